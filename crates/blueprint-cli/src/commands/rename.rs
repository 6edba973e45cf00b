use anyhow::Context;
use blueprint_schema::{SchemaBuilder, SchemaPath};

use crate::args::InputArgs;
use crate::util::{parse_path, print_json, read_schema};

#[derive(clap::Args)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,
    /// Dotted path of the property to rename
    #[arg(value_parser = parse_path)]
    pub path: SchemaPath,
    /// New key; the property keeps its position
    pub key: String,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let mut builder = SchemaBuilder::new(read_schema(&args.input.file)?);
    builder
        .rename_property(&args.path, args.key.as_str())
        .with_context(|| format!("cannot rename `{}` to `{}`", args.path, args.key))?;
    print_json(builder.schema(), args.input.pretty)
}
