use anyhow::Context;
use blueprint_schema::{SchemaBuilder, SchemaPatch, SchemaPath};

use crate::args::{ConfigArgs, InputArgs};
use crate::util::{parse_path, print_json, read_schema};

#[derive(clap::Args)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,
    /// Dotted path of the property to update (empty for the root)
    #[arg(value_parser = parse_path)]
    pub path: SchemaPath,
    /// Patch as JSON: `{"key": "new_name", "schema": {"type": "array", "minItems": null}}`
    #[arg(long)]
    pub patch: String,
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let patch: SchemaPatch = serde_json::from_str(&args.patch).context("--patch is not valid")?;

    let schema = read_schema(&args.input.file)?;
    let mut builder = SchemaBuilder::with_config(schema, args.config.to_config());
    builder
        .update_property(&args.path, patch)
        .with_context(|| format!("cannot update `{}`", args.path))?;
    print_json(builder.schema(), args.input.pretty)
}
