use blueprint_schema::{SchemaBuilder, SchemaPath};
use tracing::warn;

use crate::args::InputArgs;
use crate::util::{parse_path, print_json, read_schema};

#[derive(clap::Args)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,
    /// Dotted path of the property to remove
    #[arg(value_parser = parse_path)]
    pub path: SchemaPath,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let mut builder = SchemaBuilder::new(read_schema(&args.input.file)?);
    if !builder.has_schema_property(&args.path) {
        warn!(path = %args.path, "no such property, schema left unchanged");
    }
    builder.remove_property(&args.path);
    print_json(builder.schema(), args.input.pretty)
}
