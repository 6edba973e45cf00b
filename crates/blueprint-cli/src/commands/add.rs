use anyhow::Context;
use blueprint_schema::{JsonSchema, SchemaBuilder, SchemaPath, SchemaType};

use crate::args::{ConfigArgs, InputArgs};
use crate::util::{parse_path, parse_schema_type, print_json, read_schema};

#[derive(clap::Args)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,
    /// Dotted path of the new property; missing parents are created
    #[arg(value_parser = parse_path)]
    pub path: SchemaPath,
    /// Type of the new property
    #[arg(short, long, value_parser = parse_schema_type, default_value = "string")]
    pub r#type: SchemaType,
    /// Full JSON definition of the new property (overrides --type)
    #[arg(short, long)]
    pub definition: Option<String>,
    /// Sibling path to place the new key after in `required`
    #[arg(short, long, value_parser = parse_path)]
    pub after: Option<SchemaPath>,
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let definition = match &args.definition {
        Some(json) => serde_json::from_str::<JsonSchema>(json)
            .context("--definition is not a JSON schema")?,
        None => JsonSchema::new(args.r#type),
    };

    let schema = read_schema(&args.input.file)?;
    let mut builder = SchemaBuilder::with_config(schema, args.config.to_config());
    builder
        .add_property(&args.path, definition, args.after.as_ref())
        .with_context(|| format!("cannot add `{}`", args.path))?;
    print_json(builder.schema(), args.input.pretty)
}
