use blueprint_schema::{SchemaBuilder, SchemaPath};

use crate::args::InputArgs;
use crate::util::{parse_path, print_json, read_schema};

#[derive(clap::Args)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,
    /// Dotted path of the node whose children are listed (default: root)
    #[arg(long, value_parser = parse_path)]
    pub path: Option<SchemaPath>,
    /// Print only the keys, one per line
    #[arg(short, long)]
    pub keys: bool,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let builder = SchemaBuilder::new(read_schema(&args.input.file)?);
    let properties = builder.ordered_properties(&args.path.unwrap_or_default())?;
    if args.keys {
        for property in &properties {
            println!("{}", property.key);
        }
        return Ok(());
    }
    print_json(&properties, args.input.pretty)
}
