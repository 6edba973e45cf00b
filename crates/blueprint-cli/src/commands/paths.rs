use blueprint_schema::{SchemaPath, SchemaSelector};

use crate::args::InputArgs;
use crate::util::{parse_path, read_schema};

#[derive(clap::Args)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,
    /// Paths committed by earlier sessions
    #[arg(long, value_parser = parse_path)]
    pub prior: Vec<SchemaPath>,
    /// Only list paths not yet selected
    #[arg(short, long)]
    pub remaining: bool,
}

/// Prints one dotted path per line. The root prints as an empty line.
pub fn run(args: Args) -> anyhow::Result<()> {
    let schema = read_schema(&args.input.file)?;
    let selector = SchemaSelector::new(&schema).with_prior_selections(args.prior);
    if args.remaining {
        for path in selector.remaining_paths() {
            println!("{path}");
        }
    } else {
        for path in selector.target_paths() {
            println!("{path}");
        }
    }
    Ok(())
}
