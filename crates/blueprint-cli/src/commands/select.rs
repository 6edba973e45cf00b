use anyhow::{Context, bail};
use blueprint_schema::{SchemaPath, SchemaSelector};

use crate::args::InputArgs;
use crate::util::{parse_path, print_json, read_schema};

#[derive(clap::Args)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,
    /// Paths to select, in order (repeatable)
    #[arg(long, value_parser = parse_path)]
    pub path: Vec<SchemaPath>,
    /// Paths committed by earlier sessions
    #[arg(long, value_parser = parse_path)]
    pub prior: Vec<SchemaPath>,
    /// Select every remaining path
    #[arg(short, long, conflicts_with = "path")]
    pub all: bool,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let schema = read_schema(&args.input.file)?;
    let mut selector = SchemaSelector::new(&schema).with_prior_selections(args.prior);
    if args.all {
        selector.select_all();
    } else {
        for path in &args.path {
            selector
                .select(path)
                .with_context(|| format!("cannot select `{path}`"))?;
        }
    }

    let Some(selection) = selector.get_selection() else {
        bail!("nothing selected");
    };
    print_json(&selection, args.input.pretty)
}
