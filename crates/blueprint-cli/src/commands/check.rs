use anyhow::bail;
use blueprint_schema::check_structure;

use crate::args::InputArgs;
use crate::util::{display_path, read_schema};

#[derive(clap::Args)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,
    /// Suppress output on success
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let schema = read_schema(&args.input.file)?;
    let issues = check_structure(&schema);
    let file = display_path(&args.input.file);

    if issues.is_empty() {
        if !args.quiet {
            println!("{file}: ok");
        }
        return Ok(());
    }
    for issue in &issues {
        eprintln!("{file}: {issue}");
    }
    bail!("{} structural issue(s) in {file}", issues.len())
}
