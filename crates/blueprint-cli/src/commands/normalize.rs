use blueprint_schema::normalize;

use crate::args::{ConfigArgs, InputArgs};
use crate::util::{print_json, read_schema};

#[derive(clap::Args)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let mut schema = read_schema(&args.input.file)?;
    normalize(&mut schema, &args.config.to_config());
    print_json(&schema, args.input.pretty)
}
