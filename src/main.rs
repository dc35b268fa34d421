use anyhow::Result;
use clap::Parser;

use colloscope::cli::{self, CliCommand};

#[derive(Debug, Parser)]
#[command(name = "colloscope", version, about = "Fortnight oral-examination timetable solver and analyzer")]
struct Args {
    #[command(subcommand)]
    command: CliCommand,
}

fn main() -> Result<()> {
    let args = Args::parse();
    cli::execute(args.command)
}
