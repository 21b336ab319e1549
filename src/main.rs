use clap::Parser;
use prsa_processor::cli::{run, Cli};
use prsa_processor::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
