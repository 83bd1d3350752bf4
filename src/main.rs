use anyhow::Result;
use clap::Parser;

use detect_primes::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
