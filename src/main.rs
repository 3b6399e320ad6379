use anyhow::Result;
use clap::Parser;
use gitdigest::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    gitdigest::logger::init(cli.verbose)?;
    cli.execute()
}
