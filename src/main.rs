use anyhow::Result;
use clap::Parser;

use estampa::cli::{Cli, Commands};
use estampa::config::Config;
use estampa::{build, init};

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Init => init::new_site(&cli.root),
        Commands::Build => {
            let config = Config::from_directory(&cli.root)?;
            build::build_site(&config)?;
            Ok(())
        }
    }
}
