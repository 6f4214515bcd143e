//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// estampa static-blog generator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Site directory; `build` also searches parent directories for
    /// `estampa.yaml`
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate post pages and splice the site files
    Build,

    /// Scaffold a fresh site in the root directory
    Init,
}
