use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates a bookbinder.toml config file with the default settings
    Config,
    /// Builds the EPUB according to the contents of the config file
    Build {
        /// Path to the config file; built-in defaults apply if it is absent
        #[clap(long, default_value = "bookbinder.toml")]
        config: PathBuf,
    },
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
