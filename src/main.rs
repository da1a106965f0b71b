use anyhow::{Context, Result};
use cli::Cli;
use std::path::Path;
use std::process::ExitCode;

mod archive;
mod chapters;
mod cli;
mod config;
mod cover;
mod metadata;
mod nav;
mod pipeline;
mod staging;
mod template;

fn main() -> ExitCode {
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Config => config::write_default(Path::new("bookbinder.toml")),
        cli::Commands::Build { config } => {
            let config = config::BuildConfig::load(config)?;

            let stats = pipeline::run(&config, &cover::SystemRunner)
                .with_context(|| "Failed to build EPUB")?;

            println!();
            println!("  Chapters: {}", stats.chapter_count);
            println!("  EPUB:     {}", config.outfile.display());

            Ok(())
        }
    }
}
