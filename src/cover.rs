//! Cover image pipeline.
//!
//! The rendered SVG cover is rasterized to a fixed-size PNG, the PNG is then
//! converted to JPEG, and both intermediates are removed. Two external tools
//! are needed: the rasterizer only produces PNG, and the tools that convert
//! SVG straight to JPEG do not support every SVG feature the cover templates
//! use.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::process::Command;

use crate::config::CoverConfig;

/// Runs external programs on behalf of the pipeline. Tests substitute a
/// recording fake so the cover step is deterministic without the real tools.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<()>;
}

/// Spawns the program and waits for it to finish. A program that cannot be
/// spawned is an error; a non-zero exit only earns a warning, and a later
/// step then fails on the missing output file.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        log::debug!("running {} {}", program, args.join(" "));
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("Failed to run `{program}`"))?;
        if !status.success() {
            eprintln!(
                "{}: `{}` exited with {}",
                console::style("Warning").yellow(),
                program,
                status
            );
        }
        Ok(())
    }
}

/// Produce `cover.jpg` in the staging directory from the already-rendered
/// `cover.svg`, removing the SVG and the intermediate PNG.
pub fn generate(config: &CoverConfig, staging_dir: &Path, runner: &dyn CommandRunner) -> Result<()> {
    let svg_path = staging_dir.join("cover.svg");
    let png_path = staging_dir.join("cover.png");
    let jpg_path = staging_dir.join("cover.jpg");

    runner.run(
        &config.rasterizer,
        &[
            "-h".to_string(),
            config.height.to_string(),
            "-w".to_string(),
            config.width.to_string(),
            "--format".to_string(),
            "png".to_string(),
            "--output".to_string(),
            png_path.display().to_string(),
            svg_path.display().to_string(),
        ],
    )?;
    runner.run(
        &config.converter,
        &[png_path.display().to_string(), jpg_path.display().to_string()],
    )?;

    fs::remove_file(&svg_path)
        .with_context(|| format!("Failed to remove intermediate {}", svg_path.display()))?;
    fs::remove_file(&png_path)
        .with_context(|| format!("Failed to remove intermediate {}", png_path.display()))?;
    println!("Wrote {}", jpg_path.display());
    Ok(())
}

/// Records invocations and emulates the tools' output files: the rasterizer
/// writes the path following `--output`, the converter writes its second
/// argument.
#[cfg(test)]
pub(crate) struct FakeRunner {
    pub calls: std::cell::RefCell<Vec<(String, Vec<String>)>>,
}

#[cfg(test)]
impl FakeRunner {
    pub fn new() -> Self {
        Self {
            calls: std::cell::RefCell::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        if let Some(pos) = args.iter().position(|a| a == "--output") {
            fs::write(&args[pos + 1], b"png")?;
        } else if let [_, output] = args {
            fs::write(output, b"jpg")?;
        }
        self.calls
            .borrow_mut()
            .push((program.to_string(), args.to_vec()));
        Ok(())
    }
}
