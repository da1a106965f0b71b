//! Build configuration.
//!
//! Every path and external tool the pipeline touches lives here, loaded from
//! `bookbinder.toml`. All fields default to the conventional project layout,
//! so the config file is only needed to override something.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Cover image pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Rasterized cover width in pixels.
    pub width: u32,
    /// Rasterized cover height in pixels.
    pub height: u32,
    /// Program that rasterizes the SVG cover to a PNG.
    pub rasterizer: String,
    /// Program that converts the PNG cover to a JPEG.
    pub converter: String,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            width: 938,
            height: 1500,
            rasterizer: "rsvg-convert".to_string(),
            converter: "magick".to_string(),
        }
    }
}

/// Complete configuration for a bookbinder project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// YAML metadata file for the manuscript.
    pub metadata: PathBuf,
    /// Raw HTML manuscript content.
    pub content: PathBuf,
    /// Directory holding the EPUB template set.
    pub template_dir: PathBuf,
    /// Staging directory mirroring the final archive layout. Deleted and
    /// recreated on every build.
    pub staging_dir: PathBuf,
    /// Final EPUB archive path.
    pub outfile: PathBuf,
    /// Cover image pipeline settings.
    pub cover: CoverConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            metadata: PathBuf::from("inputs/metadata.yaml"),
            content: PathBuf::from("inputs/content.html"),
            template_dir: PathBuf::from("epub-template"),
            staging_dir: PathBuf::from("out_epub"),
            outfile: PathBuf::from("book.epub"),
            cover: CoverConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Load the configuration from `path`, or fall back to the defaults when
    /// no such file exists.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        let config: BuildConfig =
            toml::from_str(&contents).with_context(|| "Failed to parse TOML")?;
        Ok(config)
    }
}

/// Write a default `bookbinder.toml`, refusing to clobber an existing one.
pub fn write_default(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists, not overwriting it", path.display());
    }
    let contents = toml::to_string_pretty(&BuildConfig::default())
        .with_context(|| "Failed to serialize default configuration")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
