//! The build pipeline.
//!
//! Fully sequential: metadata, staging, static pages, cover image, chapters,
//! navigation documents, archive. Each step depends on the previous one's
//! output on disk, so nothing here is parallelised.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;

use crate::config::BuildConfig;
use crate::cover::{self, CommandRunner};
use crate::metadata::Metadata;
use crate::{archive, chapters, nav, staging, template};

/// Pages rendered straight from their template with only the metadata map.
const STATIC_PAGES: [&str; 4] = [
    "cover.svg",
    "page-cover.xhtml",
    "page-title.xhtml",
    "page-copyright.xhtml",
];

/// Statistics from a build, used for user feedback.
pub struct BuildStats {
    /// Number of chapters carved out of the manuscript
    pub chapter_count: usize,
}

/// Run the whole pipeline and produce the EPUB at `config.outfile`.
pub fn run(config: &BuildConfig, runner: &dyn CommandRunner) -> Result<BuildStats> {
    let metadata = Metadata::load(&config.metadata)?;

    staging::prepare(&config.template_dir, &config.staging_dir)?;

    let values = metadata.placeholders();
    for page in STATIC_PAGES {
        template::render_file(
            &config.template_dir.join(page),
            &config.staging_dir.join(page),
            &values,
        )?;
    }

    cover::generate(&config.cover, &config.staging_dir, runner)?;

    let content = fs::read_to_string(&config.content)
        .with_context(|| format!("Failed to read content file {}", config.content.display()))?;
    let book_chapters = chapters::split(&content);

    let progress = ProgressBar::new(book_chapters.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );
    progress.set_message("Rendering chapters...");
    chapters::render_all(
        &config.template_dir,
        &config.staging_dir,
        &metadata,
        &book_chapters,
        &progress,
    )?;
    progress.finish_with_message("Chapters rendered");

    let chapter_count = book_chapters.len();
    nav::write_package_manifest(
        &config.template_dir,
        &config.staging_dir,
        &metadata,
        chapter_count,
    )?;
    nav::write_page_toc(
        &config.template_dir,
        &config.staging_dir,
        &metadata,
        chapter_count,
    )?;
    nav::write_ncx(
        &config.template_dir,
        &config.staging_dir,
        &metadata,
        chapter_count,
    )?;

    archive::write_epub(&config.staging_dir, &config.outfile)?;

    Ok(BuildStats { chapter_count })
}
