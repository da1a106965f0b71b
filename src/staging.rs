//! Staging directory preparation.
//!
//! The staging directory mirrors the final archive's internal layout. Each
//! build starts it fresh from the template set; whatever a previous run left
//! behind is discarded.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::chapters;

/// Recreate `staging_dir` as a copy of `template_dir`.
///
/// The chapter template is not staged; it is rendered once per chapter
/// instead of being shipped verbatim.
pub fn prepare(template_dir: &Path, staging_dir: &Path) -> Result<()> {
    if staging_dir.is_dir() {
        fs::remove_dir_all(staging_dir).with_context(|| {
            format!(
                "Failed to remove previous staging directory {}",
                staging_dir.display()
            )
        })?;
    }
    copy_tree(template_dir, staging_dir)?;

    let chapter_template = staging_dir.join(chapters::CHAPTER_TEMPLATE);
    if chapter_template.exists() {
        fs::remove_file(&chapter_template)
            .with_context(|| format!("Failed to remove {}", chapter_template.display()))?;
    }
    Ok(())
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry
            .with_context(|| format!("Failed to walk template directory {}", from.display()))?;
        let relative = entry.path().strip_prefix(from)?;
        let dest = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)
                .with_context(|| format!("Failed to create {}", dest.display()))?;
        } else {
            fs::copy(entry.path(), &dest).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    dest.display()
                )
            })?;
        }
    }
    Ok(())
}
