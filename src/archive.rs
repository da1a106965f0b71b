//! Final EPUB archive assembly.
//!
//! Walks the staging directory and writes every file into the output zip
//! under its staging-relative name. The `mimetype` entry goes first and is
//! stored uncompressed as the EPUB container requires; everything else is
//! deflated.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Zip the full contents of `staging_dir` into `outfile`.
pub fn write_epub(staging_dir: &Path, outfile: &Path) -> Result<()> {
    let file = File::create(outfile)
        .with_context(|| format!("Failed to create {}", outfile.display()))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(staging_dir) {
        let entry = entry.with_context(|| {
            format!("Failed to walk staging directory {}", staging_dir.display())
        })?;
        if entry.file_type().is_file() {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    if let Some(pos) = paths.iter().position(|p| *p == staging_dir.join("mimetype")) {
        let mimetype = paths.remove(pos);
        paths.insert(0, mimetype);
    }

    for path in &paths {
        let relative = path.strip_prefix(staging_dir)?;
        let name = relative.to_string_lossy().replace('\\', "/");
        let options = if name == "mimetype" {
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored)
        } else {
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated)
        };
        zip.start_file(&name, options)
            .with_context(|| format!("Failed to add {name} to archive"))?;
        let mut source = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        std::io::copy(&mut source, &mut zip)
            .with_context(|| format!("Failed to write {name} to archive"))?;
    }

    zip.finish().with_context(|| "Failed to finalise archive")?;
    println!("Wrote {}", outfile.display());
    Ok(())
}
