//! Package manifest and navigation document generation.
//!
//! Three documents enumerate the chapters once their count is known: the OPF
//! package manifest, the human-readable table of contents page, and the
//! legacy NCX navigation document. Each builds a per-chapter list fragment
//! and substitutes it into its template alongside the metadata.

use anyhow::Result;
use std::fmt::Write;
use std::path::Path;

use crate::metadata::Metadata;
use crate::template;

/// First playOrder available to chapters; 1-3 belong to the front-matter
/// navPoints baked into the NCX template.
const CHAPTER_PLAY_ORDER_START: usize = 4;

/// Render `metadata.opf` with one manifest item and one spine itemref per
/// chapter.
pub fn write_package_manifest(
    template_dir: &Path,
    staging_dir: &Path,
    metadata: &Metadata,
    chapter_count: usize,
) -> Result<()> {
    let (item_list, itemref_list) = chapter_manifest_entries(chapter_count);
    let mut values = metadata.placeholders();
    values.insert("chapter_item_list".to_string(), item_list);
    values.insert("chapter_itemref_list".to_string(), itemref_list);
    template::render_file(
        &template_dir.join("metadata.opf"),
        &staging_dir.join("metadata.opf"),
        &values,
    )
}

/// Render `page-toc.xhtml` with one list entry per chapter.
pub fn write_page_toc(
    template_dir: &Path,
    staging_dir: &Path,
    metadata: &Metadata,
    chapter_count: usize,
) -> Result<()> {
    let mut values = metadata.placeholders();
    values.insert("toc_chapters".to_string(), toc_entries(chapter_count));
    template::render_file(
        &template_dir.join("page-toc.xhtml"),
        &staging_dir.join("page-toc.xhtml"),
        &values,
    )
}

/// Render `toc.ncx` with one navPoint per chapter.
pub fn write_ncx(
    template_dir: &Path,
    staging_dir: &Path,
    metadata: &Metadata,
    chapter_count: usize,
) -> Result<()> {
    let mut values = metadata.placeholders();
    values.insert("chapter_navpoints".to_string(), navpoints(chapter_count));
    template::render_file(
        &template_dir.join("toc.ncx"),
        &staging_dir.join("toc.ncx"),
        &values,
    )
}

fn chapter_manifest_entries(chapter_count: usize) -> (String, String) {
    let mut item_list = String::new();
    let mut itemref_list = String::new();
    for i in 1..=chapter_count {
        writeln!(
            item_list,
            r#"    <item id="chapter-{i:03}-xhtml" href="chapter-{i:03}.xhtml" media-type="application/xhtml+xml"/>"#
        )
        .expect("writing to a String cannot fail");
        writeln!(itemref_list, r#"    <itemref idref="chapter-{i:03}-xhtml"/>"#)
            .expect("writing to a String cannot fail");
    }
    (
        item_list.trim().to_string(),
        itemref_list.trim().to_string(),
    )
}

fn toc_entries(chapter_count: usize) -> String {
    let mut entries = String::new();
    for i in 1..=chapter_count {
        writeln!(
            entries,
            r#"      <li><a href="chapter-{i:03}.xhtml">Chapter {i}</a></li>"#
        )
        .expect("writing to a String cannot fail");
    }
    entries.trim().to_string()
}

fn navpoints(chapter_count: usize) -> String {
    let mut navpoints = String::new();
    let mut play_order = CHAPTER_PLAY_ORDER_START;
    for i in 1..=chapter_count {
        writeln!(
            navpoints,
            r#"    <navPoint id="np-{i:03}" playOrder="{play_order}">
      <navLabel>
        <text>Chapter {i}</text>
      </navLabel>
      <content src="chapter-{i:03}.xhtml" />
    </navPoint>"#
        )
        .expect("writing to a String cannot fail");
        play_order += 1;
    }
    navpoints.trim().to_string()
}
