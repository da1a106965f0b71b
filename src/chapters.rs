//! Chapter splitting and rendering.
//!
//! The manuscript is one HTML file with `<p>chapter</p>` marker paragraphs
//! between chapters. Splitting on the marker yields the chapter bodies; each
//! body is cleaned up and rendered through the chapter template into its own
//! numbered XHTML file.

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::metadata::Metadata;
use crate::template;

/// The chapter template is rendered once per chapter and never shipped as-is.
pub const CHAPTER_TEMPLATE: &str = "chapter-template.xhtml";

/// Matches the chapter marker paragraph, case-insensitively, with optional
/// `<strong>` emphasis around the word. The `>` of the opening tag is
/// optional, matching the marker's historical form in manuscripts.
static CHAPTER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<p>?\s*(?:<strong>)?\s*chapter\s*(?:</strong>)?\s*</p>")
        .expect("BUG: invalid CHAPTER_MARKER regex literal")
});

/// The empty-emphasis-plus-asterisk paragraph idiom some manuscripts use for
/// a scene break.
static SECTION_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<p><em>\s*</em>\s*\*</p>").expect("BUG: invalid SECTION_BREAK regex literal")
});

/// One chapter carved out of the manuscript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// 1-based ordinal in source order.
    pub number: usize,
    /// Cleaned HTML body.
    pub body: String,
}

impl Chapter {
    pub fn padded_number(&self) -> String {
        format!("{:03}", self.number)
    }

    pub fn file_name(&self) -> String {
        format!("chapter-{:03}.xhtml", self.number)
    }
}

/// Split raw manuscript content into chapters.
///
/// A chapter is the text following a marker. Whatever precedes the first
/// marker is front matter and is never counted; it only becomes a chapter
/// when the manuscript has no markers at all. Segments that are empty or
/// whitespace-only after cleanup (artifacts of consecutive markers) are
/// dropped without consuming a chapter number.
pub fn split(content: &str) -> Vec<Chapter> {
    let segments: Vec<&str> = CHAPTER_MARKER.split(content).collect();
    let segments = if segments.len() > 1 {
        &segments[1..]
    } else {
        &segments[..]
    };

    let mut chapters = Vec::new();
    for segment in segments {
        let body = clean_segment(segment);
        if body.trim().is_empty() {
            log::debug!("dropping empty segment between chapter markers");
            continue;
        }
        chapters.push(Chapter {
            number: chapters.len() + 1,
            body,
        });
    }
    chapters
}

/// Normalise entities and idioms the chapter template expects to be resolved.
fn clean_segment(segment: &str) -> String {
    let segment = segment.replace("&nbsp;", "\u{00A0}");
    SECTION_BREAK
        .replace_all(&segment, r#"<p class="section-break">*</p>"#)
        .into_owned()
}

/// Render every chapter through the chapter template into the staging
/// directory, one `chapter-NNN.xhtml` file per chapter.
pub fn render_all(
    template_dir: &Path,
    staging_dir: &Path,
    metadata: &Metadata,
    chapters: &[Chapter],
    progress: &ProgressBar,
) -> Result<()> {
    let template_path = template_dir.join(CHAPTER_TEMPLATE);
    let raw = fs::read_to_string(&template_path)
        .with_context(|| format!("Failed to read template {}", template_path.display()))?;

    for chapter in chapters {
        let mut values = metadata.placeholders();
        values.insert("chapter_number".to_string(), chapter.number.to_string());
        values.insert("chapter_number_padded".to_string(), chapter.padded_number());
        values.insert("chapter_content".to_string(), chapter.body.clone());

        let rendered = template::substitute(&raw, &values)
            .with_context(|| format!("Failed to render chapter {}", chapter.number))?;
        let out_path = staging_dir.join(chapter.file_name());
        fs::write(&out_path, rendered)
            .with_context(|| format!("Failed to write {}", out_path.display()))?;
        progress.println(format!("Wrote {}", out_path.display()));
        progress.inc(1);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn splits_on_plain_markers() {
        let content = "<p>Chapter</p><p>Hello</p><p>Chapter</p><p>World</p>";
        let chapters = split(content);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].number, 1);
        assert_eq!(chapters[0].body, "<p>Hello</p>");
        assert_eq!(chapters[1].number, 2);
        assert_eq!(chapters[1].body, "<p>World</p>");
    }

    #[test]
    fn leading_front_matter_is_discarded() {
        let content = "<p>Front matter</p><p>Chapter</p><p>Body</p>";
        let chapters = split(content);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].number, 1);
        assert_eq!(chapters[0].body, "<p>Body</p>");
    }

    #[test]
    fn n_markers_yield_n_chapters_despite_front_matter() {
        let content = "<p>Preface text</p><p>Chapter</p><p>a</p><p>Chapter</p><p>b</p>";
        let chapters = split(content);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].body, "<p>a</p>");
        assert_eq!(chapters[1].body, "<p>b</p>");
    }

    #[test]
    fn marker_is_case_insensitive_and_allows_strong() {
        let content = "<p>CHAPTER</p><p>One</p><p> <strong> chapter </strong> </p><p>Two</p>";
        let chapters = split(content);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[1].body, "<p>Two</p>");
    }

    #[test]
    fn whitespace_only_leading_segment_produces_no_chapter() {
        let chapters = split("   \n\t<p>Chapter</p><p>Body</p>");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].body, "<p>Body</p>");
    }

    #[test]
    fn consecutive_markers_do_not_consume_numbers() {
        let content = "<p>Chapter</p><p>Chapter</p><p>Body</p>";
        let chapters = split(content);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].number, 1);
    }

    #[test]
    fn no_marker_yields_one_chapter_with_everything() {
        let chapters = split("<p>Just one long story.</p>");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].body, "<p>Just one long story.</p>");
    }

    #[test]
    fn all_whitespace_content_yields_no_chapters() {
        assert!(split("  \n  ").is_empty());
    }

    #[test]
    fn nbsp_entity_becomes_the_literal_character() {
        let chapters = split("<p>Chapter</p><p>a&nbsp;b</p>");
        assert_eq!(chapters[0].body, "<p>a\u{00A0}b</p>");
        assert!(!chapters[0].body.contains("&nbsp;"));
    }

    #[test]
    fn section_break_idiom_is_rewritten() {
        let chapters = split("<p>Chapter</p><p>a</p><p><em> </em> *</p><p>b</p>");
        assert_eq!(
            chapters[0].body,
            r#"<p>a</p><p class="section-break">*</p><p>b</p>"#
        );
    }

    #[test]
    fn ordinals_are_contiguous_and_filenames_padded() {
        let content = "<p>Chapter</p><p>a</p><p>Chapter</p><p>b</p><p>Chapter</p><p>c</p>";
        let chapters = split(content);
        let numbers: Vec<usize> = chapters.iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(chapters[0].file_name(), "chapter-001.xhtml");
        assert_eq!(chapters[2].file_name(), "chapter-003.xhtml");
        assert_eq!(chapters[2].padded_number(), "003");
    }

    #[test]
    fn render_all_writes_one_file_per_chapter() {
        let dir = tempfile::TempDir::new().unwrap();
        let template_dir = dir.path().join("template");
        let staging_dir = dir.path().join("staging");
        fs::create_dir_all(&template_dir).unwrap();
        fs::create_dir_all(&staging_dir).unwrap();
        fs::write(
            template_dir.join(CHAPTER_TEMPLATE),
            "<h2>Chapter $chapter_number of $title</h2>\n$chapter_content",
        )
        .unwrap();

        let metadata: Metadata = serde_yaml::from_str(
            r#"
title: "T"
author: "A"
language_code: "en"
identifier: "id"
publisher: "P"
publication_year: "2026"
rights: "R"
"#,
        )
        .unwrap();
        let chapters = split("<p>Chapter</p><p>One</p><p>Chapter</p><p>Two</p>");
        let progress = ProgressBar::hidden();
        render_all(&template_dir, &staging_dir, &metadata, &chapters, &progress).unwrap();

        let first = fs::read_to_string(staging_dir.join("chapter-001.xhtml")).unwrap();
        assert_eq!(first, "<h2>Chapter 1 of T</h2>\n<p>One</p>");
        assert!(staging_dir.join("chapter-002.xhtml").exists());
        assert!(!staging_dir.join("chapter-003.xhtml").exists());
    }
}
