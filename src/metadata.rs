//! Manuscript metadata loaded from a YAML file.
//!
//! Every field the shipped templates reference is a required struct field, so
//! a missing key is caught at load time instead of midway through rendering.
//! Values are strings; quote bare years and the like in the YAML file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub author: String,
    /// BCP 47 language tag, e.g. "en" or "en-GB".
    pub language_code: String,
    /// Unique book identifier (ISBN, DOI, or a urn:uuid).
    pub identifier: String,
    pub publisher: String,
    pub publication_year: String,
    pub rights: String,
    /// Any additional keys from the metadata file. These participate in
    /// substitution like the named fields, so templates may use
    /// project-specific placeholders.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Metadata {
    /// Load metadata from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read metadata file {}", path.display()))?;
        let metadata: Metadata = serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse metadata file {}", path.display()))?;
        Ok(metadata)
    }

    /// The placeholder map used to render every template.
    pub fn placeholders(&self) -> BTreeMap<String, String> {
        let mut map = self.extra.clone();
        map.insert("title".to_string(), self.title.clone());
        map.insert("author".to_string(), self.author.clone());
        map.insert("language_code".to_string(), self.language_code.clone());
        map.insert("identifier".to_string(), self.identifier.clone());
        map.insert("publisher".to_string(), self.publisher.clone());
        map.insert(
            "publication_year".to_string(),
            self.publication_year.clone(),
        );
        map.insert("rights".to_string(), self.rights.clone());
        map
    }
}
