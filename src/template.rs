//! Placeholder substitution for template files.
//!
//! Templates use `$name` or `${name}` tokens; `$$` produces a literal dollar
//! sign. Substitution is strict: a token whose name is missing from the value
//! map is an error, as is a `$` that introduces no valid token. The template
//! set only needs plain substitution, so a small scanner is used instead of a
//! template engine.

use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Substitute every placeholder in `template` with its value from `values`.
pub fn substitute(template: &str, values: &BTreeMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(at) = rest.find('$') {
        out.push_str(&rest[..at]);
        let after = &rest[at + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
        } else if let Some(tail) = after.strip_prefix('{') {
            let Some(end) = tail.find('}') else {
                bail!("unterminated '${{' placeholder");
            };
            let name = &tail[..end];
            if name.is_empty() || identifier_len(name) != name.len() {
                bail!("invalid placeholder name '{name}'");
            }
            out.push_str(lookup(values, name)?);
            rest = &tail[end + 1..];
        } else {
            let len = identifier_len(after);
            if len == 0 {
                bail!("stray '$' with no placeholder name");
            }
            out.push_str(lookup(values, &after[..len])?);
            rest = &after[len..];
        }
    }

    out.push_str(rest);
    Ok(out)
}

/// Render the template at `template_path` and write the result to `out_path`,
/// overwriting any existing file.
pub fn render_file(
    template_path: &Path,
    out_path: &Path,
    values: &BTreeMap<String, String>,
) -> Result<()> {
    let raw = fs::read_to_string(template_path)
        .with_context(|| format!("Failed to read template {}", template_path.display()))?;
    let rendered = substitute(&raw, values)
        .with_context(|| format!("Failed to render template {}", template_path.display()))?;
    fs::write(out_path, rendered)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;
    log::debug!("rendered {} -> {}", template_path.display(), out_path.display());
    println!("Wrote {}", out_path.display());
    Ok(())
}

fn lookup<'a>(values: &'a BTreeMap<String, String>, name: &str) -> Result<&'a str> {
    match values.get(name) {
        Some(value) => Ok(value.as_str()),
        None => bail!("template references undefined placeholder '{name}'"),
    }
}

/// Length of the leading placeholder identifier in `s`, zero if none.
/// Identifiers are ASCII: a letter or underscore, then letters, digits,
/// underscores.
fn identifier_len(s: &str) -> usize {
    let mut len = 0;
    for (i, c) in s.char_indices() {
        let valid = if i == 0 {
            c.is_ascii_alphabetic() || c == '_'
        } else {
            c.is_ascii_alphanumeric() || c == '_'
        };
        if !valid {
            break;
        }
        len = i + c.len_utf8();
    }
    len
}
