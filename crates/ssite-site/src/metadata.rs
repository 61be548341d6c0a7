//! Page metadata and front matter parsing.
//!
//! [`Metadata`] is an open mapping of string keys to JSON values (title,
//! date, tags, ...). It is filled in by the analysis scheduler, one page at a
//! time, and is otherwise read-only.
//!
//! # Front Matter
//!
//! Markup pages may start with a front matter block:
//!
//! ```text
//! ---                      +++
//! title: Hello             title = "Hello"
//! tags: rust, ssg          tags = ["rust", "ssg"]
//! ---                      +++
//! ```
//!
//! YAML is fenced by `---`, TOML by `+++`.
//!
//! # Dates
//!
//! Dates are stored normalized to RFC 3339 strings so that pages can be
//! compared and serialized without carrying a datetime type around.

use std::collections::BTreeMap;
use std::time::SystemTime;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::MetadataError;

/// Open key/value metadata attached to a page.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, Value>);

impl Metadata {
    /// Create empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a string value by key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Get a list of strings by key. Non-string items are skipped.
    #[must_use]
    pub fn get_str_list(&self, key: &str) -> Vec<&str> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(s)) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }

    /// Insert a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Check if a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Overlay `other` on top of this metadata; `other` wins on conflicts.
    pub fn extend(&mut self, other: Metadata) {
        self.0.extend(other.0);
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for Metadata {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Front matter syntax.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrontMatterStyle {
    /// `---` fenced YAML.
    Yaml,
    /// `+++` fenced TOML.
    Toml,
}

impl FrontMatterStyle {
    fn fence(self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split a document into its front matter and body.
///
/// Returns `(None, text)` when the document has no front matter. An opening
/// fence without a closing one is an error.
///
/// # Errors
///
/// Returns `MetadataError::FrontMatter` when the block is unterminated or
/// does not parse as a mapping.
pub fn split_front_matter(text: &str) -> Result<(Option<Metadata>, &str), MetadataError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let style = match text.lines().next().map(str::trim_end) {
        Some("---") => FrontMatterStyle::Yaml,
        Some("+++") => FrontMatterStyle::Toml,
        _ => return Ok((None, text)),
    };
    let fence = style.fence();

    // Offset just past the opening fence line.
    let mut offset = text.find('\n').map_or(text.len(), |i| i + 1);
    let block_start = offset;
    for line in text[offset..].split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == fence || (style == FrontMatterStyle::Yaml && trimmed == "...") {
            let block = &text[block_start..offset];
            let body = &text[offset + line.len()..];
            let meta = parse_front_matter(block, style)?;
            return Ok((Some(meta), body));
        }
        offset += line.len();
    }

    Err(MetadataError::FrontMatter(format!(
        "unterminated {fence} block"
    )))
}

/// Parse a front matter block in the given style.
///
/// # Errors
///
/// Returns `MetadataError::FrontMatter` if the block is not a valid mapping.
pub fn parse_front_matter(block: &str, style: FrontMatterStyle) -> Result<Metadata, MetadataError> {
    if block.trim().is_empty() {
        return Ok(Metadata::default());
    }
    match style {
        FrontMatterStyle::Yaml => {
            let map: BTreeMap<String, Value> = serde_yaml::from_str(block)
                .map_err(|e| MetadataError::FrontMatter(format!("Invalid YAML: {e}")))?;
            Ok(Metadata(map))
        }
        FrontMatterStyle::Toml => {
            let table: toml::Table = toml::from_str(block)
                .map_err(|e| MetadataError::FrontMatter(format!("Invalid TOML: {e}")))?;
            Ok(table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect())
        }
    }
}

/// Convert a TOML value to JSON, rendering datetimes as strings.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Normalize every field named after a taxonomy into a list of strings.
///
/// A string value is split on commas; list items are stringified.
pub fn normalize_taxonomy_fields(meta: &mut Metadata, taxonomy_names: &[&str]) {
    for name in taxonomy_names {
        let Some(value) = meta.remove(name) else {
            continue;
        };
        let items: Vec<Value> = match value {
            Value::String(s) => split_list(&s),
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_owned()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .filter(|s| !s.is_empty())
                .map(Value::String)
                .collect(),
            Value::Null => Vec::new(),
            other => vec![Value::String(other.to_string())],
        };
        meta.insert(*name, Value::Array(items));
    }
}

fn split_list(s: &str) -> Vec<Value> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Value::String(s.to_owned()))
        .collect()
}

/// Parse a date string into a timezone-aware datetime.
///
/// Accepted forms: RFC 3339, `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM:SS`,
/// and `YYYY-MM-DD`. Naive values are taken as UTC.
///
/// # Errors
///
/// Returns `MetadataError::Date` if no form matches.
pub fn parse_date(value: &str) -> Result<DateTime<FixedOffset>, MetadataError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }
    if let Some(naive) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc().fixed_offset());
    }
    Err(MetadataError::Date {
        value: value.to_owned(),
    })
}

/// Normalize the `date` field to RFC 3339, if present.
///
/// # Errors
///
/// Returns `MetadataError::Date` if the field is not a parseable date string.
pub fn normalize_date(meta: &mut Metadata) -> Result<(), MetadataError> {
    let Some(value) = meta.get("date") else {
        return Ok(());
    };
    let normalized = match value {
        Value::String(s) => parse_date(s)?.to_rfc3339(),
        other => {
            return Err(MetadataError::Date {
                value: other.to_string(),
            });
        }
    };
    meta.insert("date", normalized);
    Ok(())
}

/// Format a file modification time as an RFC 3339 UTC string.
#[must_use]
pub fn mtime_to_rfc3339(mtime: SystemTime) -> String {
    DateTime::<Utc>::from(mtime).to_rfc3339()
}

/// Convert a slug (kebab-case or `snake_case`) to title case.
///
/// Replaces `-` and `_` with spaces, then capitalizes the first letter of each word.
#[must_use]
pub fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}
