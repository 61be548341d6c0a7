//! reStructuredText pages.
//!
//! Metadata comes from the docinfo field list at the top of the document:
//!
//! ```text
//! Release notes
//! =============
//!
//! :date: 2024-03-01
//! :tags: release, news
//! ```
//!
//! Only the document title and docinfo are parsed here; converting the body
//! to HTML is left to the renderer.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::archetype::{Archetype, ArchetypeStyle};
use crate::error::{LoadError, MetadataError};
use crate::handler::{PageHandler, markup_site_path};
use crate::metadata::{Metadata, normalize_date, normalize_taxonomy_fields, titlecase_from_slug};
use crate::page::{Page, PageKind, SourceFile, file_stem, index_html};
use crate::site::Site;

static FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:([^:\s][^:]*):(?:\s+(.*))?$").unwrap());

/// Handler for `.rst` and `.rest` files.
pub struct RestHandler;

fn is_rest(relpath: &str) -> bool {
    Path::new(relpath)
        .extension()
        .is_some_and(|ext| ext == "rst" || ext == "rest")
}

impl PageHandler for RestHandler {
    fn name(&self) -> &'static str {
        "restructuredtext"
    }

    fn try_load_page(&self, root: &Path, relpath: &str) -> Result<Option<Page>, LoadError> {
        if !is_rest(relpath) {
            return Ok(None);
        }
        let site_path = markup_site_path(relpath, file_stem(relpath));
        let dst = index_html(&site_path);
        Ok(Some(Page::new(
            PageKind::Rest,
            site_path,
            Some(SourceFile::new(root, relpath)),
            dst,
        )))
    }

    fn try_load_archetype(
        &self,
        archetypes: &Path,
        relpath: &str,
        name: &str,
    ) -> Option<Archetype> {
        (is_rest(relpath) && file_stem(relpath) == name)
            .then(|| Archetype::new(ArchetypeStyle::Rest, archetypes, relpath))
    }
}

/// Title, docinfo and body of a reStructuredText document.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct RestDocument {
    pub title: Option<String>,
    pub docinfo: Metadata,
    pub body_start: usize,
}

fn is_adornment(line: &str) -> bool {
    let line = line.trim_end();
    let mut chars = line.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    line.len() >= 2 && first.is_ascii_punctuation() && chars.all(|c| c == first)
}

/// Parse the document title and the docinfo field list.
///
/// `body_start` is the index of the first line after the docinfo.
pub(crate) fn parse_rest(text: &str) -> RestDocument {
    let lines: Vec<&str> = text.lines().collect();
    let skip_blank = |mut i: usize| {
        while i < lines.len() && lines[i].trim().is_empty() {
            i += 1;
        }
        i
    };

    let mut doc = RestDocument::default();
    let mut i = skip_blank(0);

    // Title with overline and underline, or with underline only.
    if i + 2 < lines.len()
        && is_adornment(lines[i])
        && !lines[i + 1].trim().is_empty()
        && is_adornment(lines[i + 2])
    {
        doc.title = Some(lines[i + 1].trim().to_owned());
        i = skip_blank(i + 3);
    } else if i + 1 < lines.len()
        && !FIELD_RE.is_match(lines[i])
        && is_adornment(lines[i + 1])
        && lines[i + 1].trim_end().chars().count() >= lines[i].trim().chars().count()
    {
        doc.title = Some(lines[i].trim().to_owned());
        i = skip_blank(i + 2);
    }

    while i < lines.len() {
        let Some(caps) = FIELD_RE.captures(lines[i]) else {
            break;
        };
        let name = caps[1].trim().to_lowercase();
        let mut value = caps.get(2).map_or("", |m| m.as_str()).trim().to_owned();
        i += 1;
        while i < lines.len() && lines[i].starts_with([' ', '\t']) && !lines[i].trim().is_empty() {
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(lines[i].trim());
            i += 1;
        }
        doc.docinfo.insert(name, Value::String(value));
    }

    doc.body_start = skip_blank(i);
    doc
}

/// Read docinfo and title of a reStructuredText page.
///
/// Title policy: an explicit `:title:` field wins, then the document title,
/// then the titlecased file stem.
pub(crate) fn read_metadata(
    page: &Page,
    site: &Site,
    mut meta: Metadata,
) -> Result<Metadata, MetadataError> {
    let source = page.source.as_ref().ok_or(MetadataError::Missing("source"))?;
    let text = std::fs::read_to_string(source.abspath())?;

    let RestDocument {
        title,
        mut docinfo,
        ..
    } = parse_rest(&text);
    normalize_taxonomy_fields(&mut docinfo, &site.taxonomy_names());
    meta.extend(docinfo);
    normalize_date(&mut meta)?;

    if !meta.contains_key("title") {
        let title = title.unwrap_or_else(|| titlecase_from_slug(file_stem(&source.relpath)));
        meta.insert("title", title);
    }

    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_claims_rst_and_rest() {
        let root = Path::new("/content");
        assert!(RestHandler.try_load_page(root, "a.rst").unwrap().is_some());
        assert!(RestHandler.try_load_page(root, "a.rest").unwrap().is_some());
        assert!(RestHandler.try_load_page(root, "a.md").unwrap().is_none());
    }

    #[test]
    fn test_index_rest_takes_directory_path() {
        let page = RestHandler
            .try_load_page(Path::new("/content"), "docs/index.rest")
            .unwrap()
            .unwrap();
        assert_eq!(page.site_path, "docs");
        assert_eq!(page.type_name(), "restructuredtext");
    }

    #[test]
    fn test_parse_title_and_docinfo() {
        let text = "Release notes\n=============\n\n:date: 2024-03-01\n:tags: release,\n    news\n\nBody text.\n";
        let doc = parse_rest(text);
        assert_eq!(doc.title.as_deref(), Some("Release notes"));
        assert_eq!(doc.docinfo.get_str("date"), Some("2024-03-01"));
        assert_eq!(doc.docinfo.get_str("tags"), Some("release, news"));
        assert_eq!(doc.body_start, 7);
    }

    #[test]
    fn test_parse_non_ascii_title_keeps_docinfo() {
        let doc = parse_rest("Café\n====\n\n:tags: x\n:date: 2024-01-02\n");
        assert_eq!(doc.title.as_deref(), Some("Café"));
        assert_eq!(doc.docinfo.get_str("tags"), Some("x"));
        assert_eq!(doc.docinfo.get_str("date"), Some("2024-01-02"));
    }

    #[test]
    fn test_parse_overlined_title() {
        let doc = parse_rest("=====\nTitle\n=====\n\n:author: me\n");
        assert_eq!(doc.title.as_deref(), Some("Title"));
        assert_eq!(doc.docinfo.get_str("author"), Some("me"));
    }

    #[test]
    fn test_parse_docinfo_without_title() {
        let doc = parse_rest(":Title: Explicit\n:path: moved/here\n\nText");
        assert!(doc.title.is_none());
        assert_eq!(doc.docinfo.get_str("title"), Some("Explicit"));
        assert_eq!(doc.docinfo.get_str("path"), Some("moved/here"));
    }

    #[test]
    fn test_parse_plain_document() {
        let doc = parse_rest("Just a paragraph.\n");
        assert!(doc.title.is_none());
        assert!(doc.docinfo.is_empty());
        assert_eq!(doc.body_start, 0);
    }

    #[test]
    fn test_archetype_lookup() {
        let root = Path::new("/archetypes");
        assert!(RestHandler.try_load_archetype(root, "note.rst", "note").is_some());
        assert!(RestHandler.try_load_archetype(root, "note.md", "note").is_none());
        assert!(RestHandler.try_load_archetype(root, "footnote.rst", "note").is_none());
    }
}
