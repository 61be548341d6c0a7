//! Taxonomy pages.
//!
//! A `tags.taxonomy` file declares that the `tags` front matter field of
//! other pages is a controlled vocabulary. The file itself is YAML:
//!
//! ```yaml
//! title: All tags
//! description: Posts grouped by tag
//! ```
//!
//! Taxonomies are resolved in pass 2, after every markup page has its
//! metadata, so the reader can group pages by category.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::archetype::Archetype;
use crate::error::{LoadError, MetadataError};
use crate::handler::PageHandler;
use crate::metadata::{FrontMatterStyle, Metadata, parse_front_matter, titlecase_from_slug};
use crate::page::{Page, PageKind, SourceFile, dirname, file_stem, index_html};
use crate::site::Site;

/// Handler for `.taxonomy` files.
pub struct TaxonomyHandler;

impl PageHandler for TaxonomyHandler {
    fn name(&self) -> &'static str {
        "taxonomy"
    }

    fn try_load_page(&self, root: &Path, relpath: &str) -> Result<Option<Page>, LoadError> {
        if !Path::new(relpath)
            .extension()
            .is_some_and(|ext| ext == "taxonomy")
        {
            return Ok(None);
        }
        let name = file_stem(relpath);
        if name.is_empty() {
            return Ok(None);
        }
        let site_path = match dirname(relpath) {
            "" => name.to_owned(),
            dir => format!("{dir}/{name}"),
        };
        let dst = index_html(&site_path);
        Ok(Some(Page::new(
            PageKind::Taxonomy {
                name: name.to_owned(),
            },
            site_path,
            Some(SourceFile::new(root, relpath)),
            dst,
        )))
    }

    fn try_load_archetype(&self, _: &Path, _: &str, _: &str) -> Option<Archetype> {
        None
    }
}

/// Read the taxonomy definition and group pages by category.
///
/// `categories` maps each value found under the `name` field of any page to
/// the site paths of the pages listing it, in discovery order.
pub(crate) fn read_metadata(
    page: &Page,
    name: &str,
    site: &Site,
    mut meta: Metadata,
) -> Result<Metadata, MetadataError> {
    let source = page.source.as_ref().ok_or(MetadataError::Missing("source"))?;
    let text = std::fs::read_to_string(source.abspath())?;
    meta.extend(parse_front_matter(&text, FrontMatterStyle::Yaml)?);

    if !meta.contains_key("title") {
        meta.insert("title", titlecase_from_slug(name));
    }
    meta.insert("categories", collect_categories(site, name));
    Ok(meta)
}

fn collect_categories(site: &Site, name: &str) -> Value {
    let mut categories: BTreeMap<&str, Vec<Value>> = BTreeMap::new();
    for (_, other) in site.pages() {
        for category in other.metadata.get_str_list(name) {
            categories
                .entry(category)
                .or_default()
                .push(Value::String(other.site_path.clone()));
        }
    }
    Value::Object(
        categories
            .into_iter()
            .map(|(category, paths)| (category.to_owned(), Value::Array(paths)))
            .collect(),
    )
}
