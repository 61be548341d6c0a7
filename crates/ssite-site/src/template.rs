//! Template pages.
//!
//! Any file with `.j2` in its name (`feed.j2.xml`, `index.j2.html`) is a
//! template; it renders to the same path with `.j2` removed. Templates are
//! not listed in directory indices.

use std::path::Path;

use crate::archetype::Archetype;
use crate::error::LoadError;
use crate::handler::PageHandler;
use crate::metadata::{Metadata, titlecase_from_slug};
use crate::page::{Page, PageKind, SourceFile, basename, dirname, file_stem};

/// Handler for Jinja2-style templates.
pub struct TemplateHandler;

/// Remove the `.j2` marker from a template path.
fn strip_j2(relpath: &str) -> Option<String> {
    let name = basename(relpath);
    let stripped = name.replacen(".j2", "", 1);
    if stripped == name || stripped.is_empty() {
        return None;
    }
    Some(match dirname(relpath) {
        "" => stripped,
        dir => format!("{dir}/{stripped}"),
    })
}

impl PageHandler for TemplateHandler {
    fn name(&self) -> &'static str {
        "template"
    }

    fn try_load_page(&self, root: &Path, relpath: &str) -> Result<Option<Page>, LoadError> {
        let Some(target) = strip_j2(relpath) else {
            return Ok(None);
        };
        Ok(Some(Page::new(
            PageKind::Template,
            target.clone(),
            Some(SourceFile::new(root, relpath)),
            target,
        )))
    }

    fn try_load_archetype(&self, _: &Path, _: &str, _: &str) -> Option<Archetype> {
        None
    }
}

/// Templates carry no front matter; the title comes from the output name.
pub(crate) fn read_metadata(page: &Page, mut meta: Metadata) -> Metadata {
    if !meta.contains_key("title") {
        meta.insert("title", titlecase_from_slug(file_stem(&page.dst_relpath)));
    }
    meta
}
