//! Markdown pages.
//!
//! `blog/post.md` becomes site path `blog/post`; `blog/index.md` stands for
//! the `blog` directory itself. Metadata comes from the YAML or TOML front
//! matter block.

use std::path::Path;

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use crate::archetype::{Archetype, ArchetypeStyle};
use crate::error::{LoadError, MetadataError};
use crate::handler::{PageHandler, markup_site_path};
use crate::metadata::{
    Metadata, normalize_date, normalize_taxonomy_fields, split_front_matter, titlecase_from_slug,
};
use crate::page::{Page, PageKind, SourceFile, file_stem, index_html};
use crate::site::Site;

/// Handler for `.md` files.
pub struct MarkdownHandler;

fn is_markdown(relpath: &str) -> bool {
    Path::new(relpath)
        .extension()
        .is_some_and(|ext| ext == "md")
}

impl PageHandler for MarkdownHandler {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn try_load_page(&self, root: &Path, relpath: &str) -> Result<Option<Page>, LoadError> {
        if !is_markdown(relpath) {
            return Ok(None);
        }
        let site_path = markup_site_path(relpath, file_stem(relpath));
        let dst = index_html(&site_path);
        Ok(Some(Page::new(
            PageKind::Markdown,
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
        (is_markdown(relpath) && file_stem(relpath) == name)
            .then(|| Archetype::new(ArchetypeStyle::Markdown, archetypes, relpath))
    }
}

/// Read front matter and title of a markdown page.
///
/// Title policy: an explicit `title` in the front matter wins, then the
/// first level-one heading of the body, then the titlecased file stem.
pub(crate) fn read_metadata(
    page: &Page,
    site: &Site,
    mut meta: Metadata,
) -> Result<Metadata, MetadataError> {
    let source = page.source.as_ref().ok_or(MetadataError::Missing("source"))?;
    let text = std::fs::read_to_string(source.abspath())?;

    let (front_matter, body) = split_front_matter(&text)?;
    if let Some(mut front_matter) = front_matter {
        normalize_taxonomy_fields(&mut front_matter, &site.taxonomy_names());
        meta.extend(front_matter);
    }
    normalize_date(&mut meta)?;

    if !meta.contains_key("title") {
        let title = first_heading(body)
            .unwrap_or_else(|| titlecase_from_slug(file_stem(&source.relpath)));
        meta.insert("title", title);
    }

    Ok(meta)
}

/// Text of the first level-one heading.
fn first_heading(markdown: &str) -> Option<String> {
    let mut in_h1 = false;
    let mut title = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_h1 = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                let title = title.trim();
                return (!title.is_empty()).then(|| title.to_owned());
            }
            Event::Text(text) | Event::Code(text) if in_h1 => title.push_str(&text),
            _ => {}
        }
    }
    None
}
