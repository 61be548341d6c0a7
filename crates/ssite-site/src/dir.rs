//! Directory index synthesis.
//!
//! After discovery, every directory that contains a findable page, and every
//! ancestor of such a directory up to the content root, gets a directory
//! page unless some page already occupies that path. Directory pages list
//! their direct findable children and link to the directory page above them.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use crate::metadata::{Metadata, parse_date, titlecase_from_slug};
use crate::page::{DirectoryIndex, Page, PageId, PageKind, basename, dirname, index_html};
use crate::site::Site;

impl Site {
    /// Create directory pages for every directory level holding findable
    /// pages, and link them to their parents.
    ///
    /// Levels already occupied by a page are left alone: an explicit
    /// `blog/index.md` opts `blog` out of synthesis and of parent linking.
    pub fn synthesize_directory_indices(&mut self) {
        let mut by_dir: BTreeMap<String, Vec<PageId>> = BTreeMap::new();
        for (id, page) in self.pages() {
            if !page.is_findable() {
                continue;
            }
            let Some(relpath) = page.source_relpath().filter(|p| !p.is_empty()) else {
                continue;
            };
            by_dir.entry(dirname(relpath).to_owned()).or_default().push(id);
        }

        // Fill in ancestors so parent chains have no gaps.
        let dirs: Vec<String> = by_dir.keys().cloned().collect();
        for dir in dirs {
            let mut current = dir.as_str();
            while !current.is_empty() {
                current = dirname(current);
                by_dir.entry(current.to_owned()).or_default();
            }
        }

        let mut created = Vec::new();
        for (dir, pages) in by_dir {
            if self.find(&dir).is_some() {
                tracing::debug!(path = %dir, "Directory already has a page");
                continue;
            }
            let index = DirectoryIndex {
                pages,
                ..DirectoryIndex::default()
            };
            let dst = index_html(&dir);
            let id = self.add_page(Page::new(PageKind::Directory(index), dir.clone(), None, dst));
            created.push((id, dir));
        }

        for (id, dir) in created {
            if dir.is_empty() {
                continue;
            }
            self.attach_to_parent(id, dirname(&dir));
        }
    }

    fn attach_to_parent(&mut self, id: PageId, parent_path: &str) {
        let Some(parent_id) = self.find(parent_path) else {
            return;
        };
        let Some(parent) = self.get_mut(parent_id).as_directory_mut() else {
            return;
        };
        parent.subdirs.push(id);
        if let Some(index) = self.get_mut(id).as_directory_mut() {
            index.parent = Some(parent_id);
        }
    }
}

/// Summarize a directory from its children.
///
/// The root directory takes the site title; other directories the
/// titlecased directory name. `date` is the most recent date found in the
/// directory or below it.
pub(crate) fn read_metadata(
    page: &Page,
    index: &DirectoryIndex,
    site: &Site,
    mut meta: Metadata,
) -> Metadata {
    if !meta.contains_key("title") {
        let title = if page.site_path.is_empty() {
            site.settings().title.clone()
        } else {
            titlecase_from_slug(basename(&page.site_path))
        };
        meta.insert("title", title);
    }

    if let Some(date) = newest_date(index, site) {
        meta.insert("date", date.to_rfc3339());
    }
    meta.insert("pages", index.children().count());
    meta
}

fn newest_date(index: &DirectoryIndex, site: &Site) -> Option<DateTime<FixedOffset>> {
    let pages = index
        .pages
        .iter()
        .filter_map(|&id| site.get(id).metadata.get_str("date"))
        .filter_map(|date| parse_date(date).ok());
    let subdirs = index
        .subdirs
        .iter()
        .filter_map(|&id| site.get(id).as_directory())
        .filter_map(|sub| newest_date(sub, site));
    pages.chain(subdirs).max()
}
