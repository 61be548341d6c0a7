//! Pass-ordered metadata resolution.
//!
//! Every registered page declares an analysis pass. Passes run in ascending
//! order and each page's metadata is read exactly once, so a page can rely
//! on everything resolved in lower passes: taxonomies (pass 2) see the tags
//! of markup pages (pass 1), directory pages (pass 3) see both.
//!
//! Taxonomy pages are collected before any metadata is read, because the
//! markup readers need the taxonomy names to recognize tag fields.

use std::collections::BTreeMap;

use crate::page::{PageId, TYPE_TAXONOMY};
use crate::site::Site;

impl Site {
    /// Resolve the metadata of every registered page, pass by pass.
    ///
    /// Metadata read failures are logged and the page keeps its default
    /// metadata; they never abort the run.
    pub fn analyze(&mut self) {
        self.taxonomies = self
            .pages()
            .filter(|(_, page)| page.type_name() == TYPE_TAXONOMY)
            .map(|(id, _)| id)
            .collect();

        let mut passes: BTreeMap<u32, Vec<PageId>> = BTreeMap::new();
        for (id, page) in self.pages() {
            passes.entry(page.analyze_pass()).or_default().push(id);
        }

        for (pass, ids) in passes {
            tracing::debug!(pass, pages = ids.len(), "Running analysis pass");
            for id in ids {
                self.resolve_metadata(id);
            }
        }
    }

    fn resolve_metadata(&mut self, id: PageId) {
        let page = self.get(id);
        let defaults = page.default_metadata();
        let metadata = match page.read_metadata(self, defaults.clone()) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(
                    path = %page.source_relpath().unwrap_or(&page.site_path),
                    error = %e,
                    "Failed to read page metadata"
                );
                defaults
            }
        };

        let aliases: Vec<String> = metadata
            .get_str_list("aliases")
            .into_iter()
            .map(str::to_owned)
            .collect();
        let new_path = metadata
            .get_str("path")
            .map(|p| p.trim_matches('/').to_owned())
            .filter(|p| *p != page.site_path);

        let page = self.get_mut(id);
        page.metadata = metadata;
        page.aliases.extend(aliases);

        if let Some(new_path) = new_path
            && let Err(e) = self.relocate(id, &new_path)
        {
            tracing::warn!(error = %e, "Relocation skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;
    use crate::site::SiteSettings;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, relpath: &str, content: &str) {
        let path = root.join(relpath);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn load(root: &Path) -> Site {
        let mut site = Site::new(SiteSettings::default());
        site.walk_content_tree(root).unwrap();
        site.synthesize_directory_indices();
        site.analyze();
        site
    }

    #[test]
    fn test_taxonomies_collected_before_markup_is_read() {
        let dir = tempfile::tempdir().unwrap();
        // Sorted discovery puts the post before the taxonomy file.
        write(dir.path(), "a-post.md", "---\ntags: rust, web\n---\nBody\n");
        write(dir.path(), "tags.taxonomy", "title: Tags\n");
        let site = load(dir.path());

        assert_eq!(site.taxonomy_names(), vec!["tags"]);
        let post = site.get_by_path("a-post").unwrap();
        assert_eq!(post.metadata.get_str_list("tags"), vec!["rust", "web"]);

        let tags = site.get_by_path("tags").unwrap();
        assert_eq!(
            tags.metadata.get("categories"),
            Some(&serde_json::json!({"rust": ["a-post"], "web": ["a-post"]}))
        );
    }

    #[test]
    fn test_unknown_field_is_not_normalized() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "post.md", "---\ntags: rust, web\n---\n");
        let site = load(dir.path());
        let post = site.get_by_path("post").unwrap();
        assert_eq!(post.metadata.get_str("tags"), Some("rust, web"));
    }

    #[test]
    fn test_malformed_front_matter_keeps_default_date() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "broken.md", "---\ntitle: [unclosed\n---\n");
        write(dir.path(), "fine.md", "# Fine\n");
        let site = load(dir.path());

        let broken = site.get_by_path("broken").unwrap();
        assert!(broken.metadata.get_str("date").is_some());
        assert!(broken.metadata.get_str("title").is_none());

        let fine = site.get_by_path("fine").unwrap();
        assert_eq!(fine.metadata.get_str("title"), Some("Fine"));
    }

    #[test]
    fn test_directory_sees_resolved_children() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "blog/one.md", "---\ndate: 2023-05-01\n---\n");
        write(dir.path(), "blog/two.md", "---\ndate: 2024-02-10 10:00\n---\n");
        let site = load(dir.path());

        let blog = site.get_by_path("blog").unwrap();
        assert_eq!(blog.metadata.get_str("date"), Some("2024-02-10T10:00:00+00:00"));
        assert_eq!(blog.title(), "Blog");
    }

    #[test]
    fn test_path_metadata_relocates_page() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "draft.md", "---\npath: posts/final\naliases: [old/one]\n---\n");
        let site = load(dir.path());

        assert!(site.get_by_path("draft").is_none());
        let page = site.get_by_path("posts/final").unwrap();
        assert_eq!(page.aliases, vec!["old/one".to_owned(), "draft".to_owned()]);
        assert_eq!(page.dst_relpath, "posts/final/index.html");
    }

    #[test]
    fn test_path_metadata_conflict_keeps_page() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "---\npath: b\n---\n");
        write(dir.path(), "b.md", "# B\n");
        let site = load(dir.path());

        assert_eq!(site.get_by_path("a").map(Page::type_name), Some("markdown"));
        assert_eq!(site.get_by_path("b").map(Page::title), Some("B"));
        assert!(site.get_by_path("a").unwrap().aliases.is_empty());
    }
}
