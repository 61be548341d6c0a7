//! Site registry and build pipeline.
//!
//! [`Site`] is the explicit context every phase works on: it owns the page
//! arena, the site path index, the collected taxonomies and the handler
//! chain. A build runs three strictly sequential phases over one `Site`:
//!
//! 1. discovery ([`Site::load_theme`], [`Site::walk_content_tree`])
//! 2. directory index synthesis ([`Site::synthesize_directory_indices`])
//! 3. pass-ordered analysis ([`Site::analyze`])
//!
//! # Architecture
//!
//! Pages are stored in a flat `Vec<Page>` and addressed by [`PageId`].
//! The registry maps each site path to the id of the page registered there.
//! Re-registering a path replaces the index entry; the replaced page stays in
//! the arena but is no longer reachable through [`Site::pages`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::archetype::{Archetype, Archetypes};
use crate::error::{LoadError, RelocateError};
use crate::handler::HandlerChain;
use crate::page::{Page, PageId, PageKind, index_html, join_link};
use crate::walker::list_files;

/// Inputs of a site build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteSettings {
    /// Site title, used for the root directory page.
    pub title: String,
    /// URL prefix page links are built from.
    pub site_root: String,
    /// Content root.
    pub source_dir: PathBuf,
    /// Theme root; its `static/` directory is loaded as assets.
    pub theme_dir: Option<PathBuf>,
    /// Archetype root.
    pub archetypes_dir: PathBuf,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: "Site".to_owned(),
            site_root: "/".to_owned(),
            source_dir: PathBuf::from("content"),
            theme_dir: None,
            archetypes_dir: PathBuf::from("archetypes"),
        }
    }
}

/// Site registry: the single source of truth about pages during a build.
pub struct Site {
    settings: SiteSettings,
    handlers: HandlerChain,
    pages: Vec<Page>,
    path_index: HashMap<String, PageId>,
    pub(crate) taxonomies: Vec<PageId>,
    theme_root: Option<PathBuf>,
}

impl Site {
    /// Create an empty site with the default handler chain.
    #[must_use]
    pub fn new(settings: SiteSettings) -> Self {
        Self::with_handlers(settings, HandlerChain::default())
    }

    /// Create an empty site with a custom handler chain.
    #[must_use]
    pub fn with_handlers(settings: SiteSettings, handlers: HandlerChain) -> Self {
        Self {
            settings,
            handlers,
            pages: Vec::new(),
            path_index: HashMap::new(),
            taxonomies: Vec::new(),
            theme_root: None,
        }
    }

    /// Run the whole pipeline: theme, content, directory indices, analysis.
    ///
    /// # Errors
    ///
    /// Returns the first fatal `LoadError` raised during discovery.
    pub fn build(settings: SiteSettings) -> Result<Self, LoadError> {
        let mut site = Self::new(settings);
        if let Some(theme_dir) = site.settings.theme_dir.clone() {
            site.load_theme(&theme_dir)?;
        }
        let source_dir = site.settings.source_dir.clone();
        site.walk_content_tree(&source_dir)?;
        site.synthesize_directory_indices();
        site.analyze();
        Ok(site)
    }

    /// Build settings.
    #[must_use]
    pub fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    /// Handler chain used for discovery and archetype lookup.
    #[must_use]
    pub fn handlers(&self) -> &HandlerChain {
        &self.handlers
    }

    /// Root the theme was loaded from, if any.
    #[must_use]
    pub fn theme_root(&self) -> Option<&Path> {
        self.theme_root.as_deref()
    }

    /// Register a page under its site path.
    ///
    /// A page already registered at the same path is replaced.
    pub fn add_page(&mut self, page: Page) -> PageId {
        let id = PageId(self.pages.len());
        if let Some(old) = self.path_index.insert(page.site_path.clone(), id) {
            let old = &self.pages[old.0];
            tracing::warn!(
                path = %page.site_path,
                old_source = ?old.source_relpath(),
                new_source = ?page.source_relpath(),
                "Replacing page already registered at this path"
            );
        }
        self.pages.push(page);
        id
    }

    /// Get a page by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not come from this site.
    #[must_use]
    pub fn get(&self, id: PageId) -> &Page {
        &self.pages[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: PageId) -> &mut Page {
        &mut self.pages[id.0]
    }

    /// Id of the page registered at `site_path`.
    #[must_use]
    pub fn find(&self, site_path: &str) -> Option<PageId> {
        self.path_index.get(site_path).copied()
    }

    /// Page registered at `site_path`.
    #[must_use]
    pub fn get_by_path(&self, site_path: &str) -> Option<&Page> {
        self.find(site_path).map(|id| self.get(id))
    }

    /// Registered pages in discovery order.
    pub fn pages(&self) -> impl Iterator<Item = (PageId, &Page)> + '_ {
        self.pages
            .iter()
            .enumerate()
            .map(|(i, page)| (PageId(i), page))
            .filter(|(id, page)| self.path_index.get(&page.site_path) == Some(id))
    }

    /// Number of registered pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.path_index.len()
    }

    /// Check if no page is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path_index.is_empty()
    }

    /// Absolute link to a page: the site root joined with its site path.
    #[must_use]
    pub fn site_link(&self, page: &Page) -> String {
        join_link(&self.settings.site_root, &page.site_path)
    }

    /// Taxonomy pages collected by the last analysis run.
    pub fn taxonomies(&self) -> impl Iterator<Item = &Page> + '_ {
        self.taxonomies.iter().map(|&id| self.get(id))
    }

    /// Names of the collected taxonomies.
    #[must_use]
    pub fn taxonomy_names(&self) -> Vec<&str> {
        self.taxonomies()
            .filter_map(Page::taxonomy_name)
            .collect()
    }

    /// Move a page to `new_path`, keeping its old path as an alias.
    ///
    /// # Errors
    ///
    /// Returns `RelocateError::Occupied` if a page is already registered at
    /// `new_path`; the registry is left unchanged.
    pub fn relocate(&mut self, id: PageId, new_path: &str) -> Result<(), RelocateError> {
        let old_path = self.get(id).site_path.clone();
        tracing::info!(from = %old_path, to = %new_path, "Relocating page");

        if self.path_index.contains_key(new_path) {
            return Err(RelocateError::Occupied {
                from: old_path,
                to: new_path.to_owned(),
            });
        }

        if self.path_index.get(&old_path) == Some(&id) {
            self.path_index.remove(&old_path);
        }
        self.path_index.insert(new_path.to_owned(), id);

        let page = self.get_mut(id);
        page.dst_relpath = match page.kind {
            PageKind::Template | PageKind::Asset => new_path.to_owned(),
            _ => index_html(new_path),
        };
        page.site_path = new_path.to_owned();
        page.aliases.push(old_path);
        Ok(())
    }

    /// Load a theme; its `static/` directory is registered as assets.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::ThemeAlreadyLoaded` on a second call, or an I/O
    /// error from walking the static directory.
    pub fn load_theme(&mut self, root: &Path) -> Result<(), LoadError> {
        if let Some(existing) = &self.theme_root {
            return Err(LoadError::ThemeAlreadyLoaded {
                existing: existing.clone(),
                requested: root.to_path_buf(),
            });
        }
        self.theme_root = Some(root.to_path_buf());

        let static_dir = root.join("static");
        if static_dir.is_dir() {
            self.walk_asset_tree(&static_dir)?;
        }
        Ok(())
    }

    /// Find the archetype named `name` under the configured archetype root.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the archetype tree cannot be read.
    pub fn find_archetype(&self, name: &str) -> Result<Option<Archetype>, LoadError> {
        Archetypes::new(&self.settings.archetypes_dir).find(&self.handlers, name)
    }

    /// Walk a content root, registering one page per non-hidden file.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the tree cannot be read or a handler fails to
    /// decide on a file.
    pub fn walk_content_tree(&mut self, root: &Path) -> Result<(), LoadError> {
        tracing::info!(path = %root.display(), "Loading pages from");
        for relpath in list_files(root)? {
            let page = match self.handlers.load_page(root, &relpath)? {
                Some(page) => page,
                None => crate::asset::asset_page(root, &relpath),
            };
            self.add_page(page);
        }
        Ok(())
    }

    /// Walk a static root, registering every non-hidden file as an asset.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the tree cannot be read.
    pub fn walk_asset_tree(&mut self, root: &Path) -> Result<(), LoadError> {
        tracing::info!(path = %root.display(), "Loading assets from");
        for relpath in list_files(root)? {
            tracing::debug!(path = %relpath, "Loading static file");
            self.add_page(crate::asset::asset_page(root, &relpath));
        }
        Ok(())
    }
}
