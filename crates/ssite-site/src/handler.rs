//! Format handlers and the ordered handler chain.
//!
//! A [`PageHandler`] looks at a path relative to a content root and decides
//! whether it claims the file. Deciding must not parse the file: metadata is
//! read later by the analysis scheduler.
//!
//! [`HandlerChain`] tries handlers in declared order and the first claim
//! wins. The default chain is:
//!
//! 1. [`MarkdownHandler`](crate::markdown::MarkdownHandler) (`.md`)
//! 2. [`RestHandler`](crate::rest::RestHandler) (`.rst`, `.rest`)
//! 3. [`TemplateHandler`](crate::template::TemplateHandler) (`*.j2*`)
//! 4. [`TaxonomyHandler`](crate::taxonomy::TaxonomyHandler) (`.taxonomy`)
//!
//! Files no handler claims become assets.

use std::path::Path;

use crate::archetype::Archetype;
use crate::error::LoadError;
use crate::markdown::MarkdownHandler;
use crate::page::Page;
use crate::rest::RestHandler;
use crate::taxonomy::TaxonomyHandler;
use crate::template::TemplateHandler;

/// Format-specific classifier for content files and archetypes.
pub trait PageHandler {
    /// Handler name for diagnostics.
    fn name(&self) -> &'static str;

    /// Claim a content file, returning its page record.
    ///
    /// `relpath` is `/`-separated and relative to `root`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the claim decision itself fails; this aborts
    /// the build.
    fn try_load_page(&self, root: &Path, relpath: &str) -> Result<Option<Page>, LoadError>;

    /// Claim an archetype file named `name`.
    ///
    /// Returns `None` when the file is not an archetype this handler knows
    /// or its stem differs from `name`.
    fn try_load_archetype(&self, archetypes: &Path, relpath: &str, name: &str)
    -> Option<Archetype>;
}

/// Handlers tried in a fixed priority order.
pub struct HandlerChain {
    handlers: Vec<Box<dyn PageHandler>>,
}

impl Default for HandlerChain {
    fn default() -> Self {
        Self::new(vec![
            Box::new(MarkdownHandler),
            Box::new(RestHandler),
            Box::new(TemplateHandler),
            Box::new(TaxonomyHandler),
        ])
    }
}

impl HandlerChain {
    /// Create a chain from handlers in priority order.
    #[must_use]
    pub fn new(handlers: Vec<Box<dyn PageHandler>>) -> Self {
        Self { handlers }
    }

    /// Handler names in priority order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.iter().map(|h| h.name())
    }

    /// Ask each handler in order; the first claim wins.
    ///
    /// # Errors
    ///
    /// Propagates the first handler failure.
    pub fn load_page(&self, root: &Path, relpath: &str) -> Result<Option<Page>, LoadError> {
        for handler in &self.handlers {
            if let Some(page) = handler.try_load_page(root, relpath)? {
                tracing::debug!(path = %relpath, handler = handler.name(), "Claimed page");
                return Ok(Some(page));
            }
        }
        Ok(None)
    }

    /// Ask each handler in order for an archetype; the first claim wins.
    #[must_use]
    pub fn load_archetype(&self, archetypes: &Path, relpath: &str, name: &str) -> Option<Archetype> {
        self.handlers
            .iter()
            .find_map(|h| h.try_load_archetype(archetypes, relpath, name))
    }
}

/// Site path of a markup document: extension stripped, and `index.<ext>`
/// standing for its directory.
pub(crate) fn markup_site_path(relpath: &str, stem: &str) -> String {
    let (dir, _) = relpath.rsplit_once('/').unwrap_or(("", relpath));
    if stem == "index" {
        dir.to_owned()
    } else if dir.is_empty() {
        stem.to_owned()
    } else {
        format!("{dir}/{stem}")
    }
}
