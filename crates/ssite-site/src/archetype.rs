//! Archetypes: scaffolds for new content files.
//!
//! An archetype is a markup file under the archetype root whose stem names
//! it (`archetypes/post.md` is the `post` archetype). Lookup asks each
//! handler in priority order, like page discovery does.

use std::path::{Path, PathBuf};

use crate::error::{LoadError, MetadataError};
use crate::handler::HandlerChain;
use crate::metadata::{Metadata, split_front_matter};
use crate::rest::parse_rest;
use crate::walker::list_files;

/// Markup dialect of an archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchetypeStyle {
    /// Markdown with a front matter block.
    Markdown,
    /// reStructuredText with a docinfo field list.
    Rest,
}

/// An archetype file found under the archetype root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Archetype {
    /// Markup dialect.
    pub style: ArchetypeStyle,
    /// Archetype root.
    pub root: PathBuf,
    /// Path relative to `root`.
    pub relpath: String,
}

/// Archetype contents, split but not expanded.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedArchetype {
    /// Markup dialect.
    pub style: ArchetypeStyle,
    /// Front matter or docinfo fields.
    pub front_matter: Metadata,
    /// Body lines after the front matter.
    pub body: Vec<String>,
}

impl Archetype {
    /// Create an archetype reference.
    #[must_use]
    pub fn new(style: ArchetypeStyle, root: &Path, relpath: &str) -> Self {
        Self {
            style,
            root: root.to_path_buf(),
            relpath: relpath.to_owned(),
        }
    }

    /// Path to the archetype file.
    #[must_use]
    pub fn abspath(&self) -> PathBuf {
        self.root.join(&self.relpath)
    }

    /// Read the file and split it into front matter and body.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError` if the file cannot be read or its front
    /// matter is malformed.
    pub fn load(&self) -> Result<LoadedArchetype, MetadataError> {
        let text = std::fs::read_to_string(self.abspath())?;
        let (front_matter, body) = match self.style {
            ArchetypeStyle::Markdown => {
                let (front_matter, body) = split_front_matter(&text)?;
                (front_matter.unwrap_or_default(), body.lines().map(str::to_owned).collect())
            }
            ArchetypeStyle::Rest => {
                let doc = parse_rest(&text);
                let body = text
                    .lines()
                    .skip(doc.body_start)
                    .map(str::to_owned)
                    .collect();
                (doc.docinfo, body)
            }
        };
        Ok(LoadedArchetype {
            style: self.style,
            front_matter,
            body,
        })
    }
}

/// Archetype lookup under one root.
pub struct Archetypes {
    root: PathBuf,
}

impl Archetypes {
    /// Create a lookup over `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find the archetype named `name`.
    ///
    /// Returns `Ok(None)` if the root does not exist or no handler claims a
    /// file with that stem.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the archetype tree cannot be read.
    pub fn find(&self, handlers: &HandlerChain, name: &str) -> Result<Option<Archetype>, LoadError> {
        if !self.root.is_dir() {
            tracing::debug!(path = %self.root.display(), "Archetype directory not found");
            return Ok(None);
        }
        Ok(list_files(&self.root)?
            .iter()
            .find_map(|relpath| handlers.load_archetype(&self.root, relpath, name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_find_requires_exact_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blogpost.md"), "").unwrap();
        fs::write(dir.path().join("post.md"), "").unwrap();
        fs::write(dir.path().join(".post.md"), "").unwrap();

        let archetypes = Archetypes::new(dir.path());
        let handlers = HandlerChain::default();
        let found = archetypes.find(&handlers, "post").unwrap().unwrap();
        assert_eq!(found.relpath, "post.md");
        assert_eq!(found.style, ArchetypeStyle::Markdown);
        assert!(archetypes.find(&handlers, "missing").unwrap().is_none());
    }

    #[test]
    fn test_find_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let archetypes = Archetypes::new(dir.path().join("none"));
        assert!(archetypes.find(&HandlerChain::default(), "post").unwrap().is_none());
    }

    #[test]
    fn test_load_markdown() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("post.md"),
            "---\ntitle: New post\ntags: [draft]\n---\n# Heading\n\nText\n",
        )
        .unwrap();
        let loaded = Archetype::new(ArchetypeStyle::Markdown, dir.path(), "post.md")
            .load()
            .unwrap();
        assert_eq!(loaded.front_matter.get_str("title"), Some("New post"));
        assert_eq!(loaded.body, vec!["# Heading", "", "Text"]);
    }

    #[test]
    fn test_load_rest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("note.rst"), "Note\n====\n\n:tags: x\n\nBody\n").unwrap();
        let loaded = Archetype::new(ArchetypeStyle::Rest, dir.path(), "note.rst")
            .load()
            .unwrap();
        assert_eq!(loaded.front_matter.get_str("tags"), Some("x"));
        assert_eq!(loaded.body, vec!["Body"]);
    }
}
