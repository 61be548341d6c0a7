//! Page records held by the site registry.
//!
//! All pages share one [`Page`] struct; what differs between markdown,
//! reStructuredText, templates, taxonomies, directory indices and assets is
//! captured by [`PageKind`]. The kind decides the page's type tag, analysis
//! pass, findability and metadata reader.
//!
//! Pages never own each other. Directory indices refer to their children and
//! parent through [`PageId`]s into the site's page arena.

use std::path::{Path, PathBuf};

use crate::error::MetadataError;
use crate::metadata::Metadata;
use crate::site::Site;
use crate::{asset, dir, markdown, rest, taxonomy, template};

/// Index of a page in the site's page arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub(crate) usize);

impl PageId {
    /// Raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Location of a page's source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    /// Root the file was discovered under.
    pub root: PathBuf,
    /// Path relative to `root`, `/`-separated.
    pub relpath: String,
}

impl SourceFile {
    /// Create a source file reference.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, relpath: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            relpath: relpath.into(),
        }
    }

    /// Absolute (or root-relative) path to the file on disk.
    #[must_use]
    pub fn abspath(&self) -> PathBuf {
        self.root.join(&self.relpath)
    }
}

/// Child and parent links of a directory index page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryIndex {
    /// Findable pages directly inside the directory, in discovery order.
    pub pages: Vec<PageId>,
    /// Directory index pages of direct subdirectories.
    pub subdirs: Vec<PageId>,
    /// Directory index page of the parent directory (`None` at the root).
    pub parent: Option<PageId>,
}

impl DirectoryIndex {
    /// Pages followed by subdirectories.
    pub fn children(&self) -> impl Iterator<Item = PageId> + '_ {
        self.pages.iter().chain(self.subdirs.iter()).copied()
    }
}

/// Page variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageKind {
    /// Markdown document.
    Markdown,
    /// reStructuredText document.
    Rest,
    /// Template rendered as-is (e.g. `feed.j2.xml`).
    Template,
    /// Controlled vocabulary other pages reference from front matter.
    Taxonomy {
        /// Name of the front matter field the taxonomy governs.
        name: String,
    },
    /// Synthesized directory index.
    Directory(DirectoryIndex),
    /// Static file copied verbatim.
    Asset,
}

/// Type tag of markdown pages.
pub const TYPE_MARKDOWN: &str = "markdown";
/// Type tag of reStructuredText pages.
pub const TYPE_REST: &str = "restructuredtext";
/// Type tag of template pages.
pub const TYPE_TEMPLATE: &str = "template";
/// Type tag of taxonomy pages.
pub const TYPE_TAXONOMY: &str = "taxonomy";
/// Type tag of directory index pages.
pub const TYPE_DIR: &str = "dir";
/// Type tag of static assets.
pub const TYPE_ASSET: &str = "asset";

impl PageKind {
    /// Format tag of this variant.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Markdown => TYPE_MARKDOWN,
            Self::Rest => TYPE_REST,
            Self::Template => TYPE_TEMPLATE,
            Self::Taxonomy { .. } => TYPE_TAXONOMY,
            Self::Directory(_) => TYPE_DIR,
            Self::Asset => TYPE_ASSET,
        }
    }

    /// Analysis pass this variant's metadata is resolved in.
    ///
    /// Taxonomies read the tags collected from markup pages, and directory
    /// indices summarize everything below them, so they come last.
    #[must_use]
    pub fn analyze_pass(&self) -> u32 {
        match self {
            Self::Markdown | Self::Rest | Self::Template | Self::Asset => 1,
            Self::Taxonomy { .. } => 2,
            Self::Directory(_) => 3,
        }
    }

    /// Whether pages of this variant are listed in their directory's index.
    #[must_use]
    pub fn is_findable(&self) -> bool {
        matches!(self, Self::Markdown | Self::Rest)
    }
}

/// A page in the site registry.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    /// Canonical site path; registry key.
    pub site_path: String,
    /// Source file, absent for synthesized pages.
    pub source: Option<SourceFile>,
    /// Output path relative to the build directory.
    pub dst_relpath: String,
    /// Additional site paths that redirect to this page.
    pub aliases: Vec<String>,
    /// Resolved metadata.
    pub metadata: Metadata,
    /// Variant data.
    pub kind: PageKind,
}

impl Page {
    /// Create a page.
    #[must_use]
    pub fn new(
        kind: PageKind,
        site_path: impl Into<String>,
        source: Option<SourceFile>,
        dst_relpath: impl Into<String>,
    ) -> Self {
        Self {
            site_path: site_path.into(),
            source,
            dst_relpath: dst_relpath.into(),
            aliases: Vec::new(),
            metadata: Metadata::new(),
            kind,
        }
    }

    /// Format tag (`TYPE`).
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Analysis pass (`ANALYZE_PASS`).
    #[must_use]
    pub fn analyze_pass(&self) -> u32 {
        self.kind.analyze_pass()
    }

    /// Whether the page is listed in its directory's index (`FINDABLE`).
    #[must_use]
    pub fn is_findable(&self) -> bool {
        self.kind.is_findable()
    }

    /// Source path relative to its root, if any.
    #[must_use]
    pub fn source_relpath(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.relpath.as_str())
    }

    /// Directory index links, if this is a directory page.
    #[must_use]
    pub fn as_directory(&self) -> Option<&DirectoryIndex> {
        match &self.kind {
            PageKind::Directory(index) => Some(index),
            _ => None,
        }
    }

    pub(crate) fn as_directory_mut(&mut self) -> Option<&mut DirectoryIndex> {
        match &mut self.kind {
            PageKind::Directory(index) => Some(index),
            _ => None,
        }
    }

    /// Taxonomy name, if this is a taxonomy page.
    #[must_use]
    pub fn taxonomy_name(&self) -> Option<&str> {
        match &self.kind {
            PageKind::Taxonomy { name } => Some(name),
            _ => None,
        }
    }

    /// Page title from metadata, falling back to the site path.
    #[must_use]
    pub fn title(&self) -> &str {
        self.metadata.get_str("title").unwrap_or(&self.site_path)
    }

    /// Output paths this page renders to: its destination plus one redirect
    /// stub per alias.
    #[must_use]
    pub fn target_relpaths(&self) -> Vec<String> {
        let mut res = vec![self.dst_relpath.clone()];
        res.extend(self.aliases.iter().map(|alias| index_html(alias)));
        res
    }

    /// Metadata to keep if the page's reader fails.
    ///
    /// Pages backed by a file get their modification time as `date`.
    #[must_use]
    pub fn default_metadata(&self) -> Metadata {
        let mut meta = Metadata::new();
        if matches!(self.kind, PageKind::Asset | PageKind::Directory(_)) {
            return meta;
        }
        if let Some(source) = &self.source
            && let Ok(mtime) = std::fs::metadata(source.abspath()).and_then(|m| m.modified())
        {
            meta.insert("date", crate::metadata::mtime_to_rfc3339(mtime));
        }
        meta
    }

    /// Read this page's metadata on top of `defaults`.
    ///
    /// Called once per analysis run by the scheduler, after every page of a
    /// lower pass has been resolved.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError` if the source cannot be read or parsed. The
    /// caller keeps `defaults` in that case.
    pub fn read_metadata(&self, site: &Site, defaults: Metadata) -> Result<Metadata, MetadataError> {
        match &self.kind {
            PageKind::Markdown => markdown::read_metadata(self, site, defaults),
            PageKind::Rest => rest::read_metadata(self, site, defaults),
            PageKind::Template => Ok(template::read_metadata(self, defaults)),
            PageKind::Taxonomy { name } => taxonomy::read_metadata(self, name, site, defaults),
            PageKind::Directory(index) => Ok(dir::read_metadata(self, index, site, defaults)),
            PageKind::Asset => Ok(asset::read_metadata(defaults)),
        }
    }
}

/// `<path>/index.html`, or `index.html` for the root path.
#[must_use]
pub fn index_html(site_path: &str) -> String {
    if site_path.is_empty() {
        "index.html".to_owned()
    } else {
        format!("{site_path}/index.html")
    }
}

/// Parent of a `/`-separated relative path (`""` for top-level entries).
#[must_use]
pub fn dirname(relpath: &str) -> &str {
    relpath.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// Last component of a `/`-separated relative path.
#[must_use]
pub fn basename(relpath: &str) -> &str {
    relpath.rsplit_once('/').map_or(relpath, |(_, name)| name)
}

/// Join a URL prefix and a site path with a single slash.
#[must_use]
pub fn join_link(site_root: &str, site_path: &str) -> String {
    if site_path.is_empty() {
        return site_root.to_owned();
    }
    format!("{}/{site_path}", site_root.trim_end_matches('/'))
}

/// File stem of a relative path (`blog/post.md` -> `post`).
#[must_use]
pub fn file_stem(relpath: &str) -> &str {
    Path::new(basename(relpath))
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dirname_and_basename() {
        assert_eq!(dirname("blog/2024/post.md"), "blog/2024");
        assert_eq!(dirname("about.md"), "");
        assert_eq!(dirname(""), "");
        assert_eq!(basename("blog/post.md"), "post.md");
        assert_eq!(basename("about.md"), "about.md");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("blog/post.md"), "post");
        assert_eq!(file_stem("tags.taxonomy"), "tags");
    }

    #[test]
    fn test_index_html() {
        assert_eq!(index_html(""), "index.html");
        assert_eq!(index_html("blog/post"), "blog/post/index.html");
    }

    #[test]
    fn test_join_link() {
        assert_eq!(join_link("/", ""), "/");
        assert_eq!(join_link("/", "blog"), "/blog");
        assert_eq!(join_link("https://example.org/site/", "a/b"), "https://example.org/site/a/b");
    }

    #[test]
    fn test_kind_properties() {
        assert_eq!(PageKind::Markdown.analyze_pass(), 1);
        assert_eq!(
            PageKind::Taxonomy {
                name: "tags".to_owned()
            }
            .analyze_pass(),
            2
        );
        assert_eq!(PageKind::Directory(DirectoryIndex::default()).analyze_pass(), 3);
        assert!(PageKind::Rest.is_findable());
        assert!(!PageKind::Asset.is_findable());
        assert!(!PageKind::Template.is_findable());
    }

    #[test]
    fn test_target_relpaths_include_aliases() {
        let mut page = Page::new(
            PageKind::Markdown,
            "blog/new",
            Some(SourceFile::new("/c", "blog/new.md")),
            "blog/new/index.html",
        );
        page.aliases.push("blog/old".to_owned());
        assert_eq!(
            page.target_relpaths(),
            vec!["blog/new/index.html".to_owned(), "blog/old/index.html".to_owned()]
        );
    }

    #[test]
    fn test_default_metadata_uses_mtime() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "x").unwrap();
        let page = Page::new(
            PageKind::Markdown,
            "a",
            Some(SourceFile::new(dir.path(), "a.md")),
            "a/index.html",
        );
        let meta = page.default_metadata();
        assert!(meta.get_str("date").is_some());
    }

    #[test]
    fn test_default_metadata_missing_file_is_empty() {
        let page = Page::new(
            PageKind::Markdown,
            "a",
            Some(SourceFile::new("/nonexistent", "a.md")),
            "a/index.html",
        );
        assert!(page.default_metadata().is_empty());
    }
}
