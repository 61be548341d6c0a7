//! Site ingestion and multi-pass analysis for ssite.
//!
//! This crate turns a content tree into a registry of typed pages:
//! - [`HandlerChain`]: ordered format handlers classifying each file
//! - [`Site`]: the page registry and the build pipeline
//! - Directory index synthesis and pass-ordered metadata resolution
//! - [`Archetypes`]: scaffold lookup for new content
//!
//! Rendering to HTML is left to a caller-supplied [`Renderer`].
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use ssite_site::{Site, SiteSettings};
//!
//! let site = Site::build(SiteSettings {
//!     source_dir: PathBuf::from("content"),
//!     ..SiteSettings::default()
//! })?;
//!
//! for (_, page) in site.pages() {
//!     println!("{} ({})", page.site_path, page.type_name());
//! }
//! # Ok(())
//! # }
//! ```

mod analyze;
mod archetype;
mod asset;
mod dir;
mod error;
mod handler;
mod markdown;
mod metadata;
mod page;
mod render;
mod rest;
mod site;
mod taxonomy;
mod template;
mod walker;

pub use archetype::{Archetype, ArchetypeStyle, Archetypes, LoadedArchetype};
pub use asset::asset_page;
pub use error::{LoadError, MetadataError, RelocateError};
pub use handler::{HandlerChain, PageHandler};
pub use markdown::MarkdownHandler;
pub use metadata::{
    FrontMatterStyle, Metadata, normalize_date, normalize_taxonomy_fields, parse_date,
    parse_front_matter, split_front_matter, titlecase_from_slug,
};
pub use page::{
    DirectoryIndex, Page, PageId, PageKind, SourceFile, TYPE_ASSET, TYPE_DIR, TYPE_MARKDOWN,
    TYPE_REST, TYPE_TAXONOMY, TYPE_TEMPLATE, basename, dirname, file_stem, index_html, join_link,
};
pub use render::{Renderer, Rendered, redirect_stub, render_page};
pub use rest::RestHandler;
pub use site::{Site, SiteSettings};
pub use taxonomy::TaxonomyHandler;
pub use template::TemplateHandler;
