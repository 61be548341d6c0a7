//! Static assets.
//!
//! Every file no handler claims, and every file under a theme's `static/`
//! directory, becomes an asset: copied verbatim to the same relative path.

use std::path::Path;

use crate::metadata::Metadata;
use crate::page::{Page, PageKind, SourceFile};

/// Create the asset record for `relpath` under `root`.
#[must_use]
pub fn asset_page(root: &Path, relpath: &str) -> Page {
    Page::new(
        PageKind::Asset,
        relpath,
        Some(SourceFile::new(root, relpath)),
        relpath,
    )
}

/// Assets carry no metadata of their own.
pub(crate) fn read_metadata(defaults: Metadata) -> Metadata {
    defaults
}
