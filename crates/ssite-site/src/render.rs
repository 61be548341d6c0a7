//! Rendering contract.
//!
//! Converting markup to HTML and writing files is left to a [`Renderer`]
//! supplied by the caller. This module only decides which outputs a page
//! produces: its destination, plus one redirect stub per alias.

use std::path::PathBuf;

use crate::page::{Page, PageKind};
use crate::site::Site;

/// One rendered output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered {
    /// Copy this file verbatim.
    Copy(PathBuf),
    /// Write this HTML.
    Html(String),
}

/// Converts page content to HTML.
pub trait Renderer {
    /// Error raised when a page cannot be rendered.
    type Error: std::error::Error;

    /// Render the body of a non-asset page.
    ///
    /// # Errors
    ///
    /// Returns the renderer's error when the page cannot be converted.
    fn render_html(&self, site: &Site, page: &Page) -> Result<String, Self::Error>;
}

/// All outputs of a page, keyed by path relative to the build directory.
///
/// The paths match [`Page::target_relpaths`] in order.
///
/// # Errors
///
/// Propagates the renderer's error.
pub fn render_page<R: Renderer>(
    renderer: &R,
    site: &Site,
    page: &Page,
) -> Result<Vec<(String, Rendered)>, R::Error> {
    let main = match (&page.kind, &page.source) {
        (PageKind::Asset, Some(source)) => Rendered::Copy(source.abspath()),
        _ => Rendered::Html(renderer.render_html(site, page)?),
    };

    let link = site.site_link(page);
    let mut outputs = vec![(page.dst_relpath.clone(), main)];
    outputs.extend(
        page.target_relpaths()
            .into_iter()
            .skip(1)
            .map(|relpath| (relpath, Rendered::Html(redirect_stub(&link)))),
    );
    Ok(outputs)
}

/// HTML page redirecting to `target`.
#[must_use]
pub fn redirect_stub(target: &str) -> String {
    let target = escape_attr(target);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta http-equiv=\"refresh\" content=\"0; url={target}\">\n\
         <link rel=\"canonical\" href=\"{target}\">\n</head>\n\
         <body><a href=\"{target}\">{target}</a></body>\n</html>\n"
    )
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
