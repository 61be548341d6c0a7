//! `ssite show` command implementation.

use std::io::{self, Write};

use clap::Args;
use serde::Serialize;
use ssite_site::{Metadata, Page, Site};

use super::SiteArgs;
use crate::error::CliError;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Print pages as JSON.
    #[arg(long)]
    json: bool,
}

/// One registered page as listed by `ssite show`.
#[derive(Serialize)]
struct PageEntry<'a> {
    site_path: &'a str,
    link: String,
    #[serde(rename = "type")]
    type_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    dst: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    aliases: &'a [String],
    metadata: &'a Metadata,
}

impl<'a> PageEntry<'a> {
    fn new(site: &Site, page: &'a Page) -> Self {
        Self {
            site_path: &page.site_path,
            link: site.site_link(page),
            type_name: page.type_name(),
            source: page.source_relpath(),
            dst: &page.dst_relpath,
            aliases: &page.aliases,
            metadata: &page.metadata,
        }
    }
}

impl ShowArgs {
    /// Build the site and list every registered page on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the site cannot be loaded or stdout is closed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let site = self.site.build_site()?;
        let entries: Vec<_> = site.pages().map(|(_, page)| PageEntry::new(&site, page)).collect();

        let mut out = io::stdout().lock();
        if self.json {
            serde_json::to_writer_pretty(&mut out, &entries)?;
            writeln!(out)?;
        } else {
            write_table(&mut out, &entries)?;
        }
        Ok(())
    }
}

fn write_table(out: &mut impl Write, entries: &[PageEntry<'_>]) -> io::Result<()> {
    for entry in entries {
        let path = if entry.site_path.is_empty() {
            "/"
        } else {
            entry.site_path
        };
        write!(out, "{:<16} {path} -> {}", entry.type_name, entry.dst)?;
        if !entry.aliases.is_empty() {
            write!(out, " (aliases: {})", entry.aliases.join(", "))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ssite_site::SiteSettings;

    fn site_with_alias() -> Site {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("old.md"), "---\npath: new\n---\n# New\n").unwrap();
        Site::build(SiteSettings {
            source_dir: dir.path().to_path_buf(),
            site_root: "/docs/".to_owned(),
            ..SiteSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_write_table() {
        let site = site_with_alias();
        let entries: Vec<_> = site.pages().map(|(_, p)| PageEntry::new(&site, p)).collect();
        let mut buf = Vec::new();
        write_table(&mut buf, &entries).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "markdown         new -> new/index.html (aliases: old)\n\
             dir              / -> index.html\n"
        );
    }

    #[test]
    fn test_json_entry() {
        let site = site_with_alias();
        let page = site.get_by_path("new").unwrap();
        let value = serde_json::to_value(PageEntry::new(&site, page)).unwrap();
        assert_eq!(value["link"], "/docs/new");
        assert_eq!(value["type"], "markdown");
        assert_eq!(value["source"], "old.md");
        assert_eq!(value["aliases"], serde_json::json!(["old"]));
        assert_eq!(value["metadata"]["title"], "New");
    }
}
