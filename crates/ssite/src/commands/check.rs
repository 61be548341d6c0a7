//! `ssite check` command implementation.

use std::collections::BTreeMap;

use clap::Args;
use ssite_site::Site;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub site: SiteArgs,
}

impl CheckArgs {
    /// Build the site and print a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the site cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let site = self.site.build_site()?;

        output.info(&format!("Source: {}", site.settings().source_dir.display()));
        if let Some(theme) = site.theme_root() {
            output.info(&format!("Theme: {}", theme.display()));
        }

        if site.is_empty() {
            output.warning("No pages found");
            return Ok(());
        }

        output.heading("Pages");
        for (type_name, count) in count_by_type(&site) {
            output.field(type_name, count);
        }

        let taxonomies: Vec<_> = site.taxonomies().collect();
        if !taxonomies.is_empty() {
            output.heading("Taxonomies");
            for taxonomy in taxonomies {
                let categories = taxonomy
                    .metadata
                    .get("categories")
                    .and_then(|c| c.as_object())
                    .map_or(0, serde_json::Map::len);
                output.field(
                    taxonomy.taxonomy_name().unwrap_or(&taxonomy.site_path),
                    format!("{categories} categories"),
                );
            }
        }

        output.success(&format!("Loaded {} pages", site.len()));
        Ok(())
    }
}

fn count_by_type(site: &Site) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for (_, page) in site.pages() {
        *counts.entry(page.type_name()).or_default() += 1;
    }
    counts
}
