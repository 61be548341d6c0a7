//! CLI command implementations.

pub(crate) mod archetype;
pub(crate) mod check;
pub(crate) mod show;

use std::path::PathBuf;

use clap::Args;
use ssite_config::{CliSettings, Config};
use ssite_site::{Site, SiteSettings};

use crate::error::CliError;

pub(crate) use archetype::ArchetypeArgs;
pub(crate) use check::CheckArgs;
pub(crate) use show::ShowArgs;

/// Options shared by every command that loads a site.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover ssite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Theme directory (overrides config).
    #[arg(short, long)]
    theme_dir: Option<PathBuf>,

    /// URL prefix for page links (overrides config).
    #[arg(long, env = "SSITE_SITE_ROOT")]
    site_root: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl SiteArgs {
    /// Load configuration with CLI overrides applied.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            theme_dir: self.theme_dir.clone(),
            site_root: self.site_root.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Load configuration and build the site.
    pub(crate) fn build_site(&self) -> Result<Site, CliError> {
        let config = self.load_config()?;
        tracing::debug!(config = ?config.config_path, "Configuration loaded");
        if !config.content_resolved.source_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "Source directory not found: {}",
                config.content_resolved.source_dir.display()
            )));
        }
        Ok(Site::build(site_settings(&config))?)
    }
}

/// Translate configuration into build settings.
pub(crate) fn site_settings(config: &Config) -> SiteSettings {
    SiteSettings {
        title: config.site.title.clone(),
        site_root: config.site.site_root.clone(),
        source_dir: config.content_resolved.source_dir.clone(),
        theme_dir: config.content_resolved.theme_dir.clone(),
        archetypes_dir: config.content_resolved.archetypes_dir.clone(),
    }
}
