//! `ssite archetype` command implementation.

use std::io::{self, Write};

use clap::Args;
use ssite_site::{LoadedArchetype, Site};

use super::{SiteArgs, site_settings};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the archetype command.
#[derive(Args)]
pub(crate) struct ArchetypeArgs {
    /// Archetype name (file stem under the archetypes directory).
    name: String,

    #[command(flatten)]
    pub site: SiteArgs,
}

impl ArchetypeArgs {
    /// Locate an archetype and print its front matter and body.
    ///
    /// # Errors
    ///
    /// Returns an error if the archetype is missing or cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config()?;
        let site = Site::new(site_settings(&config));
        let root = &site.settings().archetypes_dir;

        let archetype = site.find_archetype(&self.name)?.ok_or_else(|| {
            CliError::Validation(format!(
                "Archetype {} not found in {}",
                self.name,
                root.display()
            ))
        })?;
        output.info(&format!("Archetype: {}", archetype.abspath().display()));

        let loaded = archetype.load()?;
        write_archetype(&mut io::stdout().lock(), &loaded)?;
        Ok(())
    }
}

fn write_archetype(out: &mut impl Write, loaded: &LoadedArchetype) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, &loaded.front_matter)?;
    writeln!(out)?;
    for line in &loaded.body {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ssite_site::{ArchetypeStyle, Metadata};

    fn args_for(dir: &std::path::Path, name: &str) -> ArchetypeArgs {
        let config = dir.join("ssite.toml");
        std::fs::write(&config, "[content]\nsource_dir = \"content\"\n").unwrap();
        ArchetypeArgs {
            name: name.to_owned(),
            site: SiteArgs {
                config: Some(config),
                source_dir: None,
                theme_dir: None,
                site_root: None,
                verbose: false,
            },
        }
    }

    #[test]
    fn test_execute_finds_archetype_under_configured_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("archetypes/blog")).unwrap();
        std::fs::write(dir.path().join("archetypes/blog/post.md"), "---\ntitle: New\n---\n").unwrap();

        args_for(dir.path(), "post").execute().unwrap();
        let err = args_for(dir.path(), "missing").execute().unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
    }

    #[test]
    fn test_write_archetype() {
        let mut front_matter = Metadata::new();
        front_matter.insert("title", "Untitled");
        let loaded = LoadedArchetype {
            style: ArchetypeStyle::Markdown,
            front_matter,
            body: vec!["# Heading".to_owned(), String::new()],
        };
        let mut buf = Vec::new();
        write_archetype(&mut buf, &loaded).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "{\n  \"title\": \"Untitled\"\n}\n# Heading\n\n"
        );
    }
}
