//! Embedded starter site
//!
//! This module contains the starter site compiled into the binary and
//! written by `docsite init`.

use crate::config::CONFIG_FILE_NAME;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Title line of the embedded configuration, replaced by `--title`
const STARTER_TITLE_LINE: &str = "title = \"Cyrion AI\"";

/// A file of the starter site
#[derive(Debug, Clone, Copy)]
pub struct StarterFile {
    /// Path relative to the site root
    pub path: &'static str,
    /// File content
    pub content: &'static str,
}

/// Get all files of the starter site
///
/// # Returns
/// * `Vec<StarterFile>` - Configuration followed by the Markdown pages
pub fn starter_files() -> Vec<StarterFile> {
    vec![
        StarterFile {
            path: CONFIG_FILE_NAME,
            content: include_str!("templates/starter/docsite.toml"),
        },
        StarterFile {
            path: "content/intro.md",
            content: include_str!("templates/starter/content/intro.md"),
        },
        StarterFile {
            path: "content/quickstart.md",
            content: include_str!("templates/starter/content/quickstart.md"),
        },
        StarterFile {
            path: "content/architecture.md",
            content: include_str!("templates/starter/content/architecture.md"),
        },
        StarterFile {
            path: "content/features/scans.md",
            content: include_str!("templates/starter/content/features/scans.md"),
        },
        StarterFile {
            path: "content/features/agents.md",
            content: include_str!("templates/starter/content/features/agents.md"),
        },
        StarterFile {
            path: "content/platforms/mobile.md",
            content: include_str!("templates/starter/content/platforms/mobile.md"),
        },
    ]
}

/// Errors that can occur when writing the starter site
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("{path} already exists (use --force to overwrite)", path = .0.display())]
    AlreadyExists(PathBuf),

    #[error("IO error writing {path}: {source}", path = .0.display(), source = .1)]
    IoError(PathBuf, #[source] std::io::Error),
}

/// Write the starter site into `root`
///
/// # Parameters
/// * `root` - Directory to initialize; created if missing
/// * `force` - Overwrite files that already exist
/// * `title` - Site title replacing the starter's
///
/// # Returns
/// * `Ok(Vec<PathBuf>)` - Paths of the written files
/// * `Err(TemplateError)` - A file exists and `force` is off, or writing failed
pub fn write_starter(
    root: &Path,
    force: bool,
    title: Option<&str>,
) -> Result<Vec<PathBuf>, TemplateError> {
    let files = starter_files();

    if !force {
        if let Some(existing) = files
            .iter()
            .map(|file| root.join(file.path))
            .find(|path| path.exists())
        {
            return Err(TemplateError::AlreadyExists(existing));
        }
    }

    let mut written = Vec::with_capacity(files.len());
    for file in &files {
        let path = root.join(file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| TemplateError::IoError(parent.to_path_buf(), e))?;
        }

        let content = match title {
            Some(title) if file.path == CONFIG_FILE_NAME => retitle(file.content, title),
            _ => file.content.to_string(),
        };
        fs::write(&path, content).map_err(|e| TemplateError::IoError(path.clone(), e))?;

        log::debug!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}

/// Replace the title line of the starter configuration
fn retitle(config: &str, title: &str) -> String {
    let quoted = toml::Value::String(title.to_string()).to_string();
    config.replacen(STARTER_TITLE_LINE, &format!("title = {}", quoted), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::registry::SectionRegistry;

    #[test]
    fn test_starter_config_parses() {
        let config = SiteConfig::from_toml(starter_files()[0].content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.title, "Cyrion AI");
        assert_eq!(config.pages.len(), 6);
        let labels: Vec<&str> = config.tabs.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Guides", "API", "Releases"]);
    }

    #[test]
    fn test_starter_pages_match_config() {
        let files = starter_files();
        let config = SiteConfig::from_toml(files[0].content).unwrap();
        for page in &config.pages {
            let path = format!("content/{}", page.source);
            assert!(
                files.iter().any(|f| f.path == path),
                "missing starter file {}",
                path
            );
        }
    }

    #[test]
    fn test_starter_pages_have_headings() {
        for file in starter_files().iter().skip(1) {
            let registry = SectionRegistry::from_document(file.content);
            assert!(!registry.is_empty(), "{} has no TOC entries", file.path);
            assert!(registry.duplicate_ids().is_empty());
        }
    }

    #[test]
    fn test_retitle_escapes_quotes() {
        let content = retitle(starter_files()[0].content, "Team \"Red\" Docs");
        let config = SiteConfig::from_toml(&content).unwrap();
        assert_eq!(config.title, "Team \"Red\" Docs");
    }

    #[test]
    fn test_write_starter_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        write_starter(dir.path(), false, None).unwrap();

        let result = write_starter(dir.path(), false, None);
        assert!(matches!(result, Err(TemplateError::AlreadyExists(_))));

        let written = write_starter(dir.path(), true, Some("Internal Docs")).unwrap();
        assert_eq!(written.len(), 7);
        let config = SiteConfig::load(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config.title, "Internal Docs");
    }
}
