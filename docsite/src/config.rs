//! Site configuration from docsite.toml

use crate::toc::DEFAULT_HEADER_OFFSET;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file at the site root
pub const CONFIG_FILE_NAME: &str = "docsite.toml";

/// Main site configuration from docsite.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title shown in the header and page titles
    pub title: String,

    /// Height of the fixed header in logical pixels; TOC clicks scroll below it
    #[serde(default = "default_header_offset")]
    pub header_offset: f64,

    /// Directory holding the Markdown pages, relative to the site root
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Links shown on the right of the header
    #[serde(default)]
    pub links: Vec<HeaderLink>,

    /// Explicit page list; when empty, pages are discovered from `content_dir`
    #[serde(default)]
    pub pages: Vec<PageConfig>,

    /// Sidebar navigation tabs
    #[serde(default)]
    pub tabs: Vec<TabConfig>,
}

/// External link in the page header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLink {
    pub label: String,
    pub href: String,
}

/// A routed page backed by a Markdown file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Route the page is served at, e.g. `/features/scans`
    pub route: String,

    /// Markdown file relative to `content_dir`
    pub source: String,

    /// Title override; defaults to the page's first h1
    pub title: Option<String>,
}

/// Sidebar tab (e.g. Guides, API, Releases)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabConfig {
    pub id: String,
    pub label: String,

    /// Routes under this prefix select the tab; a tab without one is the fallback
    pub route_prefix: Option<String>,

    /// Collapsible item groups
    #[serde(default)]
    pub sections: Vec<NavSectionConfig>,

    /// Items listed directly under the tab, without a group
    #[serde(default)]
    pub items: Vec<NavItemConfig>,
}

/// Collapsible group of navigation items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSectionConfig {
    pub title: String,

    /// Expanded when the current page is not inside it
    #[serde(default)]
    pub default_open: bool,

    pub items: Vec<NavItemConfig>,
}

/// Navigation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItemConfig {
    pub name: String,
    pub href: String,
}

fn default_header_offset() -> f64 {
    DEFAULT_HEADER_OFFSET
}

fn default_content_dir() -> String {
    "content".to_string()
}

/// Errors that can occur when loading or saving site configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error for {}: {}", .0.display(), .1)]
    IoError(PathBuf, #[source] std::io::Error),

    #[error("TOML parse error in {}: {}", .0.display(), .1)]
    ParseError(PathBuf, #[source] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl SiteConfig {
    /// Minimal configuration with a title and defaults for everything else
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            header_offset: default_header_offset(),
            content_dir: default_content_dir(),
            links: Vec::new(),
            pages: Vec::new(),
            tabs: Vec::new(),
        }
    }

    /// Load configuration from a docsite.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(SiteConfig)` - Successfully loaded and validated configuration
    /// * `Err(ConfigError)` - Error reading, parsing or validating the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;

        let config = Self::from_toml(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML text without validating it
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save configuration to a docsite.toml file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        Ok(())
    }

    /// Check routes, links and numeric settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.header_offset.is_finite() || self.header_offset < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "header_offset must be a non-negative number, got {}",
                self.header_offset
            )));
        }

        let mut seen = HashSet::new();
        for page in &self.pages {
            if !page.route.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "page route '{}' must start with '/'",
                    page.route
                )));
            }
            if page.route.split('/').any(|segment| segment == "." || segment == "..") {
                return Err(ConfigError::Invalid(format!(
                    "page route '{}' must not contain '.' or '..' segments",
                    page.route
                )));
            }
            if !seen.insert(crate::site::normalize_route(&page.route)) {
                return Err(ConfigError::Invalid(format!(
                    "page route '{}' is defined more than once",
                    page.route
                )));
            }
        }

        let mut tab_ids = HashSet::new();
        for tab in &self.tabs {
            if !tab_ids.insert(tab.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "tab id '{}' is defined more than once",
                    tab.id
                )));
            }
        }

        Ok(())
    }
}
