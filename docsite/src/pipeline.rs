//! Site build pipeline
//!
//! This module orchestrates the stages of building a documentation site:
//! 1. **Loading**: Read docsite.toml and every Markdown page it names (or discover them)
//! 2. **Checking**: Report duplicate heading ids, unrendered headings and dangling links
//! 3. **Export**: Write the static HTML site

use crate::config::{ConfigError, PageConfig, SiteConfig, CONFIG_FILE_NAME};
use crate::export::{export_site, ExportError};
use crate::registry::SectionRegistry;
use crate::render::render_markdown;
use crate::site::{normalize_route, Page, Site};
use itertools::Itertools;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Stage 1: Load the site configuration and its pages
///
/// # Parameters
/// * `root` - Root directory of the site containing docsite.toml
///
/// # Returns
/// * `Ok(Site)` - Site with every page read from disk
/// * `Err(PipelineError)` - Error loading configuration or reading a page
pub fn load_site(root: &Path) -> Result<Site, PipelineError> {
    let config_path = root.join(CONFIG_FILE_NAME);
    let config = SiteConfig::load(&config_path)
        .map_err(|e| PipelineError::ConfigError(config_path.clone(), Box::new(e)))?;

    let content_dir = root.join(&config.content_dir);
    if !content_dir.is_dir() {
        return Err(PipelineError::MissingContentDir(content_dir));
    }

    let page_configs = if config.pages.is_empty() {
        let discovered = discover_pages(&content_dir);
        log::info!(
            "Discovered {} pages in {}",
            discovered.len(),
            content_dir.display()
        );
        discovered
    } else {
        config.pages.clone()
    };

    let duplicates: Vec<String> = page_configs
        .iter()
        .map(|p| normalize_route(&p.route))
        .duplicates()
        .collect();
    if let Some(route) = duplicates.into_iter().next() {
        return Err(PipelineError::DuplicateRoute(route));
    }

    #[cfg(feature = "parallel")]
    let pages: Result<Vec<_>, _> = page_configs
        .par_iter()
        .map(|page| load_page(page, &content_dir))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let pages: Result<Vec<_>, _> = page_configs
        .iter()
        .map(|page| load_page(page, &content_dir))
        .collect();

    let mut site = Site::new(root.to_path_buf(), config);
    site.pages = pages?;
    Ok(site)
}

/// Find Markdown pages under the content directory
///
/// Files are sorted by path so the page order is stable across runs.
pub fn discover_pages(content_dir: &Path) -> Vec<PageConfig> {
    WalkDir::new(content_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("md"))
        .filter_map(|e| {
            let relative = e.path().strip_prefix(content_dir).ok()?;
            Some(PageConfig {
                route: route_for_source(relative),
                source: source_string(relative),
                title: None,
            })
        })
        .collect()
}

/// Route a discovered Markdown file is served at
///
/// `intro.md` and `index.md` at the top level map to `/`, `guide/index.md` to
/// `/guide` and `features/scans.md` to `/features/scans`.
pub fn route_for_source(relative: &Path) -> String {
    let mut segments: Vec<String> = relative
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let is_index = segments
        .last()
        .is_some_and(|last| last == "index" || (segments.len() == 1 && last == "intro"));
    if is_index {
        segments.pop();
    }

    normalize_route(&segments.join("/"))
}

fn source_string(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .join("/")
}

/// Read a single page
///
/// # Parameters
/// * `page` - Page entry from the configuration or discovery
/// * `content_dir` - Directory the page source is relative to
///
/// # Returns
/// * `Ok(Page)` - Page with its content and resolved title
/// * `Err(PipelineError)` - Error reading the file
fn load_page(page: &PageConfig, content_dir: &Path) -> Result<Page, PipelineError> {
    let path = content_dir.join(&page.source);
    let content =
        std::fs::read_to_string(&path).map_err(|e| PipelineError::IoError(path.clone(), e))?;

    let title = page
        .title
        .clone()
        .or_else(|| first_h1(&content))
        .unwrap_or_else(|| title_from_stem(&path));

    log::debug!("Loaded {} from {}", page.route, path.display());

    Ok(Page {
        route: normalize_route(&page.route),
        title,
        source: path,
        content,
    })
}

/// Plain text of the first h1 in the document
fn first_h1(content: &str) -> Option<String> {
    render_markdown(content).title.filter(|t| !t.is_empty())
}

/// Convert a file stem like `mobile-security` to "Mobile Security"
fn title_from_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Problem found while checking a site; none of these stop the build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Two headings on one page slugify to the same id
    DuplicateHeadingId { route: String, id: String },

    /// A heading line that did not render as a heading (e.g. inside a code fence)
    UnrenderedHeading { route: String, id: String },

    /// Navigation link to a route without a page
    DanglingLink { href: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DuplicateHeadingId { route, id } => {
                write!(f, "{}: duplicate heading id '{}'", route, id)
            }
            Diagnostic::UnrenderedHeading { route, id } => {
                write!(f, "{}: TOC entry '{}' has no rendered anchor", route, id)
            }
            Diagnostic::DanglingLink { href } => {
                write!(f, "navigation link '{}' has no page", href)
            }
        }
    }
}

/// Stage 2: Check the loaded site
pub fn check_site(site: &Site) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for page in &site.pages {
        let registry = SectionRegistry::from_document(&page.content);
        let rendered = render_markdown(&page.content);

        diagnostics.extend(registry.duplicate_ids().into_iter().map(|id| {
            Diagnostic::DuplicateHeadingId {
                route: page.route.clone(),
                id: id.to_string(),
            }
        }));

        diagnostics.extend(
            registry
                .iter()
                .filter(|h| !rendered.has_anchor(&h.id))
                .map(|h| Diagnostic::UnrenderedHeading {
                    route: page.route.clone(),
                    id: h.id.clone(),
                }),
        );
    }

    diagnostics.extend(
        site.dangling_links()
            .into_iter()
            .unique()
            .map(|href| Diagnostic::DanglingLink {
                href: href.to_string(),
            }),
    );

    diagnostics
}

/// Result of a full build
#[derive(Debug, Clone)]
pub struct BuildSummary {
    /// Files written, relative to the output directory
    pub written: Vec<PathBuf>,

    /// Problems reported while checking
    pub diagnostics: Vec<Diagnostic>,
}

/// Run every stage: load, check and export
///
/// # Parameters
/// * `root` - Root directory of the site
/// * `output_dir` - Directory the HTML site is written to
///
/// # Returns
/// * `Ok(BuildSummary)` - Written files and diagnostics
/// * `Err(PipelineError)` - Error in any stage
pub fn build(root: &Path, output_dir: &Path) -> Result<BuildSummary, PipelineError> {
    let site = load_site(root)?;
    log::info!("Loaded {} pages from {}", site.pages.len(), root.display());

    let diagnostics = check_site(&site);
    for diagnostic in &diagnostics {
        log::warn!("{}", diagnostic);
    }

    let written = export_site(&site, output_dir)?;

    Ok(BuildSummary {
        written,
        diagnostics,
    })
}

/// Pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error reading {path}: {source}", path = .0.display(), source = .1)]
    IoError(PathBuf, #[source] std::io::Error),

    #[error("Config error loading {path}: {source}", path = .0.display(), source = .1)]
    ConfigError(PathBuf, #[source] Box<ConfigError>),

    #[error("Content directory not found: {path}", path = .0.display())]
    MissingContentDir(PathBuf),

    #[error("Route {0} is served by more than one page")]
    DuplicateRoute(String),

    #[error("Export error: {0}")]
    ExportError(#[from] ExportError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_route_for_source() {
        assert_eq!(route_for_source(Path::new("intro.md")), "/");
        assert_eq!(route_for_source(Path::new("index.md")), "/");
        assert_eq!(route_for_source(Path::new("quickstart.md")), "/quickstart");
        assert_eq!(
            route_for_source(&Path::new("features").join("scans.md")),
            "/features/scans"
        );
        assert_eq!(route_for_source(&Path::new("api").join("index.md")), "/api");
        // only a top-level intro is the home page
        assert_eq!(
            route_for_source(&Path::new("guide").join("intro.md")),
            "/guide/intro"
        );
    }

    #[test]
    fn test_title_from_stem() {
        assert_eq!(title_from_stem(Path::new("mobile-security.md")), "Mobile Security");
        assert_eq!(title_from_stem(Path::new("ai_agents.md")), "Ai Agents");
    }

    #[test]
    fn test_load_site_discovers_pages() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CONFIG_FILE_NAME, "title = \"Docs\"\n");
        write(dir.path(), "content/intro.md", "# Introduction\n\n## Key Features\n");
        write(dir.path(), "content/features/scans.md", "## No h1 here\n");

        let site = load_site(dir.path()).unwrap();
        let routes: Vec<&str> = site.pages.iter().map(|p| p.route.as_str()).collect();
        assert_eq!(routes, vec!["/features/scans", "/"]);
        assert_eq!(site.pages[0].title, "Scans");
        assert_eq!(site.pages[1].title, "Introduction");
    }

    #[test]
    fn test_load_site_uses_configured_pages() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            CONFIG_FILE_NAME,
            "title = \"Docs\"\ncontent_dir = \"pages\"\n\n[[pages]]\nroute = \"/\"\nsource = \"home.md\"\ntitle = \"Welcome\"\n",
        );
        write(dir.path(), "pages/home.md", "# Home\n");
        write(dir.path(), "pages/ignored.md", "# Ignored\n");

        let site = load_site(dir.path()).unwrap();
        assert_eq!(site.pages.len(), 1);
        assert_eq!(site.pages[0].title, "Welcome");
    }

    #[test]
    fn test_load_site_missing_page() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            CONFIG_FILE_NAME,
            "title = \"Docs\"\n\n[[pages]]\nroute = \"/\"\nsource = \"missing.md\"\n",
        );
        fs::create_dir_all(dir.path().join("content")).unwrap();

        assert!(matches!(
            load_site(dir.path()),
            Err(PipelineError::IoError(_, _))
        ));
    }

    #[test]
    fn test_load_site_missing_content_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CONFIG_FILE_NAME, "title = \"Docs\"\n");

        assert!(matches!(
            load_site(dir.path()),
            Err(PipelineError::MissingContentDir(_))
        ));
    }

    #[test]
    fn test_discovered_routes_must_be_unique() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CONFIG_FILE_NAME, "title = \"Docs\"\n");
        write(dir.path(), "content/intro.md", "# Intro\n");
        write(dir.path(), "content/index.md", "# Index\n");

        assert!(matches!(
            load_site(dir.path()),
            Err(PipelineError::DuplicateRoute(route)) if route == "/"
        ));
    }

    #[test]
    fn test_check_site_reports_problems() {
        let mut config = SiteConfig::new("Docs");
        config.tabs.push(crate::config::TabConfig {
            id: "guides".to_string(),
            label: "Guides".to_string(),
            route_prefix: None,
            sections: Vec::new(),
            items: vec![crate::config::NavItemConfig {
                name: "Missing".to_string(),
                href: "/missing".to_string(),
            }],
        });
        let mut site = Site::new(PathBuf::from("."), config);
        site.pages.push(Page {
            route: "/".to_string(),
            title: "Intro".to_string(),
            source: PathBuf::from("intro.md"),
            content: "## Setup\n\n## Setup\n\n```sh\n## not a heading\n```\n".to_string(),
        });

        let diagnostics = check_site(&site);
        assert_eq!(
            diagnostics,
            vec![
                Diagnostic::DuplicateHeadingId {
                    route: "/".to_string(),
                    id: "setup".to_string(),
                },
                Diagnostic::UnrenderedHeading {
                    route: "/".to_string(),
                    id: "not-a-heading".to_string(),
                },
                Diagnostic::DanglingLink {
                    href: "/missing".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_closing_hashes_reported_as_unrendered() {
        let mut site = Site::new(PathBuf::from("."), SiteConfig::new("Docs"));
        site.pages.push(Page {
            route: "/setup".to_string(),
            title: "Setup".to_string(),
            source: PathBuf::from("setup.md"),
            content: "## Setup ##\n".to_string(),
        });

        // the extractor keeps the closing hashes, the renderer drops them
        let registry = SectionRegistry::from_document(&site.pages[0].content);
        assert_eq!(registry.headings()[0].id, "setup-");
        assert_eq!(render_markdown(&site.pages[0].content).anchors, vec!["setup"]);
        assert_eq!(
            check_site(&site),
            vec![Diagnostic::UnrenderedHeading {
                route: "/setup".to_string(),
                id: "setup-".to_string(),
            }]
        );
    }
}
