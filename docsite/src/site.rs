//! Documentation site model: routed pages and sidebar navigation

use crate::config::{NavItemConfig, SiteConfig, TabConfig};
use std::path::PathBuf;

/// Markdown shown for any route without a page
pub const NOT_FOUND_MARKDOWN: &str = "# 404\n\nThis documentation page is still being written.\n\n[Back to Introduction](/)\n";

/// A page loaded from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Normalized route, e.g. `/` or `/features/scans`
    pub route: String,

    /// Title shown in the browser tab
    pub title: String,

    /// Markdown file the page was read from
    pub source: PathBuf,

    /// Raw Markdown content
    pub content: String,
}

/// Outcome of looking up a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    Page(&'a Page),
    NotFound,
}

impl<'a> Resolved<'a> {
    /// Markdown to display for the route
    pub fn content(&self) -> &'a str {
        match *self {
            Resolved::Page(page) => &page.content,
            Resolved::NotFound => NOT_FOUND_MARKDOWN,
        }
    }
}

/// Collapse trailing slashes; the root stays `/`
pub fn normalize_route(route: &str) -> String {
    let trimmed = route.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// A documentation site: configuration plus loaded pages
#[derive(Debug, Clone)]
pub struct Site {
    /// Root directory of the site source
    pub root: PathBuf,

    /// Configuration from docsite.toml
    pub config: SiteConfig,

    /// Pages in configuration (or discovery) order
    pub pages: Vec<Page>,
}

impl Site {
    pub fn new(root: PathBuf, config: SiteConfig) -> Self {
        Self {
            root,
            config,
            pages: Vec::new(),
        }
    }

    /// Look up the page for a route
    pub fn resolve(&self, route: &str) -> Resolved<'_> {
        let route = normalize_route(route);
        self.pages
            .iter()
            .find(|page| page.route == route)
            .map_or(Resolved::NotFound, Resolved::Page)
    }

    /// Sidebar state when `route` is displayed
    pub fn navigation(&self, route: &str) -> Navigation {
        let route = normalize_route(route);
        let active = active_tab_index(&self.config.tabs, &route);

        let tabs = self
            .config
            .tabs
            .iter()
            .enumerate()
            .map(|(i, tab)| TabView {
                id: tab.id.clone(),
                label: tab.label.clone(),
                active: Some(i) == active,
                sections: tab
                    .sections
                    .iter()
                    .map(|section| {
                        let items = item_views(&section.items, &route);
                        SectionView {
                            title: section.title.clone(),
                            expanded: section.default_open || items.iter().any(|i| i.current),
                            items,
                        }
                    })
                    .collect(),
                items: item_views(&tab.items, &route),
            })
            .collect();

        Navigation { tabs }
    }

    /// Navigation links that point at routes without a page
    pub fn dangling_links(&self) -> Vec<&str> {
        self.config
            .tabs
            .iter()
            .flat_map(|tab| {
                tab.sections
                    .iter()
                    .flat_map(|s| s.items.iter())
                    .chain(tab.items.iter())
            })
            .map(|item| item.href.as_str())
            .filter(|href| href.starts_with('/'))
            .filter(|href| matches!(self.resolve(href), Resolved::NotFound))
            .collect()
    }
}

/// Tab selected by the longest matching route prefix, else the first tab without one
fn active_tab_index(tabs: &[TabConfig], route: &str) -> Option<usize> {
    let by_prefix = tabs
        .iter()
        .enumerate()
        .filter_map(|(i, tab)| {
            let prefix = normalize_route(tab.route_prefix.as_deref()?);
            let matches = route == prefix || route.starts_with(&format!("{}/", prefix));
            matches.then_some((i, prefix.len()))
        })
        .max_by_key(|(_, len)| *len)
        .map(|(i, _)| i);

    by_prefix
        .or_else(|| tabs.iter().position(|tab| tab.route_prefix.is_none()))
        .or_else(|| (!tabs.is_empty()).then_some(0))
}

fn item_views(items: &[NavItemConfig], route: &str) -> Vec<ItemView> {
    items
        .iter()
        .map(|item| ItemView {
            name: item.name.clone(),
            href: item.href.clone(),
            current: item.href.starts_with('/') && normalize_route(&item.href) == route,
        })
        .collect()
}

/// Sidebar state for one displayed route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub tabs: Vec<TabView>,
}

impl Navigation {
    pub fn active_tab(&self) -> Option<&TabView> {
        self.tabs.iter().find(|t| t.active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub id: String,
    pub label: String,
    pub active: bool,
    pub sections: Vec<SectionView>,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub title: String,
    pub expanded: bool,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub name: String,
    pub href: String,
    /// Link points at the displayed route
    pub current: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavSectionConfig;

    fn item(name: &str, href: &str) -> NavItemConfig {
        NavItemConfig {
            name: name.to_string(),
            href: href.to_string(),
        }
    }

    fn sample_site() -> Site {
        let mut config = SiteConfig::new("Docs");
        config.tabs = vec![
            TabConfig {
                id: "guides".to_string(),
                label: "Guides".to_string(),
                route_prefix: None,
                sections: vec![
                    NavSectionConfig {
                        title: "Getting Started".to_string(),
                        default_open: true,
                        items: vec![item("Introduction", "/"), item("Quickstart", "/quickstart")],
                    },
                    NavSectionConfig {
                        title: "Platform Specifics".to_string(),
                        default_open: false,
                        items: vec![item("Mobile Security", "/platforms/mobile")],
                    },
                ],
                items: Vec::new(),
            },
            TabConfig {
                id: "api".to_string(),
                label: "API".to_string(),
                route_prefix: Some("/api".to_string()),
                sections: Vec::new(),
                items: vec![item("Overview", "/api")],
            },
        ];

        let mut site = Site::new(PathBuf::from("."), config);
        for (route, content) in [("/", "# Intro\n"), ("/platforms/mobile", "# Mobile\n")] {
            site.pages.push(Page {
                route: route.to_string(),
                title: route.to_string(),
                source: PathBuf::new(),
                content: content.to_string(),
            });
        }
        site
    }

    #[test]
    fn test_normalize_route() {
        assert_eq!(normalize_route(""), "/");
        assert_eq!(normalize_route("/"), "/");
        assert_eq!(normalize_route("/api/"), "/api");
        assert_eq!(normalize_route("quickstart"), "/quickstart");
    }

    #[test]
    fn test_resolve_known_and_unknown_routes() {
        let site = sample_site();
        assert!(matches!(site.resolve("/platforms/mobile/"), Resolved::Page(p) if p.content == "# Mobile\n"));
        let missing = site.resolve("/features/reports");
        assert_eq!(missing, Resolved::NotFound);
        assert!(missing.content().contains("still being written"));
    }

    #[test]
    fn test_active_tab_follows_route_prefix() {
        let site = sample_site();
        assert_eq!(site.navigation("/api/scans").active_tab().map(|t| t.id.as_str()), Some("api"));
        assert_eq!(site.navigation("/quickstart").active_tab().map(|t| t.id.as_str()), Some("guides"));
        // "/apis" is not under "/api"
        assert_eq!(site.navigation("/apis").active_tab().map(|t| t.id.as_str()), Some("guides"));
    }

    #[test]
    fn test_section_expansion() {
        let site = sample_site();

        let nav = site.navigation("/");
        let guides = &nav.tabs[0];
        assert!(guides.sections[0].expanded);
        assert!(!guides.sections[1].expanded);
        assert!(guides.sections[0].items[0].current);

        let nav = site.navigation("/platforms/mobile");
        assert!(nav.tabs[0].sections[1].expanded);
        assert!(nav.tabs[0].sections[1].items[0].current);
        assert!(!nav.tabs[0].sections[0].items[0].current);
    }

    #[test]
    fn test_dangling_links() {
        let site = sample_site();
        assert_eq!(site.dangling_links(), vec!["/quickstart", "/api"]);
    }
}
