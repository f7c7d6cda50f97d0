//! Static HTML exporter for documentation sites
//!
//! Each route becomes a standalone HTML page with:
//! - A fixed header with the site title and external links
//! - A sidebar with tabbed, collapsible navigation
//! - The rendered Markdown content with anchored headings
//! - An "On this page" panel kept in sync with scrolling by an embedded script

use crate::config::SiteConfig;
use crate::html::escape_html;
use crate::registry::SectionRegistry;
use crate::render::{highlight_css, render_markdown, RenderedPage};
use crate::site::{ItemView, Navigation, Site, NOT_FOUND_MARKDOWN};
use crate::toc::{indent_css, TocPanel};
use crate::tracker::ScrollSyncState;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// File name of the page written for unknown routes
pub const NOT_FOUND_FILE: &str = "404.html";

/// Errors that can occur during HTML export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error writing {path}: {source}", path = .0.display(), source = .1)]
    IoError(PathBuf, #[source] std::io::Error),
}

/// A page ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPage {
    /// Output path relative to the output directory
    pub path: PathBuf,

    /// Complete HTML document
    pub html: String,
}

/// Output path of a route relative to the output directory
///
/// `/` maps to `index.html`, `/a/b` to `a/b/index.html`. `.` and `..`
/// segments are dropped so the path never leaves the output directory.
pub fn page_output_path(route: &str) -> PathBuf {
    route
        .split('/')
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .fold(PathBuf::new(), |path, segment| path.join(segment))
        .join("index.html")
}

/// Inputs for rendering one page
pub struct PageLayout<'a> {
    pub config: &'a SiteConfig,
    pub title: &'a str,
    pub content: &'a RenderedPage,
    pub navigation: &'a Navigation,
    pub toc: &'a TocPanel,
}

/// Render a complete HTML document for one page
pub fn render_page(layout: &PageLayout<'_>) -> String {
    let mut output = String::new();

    let page_title = if layout.title.is_empty() || layout.title == layout.config.title {
        layout.config.title.clone()
    } else {
        format!("{} - {}", layout.title, layout.config.title)
    };
    write_html_header(&mut output, &page_title);

    output.push_str("<body>\n");
    write_site_header(&mut output, layout.config);

    output.push_str("<div class=\"shell\">\n");
    write_sidebar(&mut output, layout.navigation);

    output.push_str("<main class=\"content\">\n");
    output.push_str("<article class=\"prose\">\n");
    output.push_str(&layout.content.html);
    output.push_str("</article>\n");
    output.push_str("</main>\n");

    output.push_str("<aside class=\"toc-column\">\n");
    output.push_str(&layout.toc.render_html());
    output.push_str("</aside>\n");

    output.push_str("</div>\n");
    output.push_str("<script>\n");
    output.push_str(SCROLL_SYNC_SCRIPT);
    output.push_str("</script>\n");
    output.push_str("</body>\n");
    output.push_str("</html>\n");

    output
}

/// Render one route of the site
///
/// # Parameters
/// * `site` - Loaded site
/// * `route` - Route the page is served at
/// * `title` - Page title
/// * `content` - Raw Markdown of the page
///
/// # Returns
/// * Complete HTML document for the route
pub fn render_route(site: &Site, route: &str, title: &str, content: &str) -> String {
    let rendered = render_markdown(content);
    let registry = SectionRegistry::from_document(content);
    let toc = TocPanel::new(&registry, &ScrollSyncState::empty())
        .with_header_offset(site.config.header_offset);
    let navigation = site.navigation(route);

    render_page(&PageLayout {
        config: &site.config,
        title,
        content: &rendered,
        navigation: &navigation,
        toc: &toc,
    })
}

/// Render every page of the site plus the not-found page
pub fn render_site(site: &Site) -> Vec<ExportedPage> {
    #[cfg(feature = "parallel")]
    let mut pages: Vec<ExportedPage> = site
        .pages
        .par_iter()
        .map(|page| ExportedPage {
            path: page_output_path(&page.route),
            html: render_route(site, &page.route, &page.title, &page.content),
        })
        .collect();

    #[cfg(not(feature = "parallel"))]
    let mut pages: Vec<ExportedPage> = site
        .pages
        .iter()
        .map(|page| ExportedPage {
            path: page_output_path(&page.route),
            html: render_route(site, &page.route, &page.title, &page.content),
        })
        .collect();

    pages.push(ExportedPage {
        path: PathBuf::from(NOT_FOUND_FILE),
        html: render_route(site, "/404", "Page Not Found", NOT_FOUND_MARKDOWN),
    });

    pages
}

/// Render the whole site and write it to `output_dir`
///
/// # Returns
/// * `Ok(Vec<PathBuf>)` - Paths of the written files, relative to `output_dir`
/// * `Err(ExportError)` - Error creating a directory or writing a file
pub fn export_site(site: &Site, output_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    let pages = render_site(site);
    write_site(&pages, output_dir)?;
    Ok(pages.into_iter().map(|page| page.path).collect())
}

/// Write every page under `output_dir`, creating directories as needed
pub fn write_site(pages: &[ExportedPage], output_dir: &Path) -> Result<(), ExportError> {
    for page in pages {
        let full_path = output_dir.join(&page.path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ExportError::IoError(parent.to_path_buf(), e))?;
        }
        fs::write(&full_path, &page.html)
            .map_err(|e| ExportError::IoError(full_path.clone(), e))?;
        log::info!("Wrote {}", full_path.display());
    }
    Ok(())
}

/// Write HTML header with CSS styling
fn write_html_header(output: &mut String, title: &str) {
    output.push_str("<!DOCTYPE html>\n");
    output.push_str("<html lang=\"en\">\n");
    output.push_str("<head>\n");
    output.push_str("<meta charset=\"UTF-8\">\n");
    output.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    output.push_str("<style>\n");
    output.push_str(CSS_STYLES);
    output.push_str(&indent_css());
    output.push_str(highlight_css());
    output.push_str("</style>\n");
    output.push_str("</head>\n");
}

/// Fixed header with the menu toggle, the site title and external links
fn write_site_header(output: &mut String, config: &SiteConfig) {
    output.push_str("<header class=\"site-header\">\n");
    output.push_str(
        "<button type=\"button\" class=\"menu-toggle\" aria-label=\"Toggle navigation\" aria-controls=\"sidebar\" aria-expanded=\"false\">&#9776;</button>\n",
    );
    output.push_str(&format!(
        "<a class=\"site-title\" href=\"/\">{}</a>\n",
        escape_html(&config.title)
    ));
    if !config.links.is_empty() {
        output.push_str("<nav class=\"header-links\">\n");
        for link in &config.links {
            output.push_str(&format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a>\n",
                escape_html(&link.href),
                escape_html(&link.label)
            ));
        }
        output.push_str("</nav>\n");
    }
    output.push_str("</header>\n");
}

/// Sidebar with one panel per tab; only the active panel is visible
fn write_sidebar(output: &mut String, navigation: &Navigation) {
    output.push_str("<div class=\"sidebar-backdrop\" hidden></div>\n");
    output.push_str("<aside class=\"sidebar\" id=\"sidebar\">\n");

    if navigation.tabs.len() > 1 {
        output.push_str("<div class=\"tab-switcher\">\n");
        for tab in &navigation.tabs {
            output.push_str(&format!(
                "<button type=\"button\" class=\"tab-button{}\" data-tab=\"{}\">{}</button>\n",
                if tab.active { " active" } else { "" },
                escape_html(&tab.id),
                escape_html(&tab.label)
            ));
        }
        output.push_str("</div>\n");
    }

    for tab in &navigation.tabs {
        output.push_str(&format!(
            "<nav class=\"tab-panel\" data-tab=\"{}\"{}>\n",
            escape_html(&tab.id),
            if tab.active { "" } else { " hidden" }
        ));

        for section in &tab.sections {
            output.push_str(&format!(
                "<details class=\"nav-section\"{}>\n",
                if section.expanded { " open" } else { "" }
            ));
            output.push_str(&format!(
                "<summary>{}</summary>\n",
                escape_html(&section.title)
            ));
            write_nav_items(output, &section.items);
            output.push_str("</details>\n");
        }

        if !tab.items.is_empty() {
            output.push_str(&format!(
                "<h5 class=\"nav-heading\">{}</h5>\n",
                escape_html(&tab.label)
            ));
            write_nav_items(output, &tab.items);
        }

        output.push_str("</nav>\n");
    }

    output.push_str("</aside>\n");
}

fn write_nav_items(output: &mut String, items: &[ItemView]) {
    output.push_str("<ul class=\"nav-items\">\n");
    for item in items {
        if item.current {
            output.push_str(&format!(
                "<li><a class=\"nav-link current\" aria-current=\"page\" href=\"{}\">{}</a></li>\n",
                escape_html(&item.href),
                escape_html(&item.name)
            ));
        } else {
            output.push_str(&format!(
                "<li><a class=\"nav-link\" href=\"{}\">{}</a></li>\n",
                escape_html(&item.href),
                escape_html(&item.name)
            ));
        }
    }
    output.push_str("</ul>\n");
}

/// Browser side of scroll sync, tab switching and the narrow-screen menu
///
/// Reads the root margin and header offset from the TOC panel's data
/// attributes so the page behaves exactly like the Rust model.
const SCROLL_SYNC_SCRIPT: &str = r#"
(function () {
  var menuToggle = document.querySelector('.menu-toggle');
  var sidebar = document.getElementById('sidebar');
  var backdrop = document.querySelector('.sidebar-backdrop');

  function setSidebarOpen(open) {
    if (!sidebar) {
      return;
    }
    sidebar.classList.toggle('open', open);
    if (backdrop) {
      backdrop.hidden = !open;
    }
    if (menuToggle) {
      menuToggle.setAttribute('aria-expanded', open ? 'true' : 'false');
      menuToggle.innerHTML = open ? '&#10005;' : '&#9776;';
    }
  }

  if (menuToggle) {
    menuToggle.addEventListener('click', function () {
      setSidebarOpen(!(sidebar && sidebar.classList.contains('open')));
    });
  }
  if (backdrop) {
    backdrop.addEventListener('click', function () {
      setSidebarOpen(false);
    });
  }
  document.querySelectorAll('.nav-link').forEach(function (link) {
    link.addEventListener('click', function () {
      setSidebarOpen(false);
    });
  });

  document.querySelectorAll('.tab-button').forEach(function (button) {
    button.addEventListener('click', function () {
      document.querySelectorAll('.tab-button').forEach(function (b) {
        b.classList.toggle('active', b === button);
      });
      document.querySelectorAll('.tab-panel').forEach(function (panel) {
        panel.hidden = panel.dataset.tab !== button.dataset.tab;
      });
    });
  });

  var toc = document.querySelector('nav.toc');
  if (!toc) {
    return;
  }
  var headerOffset = Number(toc.dataset.headerOffset || 80);
  var entries = toc.querySelectorAll('button[data-target]');

  function setActive(id) {
    entries.forEach(function (entry) {
      entry.classList.toggle('active', entry.dataset.target === id);
    });
  }

  var observer = new IntersectionObserver(function (records) {
    records.forEach(function (record) {
      if (record.isIntersecting) {
        setActive(record.target.id);
      }
    });
  }, { rootMargin: toc.dataset.rootMargin, threshold: 0 });

  entries.forEach(function (entry) {
    var anchor = document.getElementById(entry.dataset.target);
    if (anchor) {
      observer.observe(anchor);
    }
    entry.addEventListener('click', function () {
      var target = document.getElementById(entry.dataset.target);
      if (!target) {
        return;
      }
      var top = target.getBoundingClientRect().top + window.scrollY - headerOffset;
      window.scrollTo({ top: top, behavior: 'smooth' });
    });
  });

  window.addEventListener('pagehide', function () {
    observer.disconnect();
  });
})();
"#;

/// Dark documentation theme
const CSS_STYLES: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', 'Oxygen',
                 'Ubuntu', 'Cantarell', 'Fira Sans', 'Droid Sans', 'Helvetica Neue',
                 sans-serif;
    line-height: 1.6;
    color: #e2e8f0;
    background-color: #0b0f17;
}

.site-header {
    position: fixed;
    top: 0;
    left: 0;
    right: 0;
    height: 64px;
    display: flex;
    align-items: center;
    justify-content: space-between;
    padding: 0 24px;
    background: rgba(11, 15, 23, 0.95);
    border-bottom: 1px solid #1f2937;
    z-index: 50;
}

.menu-toggle {
    display: none;
    margin-right: 12px;
    padding: 4px 10px;
    background: none;
    border: none;
    border-radius: 8px;
    color: #e2e8f0;
    font-size: 1.25em;
    cursor: pointer;
}

.menu-toggle:hover {
    background-color: #111827;
}

.sidebar-backdrop {
    position: fixed;
    top: 64px;
    bottom: 0;
    left: 0;
    right: 0;
    background: rgba(0, 0, 0, 0.6);
    z-index: 30;
}

.site-title {
    margin-right: auto;
    font-size: 1.25em;
    font-weight: 700;
    color: #fff;
    text-decoration: none;
}

.header-links a {
    margin-left: 16px;
    color: #cbd5e1;
    font-size: 0.9em;
    text-decoration: none;
}

.shell {
    display: flex;
    padding-top: 64px;
}

.sidebar {
    position: fixed;
    top: 64px;
    bottom: 0;
    left: 0;
    width: 256px;
    overflow-y: auto;
    padding: 16px;
    border-right: 1px solid #1f2937;
    background-color: #0b0f17;
    z-index: 40;
    transition: transform 0.3s;
}

.tab-switcher {
    display: flex;
    margin-bottom: 16px;
    border-bottom: 1px solid #1f2937;
}

.tab-button {
    flex: 1;
    padding: 8px 12px;
    background: none;
    border: none;
    color: #94a3b8;
    font-size: 0.9em;
    cursor: pointer;
}

.tab-button.active {
    color: #fff;
    border-bottom: 2px solid #22d3ee;
}

.nav-section {
    margin-bottom: 16px;
}

.nav-section summary,
.nav-heading {
    font-size: 0.75em;
    font-weight: 700;
    text-transform: uppercase;
    letter-spacing: 0.1em;
    color: #64748b;
    padding: 4px 8px;
    cursor: pointer;
}

.nav-items {
    list-style: none;
}

.nav-link {
    display: block;
    padding: 6px 12px;
    border-radius: 8px;
    color: #cbd5e1;
    font-size: 0.9em;
    text-decoration: none;
}

.nav-link:hover {
    background-color: #111827;
    color: #fff;
}

.nav-link.current {
    background-color: rgba(34, 211, 238, 0.1);
    color: #22d3ee;
    font-weight: 500;
}

.content {
    flex: 1;
    min-width: 0;
    margin-left: 256px;
    padding: 40px 48px;
}

.prose {
    max-width: 896px;
    margin: 0 auto;
}

.prose h1 {
    font-size: 2.25em;
    margin-bottom: 16px;
}

.prose h2 {
    font-size: 1.6em;
    margin: 40px 0 16px;
    padding-bottom: 8px;
    border-bottom: 1px solid #1f2937;
}

.prose h3 {
    font-size: 1.25em;
    margin: 28px 0 12px;
}

.prose h4 {
    font-size: 1.05em;
    margin: 20px 0 8px;
}

.prose p,
.prose ul,
.prose ol,
.prose table,
.prose blockquote {
    margin-bottom: 16px;
}

.prose ul,
.prose ol {
    padding-left: 28px;
}

.prose a {
    color: #22d3ee;
}

.prose code {
    font-family: 'Monaco', 'Menlo', 'Ubuntu Mono', 'Consolas', monospace;
    background-color: #111827;
    padding: 2px 6px;
    border-radius: 4px;
    font-size: 0.9em;
}

.prose pre {
    background-color: #111827;
    border: 1px solid #1f2937;
    border-radius: 8px;
    padding: 16px;
    overflow-x: auto;
}

.prose pre code {
    padding: 0;
    background: none;
}

.prose blockquote {
    border-left: 4px solid #22d3ee;
    padding-left: 16px;
    color: #94a3b8;
}

.prose table {
    width: 100%;
    border-collapse: collapse;
}

.prose th,
.prose td {
    padding: 8px 12px;
    border: 1px solid #1f2937;
    text-align: left;
}

.prose hr {
    border: none;
    border-top: 1px solid #1f2937;
    margin: 32px 0;
}

.toc-column {
    width: 224px;
    flex-shrink: 0;
    padding-right: 24px;
}

.toc {
    position: sticky;
    top: 96px;
    padding: 40px 0;
}

.toc-title {
    font-size: 0.75em;
    font-weight: 700;
    text-transform: uppercase;
    letter-spacing: 0.1em;
    color: #64748b;
    margin-bottom: 16px;
    padding: 0 8px;
}

.toc-list {
    list-style: none;
}

.toc-entry {
    display: block;
    width: 100%;
    text-align: left;
    padding-top: 4px;
    padding-bottom: 4px;
    padding-right: 8px;
    border: none;
    border-radius: 4px;
    background: none;
    color: #94a3b8;
    font-size: 0.875em;
    cursor: pointer;
}

.toc-entry:hover {
    color: #fff;
    background-color: #111827;
}

.toc-entry.active {
    color: #22d3ee;
    background-color: rgba(34, 211, 238, 0.1);
}

@media screen and (max-width: 1280px) {
    .toc-column {
        display: none;
    }
}

@media screen and (max-width: 1024px) {
    .menu-toggle {
        display: inline-block;
    }

    .sidebar {
        transform: translateX(-100%);
    }

    .sidebar.open {
        transform: translateX(0);
    }

    .content {
        margin-left: 0;
        padding: 32px 20px;
    }
}
"#;
