//! Table of contents panel
//!
//! The panel is a pure view of a [`SectionRegistry`] and a
//! [`ScrollSyncState`]: it renders an indented list of headings, marks the
//! active one, and turns a click on an entry into a scroll request.

use crate::heading::HeadingLevel;
use crate::html::escape_html;
use crate::layout::AnchorLookup;
use crate::observer::ObserverOptions;
use crate::registry::SectionRegistry;
use crate::tracker::ScrollSyncState;

/// Height of the fixed page header in logical pixels
pub const DEFAULT_HEADER_OFFSET: f64 = 80.0;

/// Indentation of a level 2 entry, in rem
const BASE_INDENT_REM: f64 = 0.5;

/// Extra indentation per level below 2, in rem
const INDENT_STEP_REM: f64 = 0.5;

/// How the host should animate a requested scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

impl ScrollBehavior {
    pub fn as_str(self) -> &'static str {
        match self {
            ScrollBehavior::Smooth => "smooth",
            ScrollBehavior::Instant => "instant",
        }
    }
}

/// Scroll the host should perform after a TOC click
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    /// Target document offset in logical pixels
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// One line of the panel
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    pub id: String,
    pub text: String,
    pub level: HeadingLevel,
    pub indent_steps: usize,
    pub active: bool,
}

impl TocEntry {
    /// Left padding of the entry in rem
    pub fn indent_rem(&self) -> f64 {
        BASE_INDENT_REM + INDENT_STEP_REM * self.indent_steps as f64
    }
}

/// Rendered state of the "On this page" panel
#[derive(Debug, Clone, PartialEq)]
pub struct TocPanel {
    entries: Vec<TocEntry>,
    header_offset: f64,
    observer_options: ObserverOptions,
}

impl TocPanel {
    pub fn new(registry: &SectionRegistry, state: &ScrollSyncState) -> Self {
        let entries = registry
            .iter()
            .map(|heading| TocEntry {
                id: heading.id.clone(),
                text: heading.text.clone(),
                level: heading.level,
                indent_steps: heading.level.indent_steps(),
                active: state.is_active(&heading.id),
            })
            .collect();

        Self {
            entries,
            header_offset: DEFAULT_HEADER_OFFSET,
            observer_options: ObserverOptions::default(),
        }
    }

    pub fn with_header_offset(mut self, header_offset: f64) -> Self {
        self.header_offset = header_offset;
        self
    }

    pub fn with_observer_options(mut self, options: ObserverOptions) -> Self {
        self.observer_options = options;
        self
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn header_offset(&self) -> f64 {
        self.header_offset
    }

    /// First highlighted entry
    pub fn active_entry(&self) -> Option<&TocEntry> {
        self.entries.iter().find(|e| e.active)
    }

    /// Scroll request for a click on the entry with this id
    ///
    /// The target puts the heading just below the fixed header. A click on
    /// an id without a rendered anchor does nothing and returns `None`.
    pub fn click(&self, id: &str, anchors: &impl AnchorLookup) -> Option<ScrollRequest> {
        let anchor_top = anchors.anchor_top(id)?;

        Some(ScrollRequest {
            top: anchor_top - self.header_offset,
            behavior: ScrollBehavior::Smooth,
        })
    }

    /// HTML for the panel; empty when there are no headings
    pub fn render_html(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }

        let mut output = String::new();
        output.push_str(&format!(
            "<nav class=\"toc\" data-header-offset=\"{}\" data-root-margin=\"{}\">\n",
            self.header_offset,
            escape_html(&self.observer_options.to_root_margin_string())
        ));
        output.push_str("<h5 class=\"toc-title\">On this page</h5>\n");
        output.push_str("<ul class=\"toc-list\">\n");

        for entry in &self.entries {
            let active_class = if entry.active { " active" } else { "" };
            output.push_str(&format!(
                "<li><button type=\"button\" class=\"toc-entry toc-indent-{}{}\" data-target=\"{}\">{}</button></li>\n",
                entry.indent_steps,
                active_class,
                escape_html(&entry.id),
                escape_html(&entry.text)
            ));
        }

        output.push_str("</ul>\n");
        output.push_str("</nav>\n");
        output
    }

    /// Plain-text outline, two spaces per indent step, `*` marks the active entry
    pub fn render_text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                let marker = if entry.active { '*' } else { '-' };
                format!(
                    "{}{} {} (#{})\n",
                    "  ".repeat(entry.indent_steps),
                    marker,
                    entry.text,
                    entry.id
                )
            })
            .collect()
    }
}

/// CSS for the indentation classes emitted by [`TocPanel::render_html`]
pub fn indent_css() -> String {
    [HeadingLevel::H2, HeadingLevel::H3, HeadingLevel::H4]
        .iter()
        .map(|level| {
            let steps = level.indent_steps();
            format!(
                ".toc-indent-{} {{ padding-left: {}rem; }}\n",
                steps,
                BASE_INDENT_REM + INDENT_STEP_REM * steps as f64
            )
        })
        .collect()
}
