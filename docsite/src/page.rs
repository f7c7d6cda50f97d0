//! Page view lifecycle across navigations
//!
//! A [`PageView`] holds the section registry and scroll-sync tracker of the
//! document on screen. Navigating to another document throws both away and
//! rebuilds them; nothing carries over between documents.

use crate::layout::AnchorLookup;
use crate::observer::IntersectionObserver;
use crate::registry::SectionRegistry;
use crate::toc::{ScrollRequest, TocPanel, DEFAULT_HEADER_OFFSET};
use crate::tracker::{ScrollSyncState, ScrollSyncTracker};

/// Fresh registry and scroll-sync state for a newly displayed document
pub fn on_navigate(document: &str) -> (SectionRegistry, ScrollSyncState) {
    (
        SectionRegistry::from_document(document),
        ScrollSyncState::empty(),
    )
}

/// The document currently on screen with its TOC state
#[derive(Debug)]
pub struct PageView<O: IntersectionObserver> {
    registry: SectionRegistry,
    tracker: Option<ScrollSyncTracker<O>>,
    header_offset: f64,
}

impl<O: IntersectionObserver> Default for PageView<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: IntersectionObserver> PageView<O> {
    /// A view with no document loaded
    pub fn new() -> Self {
        Self {
            registry: SectionRegistry::empty(),
            tracker: None,
            header_offset: DEFAULT_HEADER_OFFSET,
        }
    }

    pub fn with_header_offset(mut self, header_offset: f64) -> Self {
        self.header_offset = header_offset;
        self
    }

    /// Display a new document
    ///
    /// The previous tracker is disposed before any anchor of the new
    /// document is observed, so no highlight leaks across pages.
    ///
    /// # Parameters
    /// * `document` - Raw Markdown of the new document
    /// * `anchors` - Anchors rendered for the new document
    /// * `observer` - A fresh subscription for the new page view
    pub fn navigate(&mut self, document: &str, anchors: &impl AnchorLookup, observer: O) {
        if let Some(mut previous) = self.tracker.take() {
            previous.dispose();
        }

        let (registry, _) = on_navigate(document);
        self.tracker = Some(ScrollSyncTracker::mount(&registry, observer, anchors));
        self.registry = registry;
    }

    /// Tear down the current page view without loading another
    pub fn unmount(&mut self) {
        if let Some(mut tracker) = self.tracker.take() {
            tracker.dispose();
        }
        self.registry = SectionRegistry::empty();
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> Option<&ScrollSyncTracker<O>> {
        self.tracker.as_ref()
    }

    pub fn tracker_mut(&mut self) -> Option<&mut ScrollSyncTracker<O>> {
        self.tracker.as_mut()
    }

    /// Active heading id; empty when none is tracked
    pub fn active_id(&self) -> &str {
        self.tracker.as_ref().map_or("", |t| t.active_id())
    }

    /// Apply queued intersection records; returns whether the highlight changed
    pub fn poll(&mut self) -> bool {
        self.tracker.as_mut().is_some_and(ScrollSyncTracker::poll)
    }

    /// Panel reflecting the current registry and highlight
    pub fn toc_panel(&self) -> TocPanel {
        let empty = ScrollSyncState::empty();
        let state = self.tracker.as_ref().map_or(&empty, |t| t.state());
        TocPanel::new(&self.registry, state).with_header_offset(self.header_offset)
    }

    /// Handle a click on a TOC entry
    pub fn click(&self, id: &str, anchors: &impl AnchorLookup) -> Option<ScrollRequest> {
        self.toc_panel().click(id, anchors)
    }
}
