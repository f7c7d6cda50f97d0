//! Scroll-sync tracking of the active section
//!
//! A [`ScrollSyncTracker`] owns the intersection subscription for one page
//! view. Every record reporting an anchor entering the band makes that
//! anchor the active section; the last one applied wins. Records reporting
//! an anchor leaving the band never clear the active section.

use crate::layout::AnchorLookup;
use crate::observer::{IntersectionEntry, IntersectionObserver};
use crate::registry::SectionRegistry;

/// Which heading, if any, is currently considered in view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollSyncState {
    active_id: String,
}

impl ScrollSyncState {
    /// State before any anchor has entered the band
    pub fn empty() -> Self {
        Self::default()
    }

    /// Id of the active heading; empty when none is tracked
    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn is_empty(&self) -> bool {
        self.active_id.is_empty()
    }

    pub fn is_active(&self, id: &str) -> bool {
        !self.active_id.is_empty() && self.active_id == id
    }

    /// Transition applied when an anchor enters the intersection band
    pub fn on_intersect(self, id: &str) -> Self {
        Self {
            active_id: id.to_string(),
        }
    }

    /// Apply a batch of records in delivery order
    pub fn apply<'a, I>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = &'a IntersectionEntry>,
    {
        entries
            .into_iter()
            .filter(|entry| entry.is_intersecting)
            .fold(self, |state, entry| state.on_intersect(&entry.target_id))
    }
}

/// Tracks the active section for one page view
///
/// Created on mount with a fresh, empty state and torn down with
/// [`ScrollSyncTracker::dispose`] (or by dropping it). Once disposed the
/// tracker ignores any further records.
#[derive(Debug)]
pub struct ScrollSyncTracker<O: IntersectionObserver> {
    observer: O,
    state: ScrollSyncState,
    disposed: bool,
}

impl<O: IntersectionObserver> ScrollSyncTracker<O> {
    /// Observe every registry heading that has a rendered anchor
    ///
    /// Headings whose anchor is missing from the rendered document are
    /// skipped; they simply never become active.
    pub fn mount(registry: &SectionRegistry, mut observer: O, anchors: &impl AnchorLookup) -> Self {
        for heading in registry {
            if anchors.contains_anchor(&heading.id) {
                observer.observe(&heading.id);
            } else {
                log::debug!("Heading '{}' has no rendered anchor", heading.id);
            }
        }

        Self {
            observer,
            state: ScrollSyncState::empty(),
            disposed: false,
        }
    }

    pub fn state(&self) -> &ScrollSyncState {
        &self.state
    }

    pub fn active_id(&self) -> &str {
        self.state.active_id()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Access the subscription, e.g. to drive a simulated scroll
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Apply records delivered by the host, in delivery order
    ///
    /// # Returns
    /// * `true` - The active section changed
    /// * `false` - Nothing changed, or the tracker is disposed
    pub fn handle_entries<I>(&mut self, entries: I) -> bool
    where
        I: IntoIterator<Item = IntersectionEntry>,
    {
        if self.disposed {
            log::debug!("Ignoring intersection records after teardown");
            return false;
        }

        let entries: Vec<IntersectionEntry> = entries.into_iter().collect();
        let previous = self.state.clone();
        self.state = std::mem::take(&mut self.state).apply(&entries);
        self.state != previous
    }

    /// Drain the observer's queued records and apply them
    pub fn poll(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        let records = self.observer.take_records();
        self.handle_entries(records)
    }

    /// Stop observing, reset the state and refuse further updates
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.observer.disconnect();
        self.state = ScrollSyncState::empty();
        self.disposed = true;
    }
}

impl<O: IntersectionObserver> Drop for ScrollSyncTracker<O> {
    fn drop(&mut self) {
        self.dispose();
    }
}
