//! Visibility observation of rendered heading anchors
//!
//! The [`IntersectionObserver`] trait is the subscription a TOC panel owns
//! for the lifetime of one page view. Implementations queue
//! [`IntersectionEntry`] records as anchors enter or leave the intersection
//! band, and the owner drains them with `take_records`. Nothing here is
//! global: dropping or disconnecting the observer ends the subscription.

use crate::layout::{AnchorBox, DocumentLayout};
use std::collections::HashSet;
use std::fmt;

/// Height reserved for the fixed top header, in logical pixels
pub const HEADER_BAND_PX: f64 = 80.0;

/// Share of the viewport cut off the bottom of the band
pub const BOTTOM_BAND_PERCENT: f64 = 80.0;

/// A single root margin component
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginValue {
    /// Absolute logical pixels
    Px(f64),
    /// Percentage of the viewport extent along the same axis
    Percent(f64),
}

impl MarginValue {
    /// Resolve to pixels against the viewport extent
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            MarginValue::Px(px) => px,
            MarginValue::Percent(pct) => extent * pct / 100.0,
        }
    }
}

impl fmt::Display for MarginValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginValue::Px(px) => write!(f, "{}px", px),
            MarginValue::Percent(pct) => write!(f, "{}%", pct),
        }
    }
}

/// Margins applied to the viewport; negative values shrink it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl Default for RootMargin {
    fn default() -> Self {
        Self {
            top: MarginValue::Px(-HEADER_BAND_PX),
            right: MarginValue::Percent(0.0),
            bottom: MarginValue::Percent(-BOTTOM_BAND_PERCENT),
            left: MarginValue::Percent(0.0),
        }
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

/// Options shared by every observer implementation and the browser script
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    pub root_margin: RootMargin,
    pub threshold: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: RootMargin::default(),
            threshold: 0.0,
        }
    }
}

impl ObserverOptions {
    /// Root margin in CSS shorthand, e.g. `-80px 0% -80% 0%`
    pub fn to_root_margin_string(&self) -> String {
        self.root_margin.to_string()
    }
}

/// A change in visibility of one observed anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub target_id: String,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn entering(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            is_intersecting: true,
        }
    }

    pub fn leaving(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            is_intersecting: false,
        }
    }
}

/// Subscription to visibility changes of a set of anchors
pub trait IntersectionObserver {
    /// Start observing the anchor with this id
    fn observe(&mut self, target_id: &str);

    /// Stop observing one anchor
    fn unobserve(&mut self, target_id: &str);

    /// Stop observing everything and drop queued records
    fn disconnect(&mut self);

    /// Drain the records queued since the last call, in delivery order
    fn take_records(&mut self) -> Vec<IntersectionEntry>;

    /// Ids currently observed, in the order they were registered
    fn observed_ids(&self) -> &[String];
}

/// Vertical region of the document that counts as "in view"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionBand {
    pub top: f64,
    pub bottom: f64,
}

impl IntersectionBand {
    /// Band for a viewport scrolled to `scroll_y`
    ///
    /// With the default margins the band starts 80px below the top of the
    /// viewport and ends at 20% of its height.
    pub fn for_viewport(scroll_y: f64, viewport_height: f64, margin: &RootMargin) -> Self {
        Self {
            top: scroll_y - margin.top.resolve(viewport_height),
            bottom: scroll_y + viewport_height + margin.bottom.resolve(viewport_height),
        }
    }

    /// Whether the band has collapsed, e.g. on a very short viewport
    pub fn is_empty(&self) -> bool {
        self.bottom < self.top
    }

    /// Edge-adjacent boxes count as intersecting, like a zero threshold
    pub fn intersects(&self, anchor: &AnchorBox) -> bool {
        !self.is_empty() && anchor.top <= self.bottom && anchor.bottom() >= self.top
    }
}

/// Observer driven by a known document layout and explicit scroll positions
///
/// Stands in for a rendering engine: observing an anchor queues an initial
/// record with its current visibility, and every later scroll or resize
/// queues a record for each anchor whose visibility flipped, in document
/// order.
#[derive(Debug, Clone)]
pub struct LayoutObserver {
    layout: DocumentLayout,
    options: ObserverOptions,
    viewport_height: f64,
    scroll_y: f64,
    observed: Vec<String>,
    intersecting: HashSet<String>,
    records: Vec<IntersectionEntry>,
}

impl LayoutObserver {
    pub fn new(layout: DocumentLayout, viewport_height: f64, options: ObserverOptions) -> Self {
        Self {
            layout,
            options,
            viewport_height,
            scroll_y: 0.0,
            observed: Vec::new(),
            intersecting: HashSet::new(),
            records: Vec::new(),
        }
    }

    pub fn layout(&self) -> &DocumentLayout {
        &self.layout
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Current intersection band
    pub fn band(&self) -> IntersectionBand {
        IntersectionBand::for_viewport(
            self.scroll_y,
            self.viewport_height,
            &self.options.root_margin,
        )
    }

    /// Scroll the viewport and queue records for visibility changes
    pub fn scroll_to(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y.max(0.0);
        self.reevaluate();
    }

    /// Resize the viewport and queue records for visibility changes
    pub fn resize(&mut self, viewport_height: f64) {
        self.viewport_height = viewport_height;
        self.reevaluate();
    }

    fn in_band(&self, target_id: &str) -> bool {
        let band = self.band();
        self.layout
            .get(target_id)
            .is_some_and(|anchor| band.intersects(anchor))
    }

    fn reevaluate(&mut self) {
        let mut ids: Vec<&String> = self.observed.iter().collect();
        ids.sort_by(|a, b| {
            let top_a = self.layout.get(a).map_or(f64::MAX, |anchor| anchor.top);
            let top_b = self.layout.get(b).map_or(f64::MAX, |anchor| anchor.top);
            top_a.total_cmp(&top_b)
        });

        let changes: Vec<IntersectionEntry> = ids
            .into_iter()
            .filter_map(|id| {
                let now = self.in_band(id);
                (now != self.intersecting.contains(id.as_str())).then(|| IntersectionEntry {
                    target_id: id.clone(),
                    is_intersecting: now,
                })
            })
            .collect();

        for change in changes {
            if change.is_intersecting {
                self.intersecting.insert(change.target_id.clone());
            } else {
                self.intersecting.remove(&change.target_id);
            }
            self.records.push(change);
        }
    }
}

impl IntersectionObserver for LayoutObserver {
    fn observe(&mut self, target_id: &str) {
        if self.observed.iter().any(|id| id == target_id) {
            return;
        }
        if self.layout.get(target_id).is_none() {
            log::debug!("No rendered anchor for '{}', not observing", target_id);
            return;
        }

        self.observed.push(target_id.to_string());
        let now = self.in_band(target_id);
        if now {
            self.intersecting.insert(target_id.to_string());
        }
        self.records.push(IntersectionEntry {
            target_id: target_id.to_string(),
            is_intersecting: now,
        });
    }

    fn unobserve(&mut self, target_id: &str) {
        self.observed.retain(|id| id != target_id);
        self.intersecting.remove(target_id);
        self.records.retain(|r| r.target_id != target_id);
    }

    fn disconnect(&mut self) {
        self.observed.clear();
        self.intersecting.clear();
        self.records.clear();
    }

    fn take_records(&mut self) -> Vec<IntersectionEntry> {
        std::mem::take(&mut self.records)
    }

    fn observed_ids(&self) -> &[String] {
        &self.observed
    }
}

/// Observer whose records are pushed by hand
///
/// Records for ids that are not observed are dropped, as a rendering engine
/// would never report them.
#[derive(Debug, Clone, Default)]
pub struct ManualObserver {
    observed: Vec<String>,
    records: Vec<IntersectionEntry>,
}

impl ManualObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a record; returns false if the id is not observed
    pub fn push(&mut self, entry: IntersectionEntry) -> bool {
        if self.observed.contains(&entry.target_id) {
            self.records.push(entry);
            true
        } else {
            false
        }
    }
}

impl IntersectionObserver for ManualObserver {
    fn observe(&mut self, target_id: &str) {
        if !self.observed.iter().any(|id| id == target_id) {
            self.observed.push(target_id.to_string());
        }
    }

    fn unobserve(&mut self, target_id: &str) {
        self.observed.retain(|id| id != target_id);
    }

    fn disconnect(&mut self) {
        self.observed.clear();
        self.records.clear();
    }

    fn take_records(&mut self) -> Vec<IntersectionEntry> {
        std::mem::take(&mut self.records)
    }

    fn observed_ids(&self) -> &[String] {
        &self.observed
    }
}
