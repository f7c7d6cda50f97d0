//! Rendered anchor geometry
//!
//! Positions are absolute document coordinates in logical pixels, i.e. the
//! distance from the top of the document, independent of scroll position.

/// Lookup of rendered anchors by id
pub trait AnchorLookup {
    /// Absolute top offset of the anchor with this id, if it is rendered
    fn anchor_top(&self, id: &str) -> Option<f64>;

    /// Whether an anchor with this id is rendered
    fn contains_anchor(&self, id: &str) -> bool {
        self.anchor_top(id).is_some()
    }
}

/// Box of a single rendered heading anchor
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorBox {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl AnchorBox {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Geometry of every anchor in a rendered document, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentLayout {
    anchors: Vec<AnchorBox>,
}

impl DocumentLayout {
    pub fn new(anchors: Vec<AnchorBox>) -> Self {
        Self { anchors }
    }

    /// Lay out anchors one after another at a fixed spacing
    ///
    /// # Parameters
    /// * `ids` - Anchor ids in document order
    /// * `first_top` - Offset of the first anchor
    /// * `spacing` - Distance between consecutive anchor tops
    /// * `height` - Height of every anchor box
    pub fn uniform<I, S>(ids: I, first_top: f64, spacing: f64, height: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let anchors = ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| AnchorBox::new(id, first_top + spacing * i as f64, height))
            .collect();
        Self { anchors }
    }

    pub fn anchors(&self) -> &[AnchorBox] {
        &self.anchors
    }

    /// First anchor with this id, mirroring element lookup by id
    pub fn get(&self, id: &str) -> Option<&AnchorBox> {
        self.anchors.iter().find(|a| a.id == id)
    }

    /// Total height covered by the anchors
    pub fn extent(&self) -> f64 {
        self.anchors
            .iter()
            .map(AnchorBox::bottom)
            .fold(0.0, f64::max)
    }
}

impl AnchorLookup for DocumentLayout {
    fn anchor_top(&self, id: &str) -> Option<f64> {
        self.get(id).map(|a| a.top)
    }
}
