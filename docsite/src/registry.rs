//! Section registry for the currently displayed document

use crate::heading::{extract_headings, HeadingDescriptor};
use itertools::Itertools;

/// Ordered, read-only list of the headings of one document
///
/// A registry is never patched: a document change builds a new one from
/// scratch with [`SectionRegistry::from_document`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionRegistry {
    headings: Vec<HeadingDescriptor>,
}

impl SectionRegistry {
    /// Registry for a page with no navigable headings
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the registry for a document's raw Markdown text
    pub fn from_document(content: &str) -> Self {
        let headings = extract_headings(content);
        log::debug!("Section registry built with {} headings", headings.len());
        Self { headings }
    }

    /// Headings in document order
    pub fn headings(&self) -> &[HeadingDescriptor] {
        &self.headings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HeadingDescriptor> {
        self.headings.iter()
    }

    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    /// First heading with the given id
    pub fn get(&self, id: &str) -> Option<&HeadingDescriptor> {
        self.headings.iter().find(|h| h.id == id)
    }

    /// Index of the first heading with the given id
    pub fn position(&self, id: &str) -> Option<usize> {
        self.headings.iter().position(|h| h.id == id)
    }

    /// Ids shared by more than one heading, each reported once when first repeated
    ///
    /// Only a diagnostic. Anchor navigation to a duplicated id lands on the
    /// first matching element.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        self.headings
            .iter()
            .map(|h| h.id.as_str())
            .duplicates()
            .collect()
    }
}

impl<'a> IntoIterator for &'a SectionRegistry {
    type Item = &'a HeadingDescriptor;
    type IntoIter = std::slice::Iter<'a, HeadingDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.headings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCANS: &str = "# Autonomous Scans\n\n## Configuration\n\n### Targets\n\n### Rules of Engagement (RoE)\n\n### Max Iterations\n\n## Scan Lifecycle\n";

    #[test]
    fn test_registry_from_document() {
        let registry = SectionRegistry::from_document(SCANS);
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.headings()[0].id, "configuration");
        assert_eq!(registry.position("rules-of-engagement-roe"), Some(2));
        assert_eq!(
            registry.get("scan-lifecycle").map(|h| h.text.as_str()),
            Some("Scan Lifecycle")
        );
        assert!(registry.get("autonomous-scans").is_none());
    }

    #[test]
    fn test_registry_recomputation_is_identical() {
        assert_eq!(
            SectionRegistry::from_document(SCANS),
            SectionRegistry::from_document(SCANS)
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = SectionRegistry::from_document("# Only a title\n");
        assert!(registry.is_empty());
        assert_eq!(registry, SectionRegistry::empty());
    }

    #[test]
    fn test_duplicate_ids_are_reported_not_changed() {
        let registry = SectionRegistry::from_document("## Setup\n### Notes\n## Usage\n### Notes\n");
        assert_eq!(registry.duplicate_ids(), vec!["notes"]);
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.position("notes"), Some(1));
    }
}
