use docsite::layout::{AnchorBox, DocumentLayout};
use docsite::observer::{
    IntersectionEntry, IntersectionObserver, LayoutObserver, ManualObserver, ObserverOptions,
};
use docsite::render::render_markdown;
use docsite::toc::ScrollBehavior;
use docsite::{PageView, ScrollSyncTracker, SectionRegistry, TocPanel};

const SCANS: &str = "# Autonomous Scans

Scans are the primary unit of work.

## Configuration

### Targets

### Rules of Engagement (RoE)

## Scan Lifecycle
";

/// Headings 400px apart starting at 400, viewport 1000px tall
fn scans_observer() -> (SectionRegistry, DocumentLayout, LayoutObserver) {
    let registry = SectionRegistry::from_document(SCANS);
    let layout = DocumentLayout::uniform(registry.iter().map(|h| h.id.clone()), 400.0, 400.0, 32.0);
    let observer = LayoutObserver::new(layout.clone(), 1000.0, ObserverOptions::default());
    (registry, layout, observer)
}

#[test]
fn test_registry_matches_rendered_page() {
    let registry = SectionRegistry::from_document(SCANS);
    let rendered = render_markdown(SCANS);

    let ids: Vec<&str> = registry.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "configuration",
            "targets",
            "rules-of-engagement-roe",
            "scan-lifecycle"
        ]
    );
    for id in ids {
        assert!(rendered.has_anchor(id), "no rendered anchor for {}", id);
    }
}

#[test]
fn test_scrolling_moves_highlight() {
    let (registry, layout, observer) = scans_observer();
    let mut tracker = ScrollSyncTracker::mount(&registry, observer, &layout);

    // band at the top of the page is [80, 200]: nothing yet
    tracker.poll();
    assert_eq!(tracker.active_id(), "");

    tracker.observer_mut().scroll_to(300.0);
    assert!(tracker.poll());
    assert_eq!(tracker.active_id(), "configuration");

    tracker.observer_mut().scroll_to(700.0);
    tracker.poll();
    assert_eq!(tracker.active_id(), "targets");

    tracker.observer_mut().scroll_to(1050.0);
    tracker.poll();
    assert_eq!(tracker.active_id(), "rules-of-engagement-roe");

    // between headings the last highlight stays
    tracker.observer_mut().scroll_to(1300.0);
    tracker.poll();
    assert_eq!(tracker.active_id(), "rules-of-engagement-roe");

    // scrolling back up
    tracker.observer_mut().scroll_to(350.0);
    tracker.poll();
    assert_eq!(tracker.active_id(), "configuration");
}

#[test]
fn test_latest_intersecting_record_wins() {
    let registry = SectionRegistry::from_document(SCANS);
    let layout = DocumentLayout::uniform(registry.iter().map(|h| h.id.clone()), 0.0, 100.0, 20.0);
    let mut tracker = ScrollSyncTracker::mount(&registry, ManualObserver::new(), &layout);

    tracker.handle_entries(vec![
        IntersectionEntry::entering("targets"),
        IntersectionEntry::entering("scan-lifecycle"),
        IntersectionEntry::leaving("targets"),
    ]);
    assert_eq!(tracker.active_id(), "scan-lifecycle");
}

#[test]
fn test_navigation_resets_highlight() {
    let doc_a = "# A\n## One\n## Two\n## Three\n";
    let doc_b = "# B\n## Alpha\n### Beta\n### Gamma\n## Delta\n#### Epsilon\n";
    let layout_a = DocumentLayout::uniform(["one", "two", "three"], 100.0, 500.0, 30.0);
    let layout_b = DocumentLayout::uniform(
        ["alpha", "beta", "gamma", "delta", "epsilon"],
        100.0,
        500.0,
        30.0,
    );

    let mut view = PageView::new();
    view.navigate(
        doc_a,
        &layout_a,
        LayoutObserver::new(layout_a.clone(), 1000.0, ObserverOptions::default()),
    );
    if let Some(tracker) = view.tracker_mut() {
        // "two" at 600 falls in [560, 680]
        tracker.observer_mut().scroll_to(480.0);
    }
    view.poll();
    assert_eq!(view.active_id(), "two");

    view.navigate(
        doc_b,
        &layout_b,
        LayoutObserver::new(layout_b.clone(), 1000.0, ObserverOptions::default()),
    );

    let panel = view.toc_panel();
    assert_eq!(panel.entries().len(), 5);
    assert_eq!(view.active_id(), "");
    assert!(!panel.render_html().contains(" active\""));

    // the new page starts at the top, where "alpha" is under the header
    assert!(view.poll());
    assert_eq!(view.active_id(), "alpha");
}

#[test]
fn test_click_scrolls_below_header() {
    let registry = SectionRegistry::from_document(SCANS);
    let layout = DocumentLayout::new(vec![
        AnchorBox::new("configuration", 400.0, 32.0),
        AnchorBox::new("targets", 800.0, 32.0),
        AnchorBox::new("rules-of-engagement-roe", 1200.0, 32.0),
        AnchorBox::new("scan-lifecycle", 1600.0, 32.0),
    ]);
    let panel = TocPanel::new(&registry, &docsite::ScrollSyncState::empty());

    let request = panel.click("rules-of-engagement-roe", &layout);
    assert_eq!(request.map(|r| r.top), Some(1120.0));
    assert_eq!(request.map(|r| r.behavior), Some(ScrollBehavior::Smooth));

    // the highlight is left to the observer
    assert!(panel.active_entry().is_none());
}

#[test]
fn test_empty_document_has_no_panel() {
    let registry = SectionRegistry::from_document("# Only a title\n\nSome text.\n");
    let panel = TocPanel::new(&registry, &docsite::ScrollSyncState::empty());
    assert!(panel.is_empty());
    assert_eq!(panel.render_html(), "");

    let (registry, layout, observer) = scans_observer();
    let mut tracker = ScrollSyncTracker::mount(&registry, observer, &layout);
    tracker.dispose();
    assert!(tracker.observer().observed_ids().is_empty());
}
