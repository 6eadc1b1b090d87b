// crates/quire-core/src/gc.rs
//! Explicit mark-and-sweep of custom styles nothing references.
//!
//! Nothing here runs on its own; callers decide when to sweep.

use std::collections::HashSet;

use tracing::info;

use crate::{Element, StyleCategory, StyleId, StyleRegistry};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<(StyleCategory, StyleId)>,
}

impl CleanupReport {
    pub fn count(&self) -> usize {
        self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }

    pub fn removed_in(&self, category: StyleCategory) -> impl Iterator<Item = &StyleId> {
        self.removed
            .iter()
            .filter(move |(c, _)| *c == category)
            .map(|(_, id)| id)
    }
}

/// Mark phase: every style id bound by any element, across all categories.
pub fn collect_references<'a>(elements: impl IntoIterator<Item = &'a Element>) -> HashSet<StyleId> {
    elements
        .into_iter()
        .flat_map(|element| element.bindings.style_ids().cloned())
        .collect()
}

/// Sweep phase: deletes every custom definition whose id is not in
/// `referenced`. Predefined definitions are never touched.
pub fn sweep(registry: &mut StyleRegistry, referenced: &HashSet<StyleId>) -> CleanupReport {
    let mut report = CleanupReport::default();

    for category in StyleCategory::ALL {
        let mut doomed: Vec<StyleId> = registry
            .namespace(category)
            .iter()
            .filter(|d| d.is_custom && !referenced.contains(&d.id))
            .map(|d| d.id.clone())
            .collect();
        doomed.sort();

        for id in doomed {
            if registry.delete(category, id.as_str()) {
                report.removed.push((category, id));
            }
        }
    }

    if !report.is_empty() {
        info!("Removed {} unused custom styles", report.count());
    }
    report
}

/// Deletes unreferenced custom styles and reports what went.
pub fn cleanup_unused<'a>(
    registry: &mut StyleRegistry,
    elements: impl IntoIterator<Item = &'a Element>,
) -> CleanupReport {
    let referenced = collect_references(elements);
    sweep(registry, &referenced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::StyleProperties;

    #[test]
    fn test_cleanup_scenario() {
        let clock = ManualClock::new(0);
        let mut registry = StyleRegistry::with_clock(clock.clone());
        registry.seed_predefined();
        let predefined = registry.len();

        clock.set(100);
        let c1 = registry.create(StyleCategory::Border, "custom1", StyleProperties::new()).unwrap();
        clock.set(200);
        let c2 = registry.create(StyleCategory::Border, "custom2", StyleProperties::new()).unwrap();

        let report = cleanup_unused(&mut registry, std::iter::empty());
        assert_eq!(report.count(), 2);
        assert!(report.removed_in(StyleCategory::Border).any(|id| *id == c1));
        assert!(report.removed_in(StyleCategory::Border).any(|id| *id == c2));
        assert_eq!(registry.len(), predefined);
    }

    #[test]
    fn test_cleanup_keeps_referenced_and_is_idempotent() {
        let mut registry = StyleRegistry::with_predefined();
        let kept = registry.create(StyleCategory::Fill, "Brand", StyleProperties::new()).unwrap();
        registry.create(StyleCategory::Fill, "Stale", StyleProperties::new()).unwrap();

        let mut element = Element::new(1, "box");
        element.bindings.fill.link(kept.clone());
        let elements = vec![element];

        assert_eq!(cleanup_unused(&mut registry, &elements).count(), 1);
        assert_eq!(cleanup_unused(&mut registry, &elements).count(), 0);
        assert!(registry.get(StyleCategory::Fill, kept.as_str()).is_some());
        assert!(registry.iter().filter(|d| !d.is_custom).count() > 0);
    }

    #[test]
    fn test_collect_references_all_categories() {
        let mut a = Element::new(1, "a");
        a.bindings.text.link(StyleId::new("body"));
        let mut b = Element::new(2, "b");
        b.bindings.border.link(StyleId::new("simple"));
        b.bindings.fill.link(StyleId::new("body"));

        let referenced = collect_references([&a, &b]);
        assert_eq!(referenced.len(), 2);
        assert!(referenced.contains("simple"));
    }
}
