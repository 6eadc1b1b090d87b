// tests/style_protocol.rs
use quire_core::{
    ManualClock, PropertyKey, PropertyRegistry, PropertyValue, StyleCategory, StyleId,
    StyleProperties, StyleRegistry, StyleSource,
};
use quire_runtime::{
    ConflictDescriptor, ConflictMode, EditOutcome, EditorSession, SessionConfig,
};

fn session_at(start: u64) -> (EditorSession, std::rc::Rc<ManualClock>) {
    let clock = ManualClock::new(start);
    let mut registry = StyleRegistry::with_clock(clock.clone());
    registry.seed_predefined();
    (EditorSession::with_registry(SessionConfig::default(), registry), clock)
}

fn opacity(session: &EditorSession, element: u32) -> Option<PropertyValue> {
    session
        .resolve(element, StyleCategory::Fill)
        .unwrap()
        .properties
        .get(PropertyKey::Opacity)
        .cloned()
}

#[test]
fn test_linked_resolution_ignores_override() {
    let (mut session, _) = session_at(0);
    let e = session.create_element("box");
    session.apply_style(e, StyleCategory::Border, "rounded").unwrap();

    // Overrides written while unlinked survive linking but do not show.
    session.unlink(e, StyleCategory::Border).unwrap();
    session
        .edit(e, "borderRadius", 99.0, ConflictMode::Silent)
        .unwrap();
    session.apply_style(e, StyleCategory::Border, "rounded").unwrap();

    let resolved = session.resolve(e, StyleCategory::Border).unwrap();
    let shared = session
        .registry()
        .get(StyleCategory::Border, "rounded")
        .unwrap();
    assert_eq!(resolved.properties, shared.properties);
    assert_eq!(
        session.element(e).unwrap().bindings.border.local_override.get(PropertyKey::BorderRadius),
        Some(&PropertyValue::Number(99.0))
    );
}

#[test]
fn test_unlink_all_does_not_snapshot() {
    let (mut session, _) = session_at(0);
    let e = session.create_element("title");
    session.apply_style(e, StyleCategory::Text, "heading1").unwrap();
    session.apply_style(e, StyleCategory::Fill, "primary").unwrap();

    let linked_text = session.resolve(e, StyleCategory::Text).unwrap();
    session.unlink_all(e).unwrap();

    let schema = PropertyRegistry::new();
    let element = session.element(e).unwrap();
    for resolved in session.resolve_all(e).unwrap() {
        let expected = StyleProperties::merged(
            &schema.defaults(resolved.category),
            &element.binding(resolved.category).local_override,
        );
        assert_eq!(resolved.properties, expected);
        assert_eq!(resolved.source, StyleSource::Local);
    }
    assert_ne!(
        session.resolve(e, StyleCategory::Text).unwrap().properties,
        linked_text.properties
    );
}

#[test]
fn test_update_shared_fans_out() {
    let (mut session, _) = session_at(0);
    let a = session.create_element("a");
    let b = session.create_element("b");
    session.apply_style(a, StyleCategory::Fill, "card").unwrap();
    session.apply_style(b, StyleCategory::Fill, "card").unwrap();

    let outcome = session
        .edit(a, "opacity", 0.25, ConflictMode::UpdateShared)
        .unwrap();
    assert!(matches!(outcome, EditOutcome::SharedUpdated { .. }));
    assert_eq!(opacity(&session, b), Some(PropertyValue::Number(0.25)));
    assert!(session.element(a).unwrap().bindings.fill.is_linked());
}

#[test]
fn test_auto_unlink_isolates() {
    let (mut session, _) = session_at(0);
    let a = session.create_element("a");
    let b = session.create_element("b");
    session.apply_style(a, StyleCategory::Fill, "card").unwrap();
    session.apply_style(b, StyleCategory::Fill, "card").unwrap();
    let before_b = session.resolve(b, StyleCategory::Fill).unwrap();

    session
        .edit(a, "opacity", 0.25, ConflictMode::AutoUnlink)
        .unwrap();

    assert_eq!(session.resolve(b, StyleCategory::Fill).unwrap(), before_b);
    assert_eq!(session.element(a).unwrap().bindings.fill.style_id, None);
    assert_eq!(opacity(&session, a), Some(PropertyValue::Number(0.25)));
}

#[test]
fn test_interactive_cancel_keeps_primary() {
    let (mut session, _) = session_at(0);
    session.set_confirmation_provider(|_: &ConflictDescriptor| false);
    let e = session.create_element("E");
    session.apply_style(e, StyleCategory::Fill, "primary").unwrap();
    let binding_before = session.element(e).unwrap().bindings.fill.clone();

    let outcome = session
        .edit(e, "opacity", 0.5, ConflictMode::Interactive)
        .unwrap();

    assert!(matches!(outcome, EditOutcome::Cancelled(_)));
    assert_eq!(session.element(e).unwrap().bindings.fill, binding_before);
    let resolved = session.resolve(e, StyleCategory::Fill).unwrap();
    assert_eq!(resolved.source, StyleSource::Linked(StyleId::new("primary")));
    let primary = session.registry().get(StyleCategory::Fill, "primary").unwrap();
    assert_eq!(
        resolved.properties.get(PropertyKey::Opacity),
        primary.properties.get(PropertyKey::Opacity)
    );
}

#[test]
fn test_interactive_accept_unlinks() {
    let (mut session, _) = session_at(0);
    session.set_confirmation_provider(|conflict: &ConflictDescriptor| {
        conflict.category == StyleCategory::Fill
    });
    let e = session.create_element("E");
    session.apply_style(e, StyleCategory::Fill, "primary").unwrap();

    let outcome = session
        .edit(e, "opacity", 0.5, ConflictMode::Interactive)
        .unwrap();
    assert_eq!(
        outcome,
        EditOutcome::Unlinked {
            category: StyleCategory::Fill,
            key: PropertyKey::Opacity,
            previous: StyleId::new("primary"),
        }
    );
    assert_eq!(opacity(&session, e), Some(PropertyValue::Number(0.5)));
}

#[test]
fn test_silent_conflict_is_distinct_from_cancel() {
    let (mut session, _) = session_at(0);
    let e = session.create_element("E");
    session.apply_style(e, StyleCategory::Text, "body").unwrap();

    let outcome = session
        .edit(e, "fontSize", 40.0, ConflictMode::Silent)
        .unwrap();
    match outcome {
        EditOutcome::Conflict(conflict) => {
            assert_eq!(conflict.style_id, StyleId::new("body"));
            assert_eq!(conflict.style_name, "Body");
        }
        other => panic!("expected a conflict, got {:?}", other),
    }
}

#[test]
fn test_listing_and_cleanup_scenario() {
    let (mut session, clock) = session_at(0);

    clock.set(100);
    let custom1 = session
        .registry_mut()
        .create(StyleCategory::Border, "custom1", StyleProperties::new())
        .unwrap();
    clock.set(200);
    let custom2 = session
        .registry_mut()
        .create(StyleCategory::Border, "custom2", StyleProperties::new())
        .unwrap();

    let listed: Vec<StyleId> = session
        .registry()
        .list_all(StyleCategory::Border)
        .into_iter()
        .map(|d| d.id.clone())
        .collect();
    assert_eq!(listed.first(), Some(&StyleId::new("simple")));
    assert_eq!(&listed[listed.len() - 2..], &[custom2.clone(), custom1.clone()]);
    let is_custom = |id: &StyleId| {
        session
            .registry()
            .get(StyleCategory::Border, id.as_str())
            .unwrap()
            .is_custom
    };
    let first_custom = listed.iter().position(is_custom).unwrap();
    assert!(!listed[..first_custom].iter().any(is_custom));

    let predefined = session.registry().len() - session.registry().custom_len();
    let report = session.cleanup_unused();
    assert_eq!(report.count(), 2);
    assert_eq!(session.registry().len(), predefined);
    assert!(session.cleanup_unused().is_empty());
}

#[test]
fn test_cleanup_never_removes_referenced() {
    let (mut session, _) = session_at(0);
    let e = session.create_element("shape");
    let linked = session
        .create_style_from_element(e, StyleCategory::Paragraph, "Mine")
        .unwrap();
    let orphan = session
        .duplicate_style(StyleCategory::Paragraph, linked.as_str(), None)
        .unwrap();
    assert_eq!(
        session.registry().get(StyleCategory::Paragraph, orphan.as_str()).unwrap().name,
        "Mine (copy)"
    );

    let report = session.cleanup_unused();
    assert_eq!(report.removed, vec![(StyleCategory::Paragraph, orphan)]);
    assert!(session.registry().contains(StyleCategory::Paragraph, linked.as_str()));
}

#[test]
fn test_edit_rejects_bad_input() {
    let (mut session, _) = session_at(0);
    let e = session.create_element("E");

    assert!(session.edit(e, "sparkle", 1.0, ConflictMode::Silent).is_err());
    assert!(session.edit(e, "textColor", "not a colour", ConflictMode::Silent).is_err());
    assert!(session.edit(e + 100, "x", 1.0, ConflictMode::Silent).is_err());

    let outcome = session.edit(e, "textColor", "#0f0", ConflictMode::Silent).unwrap();
    assert!(outcome.is_applied());
    let outcome = session.edit(e, "width", 320.0, ConflictMode::Silent).unwrap();
    assert!(matches!(outcome, EditOutcome::AttributeSet(_)));
    assert_eq!(session.element(e).unwrap().size.x, 320.0);
}

#[test]
fn test_non_finite_edits_are_refused() {
    let (mut session, _) = session_at(0);
    let e = session.create_element("E");
    session.apply_style(e, StyleCategory::Fill, "card").unwrap();
    let card_before = session.registry().get(StyleCategory::Fill, "card").cloned();

    assert!(session
        .edit(e, "opacity", f64::NAN, ConflictMode::UpdateShared)
        .is_err());
    assert!(session
        .edit(e, "shadowBlur", f64::INFINITY, ConflictMode::AutoUnlink)
        .is_err());
    assert!(session.edit(e, "x", f64::NAN, ConflictMode::Silent).is_err());

    assert_eq!(session.registry().get(StyleCategory::Fill, "card").cloned(), card_before);
    assert!(session.element(e).unwrap().bindings.fill.is_linked());
}

#[test]
fn test_edited_styles_survive_export_and_import() {
    let (mut session, _) = session_at(0);
    let a = session.create_element("a");
    let b = session.create_element("b");
    session.apply_style(a, StyleCategory::Fill, "card").unwrap();
    session.apply_style(b, StyleCategory::Border, "rounded").unwrap();

    session
        .edit(a, "opacity", 0.4, ConflictMode::UpdateShared)
        .unwrap();
    session
        .edit(b, "borderColor", "#123456", ConflictMode::UpdateShared)
        .unwrap();
    session.unlink(b, StyleCategory::Text).unwrap();
    session.edit(b, "fontSize", 19.0, ConflictMode::Silent).unwrap();
    let custom = session
        .create_style_from_element(b, StyleCategory::Text, "Nineteen")
        .unwrap();

    let json = session.export_json().unwrap();
    let mut restored = EditorSession::new(SessionConfig::default().without_predefined());
    let summary = restored.import_json(&json).unwrap();
    assert_eq!(summary.total(), session.registry().len());

    for original in session.registry().iter() {
        let copy = restored
            .registry()
            .get(original.category, original.id.as_str())
            .unwrap();
        assert_eq!(copy.properties, original.properties, "{} changed", original.id);
        assert_eq!(copy.is_custom, original.is_custom);
    }
    let text = restored.registry().get(StyleCategory::Text, custom.as_str()).unwrap();
    assert_eq!(
        text.properties.get(PropertyKey::FontSize),
        Some(&PropertyValue::Number(19.0))
    );
}
