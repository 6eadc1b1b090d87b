// crates/quire-core/src/predefined.rs
//! Built-in styles every registry starts with. They are never garbage collected.

use crate::{
    BorderSides, Color, PropertyKey, PropertyValue, StyleCategory, StyleDefinition, StyleId,
    StyleProperties, StyleRegistry,
};
use tracing::warn;

use PropertyKey as K;

fn props<const N: usize>(entries: [(PropertyKey, PropertyValue); N]) -> StyleProperties {
    entries.into_iter().collect()
}

fn hex(value: &str) -> PropertyValue {
    PropertyValue::Color(Color::parse(value).unwrap_or(Color::BLACK))
}

/// (category, id, display name, properties), in seed order.
fn predefined_styles() -> Vec<(StyleCategory, &'static str, &'static str, StyleProperties)> {
    vec![
        // Text
        (
            StyleCategory::Text,
            "heading1",
            "Heading 1",
            props([
                (K::FontFamily, "Inter".into()),
                (K::FontSize, 32.0.into()),
                (K::Bold, true.into()),
                (K::TextColor, hex("#111827")),
            ]),
        ),
        (
            StyleCategory::Text,
            "heading2",
            "Heading 2",
            props([
                (K::FontFamily, "Inter".into()),
                (K::FontSize, 24.0.into()),
                (K::Bold, true.into()),
                (K::TextColor, hex("#1f2937")),
            ]),
        ),
        (
            StyleCategory::Text,
            "body",
            "Body",
            props([
                (K::FontFamily, "Inter".into()),
                (K::FontSize, 14.0.into()),
                (K::TextColor, hex("#374151")),
            ]),
        ),
        (
            StyleCategory::Text,
            "caption",
            "Caption",
            props([
                (K::FontFamily, "Inter".into()),
                (K::FontSize, 11.0.into()),
                (K::Italic, true.into()),
                (K::TextColor, hex("#6b7280")),
            ]),
        ),

        // Paragraph
        (
            StyleCategory::Paragraph,
            "left",
            "Left aligned",
            props([
                (K::Alignment, "left".into()),
                (K::LineHeight, 1.4.into()),
            ]),
        ),
        (
            StyleCategory::Paragraph,
            "centered",
            "Centered",
            props([
                (K::Alignment, "center".into()),
                (K::LineHeight, 1.4.into()),
            ]),
        ),
        (
            StyleCategory::Paragraph,
            "justified",
            "Justified",
            props([
                (K::Alignment, "justify".into()),
                (K::LineHeight, 1.5.into()),
                (K::Indent, 16.0.into()),
            ]),
        ),

        // Border
        (
            StyleCategory::Border,
            "simple",
            "Simple",
            props([
                (K::BorderWidth, 1.0.into()),
                (K::BorderStyle, "solid".into()),
                (K::BorderColor, hex("#d1d5db")),
                (K::BorderRadius, 0.0.into()),
                (K::BorderSides, BorderSides::all().into()),
            ]),
        ),
        (
            StyleCategory::Border,
            "rounded",
            "Rounded",
            props([
                (K::BorderWidth, 1.0.into()),
                (K::BorderStyle, "solid".into()),
                (K::BorderColor, hex("#d1d5db")),
                (K::BorderRadius, 8.0.into()),
                (K::BorderSides, BorderSides::all().into()),
            ]),
        ),
        (
            StyleCategory::Border,
            "dashed",
            "Dashed",
            props([
                (K::BorderWidth, 2.0.into()),
                (K::BorderStyle, "dashed".into()),
                (K::BorderColor, hex("#9ca3af")),
                (K::BorderSides, BorderSides::all().into()),
            ]),
        ),
        (
            StyleCategory::Border,
            "underline",
            "Underline",
            props([
                (K::BorderWidth, 2.0.into()),
                (K::BorderStyle, "solid".into()),
                (K::BorderColor, hex("#111827")),
                (K::BorderSides, BorderSides::BOTTOM.into()),
            ]),
        ),

        // Fill
        (
            StyleCategory::Fill,
            "primary",
            "Primary",
            props([
                (K::BackgroundColor, hex("#2563eb")),
                (K::Opacity, 1.0.into()),
            ]),
        ),
        (
            StyleCategory::Fill,
            "secondary",
            "Secondary",
            props([
                (K::BackgroundColor, hex("#e5e7eb")),
                (K::Opacity, 1.0.into()),
            ]),
        ),
        (
            StyleCategory::Fill,
            "sunset",
            "Sunset gradient",
            props([
                (K::GradientEnabled, true.into()),
                (K::GradientType, "linear".into()),
                (K::GradientAngle, 135.0.into()),
                (K::GradientStart, hex("#f97316")),
                (K::GradientEnd, hex("#db2777")),
                (K::Opacity, 1.0.into()),
            ]),
        ),
        (
            StyleCategory::Fill,
            "card",
            "Card",
            props([
                (K::BackgroundColor, hex("#ffffff")),
                (K::ShadowEnabled, true.into()),
                (K::ShadowColor, hex("#0000001f")),
                (K::ShadowBlur, 12.0.into()),
                (K::ShadowOffsetY, 4.0.into()),
            ]),
        ),
    ]
}

/// Inserts the predefined styles into `registry`, replacing any same-id entry.
/// Returns how many were inserted.
pub(crate) fn seed(registry: &mut StyleRegistry) -> usize {
    let created_at = registry.now();
    let mut count = 0;

    for (category, id, name, properties) in predefined_styles() {
        let definition =
            StyleDefinition::new(StyleId::new(id), category, name, properties, false, created_at);
        match registry.insert(definition) {
            Ok(_) => count += 1,
            Err(e) => warn!("Skipping predefined {} style '{}': {}", category, id, e),
        }
    }
    count
}
