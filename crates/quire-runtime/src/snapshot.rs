// crates/quire-runtime/src/snapshot.rs
//! JSON snapshot of a style registry.
//!
//! Imports are all-or-nothing: every entry is checked before the first one is
//! written, so a rejected snapshot leaves the registry exactly as it was.

use std::collections::BTreeMap;

use quire_core::{PropertyRegistry, StyleCategory, StyleDefinition, StyleId, StyleRegistry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Result, RuntimeError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSnapshot {
    #[serde(default)]
    pub text_styles: BTreeMap<StyleId, StyleDefinition>,
    #[serde(default)]
    pub paragraph_styles: BTreeMap<StyleId, StyleDefinition>,
    #[serde(default)]
    pub border_styles: BTreeMap<StyleId, StyleDefinition>,
    #[serde(default)]
    pub fill_styles: BTreeMap<StyleId, StyleDefinition>,
    #[serde(default)]
    pub custom_fonts: Vec<String>,
    #[serde(default)]
    pub metadata: SnapshotMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub exported_at: u64,
    pub total_styles: usize,
    pub custom_styles_count: usize,
}

/// What an import changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub overwritten: usize,
    pub fonts_added: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.added + self.overwritten
    }
}

impl StyleSnapshot {
    /// Copies every definition and custom font out of `registry`.
    pub fn capture(registry: &StyleRegistry) -> Self {
        let mut snapshot = StyleSnapshot {
            custom_fonts: registry.custom_fonts().to_vec(),
            metadata: SnapshotMetadata {
                exported_at: registry.now(),
                total_styles: registry.len(),
                custom_styles_count: registry.custom_len(),
            },
            ..Default::default()
        };
        for definition in registry.iter() {
            snapshot
                .namespace_mut(definition.category)
                .insert(definition.id.clone(), definition.clone());
        }
        snapshot
    }

    pub fn namespace(&self, category: StyleCategory) -> &BTreeMap<StyleId, StyleDefinition> {
        match category {
            StyleCategory::Text => &self.text_styles,
            StyleCategory::Paragraph => &self.paragraph_styles,
            StyleCategory::Border => &self.border_styles,
            StyleCategory::Fill => &self.fill_styles,
        }
    }

    pub fn namespace_mut(
        &mut self,
        category: StyleCategory,
    ) -> &mut BTreeMap<StyleId, StyleDefinition> {
        match category {
            StyleCategory::Text => &mut self.text_styles,
            StyleCategory::Paragraph => &mut self.paragraph_styles,
            StyleCategory::Border => &mut self.border_styles,
            StyleCategory::Fill => &mut self.fill_styles,
        }
    }

    /// Number of definitions across all namespaces.
    pub fn len(&self) -> usize {
        StyleCategory::ALL
            .into_iter()
            .map(|category| self.namespace(category).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Checks every entry of `snapshot` and returns the definitions to insert,
/// values coerced through the schema.
fn validate(schema: &PropertyRegistry, snapshot: StyleSnapshot) -> Result<Vec<StyleDefinition>> {
    let StyleSnapshot {
        text_styles,
        paragraph_styles,
        border_styles,
        fill_styles,
        ..
    } = snapshot;

    let namespaces = [
        (StyleCategory::Text, text_styles),
        (StyleCategory::Paragraph, paragraph_styles),
        (StyleCategory::Border, border_styles),
        (StyleCategory::Fill, fill_styles),
    ];

    let mut accepted = Vec::new();
    for (category, entries) in namespaces {
        for (key, mut definition) in entries {
            if definition.category != category {
                return Err(RuntimeError::invalid_snapshot(format!(
                    "style '{}' is a {} style stored with the {} styles",
                    key, definition.category, category
                )));
            }
            if definition.id != key {
                return Err(RuntimeError::invalid_snapshot(format!(
                    "{} style stored under '{}' has id '{}'",
                    category, key, definition.id
                )));
            }
            definition.properties = schema
                .validate_set(category, definition.properties)
                .map_err(|e| {
                    RuntimeError::invalid_snapshot(format!("{} style '{}': {}", category, key, e))
                })?;
            accepted.push(definition);
        }
    }
    Ok(accepted)
}

/// Merges `snapshot` into `registry` by id, overwriting on collision and tagging
/// every imported definition with `importedAt`.
pub fn import_snapshot(
    registry: &mut StyleRegistry,
    schema: &PropertyRegistry,
    snapshot: StyleSnapshot,
) -> Result<ImportSummary> {
    let fonts = snapshot.custom_fonts.clone();
    let mut definitions = validate(schema, snapshot)?;

    // New ids are listed in insertion order; keep that close to creation order.
    definitions.sort_by(|a, b| {
        (a.category, a.created_at, &a.id).cmp(&(b.category, b.created_at, &b.id))
    });

    let now = registry.now();
    let mut summary = ImportSummary::default();
    for mut definition in definitions {
        definition.imported_at = Some(now);
        debug!("Importing {} style '{}'", definition.category, definition.id);
        match registry.insert(definition)? {
            Some(_) => summary.overwritten += 1,
            None => summary.added += 1,
        }
    }
    for font in &fonts {
        if registry.add_custom_font(font) {
            summary.fonts_added += 1;
        }
    }

    info!(
        "Imported {} styles ({} new, {} overwritten), {} fonts",
        summary.total(),
        summary.added,
        summary.overwritten,
        summary.fonts_added
    );
    Ok(summary)
}

/// Parses and imports a JSON snapshot.
pub fn import_json(
    registry: &mut StyleRegistry,
    schema: &PropertyRegistry,
    json: &str,
) -> Result<ImportSummary> {
    let snapshot = StyleSnapshot::from_json(json)?;
    import_snapshot(registry, schema, snapshot)
}
