// crates/quire-core/src/registry.rs

use std::collections::HashMap;

use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::{
    check_properties, predefined, Result, StyleCategory, StyleDefinition, StyleId, StyleProperties,
};

/// All style definitions of one category.
#[derive(Debug, Clone)]
pub struct StyleNamespace {
    category: StyleCategory,
    definitions: HashMap<StyleId, StyleDefinition>,
}

impl StyleNamespace {
    fn new(category: StyleCategory) -> Self {
        Self {
            category,
            definitions: HashMap::new(),
        }
    }

    pub fn category(&self) -> StyleCategory {
        self.category
    }

    pub fn get(&self, id: &str) -> Option<&StyleDefinition> {
        self.definitions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Unordered. Use [`StyleNamespace::list_all`] for display order.
    pub fn iter(&self) -> impl Iterator<Item = &StyleDefinition> {
        self.definitions.values()
    }

    /// Predefined styles first in the order they were seeded, then custom styles
    /// newest first. Custom styles created in the same millisecond keep the
    /// later insertion first.
    pub fn list_all(&self) -> Vec<&StyleDefinition> {
        let mut predefined: Vec<_> = self.iter().filter(|d| !d.is_custom).collect();
        predefined.sort_by_key(|d| d.sequence);

        let mut custom: Vec<_> = self.iter().filter(|d| d.is_custom).collect();
        custom.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.sequence.cmp(&a.sequence))
        });

        predefined.extend(custom);
        predefined
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStats {
    pub category: StyleCategory,
    pub total: usize,
    pub custom: usize,
}

/// The store of every style definition, one namespace per category.
///
/// Constructed explicitly and owned by whoever runs the editing session; there
/// is no process-wide instance.
pub struct StyleRegistry {
    namespaces: [StyleNamespace; 4],
    custom_fonts: Vec<String>,
    clock: Box<dyn Clock>,
    next_id: u64,
    next_sequence: u64,
}

impl StyleRegistry {
    /// An empty registry using the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            namespaces: StyleCategory::ALL.map(StyleNamespace::new),
            custom_fonts: Vec::new(),
            clock: Box::new(clock),
            next_id: 0,
            next_sequence: 0,
        }
    }

    /// A registry seeded with the predefined styles.
    pub fn with_predefined() -> Self {
        let mut registry = Self::new();
        registry.seed_predefined();
        registry
    }

    pub fn seed_predefined(&mut self) {
        let seeded = predefined::seed(self);
        info!("Seeded {} predefined styles", seeded);
    }

    pub fn now(&self) -> u64 {
        self.clock.now_millis()
    }

    pub fn namespace(&self, category: StyleCategory) -> &StyleNamespace {
        &self.namespaces[category.index()]
    }

    fn namespace_mut(&mut self, category: StyleCategory) -> &mut StyleNamespace {
        &mut self.namespaces[category.index()]
    }

    /// `{prefix}_{n}` from a monotonic counter, skipping ids already taken in any
    /// namespace (imports can bring in ids that look generated).
    pub fn generate_id(&mut self, prefix: &str) -> StyleId {
        loop {
            self.next_id += 1;
            let candidate = format!("{}_{}", prefix, self.next_id);
            if !self.namespaces.iter().any(|ns| ns.contains(&candidate)) {
                return StyleId::new(candidate);
            }
        }
    }

    /// Creates a custom style and returns its id.
    pub fn create(
        &mut self,
        category: StyleCategory,
        name: &str,
        properties: StyleProperties,
    ) -> Result<StyleId> {
        self.create_definition(category, name, properties, true)
    }

    pub fn create_definition(
        &mut self,
        category: StyleCategory,
        name: &str,
        properties: StyleProperties,
        is_custom: bool,
    ) -> Result<StyleId> {
        let properties = check_properties(category, properties)?;

        let id = self.generate_id(category.as_str());
        let definition =
            StyleDefinition::new(id.clone(), category, name, properties, is_custom, self.now());
        self.insert(definition)?;

        info!("Created {} style '{}' ({})", category, name, id);
        Ok(id)
    }

    pub fn get(&self, category: StyleCategory, id: &str) -> Option<&StyleDefinition> {
        self.namespace(category).get(id)
    }

    pub fn contains(&self, category: StyleCategory, id: &str) -> bool {
        self.namespace(category).contains(id)
    }

    /// Merges `partial` into the stored properties. `Ok(false)` when the id is
    /// unknown; nothing changes in that case. Values of the wrong shape are
    /// refused before anything is merged.
    pub fn update(
        &mut self,
        category: StyleCategory,
        id: &str,
        partial: StyleProperties,
    ) -> Result<bool> {
        let partial = check_properties(category, partial)?;

        let now = self.now();
        let Some(definition) = self.namespace_mut(category).definitions.get_mut(id) else {
            debug!("update: no {} style '{}'", category, id);
            return Ok(false);
        };

        definition.properties.merge_from(&partial);
        definition.updated_at = Some(now);
        info!("Updated {} style '{}' ({} properties)", category, id, partial.len());
        Ok(true)
    }

    pub fn rename(&mut self, category: StyleCategory, id: &str, name: &str) -> bool {
        let now = self.now();
        match self.namespace_mut(category).definitions.get_mut(id) {
            Some(definition) => {
                definition.name = name.to_string();
                definition.updated_at = Some(now);
                true
            }
            None => {
                debug!("rename: no {} style '{}'", category, id);
                false
            }
        }
    }

    /// Removes a definition whether or not anything still references it.
    pub fn delete(&mut self, category: StyleCategory, id: &str) -> bool {
        match self.namespace_mut(category).definitions.remove(id) {
            Some(definition) => {
                info!("Deleted {} style '{}' ({})", category, definition.name, id);
                true
            }
            None => {
                debug!("delete: no {} style '{}'", category, id);
                false
            }
        }
    }

    pub fn list_all(&self, category: StyleCategory) -> Vec<&StyleDefinition> {
        self.namespace(category).list_all()
    }

    /// Copies a definition into a new custom style. `None` if `id` is unknown.
    pub fn duplicate(
        &mut self,
        category: StyleCategory,
        id: &str,
        new_name: Option<&str>,
    ) -> Option<StyleId> {
        let Some(source) = self.get(category, id) else {
            debug!("duplicate: no {} style '{}'", category, id);
            return None;
        };

        let name = new_name
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} (copy)", source.name));
        let properties = source.properties.clone();
        let source_id = source.id.clone();

        let new_id = self.generate_id(category.as_str());
        let mut copy =
            StyleDefinition::new(new_id.clone(), category, name, properties, true, self.now());
        copy.duplicated_from = Some(source_id);
        self.insert(copy).ok()?;

        info!("Duplicated {} style '{}' as '{}'", category, id, new_id);
        Some(new_id)
    }

    pub fn find_by_name(&self, category: StyleCategory, name: &str) -> Option<&StyleDefinition> {
        self.list_all(category).into_iter().find(|d| d.name == name)
    }

    /// Stores `definition`, replacing any definition with the same id in its
    /// category, and returns the replaced one. A replacement keeps the listing
    /// position of the definition it replaces. Properties are checked like
    /// [`StyleRegistry::create`] checks them.
    pub fn insert(&mut self, mut definition: StyleDefinition) -> Result<Option<StyleDefinition>> {
        definition.properties =
            check_properties(definition.category, std::mem::take(&mut definition.properties))?;

        let existing = self
            .namespace(definition.category)
            .get(definition.id.as_str())
            .map(|d| d.sequence);
        definition.sequence = match existing {
            Some(sequence) => sequence,
            None => {
                self.next_sequence += 1;
                self.next_sequence
            }
        };
        Ok(self
            .namespace_mut(definition.category)
            .definitions
            .insert(definition.id.clone(), definition))
    }

    /// Every definition in every category, unordered.
    pub fn iter(&self) -> impl Iterator<Item = &StyleDefinition> {
        self.namespaces.iter().flat_map(StyleNamespace::iter)
    }

    pub fn len(&self) -> usize {
        self.namespaces.iter().map(StyleNamespace::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn custom_len(&self) -> usize {
        self.iter().filter(|d| d.is_custom).count()
    }

    pub fn stats(&self) -> Vec<CategoryStats> {
        self.namespaces
            .iter()
            .map(|ns| CategoryStats {
                category: ns.category(),
                total: ns.len(),
                custom: ns.iter().filter(|d| d.is_custom).count(),
            })
            .collect()
    }

    pub fn custom_fonts(&self) -> &[String] {
        &self.custom_fonts
    }

    /// Returns `false` if the font was already known.
    pub fn add_custom_font(&mut self, font: &str) -> bool {
        if self.custom_fonts.iter().any(|f| f == font) {
            return false;
        }
        self.custom_fonts.push(font.to_string());
        true
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::{PropertyKey, PropertyValue, QuireError};

    fn border(width: f64) -> StyleProperties {
        [(PropertyKey::BorderWidth, PropertyValue::from(width))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_create_and_get() {
        let mut registry = StyleRegistry::new();
        let id = registry.create(StyleCategory::Border, "Thick", border(4.0)).unwrap();

        let definition = registry.get(StyleCategory::Border, id.as_str()).unwrap();
        assert_eq!(definition.name, "Thick");
        assert!(definition.is_custom);
        assert!(definition.updated_at.is_none());
        assert!(registry.get(StyleCategory::Fill, id.as_str()).is_none());
    }

    #[test]
    fn test_create_rejects_foreign_property() {
        let mut registry = StyleRegistry::new();
        let result = registry.create(StyleCategory::Text, "Wrong", border(1.0));
        assert!(matches!(result, Err(QuireError::CategoryMismatch { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_rejects_values_of_the_wrong_shape() {
        let mut registry = StyleRegistry::new();
        let huge: StyleProperties = [(PropertyKey::FontSize, PropertyValue::from("huge"))]
            .into_iter()
            .collect();
        let result = registry.create(StyleCategory::Text, "Bad", huge);
        assert!(matches!(result, Err(QuireError::InvalidValue { .. })));

        let diagonal: StyleProperties = [(PropertyKey::Alignment, PropertyValue::from("diagonal"))]
            .into_iter()
            .collect();
        assert!(registry.create(StyleCategory::Paragraph, "Bad", diagonal).is_err());
        assert!(registry.is_empty());

        let id = registry.create(StyleCategory::Fill, "Ok", StyleProperties::new()).unwrap();
        let nan: StyleProperties = [(PropertyKey::Opacity, PropertyValue::from(f64::NAN))]
            .into_iter()
            .collect();
        assert!(registry.update(StyleCategory::Fill, id.as_str(), nan).is_err());
        let stored = registry.get(StyleCategory::Fill, id.as_str()).unwrap();
        assert!(stored.properties.is_empty());
        assert!(stored.updated_at.is_none());

        let mut bad = StyleDefinition::new(
            StyleId::new("fill_9"),
            StyleCategory::Fill,
            "Inserted",
            StyleProperties::new(),
            true,
            0,
        );
        bad.properties.insert(PropertyKey::ShadowBlur, "soft".into());
        assert!(registry.insert(bad).is_err());
        assert!(!registry.contains(StyleCategory::Fill, "fill_9"));
    }

    #[test]
    fn test_create_coerces_colour_text() {
        let mut registry = StyleRegistry::new();
        let props: StyleProperties = [(PropertyKey::BackgroundColor, PropertyValue::from("#0f0"))]
            .into_iter()
            .collect();
        let id = registry.create(StyleCategory::Fill, "Green", props).unwrap();
        let stored = registry.get(StyleCategory::Fill, id.as_str()).unwrap();
        assert!(stored.properties.get(PropertyKey::BackgroundColor).unwrap().as_color().is_some());
    }

    #[test]
    fn test_update_merges_and_stamps() {
        let clock = ManualClock::new(100);
        let mut registry = StyleRegistry::with_clock(clock.clone());
        let id = registry.create(StyleCategory::Border, "Thin", border(1.0)).unwrap();

        clock.set(250);
        let mut partial = StyleProperties::new();
        partial.insert(PropertyKey::BorderRadius, 8.0.into());
        assert!(registry.update(StyleCategory::Border, id.as_str(), partial).unwrap());

        let definition = registry.get(StyleCategory::Border, id.as_str()).unwrap();
        assert_eq!(definition.properties.len(), 2);
        assert_eq!(definition.created_at, 100);
        assert_eq!(definition.updated_at, Some(250));
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut registry = StyleRegistry::new();
        assert!(!registry.update(StyleCategory::Border, "missing", border(2.0)).unwrap());
        assert!(!registry.delete(StyleCategory::Border, "missing"));
        assert!(!registry.rename(StyleCategory::Border, "missing", "x"));
    }

    #[test]
    fn test_list_order_predefined_then_newest_custom() {
        let clock = ManualClock::new(0);
        let mut registry = StyleRegistry::with_clock(clock.clone());
        registry.seed_predefined();

        clock.set(100);
        let first = registry.create(StyleCategory::Border, "custom1", border(1.0)).unwrap();
        clock.set(200);
        let second = registry.create(StyleCategory::Border, "custom2", border(2.0)).unwrap();

        let listed = registry.list_all(StyleCategory::Border);
        let predefined_count = listed.iter().take_while(|d| !d.is_custom).count();
        assert_eq!(predefined_count, listed.len() - 2);
        assert_eq!(listed[0].id.as_str(), "simple");
        assert_eq!(listed[predefined_count].id, second);
        assert_eq!(listed[predefined_count + 1].id, first);
    }

    #[test]
    fn test_list_order_same_millisecond() {
        let clock = ManualClock::new(500);
        let mut registry = StyleRegistry::with_clock(clock);
        let a = registry.create(StyleCategory::Fill, "a", StyleProperties::new()).unwrap();
        let b = registry.create(StyleCategory::Fill, "b", StyleProperties::new()).unwrap();

        let ids: Vec<_> = registry
            .list_all(StyleCategory::Fill)
            .into_iter()
            .map(|d| d.id.clone())
            .collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn test_duplicate() {
        let mut registry = StyleRegistry::with_predefined();
        let copy = registry.duplicate(StyleCategory::Border, "simple", None).unwrap();
        let named = registry
            .duplicate(StyleCategory::Border, "simple", Some("Outline"))
            .unwrap();

        let original = registry.get(StyleCategory::Border, "simple").unwrap().clone();
        let copied = registry.get(StyleCategory::Border, copy.as_str()).unwrap();
        assert_eq!(copied.name, format!("{} (copy)", original.name));
        assert_eq!(copied.properties, original.properties);
        assert!(copied.is_custom);
        assert_eq!(copied.duplicated_from, Some(StyleId::new("simple")));
        assert_eq!(registry.get(StyleCategory::Border, named.as_str()).unwrap().name, "Outline");

        assert!(registry.duplicate(StyleCategory::Border, "missing", None).is_none());
    }

    #[test]
    fn test_generate_id_skips_taken() {
        let mut registry = StyleRegistry::new();
        registry
            .insert(StyleDefinition::new(
                StyleId::new("fill_1"),
                StyleCategory::Fill,
                "Imported",
                StyleProperties::new(),
                true,
                0,
            ))
            .unwrap();
        let id = registry.create(StyleCategory::Fill, "Fresh", StyleProperties::new()).unwrap();
        assert_eq!(id.as_str(), "fill_2");
        assert_eq!(registry.namespace(StyleCategory::Fill).len(), 2);
    }

    #[test]
    fn test_custom_fonts_dedup() {
        let mut registry = StyleRegistry::new();
        assert!(registry.add_custom_font("Lora"));
        assert!(!registry.add_custom_font("Lora"));
        assert!(registry.add_custom_font("Rubik"));
        assert_eq!(registry.custom_fonts(), ["Lora".to_string(), "Rubik".to_string()]);
    }

    #[test]
    fn test_stats() {
        let mut registry = StyleRegistry::with_predefined();
        registry.create(StyleCategory::Text, "Mine", StyleProperties::new()).unwrap();
        let text = registry
            .stats()
            .into_iter()
            .find(|s| s.category == StyleCategory::Text)
            .unwrap();
        assert_eq!(text.custom, 1);
        assert_eq!(text.total, registry.namespace(StyleCategory::Text).len());
    }
}
