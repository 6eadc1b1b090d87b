// crates/quire-core/src/resolve.rs

use crate::{
    Element, ElementStyleBinding, PropertyRegistry, StyleCategory, StyleId, StyleProperties,
    StyleRegistry,
};

/// Where a resolved property set came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSource {
    /// The linked definition's properties, verbatim.
    Linked(StyleId),
    /// Built-in defaults merged with the local override.
    Local,
    /// The binding names a style that no longer exists; resolved as [`StyleSource::Local`].
    DanglingFallback(StyleId),
}

/// The effective style of one binding.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub category: StyleCategory,
    pub properties: StyleProperties,
    pub source: StyleSource,
}

impl ResolvedStyle {
    pub fn is_linked(&self) -> bool {
        matches!(self.source, StyleSource::Linked(_))
    }
}

/// Computes effective styles. Holds only shared borrows, so resolving can never
/// change the registry or an element.
#[derive(Clone, Copy)]
pub struct StyleResolver<'a> {
    registry: &'a StyleRegistry,
    defaults: &'a PropertyRegistry,
}

impl<'a> StyleResolver<'a> {
    pub fn new(registry: &'a StyleRegistry, defaults: &'a PropertyRegistry) -> Self {
        Self { registry, defaults }
    }

    /// A live link yields the definition's properties and ignores the local
    /// override entirely. An unlinked or dangling binding yields the built-in
    /// defaults with the local override on top.
    pub fn resolve(&self, category: StyleCategory, binding: &ElementStyleBinding) -> ResolvedStyle {
        let source = match &binding.style_id {
            Some(id) => match self.registry.get(category, id.as_str()) {
                Some(definition) => {
                    return ResolvedStyle {
                        category,
                        properties: definition.properties.clone(),
                        source: StyleSource::Linked(id.clone()),
                    };
                }
                None => StyleSource::DanglingFallback(id.clone()),
            },
            None => StyleSource::Local,
        };

        ResolvedStyle {
            category,
            properties: StyleProperties::merged(
                &self.defaults.defaults(category),
                &binding.local_override,
            ),
            source,
        }
    }

    pub fn resolve_element(&self, element: &Element, category: StyleCategory) -> ResolvedStyle {
        self.resolve(category, element.binding(category))
    }

    /// All four categories, in [`StyleCategory::ALL`] order.
    pub fn resolve_all(&self, element: &Element) -> Vec<ResolvedStyle> {
        StyleCategory::ALL
            .into_iter()
            .map(|category| self.resolve_element(element, category))
            .collect()
    }
}

/// Shorthand for a one-off [`StyleResolver::resolve`].
pub fn resolve(
    registry: &StyleRegistry,
    defaults: &PropertyRegistry,
    category: StyleCategory,
    binding: &ElementStyleBinding,
) -> StyleProperties {
    StyleResolver::new(registry, defaults)
        .resolve(category, binding)
        .properties
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PropertyKey, PropertyValue};

    fn linked(id: &str) -> ElementStyleBinding {
        ElementStyleBinding {
            style_id: Some(StyleId::new(id)),
            local_override: StyleProperties::new(),
        }
    }

    #[test]
    fn test_linked_returns_definition_verbatim() {
        let registry = StyleRegistry::with_predefined();
        let defaults = PropertyRegistry::new();
        let resolver = StyleResolver::new(&registry, &defaults);

        let mut binding = linked("primary");
        binding.local_override.insert(PropertyKey::Opacity, 0.2.into());

        let resolved = resolver.resolve(StyleCategory::Fill, &binding);
        let definition = registry.get(StyleCategory::Fill, "primary").unwrap();
        assert_eq!(resolved.properties, definition.properties);
        assert_eq!(resolved.source, StyleSource::Linked(StyleId::new("primary")));
    }

    #[test]
    fn test_unlinked_merges_defaults_and_override() {
        let registry = StyleRegistry::new();
        let defaults = PropertyRegistry::new();

        let mut binding = ElementStyleBinding::default();
        binding.local_override.insert(PropertyKey::FontSize, 20.0.into());

        let resolved = resolve(&registry, &defaults, StyleCategory::Text, &binding);
        assert_eq!(resolved.get(PropertyKey::FontSize), Some(&PropertyValue::Number(20.0)));
        assert_eq!(resolved.get(PropertyKey::Bold), Some(&PropertyValue::Bool(false)));
        assert_eq!(resolved.len(), defaults.defaults(StyleCategory::Text).len());
    }

    #[test]
    fn test_dangling_falls_back() {
        let registry = StyleRegistry::new();
        let defaults = PropertyRegistry::new();
        let mut binding = linked("gone");
        binding.local_override.insert(PropertyKey::BorderWidth, 3.0.into());

        let resolved =
            StyleResolver::new(&registry, &defaults).resolve(StyleCategory::Border, &binding);
        assert_eq!(resolved.source, StyleSource::DanglingFallback(StyleId::new("gone")));
        assert_eq!(
            resolved.properties.get(PropertyKey::BorderWidth),
            Some(&PropertyValue::Number(3.0))
        );
    }

    #[test]
    fn test_link_is_category_scoped() {
        // "primary" is a fill style; a text binding naming it is dangling.
        let registry = StyleRegistry::with_predefined();
        let defaults = PropertyRegistry::new();
        let resolver = StyleResolver::new(&registry, &defaults);
        let resolved = resolver.resolve(StyleCategory::Text, &linked("primary"));
        assert!(!resolved.is_linked());
    }

    #[test]
    fn test_resolve_is_repeatable() {
        let registry = StyleRegistry::with_predefined();
        let defaults = PropertyRegistry::new();
        let resolver = StyleResolver::new(&registry, &defaults);
        let mut element = Element::new(1, "card");
        element.bindings.border.link(StyleId::new("rounded"));

        assert_eq!(resolver.resolve_all(&element), resolver.resolve_all(&element));
        assert_eq!(resolver.resolve_all(&element).len(), 4);
    }
}
