// crates/quire-core/src/style.rs

use std::borrow::Borrow;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PropertyKey, PropertyValue, StyleCategory};

/// Identifier of a [`StyleDefinition`], unique within its category namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleId(String);

impl StyleId {
    pub fn new(id: impl Into<String>) -> Self {
        StyleId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for StyleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StyleId {
    fn from(value: &str) -> Self {
        StyleId(value.to_string())
    }
}

impl From<String> for StyleId {
    fn from(value: String) -> Self {
        StyleId(value)
    }
}

/// A property map. Ordered by key so that listings and snapshots are stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleProperties(BTreeMap<PropertyKey, PropertyValue>);

impl StyleProperties {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, key: PropertyKey) -> Option<&PropertyValue> {
        self.0.get(&key)
    }

    pub fn insert(&mut self, key: PropertyKey, value: PropertyValue) -> Option<PropertyValue> {
        self.0.insert(key, value)
    }

    pub fn remove(&mut self, key: PropertyKey) -> Option<PropertyValue> {
        self.0.remove(&key)
    }

    pub fn contains(&self, key: PropertyKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = PropertyKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, PropertyKey, PropertyValue> {
        self.0.iter()
    }

    /// Writes every entry of `other` over `self`.
    pub fn merge_from(&mut self, other: &StyleProperties) {
        for (key, value) in other.iter() {
            self.0.insert(*key, value.clone());
        }
    }

    /// `base` with `overrides` taking precedence per key.
    pub fn merged(base: &StyleProperties, overrides: &StyleProperties) -> StyleProperties {
        let mut merged = base.clone();
        merged.merge_from(overrides);
        merged
    }

    /// The first key that does not belong to `category`, if any.
    pub fn foreign_key(&self, category: StyleCategory) -> Option<PropertyKey> {
        self.keys().find(|key| key.category() != category)
    }
}

impl FromIterator<(PropertyKey, PropertyValue)> for StyleProperties {
    fn from_iter<I: IntoIterator<Item = (PropertyKey, PropertyValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for StyleProperties {
    type Item = (PropertyKey, PropertyValue);
    type IntoIter = btree_map::IntoIter<PropertyKey, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a StyleProperties {
    type Item = (&'a PropertyKey, &'a PropertyValue);
    type IntoIter = btree_map::Iter<'a, PropertyKey, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A named, reusable set of properties for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDefinition {
    pub id: StyleId,
    pub category: StyleCategory,
    pub name: String,
    pub properties: StyleProperties,
    pub is_custom: bool,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicated_from: Option<StyleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported_at: Option<u64>,
    /// Insertion order within the registry; breaks `created_at` ties and keeps
    /// predefined styles in seed order.
    #[serde(skip)]
    pub(crate) sequence: u64,
}

impl StyleDefinition {
    pub fn new(
        id: StyleId,
        category: StyleCategory,
        name: impl Into<String>,
        properties: StyleProperties,
        is_custom: bool,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            category,
            name: name.into(),
            properties,
            is_custom,
            created_at,
            updated_at: None,
            duplicated_from: None,
            imported_at: None,
            sequence: 0,
        }
    }

    pub fn is_predefined(&self) -> bool {
        !self.is_custom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_override_wins() {
        let base: StyleProperties = [
            (PropertyKey::BorderWidth, PropertyValue::from(1.0)),
            (PropertyKey::BorderRadius, PropertyValue::from(0.0)),
        ]
        .into_iter()
        .collect();
        let mut overrides = StyleProperties::new();
        overrides.insert(PropertyKey::BorderWidth, 4.0.into());

        let merged = StyleProperties::merged(&base, &overrides);
        assert_eq!(merged.get(PropertyKey::BorderWidth), Some(&PropertyValue::Number(4.0)));
        assert_eq!(merged.get(PropertyKey::BorderRadius), Some(&PropertyValue::Number(0.0)));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_foreign_key() {
        let mut props = StyleProperties::new();
        props.insert(PropertyKey::Opacity, 0.5.into());
        assert_eq!(props.foreign_key(StyleCategory::Fill), None);
        assert_eq!(props.foreign_key(StyleCategory::Text), Some(PropertyKey::Opacity));
    }
}
