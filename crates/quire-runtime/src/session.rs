// crates/quire-runtime/src/session.rs

use std::collections::BTreeMap;

use quire_core::{
    cleanup_unused, CleanupReport, Element, ElementId, PropertyRegistry, PropertyValue,
    ResolvedStyle, StyleCategory, StyleId, StyleRegistry, StyleResolver,
};
use tracing::{debug, info, warn};

use crate::edit::{self, ConfirmationProvider, EditOutcome, EditProtocol, FixedAnswer};
use crate::snapshot::{self, ImportSummary, StyleSnapshot};
use crate::{ConflictMode, Result, RuntimeError, SessionConfig};

/// One open document: the style registry, the elements placed on the canvas and
/// the collaborator asked to confirm interactive unlinks.
///
/// Every mutation borrows the session mutably, so there is only ever one writer.
pub struct EditorSession {
    config: SessionConfig,
    registry: StyleRegistry,
    schema: PropertyRegistry,
    elements: BTreeMap<ElementId, Element>,
    next_element_id: ElementId,
    confirmation: Box<dyn ConfirmationProvider>,
}

impl EditorSession {
    /// Builds a session around a fresh registry. Interactive edits are refused
    /// until a confirmation provider is installed.
    pub fn new(config: SessionConfig) -> Self {
        let registry = if config.seed_predefined {
            StyleRegistry::with_predefined()
        } else {
            StyleRegistry::new()
        };
        Self::with_registry(config, registry)
    }

    pub fn with_registry(config: SessionConfig, registry: StyleRegistry) -> Self {
        info!(
            "Editor session started: {} styles, default conflict mode {}",
            registry.len(),
            config.default_conflict_mode
        );
        Self {
            config,
            registry,
            schema: PropertyRegistry::new(),
            elements: BTreeMap::new(),
            next_element_id: 1,
            confirmation: Box::new(FixedAnswer(false)),
        }
    }

    pub fn set_confirmation_provider(&mut self, provider: impl ConfirmationProvider + 'static) {
        self.confirmation = Box::new(provider);
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut StyleRegistry {
        &mut self.registry
    }

    pub fn schema(&self) -> &PropertyRegistry {
        &self.schema
    }

    // Element store

    /// Adds a new, unstyled element and returns its id.
    pub fn create_element(&mut self, name: impl Into<String>) -> ElementId {
        while self.elements.contains_key(&self.next_element_id) {
            self.next_element_id += 1;
        }
        let id = self.next_element_id;
        self.next_element_id += 1;
        self.elements.insert(id, Element::new(id, name));
        id
    }

    /// Stores `element` under its own id, returning any element it replaced.
    pub fn insert_element(&mut self, element: Element) -> Option<Element> {
        self.elements.insert(element.id, element)
    }

    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        self.elements.remove(&id)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        self.elements
            .get_mut(&id)
            .ok_or(RuntimeError::ElementNotFound(id))
    }

    /// Ids of the elements whose `category` binding names `style_id`.
    pub fn elements_using(&self, category: StyleCategory, style_id: &str) -> Vec<ElementId> {
        self.elements
            .values()
            .filter(|e| {
                e.binding(category)
                    .style_id
                    .as_ref()
                    .is_some_and(|id| id.as_str() == style_id)
            })
            .map(|e| e.id)
            .collect()
    }

    // Editing

    pub fn edit(
        &mut self,
        element: ElementId,
        property: &str,
        value: impl Into<PropertyValue>,
        mode: ConflictMode,
    ) -> Result<EditOutcome> {
        let target = self
            .elements
            .get_mut(&element)
            .ok_or(RuntimeError::ElementNotFound(element))?;
        EditProtocol::new(&mut self.registry, &self.schema).edit(
            target,
            property,
            value.into(),
            mode,
            &mut *self.confirmation,
        )
    }

    /// [`edit`](Self::edit) with the configured default conflict mode.
    pub fn edit_default(
        &mut self,
        element: ElementId,
        property: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<EditOutcome> {
        let mode = self.config.default_conflict_mode;
        self.edit(element, property, value, mode)
    }

    pub fn unlink_all(&mut self, element: ElementId) -> Result<Vec<(StyleCategory, StyleId)>> {
        Ok(edit::unlink_all(self.element_mut(element)?))
    }

    /// Clears one binding's link. Its local override is kept.
    pub fn unlink(
        &mut self,
        element: ElementId,
        category: StyleCategory,
    ) -> Result<Option<StyleId>> {
        let previous = self.element_mut(element)?.binding_mut(category).unlink();
        if let Some(id) = &previous {
            info!("Element {} unlinked from {} style '{}'", element, category, id);
        }
        Ok(previous)
    }

    // Collaborator API

    /// Links `element` to an existing style. An unknown element is an error even
    /// when the style is unknown too; an unknown style on a known element gives
    /// `Ok(false)` and leaves the binding alone.
    pub fn apply_style(
        &mut self,
        element: ElementId,
        category: StyleCategory,
        style_id: &str,
    ) -> Result<bool> {
        let target = self
            .elements
            .get_mut(&element)
            .ok_or(RuntimeError::ElementNotFound(element))?;
        let Some(definition) = self.registry.get(category, style_id) else {
            debug!("apply_style: no {} style '{}'", category, style_id);
            return Ok(false);
        };
        target.binding_mut(category).link(definition.id.clone());
        info!("Element {} linked to {} style '{}'", element, category, style_id);
        Ok(true)
    }

    /// Saves the element's current look in `category` as a new custom style and
    /// links the element to it.
    pub fn create_style_from_element(
        &mut self,
        element: ElementId,
        category: StyleCategory,
        name: &str,
    ) -> Result<StyleId> {
        let properties = {
            let source = self
                .elements
                .get(&element)
                .ok_or(RuntimeError::ElementNotFound(element))?;
            StyleResolver::new(&self.registry, &self.schema)
                .resolve_element(source, category)
                .properties
        };
        let id = self.registry.create(category, name, properties)?;
        self.element_mut(element)?.binding_mut(category).link(id.clone());
        Ok(id)
    }

    /// Deletes a style. Elements still linked to it keep the dangling id and
    /// resolve as if unlinked.
    pub fn delete_style(&mut self, category: StyleCategory, style_id: &str) -> bool {
        if !self.registry.delete(category, style_id) {
            return false;
        }
        if self.config.warn_on_dangling_delete {
            let users = self.elements_using(category, style_id);
            if !users.is_empty() {
                warn!(
                    "Deleted {} style '{}' is still linked by {} elements",
                    category,
                    style_id,
                    users.len()
                );
            }
        }
        true
    }

    pub fn duplicate_style(
        &mut self,
        category: StyleCategory,
        style_id: &str,
        new_name: Option<&str>,
    ) -> Option<StyleId> {
        self.registry.duplicate(category, style_id, new_name)
    }

    // Queries

    pub fn resolver(&self) -> StyleResolver<'_> {
        StyleResolver::new(&self.registry, &self.schema)
    }

    pub fn resolve(&self, element: ElementId, category: StyleCategory) -> Result<ResolvedStyle> {
        let element = self
            .element(element)
            .ok_or(RuntimeError::ElementNotFound(element))?;
        Ok(self.resolver().resolve_element(element, category))
    }

    pub fn resolve_all(&self, element: ElementId) -> Result<Vec<ResolvedStyle>> {
        let element = self
            .element(element)
            .ok_or(RuntimeError::ElementNotFound(element))?;
        Ok(self.resolver().resolve_all(element))
    }

    /// Removes custom styles no element in this session links to.
    pub fn cleanup_unused(&mut self) -> CleanupReport {
        cleanup_unused(&mut self.registry, self.elements.values())
    }

    // Snapshots

    pub fn export_snapshot(&self) -> StyleSnapshot {
        StyleSnapshot::capture(&self.registry)
    }

    pub fn export_json(&self) -> Result<String> {
        self.export_snapshot().to_json_pretty()
    }

    pub fn import_snapshot(&mut self, snapshot: StyleSnapshot) -> Result<ImportSummary> {
        snapshot::import_snapshot(&mut self.registry, &self.schema, snapshot)
    }

    pub fn import_json(&mut self, json: &str) -> Result<ImportSummary> {
        snapshot::import_json(&mut self.registry, &self.schema, json)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
