// crates/quire-runtime/src/edit.rs
//! Property edits against elements whose bindings may be linked to shared styles.
//!
//! A write to a category-free attribute or to an unlinked binding always goes
//! straight through. A write to a linked binding is a conflict, settled by the
//! [`ConflictMode`] the caller picked:
//!
//! | mode | element | shared style |
//! |---|---|---|
//! | `Silent` | untouched | untouched |
//! | `AutoUnlink` | unlinked, override written | untouched |
//! | `Interactive` | as `AutoUnlink` if confirmed, else untouched | untouched |
//! | `UpdateShared` | stays linked | property written |
//!
//! A link to a style that no longer exists is reported as
//! [`EditOutcome::DanglingLink`] in `Silent` mode. Every other mode clears it
//! and writes the override.

use std::fmt;
use std::str::FromStr;

use quire_core::{
    Element, ElementAttribute, PropertyKey, PropertyRegistry, PropertyTarget, PropertyValue,
    QuireError, StyleCategory, StyleId, StyleProperties, StyleRegistry,
};
use tracing::{debug, info, warn};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictMode {
    /// Report the conflict and change nothing.
    Silent,
    /// Detach the element from the shared style, then write locally.
    AutoUnlink,
    /// Ask the [`ConfirmationProvider`]; unlink on yes, cancel on no.
    Interactive,
    /// Write into the shared style. Every element linked to it changes.
    UpdateShared,
}

impl ConflictMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictMode::Silent => "silent",
            ConflictMode::AutoUnlink => "autoUnlink",
            ConflictMode::Interactive => "interactive",
            ConflictMode::UpdateShared => "updateShared",
        }
    }
}

impl fmt::Display for ConflictMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictMode {
    type Err = String;

    /// Accepts the camelCase names as well as kebab-case (`auto-unlink`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "silent" => Ok(ConflictMode::Silent),
            "autounlink" => Ok(ConflictMode::AutoUnlink),
            "interactive" => Ok(ConflictMode::Interactive),
            "updateshared" => Ok(ConflictMode::UpdateShared),
            _ => Err(format!(
                "unknown conflict mode '{s}' \
                 (expected silent, autoUnlink, interactive or updateShared)"
            )),
        }
    }
}

/// The linked style an edit ran into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictDescriptor {
    pub category: StyleCategory,
    pub style_id: StyleId,
    pub style_name: String,
}

/// Supplies the yes/no answer for [`ConflictMode::Interactive`], typically by
/// showing a confirmation dialog.
pub trait ConfirmationProvider {
    /// `true` to unlink the element and apply the edit locally.
    fn confirm_unlink(&mut self, conflict: &ConflictDescriptor) -> bool;
}

impl<F> ConfirmationProvider for F
where
    F: FnMut(&ConflictDescriptor) -> bool,
{
    fn confirm_unlink(&mut self, conflict: &ConflictDescriptor) -> bool {
        self(conflict)
    }
}

/// Answers every confirmation the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl ConfirmationProvider for FixedAnswer {
    fn confirm_unlink(&mut self, _conflict: &ConflictDescriptor) -> bool {
        self.0
    }
}

/// What an edit did.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// A category-free attribute was written on the element.
    AttributeSet(ElementAttribute),
    /// The binding was unlinked; the value went into its local override.
    OverrideSet { category: StyleCategory, key: PropertyKey },
    /// The binding was linked and has been detached before writing the override.
    /// Also reported when a non-silent edit cleared a dangling link.
    Unlinked {
        category: StyleCategory,
        key: PropertyKey,
        previous: StyleId,
    },
    /// The shared style was rewritten; the element is still linked to it.
    SharedUpdated {
        category: StyleCategory,
        key: PropertyKey,
        style_id: StyleId,
    },
    /// `Silent` mode hit a linked binding. Nothing changed.
    Conflict(ConflictDescriptor),
    /// `Silent` mode hit a link to a style that no longer exists. Nothing changed.
    DanglingLink {
        category: StyleCategory,
        style_id: StyleId,
    },
    /// The confirmation provider declined. Nothing changed.
    Cancelled(ConflictDescriptor),
}

impl EditOutcome {
    /// Whether the edit changed anything.
    pub fn is_applied(&self) -> bool {
        !matches!(
            self,
            EditOutcome::Conflict(_) | EditOutcome::Cancelled(_) | EditOutcome::DanglingLink { .. }
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, EditOutcome::Cancelled(_))
    }

    pub fn conflict(&self) -> Option<&ConflictDescriptor> {
        match self {
            EditOutcome::Conflict(c) | EditOutcome::Cancelled(c) => Some(c),
            _ => None,
        }
    }
}

/// Runs edits against one registry and schema.
pub struct EditProtocol<'a> {
    registry: &'a mut StyleRegistry,
    schema: &'a PropertyRegistry,
}

impl<'a> EditProtocol<'a> {
    pub fn new(registry: &'a mut StyleRegistry, schema: &'a PropertyRegistry) -> Self {
        Self { registry, schema }
    }

    /// Writes `property = value` on `element`, settling a conflict with a linked
    /// style according to `mode`. `confirm` is only consulted in
    /// [`ConflictMode::Interactive`].
    pub fn edit(
        &mut self,
        element: &mut Element,
        property: &str,
        value: PropertyValue,
        mode: ConflictMode,
        confirm: &mut dyn ConfirmationProvider,
    ) -> Result<EditOutcome> {
        let key = match self.schema.lookup(property) {
            Some(PropertyTarget::Style(key)) => key,
            Some(PropertyTarget::Attribute(attribute)) => {
                let value = self.schema.validate_attribute(attribute, value)?;
                element.set_attribute(attribute, &value);
                debug!("Element {}: {} = {}", element.id, attribute, value);
                return Ok(EditOutcome::AttributeSet(attribute));
            }
            None => return Err(QuireError::UnknownProperty(property.to_string()).into()),
        };

        let value = self.schema.validate(key, value)?;
        let category = key.category();

        let Some(style_id) = element.binding(category).style_id.clone() else {
            debug!("Element {}: local {} = {}", element.id, key, value);
            element.binding_mut(category).local_override.insert(key, value);
            return Ok(EditOutcome::OverrideSet { category, key });
        };

        let Some(definition) = self.registry.get(category, style_id.as_str()) else {
            if mode == ConflictMode::Silent {
                warn!(
                    "Element {} links missing {} style '{}'; left as is",
                    element.id, category, style_id
                );
                return Ok(EditOutcome::DanglingLink { category, style_id });
            }
            warn!(
                "Element {} links missing {} style '{}'; clearing the link",
                element.id, category, style_id
            );
            Self::unlink_and_write(element, key, value);
            return Ok(EditOutcome::Unlinked {
                category,
                key,
                previous: style_id,
            });
        };

        let conflict = ConflictDescriptor {
            category,
            style_id: style_id.clone(),
            style_name: definition.name.clone(),
        };

        match mode {
            ConflictMode::Silent => {
                debug!("Element {}: {} is linked to '{}'", element.id, key, style_id);
                Ok(EditOutcome::Conflict(conflict))
            }
            ConflictMode::AutoUnlink => {
                Self::unlink_and_write(element, key, value);
                info!(
                    "Element {} unlinked from {} style '{}'",
                    element.id, category, style_id
                );
                Ok(EditOutcome::Unlinked {
                    category,
                    key,
                    previous: style_id,
                })
            }
            ConflictMode::Interactive => {
                if confirm.confirm_unlink(&conflict) {
                    Self::unlink_and_write(element, key, value);
                    info!(
                        "Element {} unlinked from {} style '{}'",
                        element.id, category, style_id
                    );
                    Ok(EditOutcome::Unlinked {
                        category,
                        key,
                        previous: style_id,
                    })
                } else {
                    info!("Edit of {} on element {} cancelled", key, element.id);
                    Ok(EditOutcome::Cancelled(conflict))
                }
            }
            ConflictMode::UpdateShared => {
                let mut partial = StyleProperties::new();
                partial.insert(key, value);
                self.registry.update(category, style_id.as_str(), partial)?;
                Ok(EditOutcome::SharedUpdated {
                    category,
                    key,
                    style_id,
                })
            }
        }
    }

    fn unlink_and_write(element: &mut Element, key: PropertyKey, value: PropertyValue) {
        let binding = element.binding_mut(key.category());
        binding.unlink();
        binding.local_override.insert(key, value);
    }
}

/// Clears every style link on `element`. Local overrides are kept as they are
/// and nothing from the former styles is copied into them, so the element falls
/// back to built-in defaults plus whatever it overrode before.
pub fn unlink_all(element: &mut Element) -> Vec<(StyleCategory, StyleId)> {
    let mut cleared = Vec::new();
    for category in StyleCategory::ALL {
        if let Some(id) = element.binding_mut(category).unlink() {
            cleared.push((category, id));
        }
    }
    if !cleared.is_empty() {
        info!("Element {}: cleared {} style links", element.id, cleared.len());
    }
    cleared
}
