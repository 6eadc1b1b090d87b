// crates/quire-core/src/elements.rs
use glam::Vec2;

use crate::{ElementAttribute, PropertyValue, StyleCategory, StyleId, StyleProperties};

pub type ElementId = u32;

/// An element's link to one category: an optional style reference plus its own
/// local overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementStyleBinding {
    pub style_id: Option<StyleId>,
    pub local_override: StyleProperties,
}

impl ElementStyleBinding {
    pub fn is_linked(&self) -> bool {
        self.style_id.is_some()
    }

    pub fn link(&mut self, style_id: StyleId) {
        self.style_id = Some(style_id);
    }

    /// Clears the style reference. Local overrides are left as they are.
    pub fn unlink(&mut self) -> Option<StyleId> {
        self.style_id.take()
    }
}

/// One binding per category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleBindings {
    pub text: ElementStyleBinding,
    pub paragraph: ElementStyleBinding,
    pub border: ElementStyleBinding,
    pub fill: ElementStyleBinding,
}

impl StyleBindings {
    pub fn get(&self, category: StyleCategory) -> &ElementStyleBinding {
        match category {
            StyleCategory::Text => &self.text,
            StyleCategory::Paragraph => &self.paragraph,
            StyleCategory::Border => &self.border,
            StyleCategory::Fill => &self.fill,
        }
    }

    pub fn get_mut(&mut self, category: StyleCategory) -> &mut ElementStyleBinding {
        match category {
            StyleCategory::Text => &mut self.text,
            StyleCategory::Paragraph => &mut self.paragraph,
            StyleCategory::Border => &mut self.border,
            StyleCategory::Fill => &mut self.fill,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleCategory, &ElementStyleBinding)> {
        StyleCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Every style id referenced by these bindings.
    pub fn style_ids(&self) -> impl Iterator<Item = &StyleId> {
        self.iter().filter_map(|(_, binding)| binding.style_id.as_ref())
    }
}

/// A visual element as far as styling is concerned. Geometry is owned by the
/// layout engine; the element only stores the category-free attributes it edits.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub name: String,

    pub position: Vec2,
    pub size: Vec2,
    /// Degrees.
    pub rotation: f32,
    pub scale: Vec2,
    pub z_index: i32,
    pub visible: bool,
    pub locked: bool,

    pub bindings: StyleBindings,
}

impl Element {
    pub fn new(id: ElementId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn binding(&self, category: StyleCategory) -> &ElementStyleBinding {
        self.bindings.get(category)
    }

    pub fn binding_mut(&mut self, category: StyleCategory) -> &mut ElementStyleBinding {
        self.bindings.get_mut(category)
    }

    pub fn attribute(&self, attribute: ElementAttribute) -> PropertyValue {
        match attribute {
            ElementAttribute::X => self.position.x.into(),
            ElementAttribute::Y => self.position.y.into(),
            ElementAttribute::Width => self.size.x.into(),
            ElementAttribute::Height => self.size.y.into(),
            ElementAttribute::Rotation => self.rotation.into(),
            ElementAttribute::ScaleX => self.scale.x.into(),
            ElementAttribute::ScaleY => self.scale.y.into(),
            ElementAttribute::ZIndex => self.z_index.into(),
            ElementAttribute::Visible => self.visible.into(),
            ElementAttribute::Locked => self.locked.into(),
        }
    }

    /// Writes an already validated value. Values of the wrong shape are ignored
    /// and `false` is returned.
    pub fn set_attribute(&mut self, attribute: ElementAttribute, value: &PropertyValue) -> bool {
        match (attribute, value) {
            (ElementAttribute::Visible, PropertyValue::Bool(b)) => self.visible = *b,
            (ElementAttribute::Locked, PropertyValue::Bool(b)) => self.locked = *b,
            (_, PropertyValue::Number(n)) => {
                let n = *n as f32;
                match attribute {
                    ElementAttribute::X => self.position.x = n,
                    ElementAttribute::Y => self.position.y = n,
                    ElementAttribute::Width => self.size.x = n,
                    ElementAttribute::Height => self.size.y = n,
                    ElementAttribute::Rotation => self.rotation = n,
                    ElementAttribute::ScaleX => self.scale.x = n,
                    ElementAttribute::ScaleY => self.scale.y = n,
                    ElementAttribute::ZIndex => self.z_index = n.round() as i32,
                    ElementAttribute::Visible | ElementAttribute::Locked => return false,
                }
            }
            _ => return false,
        }
        true
    }
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            z_index: 0,
            visible: true,
            locked: false,
            bindings: StyleBindings::default(),
        }
    }
}
