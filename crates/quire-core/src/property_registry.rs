// crates/quire-core/src/property_registry.rs

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{BorderSides, Color, PropertyValue, QuireError, Result, StyleProperties};

/// The four independent style namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleCategory {
    Text,
    Paragraph,
    Border,
    Fill,
}

impl StyleCategory {
    pub const ALL: [StyleCategory; 4] = [
        StyleCategory::Text,
        StyleCategory::Paragraph,
        StyleCategory::Border,
        StyleCategory::Fill,
    ];

    pub fn index(self) -> usize {
        match self {
            StyleCategory::Text => 0,
            StyleCategory::Paragraph => 1,
            StyleCategory::Border => 2,
            StyleCategory::Fill => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StyleCategory::Text => "text",
            StyleCategory::Paragraph => "paragraph",
            StyleCategory::Border => "border",
            StyleCategory::Fill => "fill",
        }
    }
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleCategory {
    type Err = QuireError;

    fn from_str(s: &str) -> Result<Self> {
        StyleCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| QuireError::UnknownCategory(s.to_string()))
    }
}

/// Every property a style definition can carry. Each variant belongs to exactly
/// one [`StyleCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum PropertyKey {
    // Text
    FontFamily,
    FontSize,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    TextColor,

    // Paragraph
    Alignment,
    LineHeight,
    LetterSpacing,
    Indent,
    SpacingBefore,
    SpacingAfter,
    WordWrap,

    // Border
    BorderWidth,
    BorderStyle,
    BorderColor,
    BorderRadius,
    BorderSides,

    // Fill
    BackgroundColor,
    Opacity,
    GradientEnabled,
    GradientType,
    GradientAngle,
    GradientStart,
    GradientEnd,
    ShadowEnabled,
    ShadowColor,
    ShadowBlur,
    ShadowOffsetX,
    ShadowOffsetY,
}

impl PropertyKey {
    pub const COUNT: usize = 31;

    pub fn category(self) -> StyleCategory {
        use PropertyKey::*;
        match self {
            FontFamily | FontSize | Bold | Italic | Underline | Strikethrough | TextColor => {
                StyleCategory::Text
            }
            Alignment | LineHeight | LetterSpacing | Indent | SpacingBefore | SpacingAfter
            | WordWrap => StyleCategory::Paragraph,
            BorderWidth | BorderStyle | BorderColor | BorderRadius | Self::BorderSides => {
                StyleCategory::Border
            }
            BackgroundColor | Opacity | GradientEnabled | GradientType | GradientAngle
            | GradientStart | GradientEnd | ShadowEnabled | ShadowColor | ShadowBlur
            | ShadowOffsetX | ShadowOffsetY => StyleCategory::Fill,
        }
    }

    /// The editor-facing property name, also used as the snapshot key.
    pub fn name(self) -> &'static str {
        use PropertyKey::*;
        match self {
            FontFamily => "fontFamily",
            FontSize => "fontSize",
            Bold => "bold",
            Italic => "italic",
            Underline => "underline",
            Strikethrough => "strikethrough",
            TextColor => "textColor",
            Alignment => "alignment",
            LineHeight => "lineHeight",
            LetterSpacing => "letterSpacing",
            Indent => "indent",
            SpacingBefore => "spacingBefore",
            SpacingAfter => "spacingAfter",
            WordWrap => "wordWrap",
            BorderWidth => "borderWidth",
            BorderStyle => "borderStyle",
            BorderColor => "borderColor",
            BorderRadius => "borderRadius",
            Self::BorderSides => "borderSides",
            BackgroundColor => "backgroundColor",
            Opacity => "opacity",
            GradientEnabled => "gradientEnabled",
            GradientType => "gradientType",
            GradientAngle => "gradientAngle",
            GradientStart => "gradientStart",
            GradientEnd => "gradientEnd",
            ShadowEnabled => "shadowEnabled",
            ShadowColor => "shadowColor",
            ShadowBlur => "shadowBlur",
            ShadowOffsetX => "shadowOffsetX",
            ShadowOffsetY => "shadowOffsetY",
        }
    }

    /// The shape every value of this property must have.
    pub fn value_type(self) -> PropertyValueType {
        use PropertyKey::*;
        use PropertyValueType as T;
        match self {
            FontFamily => T::Text,
            FontSize | LineHeight | LetterSpacing | Indent | SpacingBefore | SpacingAfter
            | BorderWidth | BorderRadius | Opacity | GradientAngle | ShadowBlur
            | ShadowOffsetX | ShadowOffsetY => T::Number,
            Bold | Italic | Underline | Strikethrough | WordWrap | GradientEnabled
            | ShadowEnabled => T::Bool,
            TextColor | BorderColor | BackgroundColor | GradientStart | GradientEnd
            | ShadowColor => T::Color,
            Alignment => T::Keyword(ALIGNMENTS),
            BorderStyle => T::Keyword(BORDER_STYLES),
            GradientType => T::Keyword(GRADIENT_TYPES),
            Self::BorderSides => T::Sides,
        }
    }

    /// Coerces `value` into this property's shape, or reports why it can't be.
    pub fn check(self, value: PropertyValue) -> Result<PropertyValue> {
        check_shape(self.name(), self.value_type(), value)
    }
}

fn check_shape(
    property: &str,
    expected: PropertyValueType,
    value: PropertyValue,
) -> Result<PropertyValue> {
    let found = value.kind_name();
    value.coerce(expected).ok_or_else(|| QuireError::InvalidValue {
        property: property.to_string(),
        expected: expected.to_string(),
        found: found.to_string(),
    })
}

/// Checks that every entry of `properties` belongs to `category` and has the
/// shape its key requires. Returns the coerced set.
pub fn check_properties(
    category: StyleCategory,
    properties: StyleProperties,
) -> Result<StyleProperties> {
    let mut checked = StyleProperties::new();
    for (key, value) in properties {
        if key.category() != category {
            return Err(QuireError::CategoryMismatch {
                property: key.name().to_string(),
                expected: category,
                found: key.category(),
            });
        }
        checked.insert(key, key.check(value)?);
    }
    Ok(checked)
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category-free attributes that live directly on the element and never go
/// through style bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementAttribute {
    X,
    Y,
    Width,
    Height,
    Rotation,
    ScaleX,
    ScaleY,
    ZIndex,
    Visible,
    Locked,
}

impl ElementAttribute {
    pub const ALL: [ElementAttribute; 10] = [
        ElementAttribute::X,
        ElementAttribute::Y,
        ElementAttribute::Width,
        ElementAttribute::Height,
        ElementAttribute::Rotation,
        ElementAttribute::ScaleX,
        ElementAttribute::ScaleY,
        ElementAttribute::ZIndex,
        ElementAttribute::Visible,
        ElementAttribute::Locked,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ElementAttribute::X => "x",
            ElementAttribute::Y => "y",
            ElementAttribute::Width => "width",
            ElementAttribute::Height => "height",
            ElementAttribute::Rotation => "rotation",
            ElementAttribute::ScaleX => "scaleX",
            ElementAttribute::ScaleY => "scaleY",
            ElementAttribute::ZIndex => "zIndex",
            ElementAttribute::Visible => "visible",
            ElementAttribute::Locked => "locked",
        }
    }

    pub fn value_type(self) -> PropertyValueType {
        match self {
            ElementAttribute::Visible | ElementAttribute::Locked => PropertyValueType::Bool,
            _ => PropertyValueType::Number,
        }
    }
}

impl fmt::Display for ElementAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValueType {
    Text,
    /// Text restricted to a fixed set of words.
    Keyword(&'static [&'static str]),
    Number,
    Bool,
    Color,
    Sides,
}

impl fmt::Display for PropertyValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValueType::Text => f.write_str("text"),
            PropertyValueType::Keyword(words) => write!(f, "one of {}", words.join("|")),
            PropertyValueType::Number => f.write_str("number"),
            PropertyValueType::Bool => f.write_str("bool"),
            PropertyValueType::Color => f.write_str("color"),
            PropertyValueType::Sides => f.write_str("list of border sides"),
        }
    }
}

/// What an editor property name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyTarget {
    Style(PropertyKey),
    Attribute(ElementAttribute),
}

const ALIGNMENTS: &[&str] = &["left", "center", "right", "justify"];
const BORDER_STYLES: &[&str] = &["none", "solid", "dashed", "dotted", "double"];
const GRADIENT_TYPES: &[&str] = &["linear", "radial"];

/// Metadata about a style property: its value shape and built-in default.
#[derive(Debug, Clone)]
pub struct PropertyMetadata {
    pub key: PropertyKey,
    pub value_type: PropertyValueType,
    pub default_value: PropertyValue,
}

/// Single source of truth for the property schema, the property-to-category map
/// and the built-in defaults every unlinked binding is merged over.
#[derive(Clone)]
pub struct PropertyRegistry {
    properties: Vec<PropertyMetadata>,
    key_to_index: [Option<usize>; PropertyKey::COUNT],
    by_name: HashMap<&'static str, PropertyTarget>,
}

impl PropertyRegistry {
    pub fn new() -> Self {
        let mut registry = PropertyRegistry {
            properties: Vec::new(),
            key_to_index: [None; PropertyKey::COUNT],
            by_name: HashMap::new(),
        };

        registry.initialize_properties();
        for attribute in ElementAttribute::ALL {
            registry
                .by_name
                .insert(attribute.name(), PropertyTarget::Attribute(attribute));
        }
        registry
    }

    fn initialize_properties(&mut self) {
        // Text
        self.register_property(PropertyKey::FontFamily, "Inter".into());
        self.register_property(PropertyKey::FontSize, 14.0.into());
        self.register_property(PropertyKey::Bold, false.into());
        self.register_property(PropertyKey::Italic, false.into());
        self.register_property(PropertyKey::Underline, false.into());
        self.register_property(PropertyKey::Strikethrough, false.into());
        self.register_property(PropertyKey::TextColor, Color::BLACK.into());

        // Paragraph
        self.register_property(PropertyKey::Alignment, "left".into());
        self.register_property(PropertyKey::LineHeight, 1.4.into());
        self.register_property(PropertyKey::LetterSpacing, 0.0.into());
        self.register_property(PropertyKey::Indent, 0.0.into());
        self.register_property(PropertyKey::SpacingBefore, 0.0.into());
        self.register_property(PropertyKey::SpacingAfter, 0.0.into());
        self.register_property(PropertyKey::WordWrap, true.into());

        // Border
        self.register_property(PropertyKey::BorderWidth, 0.0.into());
        self.register_property(PropertyKey::BorderStyle, "none".into());
        self.register_property(PropertyKey::BorderColor, Color::BLACK.into());
        self.register_property(PropertyKey::BorderRadius, 0.0.into());
        self.register_property(PropertyKey::BorderSides, BorderSides::all().into());

        // Fill
        self.register_property(PropertyKey::BackgroundColor, Color::TRANSPARENT.into());
        self.register_property(PropertyKey::Opacity, 1.0.into());
        self.register_property(PropertyKey::GradientEnabled, false.into());
        self.register_property(PropertyKey::GradientType, "linear".into());
        self.register_property(PropertyKey::GradientAngle, 0.0.into());
        self.register_property(PropertyKey::GradientStart, Color::WHITE.into());
        self.register_property(PropertyKey::GradientEnd, Color::BLACK.into());
        self.register_property(PropertyKey::ShadowEnabled, false.into());
        self.register_property(PropertyKey::ShadowColor, Color::rgba(0, 0, 0, 0x40).into());
        self.register_property(PropertyKey::ShadowBlur, 0.0.into());
        self.register_property(PropertyKey::ShadowOffsetX, 0.0.into());
        self.register_property(PropertyKey::ShadowOffsetY, 0.0.into());
    }

    fn register_property(&mut self, key: PropertyKey, default_value: PropertyValue) {
        let index = self.properties.len();
        self.properties.push(PropertyMetadata {
            key,
            value_type: key.value_type(),
            default_value,
        });
        self.key_to_index[key as usize] = Some(index);
        self.by_name.insert(key.name(), PropertyTarget::Style(key));
    }

    pub fn metadata(&self, key: PropertyKey) -> Option<&PropertyMetadata> {
        self.key_to_index[key as usize].and_then(|index| self.properties.get(index))
    }

    /// Looks up an editor property name.
    pub fn lookup(&self, name: &str) -> Option<PropertyTarget> {
        self.by_name.get(name).copied()
    }

    /// The property-to-category map. `None` for category-free and unknown names.
    pub fn category_of(&self, name: &str) -> Option<StyleCategory> {
        match self.lookup(name)? {
            PropertyTarget::Style(key) => Some(key.category()),
            PropertyTarget::Attribute(_) => None,
        }
    }

    pub fn default_value(&self, key: PropertyKey) -> Option<&PropertyValue> {
        self.metadata(key).map(|meta| &meta.default_value)
    }

    /// Built-in defaults for every property of `category`.
    pub fn defaults(&self, category: StyleCategory) -> StyleProperties {
        self.properties
            .iter()
            .filter(|meta| meta.key.category() == category)
            .map(|meta| (meta.key, meta.default_value.clone()))
            .collect()
    }

    pub fn keys(&self, category: StyleCategory) -> impl Iterator<Item = PropertyKey> + '_ {
        self.properties
            .iter()
            .map(|meta| meta.key)
            .filter(move |key| key.category() == category)
    }

    /// Checks `value` against the schema of `key`, coercing text to colours and
    /// keywords where the schema asks for them. Non-finite numbers are refused.
    pub fn validate(&self, key: PropertyKey, value: PropertyValue) -> Result<PropertyValue> {
        key.check(value)
    }

    pub fn validate_attribute(
        &self,
        attribute: ElementAttribute,
        value: PropertyValue,
    ) -> Result<PropertyValue> {
        check_shape(attribute.name(), attribute.value_type(), value)
    }

    /// Validates every entry of `properties` against `category` and the schema,
    /// returning the coerced set.
    pub fn validate_set(
        &self,
        category: StyleCategory,
        properties: StyleProperties,
    ) -> Result<StyleProperties> {
        check_properties(category, properties)
    }

    pub fn all_properties(&self) -> &[PropertyMetadata] {
        &self.properties
    }
}

impl Default for PropertyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
