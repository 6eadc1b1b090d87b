// crates/quire-core/src/properties.rs
use std::fmt;

use bitflags::bitflags;
use glam::Vec4;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{PropertyValueType, QuireError};

/// An RGBA colour with components in the 0.0-1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub Vec4);

impl Color {
    pub const TRANSPARENT: Color = Color(Vec4::ZERO);
    pub const BLACK: Color = Color(Vec4::new(0.0, 0.0, 0.0, 1.0));
    pub const WHITE: Color = Color(Vec4::ONE);

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(Vec4::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ))
    }

    /// Parses `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` or `transparent`.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("transparent") {
            return Some(Color::TRANSPARENT);
        }

        let hex = trimmed.strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            3 => Some(Color::rgba(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
            4 => Some(Color::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            channel(self.0.x),
            channel(self.0.y),
            channel(self.0.z),
            channel(self.0.w)
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = QuireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s).ok_or_else(|| QuireError::InvalidColor(s.to_string()))
    }
}

bitflags! {
    /// Which edges of an element a border is drawn on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BorderSides: u8 {
        const TOP = 0b0001;
        const RIGHT = 0b0010;
        const BOTTOM = 0b0100;
        const LEFT = 0b1000;
    }
}

const SIDE_NAMES: [(BorderSides, &str); 4] = [
    (BorderSides::TOP, "top"),
    (BorderSides::RIGHT, "right"),
    (BorderSides::BOTTOM, "bottom"),
    (BorderSides::LEFT, "left"),
];

impl BorderSides {
    pub fn names(&self) -> Vec<&'static str> {
        SIDE_NAMES
            .iter()
            .filter(|(side, _)| self.contains(*side))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Returns `None` if any name is not a side.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Option<Self> {
        let mut sides = BorderSides::empty();
        for name in names {
            let (side, _) = SIDE_NAMES
                .iter()
                .find(|(_, n)| n.eq_ignore_ascii_case(name.as_ref()))?;
            sides |= *side;
        }
        Some(sides)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Color(Color),
    Sides(BorderSides),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            PropertyValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_sides(&self) -> Option<BorderSides> {
        match self {
            PropertyValue::Sides(s) => Some(*s),
            _ => None,
        }
    }

    /// Short name of the value's shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropertyValue::Text(_) => "text",
            PropertyValue::Number(n) if !n.is_finite() => "non-finite number",
            PropertyValue::Number(_) => "number",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Color(_) => "color",
            PropertyValue::Sides(_) => "sides",
        }
    }

    /// Converts the value into the shape `expected` asks for, if it can.
    ///
    /// Text is accepted for colours when it parses as one and for keywords when
    /// it is one of the allowed words. Nothing else is converted. NaN and the
    /// infinities have no JSON form and are never accepted as numbers.
    pub fn coerce(self, expected: PropertyValueType) -> Option<PropertyValue> {
        match (expected, self) {
            (PropertyValueType::Text, v @ PropertyValue::Text(_)) => Some(v),
            (PropertyValueType::Keyword(allowed), PropertyValue::Text(word)) => allowed
                .iter()
                .any(|a| *a == word)
                .then_some(PropertyValue::Text(word)),
            (PropertyValueType::Number, PropertyValue::Number(n)) if n.is_finite() => {
                Some(PropertyValue::Number(n))
            }
            (PropertyValueType::Bool, v @ PropertyValue::Bool(_)) => Some(v),
            (PropertyValueType::Color, v @ PropertyValue::Color(_)) => Some(v),
            (PropertyValueType::Color, PropertyValue::Text(s)) => {
                Color::parse(&s).map(PropertyValue::Color)
            }
            (PropertyValueType::Sides, v @ PropertyValue::Sides(_)) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => write!(f, "{s:?}"),
            PropertyValue::Number(n) => write!(f, "{n}"),
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Color(c) => write!(f, "{c}"),
            PropertyValue::Sides(s) => write!(f, "[{}]", s.names().join(", ")),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        PropertyValue::Number(value as f64)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Number(value as f64)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<Color> for PropertyValue {
    fn from(value: Color) -> Self {
        PropertyValue::Color(value)
    }
}

impl From<BorderSides> for PropertyValue {
    fn from(value: BorderSides) -> Self {
        PropertyValue::Sides(value)
    }
}

// Colours travel as hex strings and side sets as arrays of side names.
impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Text(s) => serializer.serialize_str(s),
            PropertyValue::Number(n) => serializer.serialize_f64(*n),
            PropertyValue::Bool(b) => serializer.serialize_bool(*b),
            PropertyValue::Color(c) => serializer.serialize_str(&c.to_hex()),
            PropertyValue::Sides(s) => serializer.collect_seq(s.names()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawValue::deserialize(deserializer)? {
            RawValue::Bool(b) => PropertyValue::Bool(b),
            RawValue::Number(n) => PropertyValue::Number(n),
            RawValue::Text(s) => PropertyValue::Text(s),
            RawValue::List(names) => PropertyValue::Sides(
                BorderSides::from_names(&names)
                    .ok_or_else(|| D::Error::custom(format!("unknown border side in {names:?}")))?,
            ),
        })
    }
}
