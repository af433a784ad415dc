//! Style maps and pixel conversions.
//!
//! `StyleProps` is what every placement parser produces and what the host
//! applies to an overlay element. Keys are CSS property names normalised to
//! kebab-case (`maxHeight` and `max-height` are the same key).

use std::collections::BTreeMap;
use std::fmt;

use miette::SourceSpan;
use pest::Parser;
use pest::error::InputLocation;
use pest_derive::Parser;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{ConfigError, SourceContext};
use crate::types::Px;

#[derive(Parser)]
#[grammar = "style.pest"]
struct DeclarationParser;

/// `382` → `"382px"`
pub fn to_pixel(value: impl Into<Px>) -> String {
    format!("{}px", value.into())
}

/// Tolerant pixel parser: the first run of ASCII digits, as an integer.
///
/// Anything without digits is `0`. Signs and fractions are ignored, so
/// `"-12.5px"` reads as `12`.
pub fn pixel_to_num(value: &str) -> f64 {
    let digits: String = value
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<f64>().unwrap_or(0.0)
}

/// Parse every value of a style map back to numbers with [`pixel_to_num`].
pub fn pixel_map_to_num(props: &StyleProps) -> BTreeMap<String, f64> {
    props
        .iter()
        .map(|(k, v)| (k.to_string(), pixel_to_num(v)))
        .collect()
}

/// `maxHeight` → `max-height`. Custom properties (`--x`) are left alone.
pub fn kebab_case(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// A value on its way into a [`StyleProps`]: numbers become pixels,
/// text is kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    fn into_css(self) -> String {
        match self {
            StyleValue::Number(n) => to_pixel(n),
            StyleValue::Text(s) => s,
        }
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

impl From<Px> for StyleValue {
    fn from(px: Px) -> Self {
        StyleValue::Number(px.raw())
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Text(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::Text(s)
    }
}

/// A set of inline CSS properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StyleProps(BTreeMap<String, String>);

impl StyleProps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(property, value)` pairs, turning numbers into pixels.
    pub fn from_values<K, V, I>(values: I) -> Self
    where
        K: AsRef<str>,
        V: Into<StyleValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut props = StyleProps::new();
        for (k, v) in values {
            props.set(k.as_ref(), v);
        }
        props
    }

    /// Parse a CSS declaration block (`"top: 0; left: 0"`).
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        Self::parse_named("<styleProps>", source)
    }

    pub fn parse_named(name: &str, source: &str) -> Result<Self, ConfigError> {
        let pairs = DeclarationParser::parse(Rule::declarations, source).map_err(|e| {
            let span = match e.location {
                InputLocation::Pos(p) => SourceSpan::from((p, 0)),
                InputLocation::Span((s, end)) => SourceSpan::from((s, end - s)),
            };
            ConfigError::InvalidStyle {
                message: e.variant.message().to_string(),
                src: SourceContext::new(name, source).named_source(),
                span,
            }
        })?;

        let mut props = StyleProps::new();
        for pair in pairs.flatten().filter(|p| p.as_rule() == Rule::declaration) {
            let mut inner = pair.into_inner();
            if let (Some(property), Some(value)) = (inner.next(), inner.next()) {
                props.insert(property.as_str(), value.as_str().trim());
            }
        }
        Ok(props)
    }

    /// Insert a raw CSS value.
    pub fn insert(&mut self, property: &str, value: impl Into<String>) {
        self.0.insert(kebab_case(property), value.into());
    }

    /// Insert a value, turning numbers into pixels.
    pub fn set(&mut self, property: &str, value: impl Into<StyleValue>) {
        self.0.insert(kebab_case(property), value.into().into_css());
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(&kebab_case(property)).map(String::as_str)
    }

    /// Numeric view of one property, `0` when absent or unparseable.
    pub fn number(&self, property: &str) -> f64 {
        self.get(property).map(pixel_to_num).unwrap_or(0.0)
    }

    /// Copy every property of `other` over `self`; `other` wins.
    pub fn extend(&mut self, other: &StyleProps) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// `self` with `other` layered on top.
    pub fn overlaid(&self, other: &StyleProps) -> StyleProps {
        let mut out = self.clone();
        out.extend(other);
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialise as a declaration block, properties sorted by name.
    pub fn to_css(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for StyleProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl<K: AsRef<str>, V: Into<StyleValue>> FromIterator<(K, V)> for StyleProps {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        StyleProps::from_values(iter)
    }
}

/// Accepts `{"minHeight": "350px", "top": 10}` or `"min-height: 350px"`.
impl<'de> Deserialize<'de> for StyleProps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawValue {
            Number(f64),
            Text(String),
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawProps {
            Block(String),
            Map(BTreeMap<String, RawValue>),
        }

        match RawProps::deserialize(deserializer)? {
            RawProps::Block(css) => StyleProps::parse(&css).map_err(serde::de::Error::custom),
            RawProps::Map(map) => Ok(map
                .into_iter()
                .map(|(k, v)| {
                    let v = match v {
                        RawValue::Number(n) => StyleValue::Number(n),
                        RawValue::Text(s) => StyleValue::Text(s),
                    };
                    (k, v)
                })
                .collect()),
        }
    }
}
