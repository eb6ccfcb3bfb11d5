//! The value model of a document.
//!
//! This module provides the [`Value`] enum, the three storable variants it
//! wraps ([`Section`], [`Text`] and [`Sequence`]), and [`Raw`], the untyped
//! input from which values are built.
//!
//! ## Core Types
//!
//! - [`Value`]: a named entry of a document (section, text or sequence)
//! - [`Text`]: a scalar entry; integers, strings, dates etc. all share this representation
//! - [`Sequence`]: a list of scalar items
//! - [`Raw`]: untyped input classified by [`make_value`]
//!
//! ## Type Dispatch
//!
//! [`make_value`] tries the variants in a fixed order, most specific first:
//! Section, then Sequence, then Text. Every variant has a `validate` check
//! that is used both by the factory and by direct construction.
//!
//! ```rust
//! use serde_tesql::{make_value, Raw};
//!
//! let text = make_value("pk", Raw::from(1)).unwrap();
//! assert!(text.is_text());
//! assert_eq!(text.as_str(), Some("1"));
//!
//! let list = make_value("tags", Raw::from(vec!["a", "b"])).unwrap();
//! assert!(list.is_sequence());
//!
//! let section = make_value("Person", Raw::from_iter([("firstname", "Homer")])).unwrap();
//! assert!(section.is_section());
//! ```
//!
//! ## Equality
//!
//! Values compare by payload only. Names are ignored, and sections compare
//! as dictionaries (same key/value pairs, regardless of order).
//!
//! ```rust
//! use serde_tesql::{make_value, Raw};
//!
//! let a = make_value("a", Raw::from("Value")).unwrap();
//! let b = make_value("b", Raw::from("Value")).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a, "Value");
//! ```

use crate::{Error, Result, Section};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A named entry of a document.
#[derive(Clone, Debug)]
pub enum Value {
    Section(Section),
    Text(Text),
    Sequence(Sequence),
}

/// A scalar entry.
///
/// The text format does not distinguish integers from strings; the consuming
/// layer decides how to read the payload through [`Text::parse`],
/// [`Text::as_date`] or [`Text::as_bigint`].
#[derive(Clone, Debug)]
pub struct Text {
    name: String,
    text: String,
}

/// A list of scalar items.
///
/// Written as `name[]: a, b, c`, so items may not contain `", "` or newlines.
#[derive(Clone, Debug)]
pub struct Sequence {
    name: String,
    items: Vec<String>,
}

/// Untyped input for [`make_value`].
///
/// `Raw` is what a consumer hands over before the format decides which
/// variant stores it. Any `T: Serialize` can be turned into a `Raw` with
/// [`crate::to_raw`].
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Raw {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(DateTime<Utc>),
    BigInt(BigInt),
    List(Vec<Raw>),
    Map(IndexMap<String, Raw>),
    Value(Value),
}

type Validator = fn(&Raw) -> Result<()>;
type Builder = fn(&str, Raw) -> Result<Value>;

/// Candidate variants in dispatch order: most specific first.
const FACTORIES: [(&str, Validator, Builder); 3] = [
    ("section", Section::validate, |name, raw| {
        Section::from_raw(name, raw).map(Value::Section)
    }),
    ("sequence", Sequence::validate, |name, raw| {
        Sequence::from_raw(name, raw).map(Value::Sequence)
    }),
    ("text", Text::validate, |name, raw| {
        Text::from_raw(name, raw).map(Value::Text)
    }),
];

/// Builds the most specific [`Value`] that can represent `raw`.
///
/// Variants are tried in the order Section, Sequence, Text. A validation
/// failure on one candidate falls through to the next; only when all of
/// them reject the input is an [`Error::Type`] returned.
///
/// # Errors
///
/// Returns [`Error::Type`] when no variant accepts `raw` (e.g. [`Raw::Null`]),
/// or any error raised while building nested entries.
pub fn make_value(name: &str, raw: Raw) -> Result<Value> {
    for (kind, validate, build) in FACTORIES {
        if validate(&raw).is_ok() {
            tracing::trace!(name, kind, "classified value");
            return build(name, raw);
        }
    }

    Err(Error::type_error(format!(
        "unable to identify the type of '{}' ({})",
        name,
        raw.kind()
    )))
}

impl Value {
    /// Returns the entry name. Empty only for an unnamed root section.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Value::Section(s) => s.name(),
            Value::Text(t) => &t.name,
            Value::Sequence(s) => &s.name,
        }
    }

    /// A short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Section(_) => "section",
            Value::Text(_) => "text",
            Value::Sequence(_) => "sequence",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_section(&self) -> bool {
        matches!(self, Value::Section(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    /// If the value is a section, returns a reference to it.
    #[must_use]
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Value::Section(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_section_mut(&mut self) -> Option<&mut Section> {
        match self {
            Value::Section(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a text entry, returns it.
    #[must_use]
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Value::Text(t) => Some(t),
            _ => None,
        }
    }

    /// If the value is a text entry, returns its payload.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tesql::{make_value, Raw};
    ///
    /// let value = make_value("surname", Raw::from("Simpson")).unwrap();
    /// assert_eq!(value.as_str(), Some("Simpson"));
    /// ```
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(t) => Some(&t.text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Consumes the value, returning the section it holds.
    pub fn into_section(self) -> Option<Section> {
        match self {
            Value::Section(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Section(a), Value::Section(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Section(s) => write!(f, "[{}]", s.name()),
            Value::Text(t) => write!(f, "{}", t),
            Value::Sequence(s) => write!(f, "{}", s),
        }
    }
}

impl From<Section> for Value {
    fn from(value: Section) -> Self {
        Value::Section(value)
    }
}

impl From<Text> for Value {
    fn from(value: Text) -> Self {
        Value::Text(value)
    }
}

impl From<Sequence> for Value {
    fn from(value: Sequence) -> Self {
        Value::Sequence(value)
    }
}

impl Text {
    /// Creates a text entry.
    pub fn new(name: &str, text: impl Into<String>) -> Self {
        Text {
            name: name.to_string(),
            text: text.into(),
        }
    }

    /// Checks that `raw` has a string representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Type`] for null, lists, maps, sections and sequences.
    pub fn validate(raw: &Raw) -> Result<()> {
        match raw {
            Raw::Bool(_)
            | Raw::Integer(_)
            | Raw::Float(_)
            | Raw::String(_)
            | Raw::Date(_)
            | Raw::BigInt(_)
            | Raw::Value(Value::Text(_)) => Ok(()),
            other => Err(Error::type_error(format!(
                "value must be a string, found {}",
                other.kind()
            ))),
        }
    }

    /// Builds a text entry, failing with [`Error::Type`] if `raw` is not scalar.
    pub fn from_raw(name: &str, raw: Raw) -> Result<Self> {
        let text = match raw {
            Raw::Bool(b) => b.to_string(),
            Raw::Integer(i) => i.to_string(),
            Raw::Float(f) => f.to_string(),
            Raw::String(s) => s,
            Raw::Date(dt) => dt.to_rfc3339(),
            Raw::BigInt(bi) => bi.to_string(),
            Raw::Value(Value::Text(t)) => t.text,
            other => {
                return Err(Error::type_error(format!(
                    "value must be a string, found {}",
                    other.kind()
                )))
            }
        };
        Ok(Text::new(name, text))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Parses the payload into any `FromStr` type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tesql::Text;
    ///
    /// let pk = Text::new("pk", "42");
    /// assert_eq!(pk.parse::<u32>().unwrap(), 42);
    /// assert!(pk.parse::<bool>().is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::Type`] if the payload does not parse as `T`.
    pub fn parse<T>(&self) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.text.parse::<T>().map_err(|e| {
            Error::type_error(format!(
                "cannot read '{}' as {}: {}",
                self.name,
                std::any::type_name::<T>(),
                e
            ))
        })
    }

    /// Reads the payload as an RFC 3339 timestamp.
    pub fn as_date(&self) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Error::type_error(format!("cannot read '{}' as date: {}", self.name, e)))
    }

    /// Reads the payload as an arbitrary precision integer.
    pub fn as_bigint(&self) -> Result<BigInt> {
        self.parse::<BigInt>()
    }

    /// Returns `true` if the payload contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for Text {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Sequence {
    /// Creates a sequence entry from scalar items.
    pub fn new<I, S>(name: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Sequence {
            name: name.to_string(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Checks that `raw` is a list of scalars (or an existing sequence).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Type`] for non-lists and for lists holding maps or lists.
    pub fn validate(raw: &Raw) -> Result<()> {
        match raw {
            Raw::Value(Value::Sequence(_)) => Ok(()),
            Raw::List(items) => {
                for item in items {
                    Text::validate(item).map_err(|_| {
                        Error::type_error(format!(
                            "sequence items must be scalar, found {}",
                            item.kind()
                        ))
                    })?;
                }
                Ok(())
            }
            other => Err(Error::type_error(format!(
                "value must be a sequence, found {}",
                other.kind()
            ))),
        }
    }

    /// Builds a sequence entry, failing with [`Error::Type`] if `raw` is not a list of scalars.
    pub fn from_raw(name: &str, raw: Raw) -> Result<Self> {
        Self::validate(&raw)?;
        match raw {
            Raw::Value(Value::Sequence(s)) => Ok(Sequence {
                name: name.to_string(),
                items: s.items,
            }),
            Raw::List(items) => {
                let items = items
                    .into_iter()
                    .map(|item| Text::from_raw(name, item).map(|t| t.text))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Sequence {
                    name: name.to_string(),
                    items,
                })
            }
            other => Err(Error::type_error(format!(
                "value must be a sequence, found {}",
                other.kind()
            ))),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|i| i == item)
    }

    pub fn push(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.items.join(", "))
    }
}

impl Raw {
    /// A short name of the input kind, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Raw::Null => "null",
            Raw::Bool(_) => "bool",
            Raw::Integer(_) => "integer",
            Raw::Float(_) => "float",
            Raw::String(_) => "string",
            Raw::Date(_) => "date",
            Raw::BigInt(_) => "bigint",
            Raw::List(_) => "list",
            Raw::Map(_) => "map",
            Raw::Value(v) => v.kind(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Raw::Null)
    }

    /// Creates an empty map, the input for an empty section.
    #[must_use]
    pub fn map() -> Self {
        Raw::Map(IndexMap::new())
    }
}

impl From<bool> for Raw {
    fn from(value: bool) -> Self {
        Raw::Bool(value)
    }
}

impl From<i8> for Raw {
    fn from(value: i8) -> Self {
        Raw::Integer(value as i64)
    }
}

impl From<i16> for Raw {
    fn from(value: i16) -> Self {
        Raw::Integer(value as i64)
    }
}

impl From<i32> for Raw {
    fn from(value: i32) -> Self {
        Raw::Integer(value as i64)
    }
}

impl From<i64> for Raw {
    fn from(value: i64) -> Self {
        Raw::Integer(value)
    }
}

impl From<u8> for Raw {
    fn from(value: u8) -> Self {
        Raw::Integer(value as i64)
    }
}

impl From<u16> for Raw {
    fn from(value: u16) -> Self {
        Raw::Integer(value as i64)
    }
}

impl From<u32> for Raw {
    fn from(value: u32) -> Self {
        Raw::Integer(value as i64)
    }
}

impl From<u64> for Raw {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Raw::Integer(i),
            Err(_) => Raw::BigInt(BigInt::from(value)),
        }
    }
}

impl From<f32> for Raw {
    fn from(value: f32) -> Self {
        Raw::Float(value as f64)
    }
}

impl From<f64> for Raw {
    fn from(value: f64) -> Self {
        Raw::Float(value)
    }
}

impl From<char> for Raw {
    fn from(value: char) -> Self {
        Raw::String(value.to_string())
    }
}

impl From<&str> for Raw {
    fn from(value: &str) -> Self {
        Raw::String(value.to_string())
    }
}

impl From<String> for Raw {
    fn from(value: String) -> Self {
        Raw::String(value)
    }
}

impl From<DateTime<Utc>> for Raw {
    fn from(value: DateTime<Utc>) -> Self {
        Raw::Date(value)
    }
}

impl From<BigInt> for Raw {
    fn from(value: BigInt) -> Self {
        Raw::BigInt(value)
    }
}

impl<T: Into<Raw>> From<Option<T>> for Raw {
    fn from(value: Option<T>) -> Self {
        value.map_or(Raw::Null, Into::into)
    }
}

impl<T: Into<Raw>> From<Vec<T>> for Raw {
    fn from(value: Vec<T>) -> Self {
        Raw::List(value.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Raw>> for Raw {
    fn from(value: IndexMap<String, Raw>) -> Self {
        Raw::Map(value)
    }
}

impl<T: Into<Raw>> From<HashMap<String, T>> for Raw {
    fn from(value: HashMap<String, T>) -> Self {
        Raw::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<Value> for Raw {
    fn from(value: Value) -> Self {
        Raw::Value(value)
    }
}

impl From<Section> for Raw {
    fn from(value: Section) -> Self {
        Raw::Value(Value::Section(value))
    }
}

impl From<Text> for Raw {
    fn from(value: Text) -> Self {
        Raw::Value(Value::Text(value))
    }
}

impl From<Sequence> for Raw {
    fn from(value: Sequence) -> Self {
        Raw::Value(Value::Sequence(value))
    }
}

impl<K: Into<String>, V: Into<Raw>> FromIterator<(K, V)> for Raw {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Raw::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
