//! Serde bridge from a decoded [`Value`] to Rust data.
//!
//! The text format stores every scalar as a string, so [`Deserializer`]
//! parses on demand: when the target type asks for a `u32`, the payload is
//! parsed as one. Sections deserialize as maps or structs, sequences as
//! sequences of parsed items.
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_tesql::{from_document, from_str};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Person {
//!     pk: u32,
//!     firstname: String,
//!     nickname: Option<String>,
//!     tags: Vec<String>,
//! }
//!
//! let doc = from_str("\n[Person]\n\npk: 1\nfirstname: Homer\ntags[]: dad, nuclear\n").unwrap();
//! let person: Person = from_document(&doc).unwrap();
//! assert_eq!(person.pk, 1);
//! assert_eq!(person.nickname, None);
//! assert_eq!(person.tags, ["dad", "nuclear"]);
//! ```
//!
//! Enums follow serde's external tagging: a unit variant is a text entry
//! holding the variant name, any other variant is a section with a single
//! entry keyed by the variant name.

use crate::{Error, Result, Section, Value};
use serde::de::value::BorrowedStrDeserializer;
use serde::de;
use serde::forward_to_deserialize_any;
use std::fmt;
use std::str::FromStr;

/// Deserializes Rust values out of a borrowed [`Value`].
#[derive(Clone, Copy)]
pub struct Deserializer<'de> {
    value: &'de Value,
}

impl<'de> Deserializer<'de> {
    #[must_use]
    pub fn new(value: &'de Value) -> Self {
        Deserializer { value }
    }
}

macro_rules! forward_to_text {
    ($($method:ident)*) => {$(
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            match self.value {
                Value::Text(text) => {
                    de::Deserializer::$method(TextDeserializer::new(text.name(), text.as_str()), visitor)
                }
                _ => de::Deserializer::deserialize_any(self, visitor),
            }
        }
    )*};
}

impl<'de> de::Deserializer<'de> for Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Text(text) => visitor.visit_borrowed_str(text.as_str()),
            Value::Sequence(seq) => visitor.visit_seq(SeqDeserializer::new(seq.name(), seq.items())),
            Value::Section(section) => visitor.visit_map(MapDeserializer::new(section)),
        }
    }

    forward_to_text! {
        deserialize_bool deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_i128 deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
        deserialize_u128 deserialize_f32 deserialize_f64 deserialize_char deserialize_unit
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_unit(self, visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Text(text) => visitor.visit_enum(BorrowedStrDeserializer::<Error>::new(text.as_str())),
            Value::Section(section) if section.len() == 1 => {
                let mut entries = section.iter();
                match entries.next() {
                    Some((variant, value)) => visitor.visit_enum(EnumDeserializer { variant, value }),
                    None => Err(Error::type_error("empty section cannot hold an enum variant")),
                }
            }
            other => Err(Error::type_error(format!(
                "expected an enum variant in '{}', found {}",
                other.name(),
                other.kind()
            ))),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        str string bytes byte_buf seq tuple tuple_struct map struct identifier
    }
}

/// Parses a single scalar (a text payload, a sequence item or a key) on demand.
struct TextDeserializer<'de> {
    name: &'de str,
    text: &'de str,
}

impl<'de> TextDeserializer<'de> {
    fn new(name: &'de str, text: &'de str) -> Self {
        TextDeserializer { name, text }
    }

    fn parse<T>(&self) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.text.parse::<T>().map_err(|e| {
            Error::type_error(format!(
                "cannot read '{}' = {:?} as {}: {}",
                self.name,
                self.text,
                std::any::type_name::<T>(),
                e
            ))
        })
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident($ty:ty))*) => {$(
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            visitor.$visit(self.parse::<$ty>()?)
        }
    )*};
}

impl<'de> de::Deserializer<'de> for TextDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.text)
    }

    deserialize_parsed! {
        deserialize_bool => visit_bool(bool)
        deserialize_i8 => visit_i8(i8)
        deserialize_i16 => visit_i16(i16)
        deserialize_i32 => visit_i32(i32)
        deserialize_i64 => visit_i64(i64)
        deserialize_i128 => visit_i128(i128)
        deserialize_u8 => visit_u8(u8)
        deserialize_u16 => visit_u16(u16)
        deserialize_u32 => visit_u32(u32)
        deserialize_u64 => visit_u64(u64)
        deserialize_u128 => visit_u128(u128)
        deserialize_f32 => visit_f32(f32)
        deserialize_f64 => visit_f64(f64)
        deserialize_char => visit_char(char)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.text.is_empty() {
            visitor.visit_unit()
        } else {
            Err(Error::type_error(format!("expected an empty value in '{}'", self.name)))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_unit(self, visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(BorrowedStrDeserializer::<Error>::new(self.text))
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        str string bytes byte_buf seq tuple tuple_struct map struct identifier
    }
}

struct SeqDeserializer<'de> {
    name: &'de str,
    iter: std::slice::Iter<'de, String>,
}

impl<'de> SeqDeserializer<'de> {
    fn new(name: &'de str, items: &'de [String]) -> Self {
        SeqDeserializer {
            name,
            iter: items.iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(item) => seed.deserialize(TextDeserializer::new(self.name, item)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer<'de> {
    iter: indexmap::map::Iter<'de, String, Value>,
    value: Option<&'de Value>,
}

impl<'de> MapDeserializer<'de> {
    fn new(section: &'de Section) -> Self {
        MapDeserializer {
            iter: section.iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(TextDeserializer::new(key, key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(Deserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer<'de> {
    variant: &'de str,
    value: &'de Value,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer<'de> {
    type Error = Error;
    type Variant = Deserializer<'de>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(BorrowedStrDeserializer::<Error>::new(self.variant))?;
        Ok((variant, Deserializer::new(self.value)))
    }
}

impl<'de> de::VariantAccess<'de> for Deserializer<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Err(Error::type_error(format!(
            "unit variant '{}' must be written as text",
            self.value.name()
        )))
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_map(self, visitor)
    }
}
