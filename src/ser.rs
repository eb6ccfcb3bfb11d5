//! Serde bridge from Rust data to [`Raw`].
//!
//! [`RawSerializer`] turns any `T: Serialize` into the untyped [`Raw`] input
//! that [`crate::make_value`] classifies. Structs and maps become
//! [`Raw::Map`], sequences and tuples become [`Raw::List`], scalars keep
//! their type.
//!
//! A section cannot hold an absent entry, so map entries and struct fields
//! whose value serializes to [`Raw::Null`] (`None`, `()`) are left out. They
//! read back as `None` through [`crate::from_document`].
//!
//! ```rust
//! use serde::Serialize;
//! use serde_tesql::{to_raw, Raw};
//!
//! #[derive(Serialize)]
//! struct Person {
//!     pk: u32,
//!     nickname: Option<String>,
//!     tags: Vec<&'static str>,
//! }
//!
//! let raw = to_raw(&Person { pk: 1, nickname: None, tags: vec!["a"] }).unwrap();
//! let Raw::Map(map) = raw else { panic!("expected a map") };
//! assert_eq!(map.keys().collect::<Vec<_>>(), ["pk", "tags"]);
//! assert_eq!(map["pk"], Raw::Integer(1));
//! ```
//!
//! Enum variants carrying data use serde's external tagging: the variant
//! name becomes the single key of a map.

use crate::{Error, Raw, Result};
use indexmap::IndexMap;
use num_bigint::BigInt;
use serde::ser::{self, Serialize};

/// Serializes Rust values into [`Raw`].
pub struct RawSerializer;

pub struct SerializeVec {
    vec: Vec<Raw>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: IndexMap<String, Raw>,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

impl ser::Serializer for RawSerializer {
    type Ok = Raw;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Raw> {
        Ok(Raw::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Raw> {
        Ok(Raw::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Raw> {
        Ok(Raw::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Raw> {
        Ok(Raw::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Raw> {
        Ok(Raw::Integer(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Raw> {
        Ok(match i64::try_from(v) {
            Ok(i) => Raw::Integer(i),
            Err(_) => Raw::BigInt(BigInt::from(v)),
        })
    }

    fn serialize_u8(self, v: u8) -> Result<Raw> {
        Ok(Raw::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Raw> {
        Ok(Raw::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Raw> {
        Ok(Raw::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Raw> {
        Ok(Raw::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Raw> {
        Ok(match i64::try_from(v) {
            Ok(i) => Raw::Integer(i),
            Err(_) => Raw::BigInt(BigInt::from(v)),
        })
    }

    fn serialize_f32(self, v: f32) -> Result<Raw> {
        Ok(Raw::Float(v as f64))
    }

    fn serialize_f64(self, v: f64) -> Result<Raw> {
        Ok(Raw::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Raw> {
        Ok(Raw::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Raw> {
        Ok(Raw::String(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Raw> {
        Err(Error::type_error("binary data has no text representation"))
    }

    fn serialize_none(self) -> Result<Raw> {
        Ok(Raw::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Raw>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Raw> {
        Ok(Raw::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Raw> {
        Ok(Raw::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Raw> {
        Ok(Raw::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Raw>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Raw>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant, to_raw_value(value)?))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(None))
    }

    fn serialize_tuple(self, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(Some(variant)))
    }
}

impl SerializeVec {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::new(),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_raw_value(value)?);
        Ok(())
    }

    fn finish(self) -> Raw {
        let list = Raw::List(self.vec);
        match self.variant {
            Some(variant) => tagged(variant, list),
            None => list,
        }
    }
}

impl SerializeMap {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: IndexMap::new(),
            current_key: None,
            variant,
        }
    }

    fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<()> {
        let value = to_raw_value(value)?;
        if !value.is_null() {
            self.map.insert(key, value);
        }
        Ok(())
    }

    fn finish(self) -> Raw {
        let map = Raw::Map(self.map);
        match self.variant {
            Some(variant) => tagged(variant, map),
            None => map,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Raw;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Raw> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Raw;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Raw> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Raw;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Raw> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Raw;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Raw> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Raw;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match to_raw_value(key)? {
            Raw::String(s) => s,
            Raw::Integer(i) => i.to_string(),
            Raw::Bool(b) => b.to_string(),
            other => {
                return Err(Error::type_error(format!(
                    "map keys must be strings, found {}",
                    other.kind()
                )))
            }
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Raw> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Raw;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Raw> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Raw;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Raw> {
        Ok(self.finish())
    }
}

fn tagged(variant: &str, inner: Raw) -> Raw {
    let mut map = IndexMap::new();
    map.insert(variant.to_string(), inner);
    Raw::Map(map)
}

pub(crate) fn to_raw_value<T: Serialize + ?Sized>(value: &T) -> Result<Raw> {
    value.serialize(RawSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Address {
        street: String,
        number: u16,
    }

    #[derive(Serialize)]
    struct Person {
        pk: u32,
        firstname: String,
        nickname: Option<String>,
        address: Address,
    }

    #[derive(Serialize)]
    enum Shape {
        Point,
        Circle(f64),
        Rect { w: u8, h: u8 },
    }

    #[test]
    fn test_struct_fields_keep_order() {
        let person = Person {
            pk: 1,
            firstname: "Homer".to_string(),
            nickname: None,
            address: Address {
                street: "Evergreen Terrace".to_string(),
                number: 742,
            },
        };
        let Raw::Map(map) = to_raw_value(&person).unwrap() else {
            panic!("expected a map");
        };
        assert_eq!(map.keys().collect::<Vec<_>>(), ["pk", "firstname", "address"]);
        assert!(matches!(&map["address"], Raw::Map(inner) if inner["number"] == Raw::Integer(742)));
    }

    #[test]
    fn test_scalars() {
        assert_eq!(to_raw_value(&true).unwrap(), Raw::Bool(true));
        assert_eq!(to_raw_value(&'x').unwrap(), Raw::String("x".into()));
        assert_eq!(to_raw_value(&1.5f32).unwrap(), Raw::Float(1.5));
        assert_eq!(to_raw_value(&None::<u8>).unwrap(), Raw::Null);
        assert_eq!(
            to_raw_value(&u128::MAX).unwrap(),
            Raw::BigInt(BigInt::from(u128::MAX))
        );
    }

    #[test]
    fn test_enum_variants() {
        assert_eq!(to_raw_value(&Shape::Point).unwrap(), Raw::from("Point"));
        assert_eq!(
            to_raw_value(&Shape::Circle(2.0)).unwrap(),
            Raw::from_iter([("Circle", 2.0)])
        );
        let Raw::Map(rect) = to_raw_value(&Shape::Rect { w: 1, h: 2 }).unwrap() else {
            panic!("expected a map");
        };
        assert!(matches!(&rect["Rect"], Raw::Map(m) if m.len() == 2));
    }

    #[test]
    fn test_map_keys_are_stringified() {
        let mut map = BTreeMap::new();
        map.insert(1, "one");
        map.insert(2, "two");
        let Raw::Map(raw) = to_raw_value(&map).unwrap() else {
            panic!("expected a map");
        };
        assert_eq!(raw.keys().collect::<Vec<_>>(), ["1", "2"]);
    }

    #[test]
    fn test_bytes_rejected() {
        assert!(matches!(to_raw_value(&Bytes(&[1, 2, 3])), Err(Error::Type(_))));
    }

    struct Bytes<'a>(&'a [u8]);

    impl Serialize for Bytes<'_> {
        fn serialize<S: ser::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            serializer.serialize_bytes(self.0)
        }
    }
}
