//! # serde_tesql
//!
//! A human-editable, sectioned plain-text document format with ordered
//! sections, multi-line text values and serde bridges.
//!
//! ## What does it look like?
//!
//! ```text
//!
//! [Person]
//!
//! pk: 1
//! firstname: Homer
//! surname: Simpson
//! quote: D'oh!
//!  .
//!  Mmm... donuts.
//!
//! [Person.address]
//!
//! street: Evergreen Terrace
//! ```
//!
//! Documents are trees of [`Section`]s. A section keeps its entries in an
//! explicit order: scalar fields first, nested sections after, with a cursor
//! that decides where the next entry lands. Nesting is spelled with dotted
//! headers, so files stay flat and diff cleanly.
//!
//! ## Key Features
//!
//! - **Ordered sections**: [`Section::append`] and [`Section::prepend`] insert
//!   relative to a selection cursor and keep fields ahead of sub-sections
//! - **Type dispatch**: [`make_value`] turns untyped [`Raw`] input into the
//!   most specific [`Value`] variant
//! - **Multi-document streams**: [`documents_from_str`] yields every top-level
//!   document of a file
//! - **Serde Compatible**: [`to_document`] and [`from_document`] bridge
//!   `#[derive(Serialize, Deserialize)]` types
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_tesql::{from_document, from_str, to_document, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Person {
//!     pk: u32,
//!     firstname: String,
//!     surname: String,
//! }
//!
//! let homer = Person {
//!     pk: 1,
//!     firstname: "Homer".to_string(),
//!     surname: "Simpson".to_string(),
//! };
//!
//! let doc = to_document("Person", &homer).unwrap();
//! let text = to_string(&doc).unwrap();
//! assert_eq!(text, "\n[Person]\n\npk: 1\nfirstname: Homer\nsurname: Simpson\n");
//!
//! let back = from_str(&text).unwrap();
//! assert_eq!(back.name(), "Person");
//! assert_eq!(from_document::<Person>(&back).unwrap(), homer);
//! ```
//!
//! ## Building sections by hand
//!
//! ```rust
//! use serde_tesql::{Raw, Section};
//!
//! let mut person = Section::new("Person");
//! person.append("pk", 1, true).unwrap();
//! person.append("address", Raw::map(), true).unwrap();
//! person.append("surname", "Simpson", true).unwrap();
//!
//! // Fields stay ahead of the nested section
//! assert_eq!(person.keys().collect::<Vec<_>>(), ["surname", "pk", "address"]);
//! ```
//!
//! ## Logging
//!
//! The codec emits [`tracing`] events: `debug` when a section is opened or
//! closed, `trace` for codec selection and line push-back. No subscriber is
//! installed by the library.
//!
//! ## Format
//!
//! See the [`format`] module for the grammar.

pub mod codec;
pub mod de;
pub mod error;
pub mod format;
pub mod macros;
pub mod options;
pub mod reader;
pub mod section;
pub mod ser;
pub mod value;

pub use codec::{Codec, Documents};
pub use de::Deserializer;
pub use error::{Error, Result};
pub use options::{FormatOptions, Separator};
pub use reader::LineReader;
pub use section::Section;
pub use ser::RawSerializer;
pub use value::{make_value, Raw, Sequence, Text, Value};

use serde::{Deserialize, Serialize};
use std::io;

/// Encode a value as text.
///
/// # Examples
///
/// ```rust
/// use serde_tesql::{to_string, Section, Value};
///
/// let empty = Value::Section(Section::new("Section"));
/// assert_eq!(to_string(&empty).unwrap(), "\n[Section]\n\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Encode`] if the value holds something the format cannot
/// carry (a malformed key, a sequence item with `", "` in it).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(value: &Value) -> Result<String> {
    to_string_with_options(value, FormatOptions::default())
}

/// Encode a value as text with custom options.
///
/// # Errors
///
/// Same as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(value: &Value, options: FormatOptions) -> Result<String> {
    let mut out = Vec::new();
    codec::encode_with_options(value, &mut out, &options)?;
    String::from_utf8(out).map_err(|e| Error::custom(e.to_string()))
}

/// Encode a value to a writer.
///
/// # Examples
///
/// ```rust
/// use serde_tesql::{to_writer, Text, Value};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Value::Text(Text::new("Key2", "MultiLine text\nSecondLine"))).unwrap();
/// assert_eq!(buffer, b"Key2: MultiLine text\n SecondLine\n");
/// ```
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W: io::Write>(writer: W, value: &Value) -> Result<()> {
    to_writer_with_options(writer, value, FormatOptions::default())
}

/// Encode a value to a writer with custom options.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W: io::Write>(
    mut writer: W,
    value: &Value,
    options: FormatOptions,
) -> Result<()> {
    codec::encode_with_options(value, &mut writer, &options)?;
    writer.flush()?;
    Ok(())
}

/// Decode the first document of `s` as a section.
///
/// Text entries ahead of any header belong to an unnamed root section, which
/// then also takes in every following section. Empty input gives an empty
/// unnamed section.
///
/// # Examples
///
/// ```rust
/// use serde_tesql::from_str;
///
/// let root = from_str("\n").unwrap();
/// let root = root.as_section().unwrap();
/// assert_eq!(root.name(), "");
/// assert!(root.is_empty());
///
/// let doc = from_str("\n[Person]\n\npk: 1\n").unwrap();
/// assert_eq!(doc.as_section().unwrap()["pk"], "1");
/// ```
///
/// # Errors
///
/// Returns [`Error::Decode`] with the offending line if a line matches no
/// entry pattern, or a key error if the text repeats a key.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<Value> {
    from_buf_read(s.as_bytes())
}

/// Decode the first document of a byte slice.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or not a valid document.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<Value> {
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

/// Decode the first document of an I/O stream.
///
/// # Examples
///
/// ```rust
/// use serde_tesql::from_reader;
/// use std::io::Cursor;
///
/// let doc = from_reader(Cursor::new(b"\n[Section]\n\nKey1= Value1\n")).unwrap();
/// assert_eq!(doc.name(), "Section");
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the input is not a valid document.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R: io::Read>(reader: R) -> Result<Value> {
    from_buf_read(io::BufReader::new(reader))
}

fn from_buf_read<R: io::BufRead>(reader: R) -> Result<Value> {
    let mut reader = LineReader::new(reader);
    let value = codec::decode(&mut reader, true)?;
    Ok(value.unwrap_or_else(|| Value::Section(Section::new(""))))
}

/// Iterate over every top-level entry of `s`.
///
/// # Examples
///
/// ```rust
/// use serde_tesql::documents_from_str;
///
/// let text = "\n[Homer]\n\npk: 1\n\n[Marge]\n\npk: 2\n";
/// let names: Vec<_> = documents_from_str(text)
///     .map(|doc| doc.map(|d| d.name().to_string()))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(names, ["Homer", "Marge"]);
/// ```
pub fn documents_from_str(s: &str) -> Documents<&[u8]> {
    Documents::new(LineReader::new(s.as_bytes()))
}

/// Iterate over every top-level entry of an I/O stream.
pub fn documents_from_reader<R: io::Read>(reader: R) -> Documents<io::BufReader<R>> {
    Documents::new(LineReader::new(io::BufReader::new(reader)))
}

/// Convert any `T: Serialize` to untyped [`Raw`] input.
///
/// # Errors
///
/// Returns an error for types with no text form (byte buffers) or maps with
/// non-scalar keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_raw<T>(value: &T) -> Result<Raw>
where
    T: ?Sized + Serialize,
{
    ser::to_raw_value(value)
}

/// Convert any `T: Serialize` to a named [`Value`].
///
/// Structs become sections, lists of scalars become sequences, scalars
/// become text.
///
/// # Errors
///
/// Returns [`Error::Type`] when the value has no representation (e.g. `None`,
/// or a list of structs) and key errors for field names the format cannot
/// carry.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_document<T>(name: &str, value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    make_value(name, to_raw(value)?)
}

/// Deserialize an instance of type `T` from a decoded [`Value`].
///
/// # Errors
///
/// Returns an error if a required entry is missing or a payload does not
/// parse as the requested type.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_document<'de, T>(value: &'de Value) -> Result<T>
where
    T: Deserialize<'de>,
{
    T::deserialize(Deserializer::new(value))
}
