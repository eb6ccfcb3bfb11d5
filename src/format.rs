//! Plain-text document format
//!
//! This module documents the on-disk format as implemented by this library.
//! It holds no code; the grammar lives in [`crate::codec`].
//!
//! # Overview
//!
//! A file is a sequence of zero or more top-level documents. Each document is
//! a tree of sections holding text and sequence entries. The format is meant
//! to be edited by hand and diffed line by line, so nesting is expressed with
//! dotted headers rather than indentation.
//!
//! # Grammar
//!
//! ```text
//! document      := entry*
//! entry         := text_entry | sequence_entry | section_entry
//! text_entry    := KEY SEP ' ' FIRSTLINE '\n' continuation*
//! continuation  := ' ' ('.' | CONTLINE) '\n'
//! sequence_entry:= KEY '[]' SEP ' ' (ITEM (', ' ITEM)*)? '\n'
//! section_entry := '\n' ('[' QUALIFIED_KEY ']\n')? '\n' entry*
//! KEY           := [A-Za-z0-9_.-]+
//! SEP           := ':' | '='
//! QUALIFIED_KEY := KEY ('.' KEY)*
//! ```
//!
//! Both separators are accepted on read. The writer emits `:` unless
//! [`FormatOptions::with_separator`](crate::FormatOptions::with_separator)
//! says otherwise.
//!
//! ## Text
//!
//! A payload with embedded newlines continues on following lines, each
//! prefixed by one space. An empty line inside the payload is written as a
//! lone `.` so it cannot be mistaken for the blank line that separates
//! entries.
//!
//! ```rust
//! use serde_tesql::{from_str, to_string, Section, Value};
//!
//! let section = Section::with_entries("", [
//!     ("Key0", ""),
//!     ("Key1", "Value1"),
//!     ("Key2", "MultiLine text\nSecondLine"),
//!     ("Key3", "MultiLine\n\nw/ empty line"),
//! ])
//! .unwrap();
//!
//! let text = to_string(&Value::Section(section.clone())).unwrap();
//! assert_eq!(
//!     text,
//!     "\nKey0: \nKey1: Value1\nKey2: MultiLine text\n SecondLine\nKey3: MultiLine\n .\n w/ empty line\n"
//! );
//! assert_eq!(from_str(&text).unwrap(), Value::Section(section));
//! ```
//!
//! A payload line consisting of a single `.` reads back as an empty line.
//! That is the one text value the format cannot carry exactly. A line that
//! ends in a carriage return is refused on write with
//! [`Error::Encode`](crate::Error::Encode), since readers strip `\r\n`
//! line endings.
//!
//! ## Sections
//!
//! A section starts with a blank line, then its header and another blank
//! line. The header carries the full dotted path: every ancestor's name, then
//! the section's own. An unnamed root section has no header and adds nothing
//! to its children's paths.
//!
//! ```rust
//! use serde_tesql::{section, to_string, Value};
//!
//! let doc = section!("Section", {
//!     "Key1": "Value1",
//!     "Key2": "Value2",
//!     "SubSection": { "SubKey1": "SubValue1" },
//! })
//! .unwrap();
//!
//! assert_eq!(
//!     to_string(&Value::Section(doc)).unwrap(),
//!     "\n[Section]\n\nKey1: Value1\nKey2: Value2\n\n[Section.SubSection]\n\nSubKey1: SubValue1\n"
//! );
//! ```
//!
//! When reading, a header belongs to the current section only if it extends
//! the current path with `.` and one more name. `[AB]` after `[A]` is a
//! sibling, and `[A.B.C]` directly under `[A]` is rejected because `[A.B]` was
//! never opened.
//!
//! ## Sequences
//!
//! Lists of scalars are written on one line, after a `[]` marker on the key:
//!
//! ```text
//! tags[]: red, green, blue
//! empty[]:
//! ```
//!
//! An empty sequence still carries the space after the separator
//! (`empty[]: `). Items are split on `", "`. Items that are empty or contain `", "` or a
//! newline cannot be written and fail with [`Error::Encode`](crate::Error::Encode).
//!
//! ## Entry order
//!
//! Flat entries (text and sequences) always precede nested sections within a
//! section, so a record's own fields are read before any of its children.
//! [`Section`](crate::Section) maintains that order on every insertion.
//!
//! # Scalars
//!
//! The format does not distinguish types: `pk: 1` stores the text `"1"`.
//! Integers, floats, booleans, dates (RFC 3339) and big integers are written
//! with their `Display` form and parsed back on demand by
//! [`Text::parse`](crate::Text::parse) or the serde bridge.
