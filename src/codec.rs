//! Line-oriented text codec.
//!
//! Every [`Value`] variant has a [`Codec`] that knows how to write it and how
//! to recognise its header line. Codecs are tried in descending priority
//! ([`Codec::ALL`]): Section, then Text, then Sequence. The first one whose
//! predicate holds encodes a value; the first one whose header pattern matches
//! decodes a line.
//!
//! Decoding never seeks further back than one line: a codec reads a line,
//! and if it belongs to someone else (a sibling section, the next entry) it
//! is pushed back with [`LineReader::unread`].
//!
//! ```rust
//! use serde_tesql::codec::{decode, encode};
//! use serde_tesql::{LineReader, Section, Value};
//!
//! let person = Section::with_entries("Person", [("pk", "1"), ("surname", "Simpson")]).unwrap();
//! let mut out = Vec::new();
//! encode(&Value::Section(person.clone()), &mut out, "").unwrap();
//! assert_eq!(out, b"\n[Person]\n\npk: 1\nsurname: Simpson\n");
//!
//! let mut reader = LineReader::new(out.as_slice());
//! let decoded = decode(&mut reader, false).unwrap().unwrap();
//! assert_eq!(decoded.name(), "Person");
//! assert_eq!(decoded, Value::Section(person));
//! assert!(decode(&mut reader, false).unwrap().is_none());
//! ```

use crate::{Error, FormatOptions, LineReader, Result, Section, Separator, Sequence, Text, Value};
use lazy_static::lazy_static;
use regex::Regex;
use std::io::{BufRead, Write};

lazy_static! {
    static ref SECTION_HEADER: Regex = Regex::new(r"^\[([A-Za-z0-9_.-]+)\]$").unwrap();
    static ref TEXT_HEADER: Regex = Regex::new(r"^([A-Za-z0-9_.-]+)([:=]) (.*)$").unwrap();
    static ref SEQUENCE_HEADER: Regex = Regex::new(r"^([A-Za-z0-9_.-]+)\[\]([:=]) (.*)$").unwrap();
    static ref CONTINUATION: Regex = Regex::new(r"^ (\.|.+)$").unwrap();
    static ref KEY: Regex = Regex::new(r"^[A-Za-z0-9_.-]+$").unwrap();
}

const ITEM_SEPARATOR: &str = ", ";

/// A registered encoder/decoder for one [`Value`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Codec {
    Section,
    Text,
    Sequence,
}

/// A header line recognised by one of the codecs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    /// Key of a text or sequence entry, qualified name of a section.
    pub name: String,
    /// `None` for section headers.
    pub separator: Option<Separator>,
    /// Payload following the separator (empty for section headers).
    pub rest: String,
}

impl Codec {
    /// All codecs, highest priority first.
    pub const ALL: [Codec; 3] = [Codec::Section, Codec::Text, Codec::Sequence];

    #[must_use]
    pub const fn priority(&self) -> u32 {
        match self {
            Codec::Section => 100,
            Codec::Text => 10,
            Codec::Sequence => 1,
        }
    }

    /// Returns `true` if this codec writes values of `value`'s variant.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Codec::Section, Value::Section(_))
                | (Codec::Text, Value::Text(_))
                | (Codec::Sequence, Value::Sequence(_))
        )
    }

    /// Matches `line` against this codec's header pattern.
    ///
    /// ```rust
    /// use serde_tesql::{Codec, Separator};
    ///
    /// let header = Codec::Text.match_header("firstname= Homer").unwrap();
    /// assert_eq!(header.name, "firstname");
    /// assert_eq!(header.separator, Some(Separator::Equals));
    /// assert_eq!(header.rest, "Homer");
    ///
    /// assert!(Codec::Section.match_header("[Person.address]").is_some());
    /// assert!(Codec::Text.match_header("tags[]: a, b").is_none());
    /// assert!(Codec::Sequence.match_header("tags[]: a, b").is_some());
    /// ```
    #[must_use]
    pub fn match_header(&self, line: &str) -> Option<Header> {
        let pattern: &Regex = match self {
            Codec::Section => &SECTION_HEADER,
            Codec::Text => &TEXT_HEADER,
            Codec::Sequence => &SEQUENCE_HEADER,
        };
        let caps = pattern.captures(line)?;
        let separator = caps
            .get(2)
            .and_then(|m| m.as_str().chars().next())
            .and_then(Separator::from_char);
        Some(Header {
            name: caps[1].to_string(),
            separator,
            rest: caps.get(3).map_or_else(String::new, |m| m.as_str().to_string()),
        })
    }

    /// Picks the highest-priority codec that writes `value`.
    #[must_use]
    pub fn for_value(value: &Value) -> Option<Codec> {
        Codec::ALL.into_iter().find(|codec| codec.matches(value))
    }

    fn write<W: Write>(&self, value: &Value, writer: &mut W, prefix: &str, separator: Separator) -> Result<()> {
        match (self, value) {
            (Codec::Section, Value::Section(section)) => write_section(section, writer, prefix, separator),
            (Codec::Text, Value::Text(text)) => write_text(text, writer, separator),
            (Codec::Sequence, Value::Sequence(seq)) => write_sequence(seq, writer, separator),
            _ => Err(Error::encode(format!("{:?} codec cannot write a {}", self, value.kind()))),
        }
    }

    /// Reads the body of an entry whose header line has already been consumed.
    fn read<R: BufRead>(&self, reader: &mut LineReader<R>, header: Header, parent: &str) -> Result<Value> {
        match self {
            Codec::Section => {
                let leaf = leaf_name(parent, &header.name);
                read_section(reader, &header.name, leaf).map(Value::Section)
            }
            Codec::Text => read_text(reader, header).map(Value::Text),
            Codec::Sequence => Ok(Value::Sequence(read_sequence(header))),
        }
    }
}

/// Writes the text representation of `value`, qualifying section headers with `prefix`.
///
/// # Errors
///
/// Returns [`Error::Encode`] for names or payloads the format cannot carry,
/// and [`Error::Io`] if the writer fails.
pub fn encode<W: Write>(value: &Value, writer: &mut W, prefix: &str) -> Result<()> {
    encode_with_options(value, writer, &FormatOptions::new().with_prefix(prefix))
}

/// Like [`encode`], with an explicit separator and prefix.
pub fn encode_with_options<W: Write>(value: &Value, writer: &mut W, options: &FormatOptions) -> Result<()> {
    write_value(value, writer, &options.prefix, options.separator)
}

fn write_value<W: Write>(value: &Value, writer: &mut W, prefix: &str, separator: Separator) -> Result<()> {
    let codec = Codec::for_value(value)
        .ok_or_else(|| Error::encode(format!("no codec for '{}'", value.name())))?;
    tracing::trace!(name = value.name(), ?codec, "encode");
    codec.write(value, writer, prefix, separator)
}

fn write_section<W: Write>(section: &Section, writer: &mut W, prefix: &str, separator: Separator) -> Result<()> {
    let child_prefix = if section.name().is_empty() {
        prefix.to_string()
    } else {
        check_section_name(section.name())?;
        let qualified = format!("{}{}", prefix, section.name());
        tracing::debug!(section = %qualified, entries = section.len(), "write section");
        write!(writer, "\n[{}]\n", qualified)?;
        qualified + "."
    };
    writer.write_all(b"\n")?;

    for value in section.values() {
        write_value(value, writer, &child_prefix, separator)?;
    }
    Ok(())
}

fn write_text<W: Write>(text: &Text, writer: &mut W, separator: Separator) -> Result<()> {
    check_name(text.name())?;
    // A trailing '\r' would be taken for a CRLF line ending on read
    if text.as_str().split('\n').any(|line| line.ends_with('\r')) {
        return Err(Error::encode(format!(
            "text of '{}' has a line ending in a carriage return",
            text.name()
        )));
    }
    let mut lines = text.as_str().split('\n');
    let first = lines.next().unwrap_or_default();
    writeln!(writer, "{}{} {}", text.name(), separator.as_char(), first)?;
    for line in lines {
        let line = if line.is_empty() { "." } else { line };
        writeln!(writer, " {}", line)?;
    }
    Ok(())
}

fn write_sequence<W: Write>(seq: &Sequence, writer: &mut W, separator: Separator) -> Result<()> {
    check_name(seq.name())?;
    for item in seq.iter() {
        if item.is_empty() || item.contains(ITEM_SEPARATOR) || item.contains(['\n', '\r']) {
            return Err(Error::encode(format!(
                "item {:?} of '{}' cannot be written in a sequence",
                item,
                seq.name()
            )));
        }
    }
    writeln!(
        writer,
        "{}[]{} {}",
        seq.name(),
        separator.as_char(),
        seq.items().join(ITEM_SEPARATOR)
    )?;
    Ok(())
}

fn check_name(name: &str) -> Result<()> {
    if KEY.is_match(name) {
        Ok(())
    } else {
        Err(Error::encode(format!("'{}' is not a valid key", name)))
    }
}

/// Section names are keys without dots, which separate levels in headers.
fn check_section_name(name: &str) -> Result<()> {
    if KEY.is_match(name) && !name.contains('.') {
        Ok(())
    } else {
        Err(Error::encode(format!("'{}' is not a valid section name", name)))
    }
}

/// Decodes the next top-level entry, or returns `None` at end of stream.
///
/// With `as_section`, whatever follows is read as a section even without a
/// header: leading text entries then belong to an unnamed root section, and
/// an empty stream yields an empty unnamed section instead of `None`.
///
/// # Errors
///
/// Returns [`Error::Decode`] with the offending line when no codec matches.
/// The line is pushed back first, so the reader is left positioned on it.
pub fn decode<R: BufRead>(reader: &mut LineReader<R>, as_section: bool) -> Result<Option<Value>> {
    let Some(line) = next_content_line(reader)? else {
        return Ok(as_section.then(|| Value::Section(Section::new(""))));
    };

    if let Some(header) = Codec::Section.match_header(&line) {
        return Codec::Section.read(reader, header, "").map(Some);
    }

    reader.unread(line);
    if as_section {
        read_section(reader, "", "").map(|s| Some(Value::Section(s)))
    } else {
        read_entry(reader).map(Some)
    }
}

/// Iterator over the top-level entries of a stream.
///
/// Stops after the first error.
pub struct Documents<R> {
    reader: LineReader<R>,
    done: bool,
}

impl<R: BufRead> Documents<R> {
    pub fn new(reader: LineReader<R>) -> Self {
        Documents { reader, done: false }
    }
}

impl<R: BufRead> Iterator for Documents<R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match decode(&mut self.reader, false) {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn next_content_line<R: BufRead>(reader: &mut LineReader<R>) -> Result<Option<String>> {
    while let Some(line) = reader.next_line()? {
        if !line.trim().is_empty() {
            return Ok(Some(line));
        }
    }
    Ok(None)
}

/// Reads a section body up to end of stream or the first header that is not
/// one of its descendants.
fn read_section<R: BufRead>(reader: &mut LineReader<R>, qualified: &str, leaf: &str) -> Result<Section> {
    tracing::debug!(section = qualified, "begin section");
    let mut section = Section::new(leaf);

    while let Some(line) = next_content_line(reader)? {
        let Some(header) = Codec::Section.match_header(&line) else {
            reader.unread(line);
            let entry = read_entry(reader)?;
            let name = entry.name().to_string();
            section.append(&name, entry, true)?;
            continue;
        };

        match child_of(qualified, &header.name) {
            Some(child) if child.contains('.') => {
                let err = Error::decode(reader.line_number(), &line);
                reader.unread(line);
                return Err(err);
            }
            Some(child) => {
                let child = child.to_string();
                let value = Codec::Section.read(reader, header, qualified)?;
                section.append(&child, value, true)?;
            }
            None => {
                reader.unread(line);
                break;
            }
        }
    }

    tracing::debug!(section = qualified, entries = section.len(), "end section");
    Ok(section)
}

/// Reads one text or sequence entry.
fn read_entry<R: BufRead>(reader: &mut LineReader<R>) -> Result<Value> {
    let Some(line) = reader.next_line()? else {
        return Err(Error::decode(reader.line_number(), ""));
    };

    for codec in [Codec::Text, Codec::Sequence] {
        if let Some(header) = codec.match_header(&line) {
            tracing::trace!(?codec, name = %header.name, "matched");
            return codec.read(reader, header, "");
        }
    }

    let number = reader.line_number();
    let err = Error::decode(number, &line);
    reader.unread(line);
    Err(err)
}

fn read_text<R: BufRead>(reader: &mut LineReader<R>, header: Header) -> Result<Text> {
    let mut text = header.rest;
    while let Some(line) = reader.next_line()? {
        match CONTINUATION.captures(&line) {
            Some(caps) => {
                text.push('\n');
                if &caps[1] != "." {
                    text.push_str(&caps[1]);
                }
            }
            None => {
                reader.unread(line);
                break;
            }
        }
    }
    Ok(Text::new(&header.name, text))
}

fn read_sequence(header: Header) -> Sequence {
    if header.rest.is_empty() {
        Sequence::new(&header.name, Vec::<String>::new())
    } else {
        Sequence::new(&header.name, header.rest.split(ITEM_SEPARATOR))
    }
}

/// Name of `header` relative to the section `qualified`, if it lies below it.
fn child_of<'a>(qualified: &str, header: &'a str) -> Option<&'a str> {
    if qualified.is_empty() {
        return Some(header);
    }
    header
        .strip_prefix(qualified)
        .and_then(|rest| rest.strip_prefix('.'))
        .filter(|rest| !rest.is_empty())
}

fn leaf_name<'a>(parent: &str, qualified: &'a str) -> &'a str {
    child_of(parent, qualified).unwrap_or(qualified)
}
