//! Ordered sections with a selection cursor.
//!
//! This module provides [`Section`], the nesting unit of a document. A section
//! keeps its entries in an explicit, mutable order backed by an [`IndexMap`]
//! (O(1) key lookup, positional insertion with suffix reindexing), plus a
//! cursor holding the most recently selected or inserted key.
//!
//! ## Ordering
//!
//! Entries are kept in two contiguous runs: flat entries (text and sequences)
//! first, nested sections after. Insertions that would break the runs are
//! redirected:
//!
//! - a section added while a flat entry is selected goes to the start of the
//!   nested run;
//! - a flat entry added while a section is selected goes to the front of the
//!   flat run.
//!
//! Otherwise [`Section::append`] inserts right after the cursor and
//! [`Section::prepend`] right before it.
//!
//! ```rust
//! use serde_tesql::{Raw, Section};
//!
//! let mut person = Section::new("Person");
//! person.append("pk", "1", true).unwrap();
//! person.append("address", Raw::map(), true).unwrap();
//! person.append("surname", "Simpson", true).unwrap();
//!
//! let keys: Vec<_> = person.keys().collect();
//! assert_eq!(keys, ["surname", "pk", "address"]);
//! ```
//!
//! Sections are not internally synchronised; mutators take `&mut self`, so
//! sharing one between threads needs a lock per document (e.g. `Mutex<Section>`).

use crate::{make_value, Error, Raw, Result, Value};
use indexmap::IndexMap;
use std::ops::Index;

/// An ordered, named collection of entries.
///
/// # Examples
///
/// ```rust
/// use serde_tesql::Section;
///
/// let mut section = Section::new("Section");
/// section.append("Key1", "Value1", true).unwrap();
/// section.append("Key2", "Value2", true).unwrap();
///
/// assert_eq!(section.len(), 2);
/// assert_eq!(section["Key1"], "Value1");
/// assert_eq!(section.selected(), Some("Key2"));
/// assert!(section.append("Key1", "again", true).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Section {
    name: String,
    entries: IndexMap<String, Value>,
    cursor: Option<usize>,
}

impl Section {
    /// Creates an empty section. The root of a document uses an empty name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Section {
            name: name.to_string(),
            entries: IndexMap::new(),
            cursor: None,
        }
    }

    /// Creates a section from key/value pairs, appending each in turn.
    ///
    /// # Errors
    ///
    /// Fails on duplicate or malformed keys and on values no variant accepts.
    pub fn with_entries<I, K, V>(name: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Raw>,
    {
        let mut section = Section::new(name);
        for (key, value) in entries {
            section.append(key.as_ref(), value, true)?;
        }
        Ok(section)
    }

    /// Checks that `raw` exposes key/value pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Type`] for anything but a map or an existing section.
    pub fn validate(raw: &Raw) -> Result<()> {
        match raw {
            Raw::Map(_) | Raw::Value(Value::Section(_)) => Ok(()),
            other => Err(Error::type_error(format!(
                "value must be a mapping, found {}",
                other.kind()
            ))),
        }
    }

    /// Builds a section, failing with [`Error::Type`] if `raw` is not a mapping.
    pub fn from_raw(name: &str, raw: Raw) -> Result<Self> {
        match raw {
            Raw::Map(map) => Section::with_entries(name, map),
            Raw::Value(Value::Section(mut section)) => {
                section.set_name(name);
                Ok(section)
            }
            other => Err(Error::type_error(format!(
                "value must be a mapping, found {}",
                other.kind()
            ))),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Returns the currently selected key, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.cursor
            .and_then(|pos| self.entries.get_index(pos))
            .map(|(key, _)| key.as_str())
    }

    /// Moves the cursor to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingKey`] if `key` is absent.
    pub fn select(&mut self, key: &str) -> Result<()> {
        let pos = self
            .entries
            .get_index_of(key)
            .ok_or_else(|| Error::missing_key(key))?;
        self.cursor = Some(pos);
        Ok(())
    }

    /// Inserts a new entry after the cursor, keeping flat entries ahead of sections.
    ///
    /// The cursor moves to `key` unless `select_new` is `false` and something
    /// is already selected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if `key` exists, [`Error::InvalidKey`] if
    /// it cannot be written, or [`Error::Type`] if no variant accepts `raw`.
    /// The section is left untouched on failure.
    pub fn append(&mut self, key: &str, raw: impl Into<Raw>, select_new: bool) -> Result<()> {
        let value = self.build_entry(key, raw.into())?;
        let position = match self.kind_conflict(&value) {
            Some(true) => self.nested_start(),
            Some(false) => 0,
            None => self.cursor.map_or(self.entries.len(), |pos| pos + 1),
        };
        self.insert_at(position, key, value, select_new);
        Ok(())
    }

    /// Inserts a new entry before the cursor, keeping flat entries ahead of sections.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tesql::Section;
    ///
    /// let mut section = Section::new("Empty");
    /// section.prepend("Key4", "Value4", false).unwrap();
    /// section.prepend("Key1", "Value1", false).unwrap();
    /// section.prepend("Key2", "Value2", true).unwrap();
    ///
    /// let keys: Vec<_> = section.keys().collect();
    /// assert_eq!(keys, ["Key1", "Key2", "Key4"]);
    /// assert_eq!(section.selected(), Some("Key2"));
    /// ```
    ///
    /// # Errors
    ///
    /// Same as [`Section::append`].
    pub fn prepend(&mut self, key: &str, raw: impl Into<Raw>, select_new: bool) -> Result<()> {
        let value = self.build_entry(key, raw.into())?;
        let position = match self.kind_conflict(&value) {
            Some(true) => self.nested_start(),
            Some(false) => 0,
            None => self.cursor.unwrap_or(0),
        };
        self.insert_at(position, key, value, select_new);
        Ok(())
    }

    /// Overwrites an existing entry in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingKey`] if `key` is absent.
    pub fn replace(&mut self, key: &str, raw: impl Into<Raw>, select_new: bool) -> Result<()> {
        let pos = self
            .entries
            .get_index_of(key)
            .ok_or_else(|| Error::missing_key(key))?;
        let value = make_value(key, raw.into())?;
        check_key(key, &value)?;

        if let Some((_, slot)) = self.entries.get_index_mut(pos) {
            *slot = value;
        }
        if select_new {
            self.cursor = Some(pos);
        }
        Ok(())
    }

    /// Assigns `key`: replaces an existing entry, or appends after the last one.
    pub fn insert(&mut self, key: &str, raw: impl Into<Raw>) -> Result<()> {
        if self.contains_key(key) {
            return self.replace(key, raw, true);
        }
        self.cursor = self.entries.len().checked_sub(1);
        self.append(key, raw, true)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Returns a nested section by key.
    #[must_use]
    pub fn section(&self, key: &str) -> Option<&Section> {
        self.get(key).and_then(Value::as_section)
    }

    pub fn section_mut(&mut self, key: &str) -> Option<&mut Section> {
        self.get_mut(key).and_then(Value::as_section_mut)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the keys, in section order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Returns an iterator over the values, in section order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.entries.values()
    }

    /// Returns an iterator over the key-value pairs, in section order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// `Some(true)`: a section added at a flat cursor. `Some(false)`: a flat
    /// entry added at a section cursor. `None`: no cursor or same kind.
    fn kind_conflict(&self, value: &Value) -> Option<bool> {
        let selected = self.cursor.and_then(|pos| self.entries.get_index(pos))?.1;
        match (value.is_section(), selected.is_section()) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }

    /// Position right after the last flat entry.
    fn nested_start(&self) -> usize {
        self.entries
            .values()
            .rposition(|v| !v.is_section())
            .map_or(0, |i| i + 1)
    }

    fn build_entry(&self, key: &str, raw: Raw) -> Result<Value> {
        if self.entries.contains_key(key) {
            return Err(Error::duplicate_key(key));
        }
        let value = make_value(key, raw)?;
        check_key(key, &value)?;
        Ok(value)
    }

    fn insert_at(&mut self, position: usize, key: &str, value: Value, select_new: bool) {
        let selkey = match self.selected() {
            Some(current) if !select_new => current.to_string(),
            _ => key.to_string(),
        };
        self.entries.shift_insert(position, key.to_string(), value);
        self.cursor = self.entries.get_index_of(&selkey);
    }
}

/// Section names may not contain dots, which separate levels in headers.
fn check_key(key: &str, value: &Value) -> Result<()> {
    let allow_dot = !value.is_section();
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || (allow_dot && c == '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::invalid_key(key))
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Index<&str> for Section {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        &self.entries[key]
    }
}

impl<'a> IntoIterator for &'a Section {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Section {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
