//! Configuration options for writing documents.
//!
//! This module provides types to customize the text output:
//!
//! - [`FormatOptions`]: Main configuration struct
//! - [`Separator`]: Choice of key/value separator (`:` or `=`)
//!
//! Both separators are always accepted when reading; the options only affect
//! what the writer emits.
//!
//! ## Examples
//!
//! ```rust
//! use serde_tesql::{to_string_with_options, FormatOptions, Section, Separator, Value};
//!
//! let section = Section::with_entries("", [("pk", "1")]).unwrap();
//! let options = FormatOptions::new().with_separator(Separator::Equals);
//! let text = to_string_with_options(&Value::Section(section), options).unwrap();
//! assert_eq!(text, "\npk= 1\n");
//! ```

/// Separator written between a key and its value.
///
/// # Examples
///
/// ```rust
/// use serde_tesql::Separator;
///
/// assert_eq!(Separator::Colon.as_char(), ':');
/// assert_eq!(Separator::Equals.as_char(), '=');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Colon,
    Equals,
}

impl Separator {
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Separator::Colon => ':',
            Separator::Equals => '=',
        }
    }

    /// Maps a separator character found on disk back to a [`Separator`].
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            ':' => Some(Separator::Colon),
            '=' => Some(Separator::Equals),
            _ => None,
        }
    }
}

/// Configuration options for writing documents.
///
/// # Examples
///
/// ```rust
/// use serde_tesql::{FormatOptions, Separator};
///
/// let options = FormatOptions::new();
/// assert_eq!(options.separator, Separator::Colon);
/// assert_eq!(options.prefix, "");
///
/// let options = FormatOptions::new()
///     .with_separator(Separator::Equals)
///     .with_prefix("Person.");
/// assert_eq!(options.prefix, "Person.");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormatOptions {
    pub separator: Separator,
    /// Qualified-name prefix applied to the headers of the written value.
    pub prefix: String,
}

impl FormatOptions {
    /// Creates default options (`:` separator, empty prefix).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the separator written after keys.
    #[must_use]
    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Sets the header prefix, used when writing a section that lives below others.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}
