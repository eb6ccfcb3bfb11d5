//! Error types for document encoding, decoding and section manipulation.
//!
//! The format favours fast, precise failure over best-effort recovery, so
//! every error here is local and synchronous. Nothing is retried internally.
//!
//! ## Error Categories
//!
//! - **Decode errors**: a line matched no entry pattern where one was required
//! - **Type errors**: an untyped input could not be turned into any value variant
//! - **Key errors**: duplicate keys on insert, missing keys on lookup, malformed keys
//! - **Encode errors**: a value has no text representation (e.g. a list item with a newline)
//! - **I/O errors**: reading from or writing to the underlying stream failed
//!
//! ## Examples
//!
//! ```rust
//! use serde_tesql::{from_str, Error};
//!
//! let result = from_str("this line has no separator\n");
//! match result {
//!     Err(Error::Decode { line, text }) => {
//!         assert_eq!(line, 1);
//!         assert_eq!(text, "this line has no separator");
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// A line matched no known entry pattern. Carries the offending raw line.
    #[error("Decode error at line {line}: unrecognised entry '{text}'")]
    Decode { line: usize, text: String },

    /// No value variant accepts the given input
    #[error("Type error: {0}")]
    Type(String),

    /// `append`/`prepend` called with a key that is already present
    #[error("Duplicate key: '{0}'")]
    DuplicateKey(String),

    /// `select`, `replace` or lookup on an absent key
    #[error("Missing key: '{0}'")]
    MissingKey(String),

    /// Key contains characters the wire format cannot carry
    #[error("Invalid key: '{0}'")]
    InvalidKey(String),

    /// A value that has no text representation
    #[error("Encode error: {0}")]
    Encode(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a decode error for the given 1-based line number and raw line text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tesql::Error;
    ///
    /// let err = Error::decode(3, "garbage");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn decode(line: usize, text: &str) -> Self {
        Error::Decode {
            line,
            text: text.to_string(),
        }
    }

    /// Creates a type error.
    pub fn type_error<T: fmt::Display>(msg: T) -> Self {
        Error::Type(msg.to_string())
    }

    pub fn duplicate_key(key: &str) -> Self {
        Error::DuplicateKey(key.to_string())
    }

    pub fn missing_key(key: &str) -> Self {
        Error::MissingKey(key.to_string())
    }

    pub fn invalid_key(key: &str) -> Self {
        Error::InvalidKey(key.to_string())
    }

    /// Creates an encode error for values that have no text representation.
    pub fn encode<T: fmt::Display>(msg: T) -> Self {
        Error::Encode(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tesql::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for stream reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for errors caused by malformed input text.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
