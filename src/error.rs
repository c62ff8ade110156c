//! Error types for LTSV parsing.
//!
//! Every error aborts the line being tokenized and carries the 1-based line
//! number and column where it was detected.
//!
//! ## Error Categories
//!
//! - **Format errors**: structurally ambiguous input rejected in strict mode
//!   ([`Error::KeyWithoutValue`], [`Error::EmptyKey`], [`Error::UnexpectedToken`],
//!   [`Error::UnexpectedQuoteInValue`])
//! - **Stream errors**: the underlying source failed to report availability or
//!   to deliver the next character ([`Error::StreamRead`])
//!
//! Lenient parsing never produces format errors; only stream errors remain.
//!
//! ## Examples
//!
//! ```rust
//! use ltsv_stream::{parse_str, Error};
//!
//! let mut records = parse_str(":");
//! match records.next() {
//!     Some(Err(Error::EmptyKey { line, column })) => {
//!         assert_eq!((line, column), (1, 1));
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Represents all possible errors that can occur while parsing LTSV.
#[derive(Debug, Error)]
pub enum Error {
    /// Entry delimiter met while a key has not seen its kv delimiter yet.
    #[error("Key without a value at line {line}, column {column}")]
    KeyWithoutValue { line: usize, column: usize },

    /// Kv delimiter or pair commit reached with an empty key.
    #[error("Empty key detected at line {line}, column {column}")]
    EmptyKey { line: usize, column: usize },

    /// Quote or escape character in key position.
    #[error("Unexpected token '{token}' at line {line}, column {column}")]
    UnexpectedToken {
        line: usize,
        column: usize,
        token: char,
    },

    /// Content follows a closing quote before the next delimiter.
    #[error("Unexpected character '{token}' after closing quote at line {line}, column {column}")]
    UnexpectedQuoteInValue {
        line: usize,
        column: usize,
        token: char,
    },

    /// The character source failed. `column` is the 1-based position of the
    /// character that could not be read.
    #[error("Error reading data source at line {line}, column {column}: {source}")]
    StreamRead {
        line: usize,
        column: usize,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Creates a key-without-value error.
    #[inline]
    pub fn key_without_value(line: usize, column: usize) -> Self {
        Error::KeyWithoutValue { line, column }
    }

    /// Creates an empty-key error.
    #[inline]
    pub fn empty_key(line: usize, column: usize) -> Self {
        Error::EmptyKey { line, column }
    }

    /// Creates an unexpected-token error for a quote or escape character found in a key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ltsv_stream::Error;
    ///
    /// let err = Error::unexpected_token(3, 7, '"');
    /// assert!(err.to_string().contains("line 3"));
    /// assert!(err.to_string().contains("'\"'"));
    /// ```
    #[inline]
    pub fn unexpected_token(line: usize, column: usize, token: char) -> Self {
        Error::UnexpectedToken {
            line,
            column,
            token,
        }
    }

    /// Creates an error for content trailing a closing quote.
    #[inline]
    pub fn unexpected_quote_in_value(line: usize, column: usize, token: char) -> Self {
        Error::UnexpectedQuoteInValue {
            line,
            column,
            token,
        }
    }

    /// Wraps an I/O failure from the character source.
    #[inline]
    pub fn stream_read(line: usize, column: usize, source: io::Error) -> Self {
        Error::StreamRead {
            line,
            column,
            source,
        }
    }

    /// Line number where the error was detected.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Error::KeyWithoutValue { line, .. }
            | Error::EmptyKey { line, .. }
            | Error::UnexpectedToken { line, .. }
            | Error::UnexpectedQuoteInValue { line, .. }
            | Error::StreamRead { line, .. } => *line,
        }
    }

    /// Column (1-based, in characters) where the error was detected.
    #[must_use]
    pub fn column(&self) -> usize {
        match self {
            Error::KeyWithoutValue { column, .. }
            | Error::EmptyKey { column, .. }
            | Error::UnexpectedToken { column, .. }
            | Error::UnexpectedQuoteInValue { column, .. }
            | Error::StreamRead { column, .. } => *column,
        }
    }

    /// The offending character, for errors raised on a specific token.
    #[must_use]
    pub fn token(&self) -> Option<char> {
        match self {
            Error::UnexpectedToken { token, .. } | Error::UnexpectedQuoteInValue { token, .. } => {
                Some(*token)
            }
            _ => None,
        }
    }

    /// Returns `true` for errors caused by malformed input rather than the source.
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        !matches!(self, Error::StreamRead { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
