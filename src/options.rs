//! Parser configuration.
//!
//! This module provides the types that decide how a line is tokenized:
//!
//! - [`ParserOptions`]: the immutable token set and behavioral flags
//! - [`Builder`]: fluent construction of an [`LtsvParser`]
//!
//! The five tokens are expected to be distinct. Overlapping tokens are not
//! rejected; the tokenizer then takes the first match in an order that
//! depends on where it is in the line, which is rarely what the caller wants:
//!
//! - in a key: line ending, entry delimiter, quote, escape, kv delimiter
//! - in a value: line ending, quote (only as the first character), escape,
//!   entry delimiter
//!
//! ## Examples
//!
//! ```rust
//! use ltsv_stream::LtsvParser;
//!
//! let parser = LtsvParser::builder()
//!     .lenient()
//!     .with_entry_delimiter('|')
//!     .with_kv_delimiter('=')
//!     .trim_values()
//!     .build();
//!
//! let record = parser.parse_str("a= 1 |b=2").next().unwrap().unwrap();
//! assert_eq!(record.get("a"), Some("1"));
//! ```

use serde::{Deserialize, Serialize};

use crate::parser::LtsvParser;

/// Token set and flags shared by every record one parser produces.
///
/// Deserializing fills missing fields with the defaults, so a configuration
/// document only needs to name what it overrides.
///
/// # Examples
///
/// ```rust
/// use ltsv_stream::ParserOptions;
///
/// let options = ParserOptions::default();
/// assert_eq!(options.entry_delimiter, '\t');
/// assert_eq!(options.kv_delimiter, ':');
/// assert!(options.strict);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    pub entry_delimiter: char,
    pub kv_delimiter: char,
    pub escape_char: char,
    pub quote_char: char,
    pub line_ending: char,
    pub strict: bool,
    pub skip_null_values: bool,
    pub trim_keys: bool,
    pub trim_values: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            entry_delimiter: '\t',
            kv_delimiter: ':',
            escape_char: '\\',
            quote_char: '"',
            line_ending: '\n',
            strict: true,
            skip_null_values: false,
            trim_keys: false,
            trim_values: false,
        }
    }
}

impl ParserOptions {
    /// Creates the default options (strict, tab / colon / backslash / double quote / LF).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates default options with strict mode turned off.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ltsv_stream::ParserOptions;
    ///
    /// assert!(!ParserOptions::lenient().strict);
    /// ```
    #[must_use]
    pub fn lenient() -> Self {
        ParserOptions {
            strict: false,
            ..Default::default()
        }
    }

    pub(crate) fn trim_key(&self, key: String) -> String {
        if self.trim_keys {
            key.trim().to_string()
        } else {
            key
        }
    }

    pub(crate) fn trim_value(&self, value: String) -> String {
        if self.trim_values {
            value.trim().to_string()
        } else {
            value
        }
    }
}

/// Fluent builder for [`LtsvParser`].
///
/// Created by [`LtsvParser::builder`]. Each call overrides one setting of
/// the defaults; [`Builder::build`] freezes them.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    options: ParserOptions,
}

impl Builder {
    /// Starts from the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects structurally ambiguous input. This is the default.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.options.strict = true;
        self
    }

    /// Recovers from ambiguous input instead of failing, e.g. a key without a value.
    #[must_use]
    pub fn lenient(mut self) -> Self {
        self.options.strict = false;
        self
    }

    #[must_use]
    pub fn with_entry_delimiter(mut self, delimiter: char) -> Self {
        self.options.entry_delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_kv_delimiter(mut self, delimiter: char) -> Self {
        self.options.kv_delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_escape_char(mut self, escape: char) -> Self {
        self.options.escape_char = escape;
        self
    }

    #[must_use]
    pub fn with_quote_char(mut self, quote: char) -> Self {
        self.options.quote_char = quote;
        self
    }

    /// Sets the character that terminates a record.
    #[must_use]
    pub fn with_line_ending(mut self, eol: char) -> Self {
        self.options.line_ending = eol;
        self
    }

    /// Omits keys whose value is empty instead of recording them with `None`.
    #[must_use]
    pub fn skip_null_values(mut self) -> Self {
        self.options.skip_null_values = true;
        self
    }

    /// Strips leading and trailing whitespace from keys.
    #[must_use]
    pub fn trim_keys(mut self) -> Self {
        self.options.trim_keys = true;
        self
    }

    /// Strips leading and trailing whitespace from values.
    #[must_use]
    pub fn trim_values(mut self) -> Self {
        self.options.trim_values = true;
        self
    }

    /// Returns the options configured so far.
    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Finishes the build and returns a parser.
    #[must_use]
    pub fn build(self) -> LtsvParser {
        LtsvParser::with_options(self.options)
    }
}
