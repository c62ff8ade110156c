//! # ltsv_stream
//!
//! A streaming parser for LTSV (Labeled Tab-Separated Values).
//!
//! ## What is LTSV?
//!
//! LTSV is a line-oriented text format. Every line is one record made of
//! `key:value` pairs separated by a tab:
//!
//! ```text
//! host:127.0.0.1	ident:-	status:200	size:777	referer:-
//! ```
//!
//! ## Key Features
//!
//! - **Streaming**: Records are produced lazily, one line at a time, from any
//!   byte reader or string; only the current record is held in memory
//! - **Configurable tokens**: Entry delimiter, kv delimiter, escape char, quote
//!   char and line ending can all be replaced
//! - **Quoting and escaping**: Quoted values keep delimiters and line endings
//!   verbatim; the escape char makes the next character literal
//! - **Strict or lenient**: Strict mode rejects ambiguous lines with a
//!   positioned error, lenient mode recovers with fixed rules
//!
//! ## Quick Start
//!
//! ```rust
//! use ltsv_stream::parse_str;
//!
//! let input = "abc:1\tdef:2\nabc:3\tdef:\n";
//!
//! for record in parse_str(input) {
//!     let record = record.unwrap();
//!     assert!(record.contains_key("abc"));
//! }
//! ```
//!
//! ### Custom Configuration
//!
//! ```rust
//! use ltsv_stream::LtsvParser;
//!
//! let parser = LtsvParser::builder()
//!     .lenient()
//!     .with_quote_char('`')
//!     .skip_null_values()
//!     .build();
//!
//! let record = parser
//!     .parse_str("abc:`1 \n\t\t 2`\tdef:3\thij:")
//!     .next()
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(record.get("abc"), Some("1 \n\t\t 2"));
//! assert_eq!(record.get("def"), Some("3"));
//! assert!(!record.contains_key("hij"));
//! ```
//!
//! ## Strict and Lenient Parsing
//!
//! | Input        | Strict                  | Lenient                 |
//! |--------------|-------------------------|-------------------------|
//! | `k1\tk2:v`   | `KeyWithoutValue`       | `{"k1\tk2": "v"}`       |
//! | `:v`         | `EmptyKey`              | `{None: "v"}`           |
//! | `"k":v`      | `UnexpectedToken`       | `{"\"k\"": "v"}`        |
//! | `k:"v"x`     | `UnexpectedQuoteInValue`| `{"k": "vx"}`           |
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - No panics in the public API
//! - Errors carry line and column numbers

pub mod error;
pub mod macros;
pub mod options;
pub mod parser;
pub mod record;
pub mod source;
pub mod tokenizer;

pub use error::{Error, Result};
pub use options::{Builder, ParserOptions};
pub use parser::{LtsvParser, Records};
pub use record::Record;
pub use source::{CharSource, ReadSource, StrSource};
pub use tokenizer::tokenize_line;

use std::io::{BufReader, Read};

/// Parses a string with the default (strict) options.
///
/// # Examples
///
/// ```rust
/// use ltsv_stream::parse_str;
///
/// let records: Vec<_> = parse_str("\n\n\n\n").collect::<Result<_, _>>().unwrap();
/// assert_eq!(records.len(), 4);
/// assert!(records.iter().all(|r| r.is_empty()));
/// ```
pub fn parse_str(input: &str) -> Records<StrSource<'_>> {
    LtsvParser::new().parse_str(input)
}

/// Parses UTF-8 bytes with the default options.
///
/// Malformed UTF-8 is reported as [`Error::StreamRead`].
pub fn parse_slice(input: &[u8]) -> Records<ReadSource<&[u8]>> {
    LtsvParser::new().parse_slice(input)
}

/// Parses a UTF-8 byte stream with the default options.
///
/// # Examples
///
/// ```rust
/// use ltsv_stream::parse_reader;
/// use std::io::Cursor;
///
/// let mut records = parse_reader(Cursor::new(b"a:1\tb:2\n".to_vec()));
/// let record = records.next().unwrap().unwrap();
/// assert_eq!(record.get("b"), Some("2"));
/// assert!(records.next().is_none());
/// ```
pub fn parse_reader<R: Read>(reader: R) -> Records<ReadSource<BufReader<R>>> {
    LtsvParser::new().parse_reader(reader)
}
