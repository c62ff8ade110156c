//! The configured parser and the lazy record sequence it produces.
//!
//! [`LtsvParser::parse`] wraps a [`CharSource`] in [`Records`], an iterator
//! that tokenizes exactly one line per call to `next`. Nothing is read ahead,
//! so input of unbounded length is processed with one record in memory.
//!
//! ## Usage
//!
//! ```rust
//! use ltsv_stream::LtsvParser;
//! use std::io::Cursor;
//!
//! let parser = LtsvParser::builder().lenient().build();
//! let input = Cursor::new("time:10\tstatus:200\ntime:11\tstatus:404\n");
//!
//! let statuses: Vec<String> = parser
//!     .parse_reader(input)
//!     .map(|record| record.map(|r| r.get("status").unwrap_or_default().to_string()))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(statuses, vec!["200", "404"]);
//! ```

use std::io::{BufReader, Read};
use std::iter::FusedIterator;

use tracing::debug;

use crate::error::{Error, Result};
use crate::options::{Builder, ParserOptions};
use crate::record::Record;
use crate::source::{CharSource, ReadSource, StrSource};
use crate::tokenizer::tokenize_line;

/// An LTSV parser with a fixed configuration.
///
/// A parser holds no per-parse state and can be reused for any number of
/// inputs, one after another or concurrently from different threads.
///
/// # Examples
///
/// ```rust
/// use ltsv_stream::LtsvParser;
///
/// let parser = LtsvParser::builder().strict().build();
/// let mut records = parser.parse_str("abc:1\tdef:2");
///
/// let record = records.next().unwrap().unwrap();
/// assert_eq!(record.get("abc"), Some("1"));
/// assert_eq!(record.get("def"), Some("2"));
/// assert!(records.next().is_none());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LtsvParser {
    options: ParserOptions,
}

impl LtsvParser {
    /// Creates a parser with the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fluent configuration from the defaults.
    #[must_use]
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Creates a parser from ready-made options, e.g. ones loaded from a config file.
    #[must_use]
    pub fn with_options(options: ParserOptions) -> Self {
        LtsvParser { options }
    }

    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses records lazily from any character source.
    pub fn parse<S: CharSource>(&self, source: S) -> Records<S> {
        Records::new(self.options, source)
    }

    /// Parses an in-memory string.
    pub fn parse_str<'a>(&self, input: &'a str) -> Records<StrSource<'a>> {
        self.parse(StrSource::new(input))
    }

    /// Parses UTF-8 bytes.
    pub fn parse_slice<'a>(&self, input: &'a [u8]) -> Records<ReadSource<&'a [u8]>> {
        self.parse(ReadSource::new(input))
    }

    /// Parses a UTF-8 byte stream through an internal buffer.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Records<ReadSource<BufReader<R>>> {
        self.parse(ReadSource::new(BufReader::new(reader)))
    }
}

/// A forward-only, single-pass sequence of records.
///
/// Each call to [`Iterator::next`] tokenizes one line. After the first error
/// the sequence is finished and yields `None`.
#[derive(Debug)]
pub struct Records<S> {
    options: ParserOptions,
    source: S,
    line: usize,
    finished: bool,
}

impl<S: CharSource> Records<S> {
    fn new(options: ParserOptions, source: S) -> Self {
        Records {
            options,
            source,
            line: 0,
            finished: false,
        }
    }

    /// Reports whether unread input remains.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StreamRead`] if the source cannot tell.
    pub fn has_next(&mut self) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        self.source.has_more().map_err(|e| {
            debug!(line = self.line + 1, error = %e, "availability check failed");
            Error::stream_read(self.line + 1, 1, e)
        })
    }

    /// Number of lines tokenized so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the underlying source, positioned after the last line read.
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: CharSource> Iterator for Records<S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_next() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        }

        self.line += 1;
        let result = tokenize_line(&self.options, &mut self.source, self.line);
        if result.is_err() {
            self.finished = true;
        }
        Some(result)
    }
}

impl<S: CharSource> FusedIterator for Records<S> {}
