//! The per-line LTSV state machine.
//!
//! [`tokenize_line`] consumes characters from a [`CharSource`] until the line
//! ending (or end of input) and returns the finished [`Record`]. All state is
//! owned by a tokenizer value built fresh for every line, so nothing carries
//! over between lines or between parses that share a parser.
//!
//! In the comments below `_` stands for the entry delimiter, `:` for the kv
//! delimiter, `\` for the escape char, `"` for the quote char and `n` for the
//! line ending.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::options::ParserOptions;
use crate::record::Record;
use crate::source::CharSource;

/// Which accumulation buffer a character goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Key,
    Value,
}

impl Field {
    fn mode(self) -> Mode {
        match self {
            Field::Key => Mode::Key,
            Field::Value => Mode::Value,
        }
    }
}

/// Lexical mode of the tokenizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Key,
    Value,
    /// Inside quotes; only lenient mode ever quotes a key.
    Quoted(Field),
    /// The next character is taken literally, then the tokenizer resumes in
    /// `field` (inside quotes when `quoted`).
    Escaped { field: Field, quoted: bool },
    /// Seen `_` after a value; the pair is committed once the next token shows
    /// what follows.
    EntryDelimiter,
    /// Strict only: a value's closing quote was just consumed.
    QuoteClosed,
    Eol,
}

/// Tokenizes one line from `source` into a record.
///
/// `line` is the 1-based line number used in errors. Consumes the line ending
/// but nothing after it.
///
/// # Errors
///
/// Returns a format error in strict mode for ambiguous input, or
/// [`Error::StreamRead`] if the source fails.
pub fn tokenize_line<S: CharSource>(
    options: &ParserOptions,
    source: &mut S,
    line: usize,
) -> Result<Record> {
    LineTokenizer::new(options, line).run(source)
}

/// State for a single line. Build a new one per line.
pub(crate) struct LineTokenizer<'a> {
    options: &'a ParserOptions,
    mode: Mode,
    key: String,
    value: String,
    record: Record,
    line: usize,
    column: usize,
}

impl<'a> LineTokenizer<'a> {
    pub fn new(options: &'a ParserOptions, line: usize) -> Self {
        LineTokenizer {
            options,
            mode: Mode::Key,
            key: String::new(),
            value: String::new(),
            record: Record::new(),
            line,
            column: 0,
        }
    }

    /// Drives the state machine to the end of the line and returns the record.
    pub fn run<S: CharSource>(mut self, source: &mut S) -> Result<Record> {
        while self.mode != Mode::Eol {
            let c = match source.next_char() {
                Ok(Some(c)) => c,
                Ok(None) => break,
                Err(e) => {
                    let column = self.column + 1;
                    debug!(line = self.line, column, error = %e, "character source failed");
                    return Err(Error::stream_read(self.line, column, e));
                }
            };
            self.column += 1;
            self.step(c)?;
        }

        // end of input is an implicit line ending
        self.commit()?;
        debug!(line = self.line, entries = self.record.len(), "record finished");
        Ok(self.record)
    }

    fn step(&mut self, c: char) -> Result<()> {
        match self.mode {
            Mode::Key => self.on_key(c),
            Mode::Value => self.on_value(c),
            Mode::Quoted(field) => self.on_quoted(field, c),
            Mode::Escaped { field, quoted } => {
                self.buffer(field).push(c);
                self.mode = if quoted { Mode::Quoted(field) } else { field.mode() };
                Ok(())
            }
            Mode::EntryDelimiter => self.on_entry_delimiter(c),
            Mode::QuoteClosed => self.on_quote_closed(c),
            Mode::Eol => Ok(()),
        }
    }

    fn on_key(&mut self, c: char) -> Result<()> {
        let opts = self.options;

        // kkk:vvvn
        //        ^
        if c == opts.line_ending {
            self.mode = Mode::Eol;
        }
        // kkk_kkk:vvv
        //    ^
        else if c == opts.entry_delimiter {
            if opts.strict {
                return Err(Error::key_without_value(self.line, self.column));
            }
            self.recovered("entry delimiter kept in key");
            self.key.push(c);
        }
        // k"kk:vvv
        //  ^
        else if c == opts.quote_char {
            if opts.strict {
                return Err(Error::unexpected_token(self.line, self.column, c));
            }
            self.recovered("quote kept in key");
            self.key.push(c);
        }
        // k\kk:vvv
        //  ^
        else if c == opts.escape_char {
            if opts.strict {
                return Err(Error::unexpected_token(self.line, self.column, c));
            }
            self.recovered("escape in key");
            self.mode = Mode::Escaped {
                field: Field::Key,
                quoted: false,
            };
        }
        // kkk:vvv
        //    ^
        else if c == opts.kv_delimiter {
            if self.key.is_empty() {
                if opts.strict {
                    return Err(Error::empty_key(self.line, self.column));
                }
                self.recovered("value without key");
            }
            self.mode = Mode::Value;
        } else {
            self.key.push(c);
        }
        Ok(())
    }

    fn on_value(&mut self, c: char) -> Result<()> {
        let opts = self.options;

        if c == opts.line_ending {
            self.mode = Mode::Eol;
        }
        // kkk:"vvv"
        //     ^
        else if c == opts.quote_char && self.value.is_empty() {
            self.mode = Mode::Quoted(Field::Value);
        }
        // kkk:v\vv
        //      ^
        else if c == opts.escape_char {
            self.mode = Mode::Escaped {
                field: Field::Value,
                quoted: false,
            };
        }
        // kkk:vvv_kkk:vvv
        //        ^
        else if c == opts.entry_delimiter {
            self.mode = Mode::EntryDelimiter;
        } else {
            self.value.push(c);
        }
        Ok(())
    }

    fn on_quoted(&mut self, field: Field, c: char) -> Result<()> {
        let opts = self.options;

        if c == opts.escape_char {
            self.mode = Mode::Escaped {
                field,
                quoted: true,
            };
        }
        // kkk:"vvv"
        //         ^
        else if c == opts.quote_char {
            self.mode = match field {
                Field::Value if opts.strict => Mode::QuoteClosed,
                _ => field.mode(),
            };
        } else {
            self.buffer(field).push(c);
        }
        Ok(())
    }

    fn on_entry_delimiter(&mut self, c: char) -> Result<()> {
        let opts = self.options;

        // kkk:vvv_n
        //         ^
        if c == opts.line_ending {
            self.mode = Mode::Eol;
        }
        // kkk:vvv__kkk:vvv
        //         ^
        else if c == opts.entry_delimiter {
        }
        // kkk:vvv_\kkk:vvv
        //         ^
        else if c == opts.escape_char {
            if opts.strict {
                return Err(Error::unexpected_token(self.line, self.column, c));
            }
            self.recovered("escape at start of key");
            self.commit()?;
            self.mode = Mode::Escaped {
                field: Field::Key,
                quoted: false,
            };
        }
        // kkk:vvv_"kkk":vvv
        //         ^
        else if c == opts.quote_char {
            if opts.strict {
                return Err(Error::unexpected_token(self.line, self.column, c));
            }
            self.recovered("quoted key");
            self.commit()?;
            self.mode = Mode::Quoted(Field::Key);
        }
        // kkk:vvv_:vvv
        //         ^
        else if c == opts.kv_delimiter {
            self.commit()?;
            self.mode = Mode::Value;
        }
        // kkk:vvv_kkk:vvv
        //         ^
        else {
            self.commit()?;
            self.key.push(c);
            self.mode = Mode::Key;
        }
        Ok(())
    }

    fn on_quote_closed(&mut self, c: char) -> Result<()> {
        let opts = self.options;

        if c == opts.line_ending {
            self.mode = Mode::Eol;
        } else if c == opts.entry_delimiter {
            self.mode = Mode::EntryDelimiter;
        } else {
            return Err(Error::unexpected_quote_in_value(self.line, self.column, c));
        }
        Ok(())
    }

    fn buffer(&mut self, field: Field) -> &mut String {
        match field {
            Field::Key => &mut self.key,
            Field::Value => &mut self.value,
        }
    }

    fn recovered(&self, rule: &'static str) {
        trace!(line = self.line, column = self.column, rule, "lenient recovery");
    }

    /// Moves the pending pair into the record and clears both buffers.
    fn commit(&mut self) -> Result<()> {
        let opts = self.options;
        let key = std::mem::take(&mut self.key);
        let value = std::mem::take(&mut self.value);

        match (key.is_empty(), value.is_empty()) {
            (true, true) => {}
            (false, true) => {
                if !opts.skip_null_values {
                    self.record.insert(Some(opts.trim_key(key)), None);
                }
            }
            (false, false) => {
                self.record
                    .insert(Some(opts.trim_key(key)), Some(opts.trim_value(value)));
            }
            (true, false) => {
                if opts.strict {
                    return Err(Error::empty_key(self.line, self.column));
                }
                self.record.insert(None, Some(opts.trim_value(value)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StrSource;

    fn tokenize(options: &ParserOptions, input: &str) -> Result<Record> {
        tokenize_line(options, &mut StrSource::new(input), 1)
    }

    fn strict() -> ParserOptions {
        ParserOptions::default()
    }

    fn lenient() -> ParserOptions {
        ParserOptions::lenient()
    }

    #[test]
    fn test_stops_after_line_ending() {
        let mut source = StrSource::new("a:1\nb:2");
        let record = tokenize_line(&strict(), &mut source, 1).unwrap();
        assert_eq!(record, crate::record! { "a" => "1" });
        assert_eq!(source.remaining(), "b:2");
    }

    #[test]
    fn test_empty_line_is_empty_record() {
        assert!(tokenize(&strict(), "\n").unwrap().is_empty());
        assert!(tokenize(&lenient(), "").unwrap().is_empty());
    }

    #[test]
    fn test_repeated_entry_delimiters_collapse() {
        let record = tokenize(&strict(), "abc:1\t\t\tdef:2\t").unwrap();
        assert_eq!(record, crate::record! { "abc" => "1", "def" => "2" });
    }

    #[test]
    fn test_escape_in_value_and_quotes() {
        let options = ParserOptions {
            quote_char: '`',
            kv_delimiter: '=',
            escape_char: '#',
            ..strict()
        };
        let record = tokenize(&options, "abc=`1 \n\t\t 2#` 3`\tdef=4#\t5").unwrap();
        assert_eq!(record.get("abc"), Some("1 \n\t\t 2` 3"));
        assert_eq!(record.get("def"), Some("4\t5"));
    }

    #[test]
    fn test_strict_error_positions() {
        let err = tokenize(&strict(), "ab\tc:1").unwrap_err();
        assert!(matches!(err, Error::KeyWithoutValue { line: 1, column: 3 }));

        let err = tokenize(&strict(), "a\"b:1").unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedToken {
                column: 2,
                token: '"',
                ..
            }
        ));

        let err = tokenize(&strict(), "a:\"x\"y").unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedQuoteInValue {
                column: 6,
                token: 'y',
                ..
            }
        ));
    }

    #[test]
    fn test_strict_empty_key_detected_on_commit() {
        let err = tokenize(&strict(), "abc:1\t:2").unwrap_err();
        assert!(matches!(err, Error::EmptyKey { column: 8, .. }));
    }

    #[test]
    fn test_strict_rejects_token_after_delimiter() {
        let err = tokenize(&strict(), "a:1\t\"b\":2").unwrap_err();
        assert_eq!(err.token(), Some('"'));
        let err = tokenize(&strict(), "a:1\t\\b:2").unwrap_err();
        assert_eq!(err.token(), Some('\\'));
    }

    #[test]
    fn test_lenient_quoted_key_after_delimiter() {
        let options = ParserOptions {
            quote_char: '`',
            ..lenient()
        };
        let record = tokenize(&options, "abc:1\t`h\tj`:2").unwrap();
        assert_eq!(record, crate::record! { "abc" => "1", "h\tj" => "2" });
    }

    #[test]
    fn test_lenient_escape_after_delimiter_starts_key() {
        let record = tokenize(&lenient(), "abc:1\t\\:x:2").unwrap();
        assert_eq!(record, crate::record! { "abc" => "1", ":x" => "2" });
    }

    #[test]
    fn test_lenient_text_after_closing_quote_extends_value() {
        let record = tokenize(&lenient(), "a:\"x\"y\"z").unwrap();
        assert_eq!(record.get("a"), Some("xy\"z"));
    }

    #[test]
    fn test_unterminated_quote_commits_value() {
        let record = tokenize(&strict(), "a:\"x\ty").unwrap();
        assert_eq!(record.get("a"), Some("x\ty"));
    }

    #[test]
    fn test_skip_null_values_in_middle_of_line() {
        let options = ParserOptions {
            skip_null_values: true,
            ..strict()
        };
        let record = tokenize(&options, "a:\tb:2").unwrap();
        assert_eq!(record, crate::record! { "b" => "2" });
    }

    #[test]
    fn test_trim_happens_after_emptiness_check() {
        let options = ParserOptions {
            trim_values: true,
            ..strict()
        };
        let record = tokenize(&options, "a:   ").unwrap();
        assert_eq!(record.get_entry(Some("a")), Some(Some("")));
    }

    #[test]
    fn test_custom_line_ending() {
        let options = ParserOptions {
            line_ending: ';',
            ..strict()
        };
        let mut source = StrSource::new("a:1\n2;b:3");
        let record = tokenize_line(&options, &mut source, 1).unwrap();
        assert_eq!(record.get("a"), Some("1\n2"));
        assert_eq!(source.remaining(), "b:3");
    }

    #[test]
    fn test_escape_at_end_of_value_commits_pair() {
        let record = tokenize(&strict(), "a:1\\").unwrap();
        assert_eq!(record, crate::record! { "a" => "1" });
    }

    #[test]
    fn test_escape_at_end_of_key_commits_key() {
        let record = tokenize(&lenient(), "a:1\tb\\").unwrap();
        assert_eq!(record, crate::record! { "a" => "1", "b" => null });
    }
}
