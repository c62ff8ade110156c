//! Character sources consumed by the tokenizer.
//!
//! The tokenizer pulls one decoded `char` at a time through [`CharSource`],
//! so it never needs more than the current line in memory. Two sources ship
//! with the crate:
//!
//! - [`StrSource`]: an in-memory `&str`
//! - [`ReadSource`]: any [`BufRead`], decoded as UTF-8 incrementally
//!
//! Failures of the underlying reader, including malformed UTF-8, are reported
//! as `io::Error` and wrapped by the parser into [`Error::StreamRead`](crate::Error::StreamRead).

use std::io::{self, BufRead};
use std::str::Chars;

/// A sequential source of decoded characters.
pub trait CharSource {
    /// Reports whether at least one more character can be read.
    fn has_more(&mut self) -> io::Result<bool>;

    /// Reads the next character, or `None` at end of input.
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn has_more(&mut self) -> io::Result<bool> {
        (**self).has_more()
    }

    fn next_char(&mut self) -> io::Result<Option<char>> {
        (**self).next_char()
    }
}

/// Characters of an in-memory string.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(input: &'a str) -> Self {
        StrSource {
            chars: input.chars(),
        }
    }

    /// The part of the input not consumed yet.
    pub fn remaining(&self) -> &'a str {
        self.chars.as_str()
    }
}

impl CharSource for StrSource<'_> {
    fn has_more(&mut self) -> io::Result<bool> {
        Ok(!self.chars.as_str().is_empty())
    }

    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// UTF-8 characters decoded from a buffered byte reader.
///
/// # Examples
///
/// ```rust
/// use ltsv_stream::{CharSource, ReadSource};
///
/// let mut source = ReadSource::new("añ".as_bytes());
/// assert_eq!(source.next_char().unwrap(), Some('a'));
/// assert_eq!(source.next_char().unwrap(), Some('ñ'));
/// assert!(!source.has_more().unwrap());
/// ```
#[derive(Debug)]
pub struct ReadSource<R> {
    reader: R,
}

impl<R: BufRead> ReadSource<R> {
    pub fn new(reader: R) -> Self {
        ReadSource { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Copies up to four bytes from the front of the reader's buffer without consuming them.
fn peek_bytes<R: BufRead>(reader: &mut R, out: &mut [u8; 4]) -> io::Result<usize> {
    loop {
        match reader.fill_buf() {
            Ok(buf) => {
                let n = buf.len().min(out.len());
                out[..n].copy_from_slice(&buf[..n]);
                return Ok(n);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

impl<R: BufRead> CharSource for ReadSource<R> {
    fn has_more(&mut self) -> io::Result<bool> {
        Ok(peek_bytes(&mut self.reader, &mut [0; 4])? > 0)
    }

    fn next_char(&mut self) -> io::Result<Option<char>> {
        // Bytes of a sequence split across buffer refills, already consumed.
        let mut pending = [0u8; 4];
        let mut held = 0;

        loop {
            let mut chunk = [0u8; 4];
            let available = peek_bytes(&mut self.reader, &mut chunk)?;
            if available == 0 {
                return match held {
                    0 => Ok(None),
                    _ => Err(invalid_utf8(format!(
                        "truncated UTF-8 sequence {:02x?} at end of input",
                        &pending[..held]
                    ))),
                };
            }

            let take = available.min(pending.len() - held);
            pending[held..held + take].copy_from_slice(&chunk[..take]);
            let candidate = &pending[..held + take];

            match bstr::decode_utf8(candidate) {
                (Some(ch), len) => {
                    self.reader.consume(len - held);
                    return Ok(Some(ch));
                }
                // Incomplete prefix cut off by the end of the buffer.
                (None, len) if len == candidate.len() && len < pending.len() => {
                    self.reader.consume(take);
                    held += take;
                }
                (None, len) => {
                    return Err(invalid_utf8(format!(
                        "invalid UTF-8 sequence {:02x?}",
                        &candidate[..len.max(1)]
                    )));
                }
            }
        }
    }
}

fn invalid_utf8(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn drain<S: CharSource>(mut source: S) -> io::Result<String> {
        let mut out = String::new();
        while source.has_more()? {
            if let Some(c) = source.next_char()? {
                out.push(c);
            }
        }
        Ok(out)
    }

    #[test]
    fn test_str_source_tracks_remaining() {
        let mut source = StrSource::new("ab");
        assert_eq!(source.next_char().unwrap(), Some('a'));
        assert_eq!(source.remaining(), "b");
        assert_eq!(source.next_char().unwrap(), Some('b'));
        assert!(!source.has_more().unwrap());
        assert_eq!(source.next_char().unwrap(), None);
    }

    #[test]
    fn test_read_source_decodes_multibyte() {
        let text = "абв:где\t€:𝄞";
        assert_eq!(drain(ReadSource::new(text.as_bytes())).unwrap(), text);
    }

    #[test]
    fn test_read_source_small_buffer_splits_sequences() {
        let text = "жзи:€𝄞";
        let reader = io::BufReader::with_capacity(1, text.as_bytes());
        assert_eq!(drain(ReadSource::new(reader)).unwrap(), text);
    }

    #[test]
    fn test_read_source_rejects_invalid_lead_byte() {
        let bytes: &[u8] = &[b'a', 0xFF, b'b'];
        let mut source = ReadSource::new(bytes);
        assert_eq!(source.next_char().unwrap(), Some('a'));
        let err = source.next_char().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_source_rejects_truncated_sequence() {
        let bytes: &[u8] = &[0xE2, 0x82];
        let err = ReadSource::new(bytes).next_char().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_read_source_rejects_bad_continuation() {
        let bytes: &[u8] = &[0xC3, b'a'];
        let err = ReadSource::new(bytes).next_char().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_source_invalid_byte_split_from_next() {
        let bytes: &[u8] = &[0xC3, b'a'];
        let reader = io::BufReader::with_capacity(1, bytes);
        let err = ReadSource::new(reader).next_char().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(!err.to_string().contains("truncated"));
    }

    /// Empty reader that counts how often it is asked for bytes.
    struct CountingReader<'a> {
        reads: &'a Cell<usize>,
    }

    impl io::Read for CountingReader<'_> {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            self.reads.set(self.reads.get() + 1);
            Ok(0)
        }
    }

    #[test]
    fn test_read_source_has_more_reads_once_at_end() {
        let reads = Cell::new(0);
        let reader = io::BufReader::new(CountingReader { reads: &reads });
        let mut source = ReadSource::new(reader);
        assert!(!source.has_more().unwrap());
        assert_eq!(reads.get(), 1);
        assert_eq!(source.next_char().unwrap(), None);
        assert_eq!(reads.get(), 2);
    }

    #[test]
    fn test_read_source_into_inner_returns_unread_bytes() {
        let mut source = ReadSource::new(io::Cursor::new("ab\ncd"));
        assert_eq!(source.next_char().unwrap(), Some('a'));
        let mut cursor = source.into_inner();
        let mut rest = String::new();
        io::Read::read_to_string(&mut cursor, &mut rest).unwrap();
        assert_eq!(rest, "b\ncd");
    }
}
