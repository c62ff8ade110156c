//! Parsed LTSV records.
//!
//! [`Record`] is an insertion-ordered map from an optional key to an optional
//! value:
//!
//! - a `None` value means the key was present without a value (`key:`)
//! - a `None` key only appears in lenient mode, for a value that had no key
//!   in front of it (`:value`)
//!
//! A repeated key overwrites the earlier value but keeps its original position.
//!
//! ## Examples
//!
//! ```rust
//! use ltsv_stream::parse_str;
//!
//! let record = parse_str("host:127.0.0.1\tstatus:200\treferer:")
//!     .next()
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(record.len(), 3);
//! assert_eq!(record.get("host"), Some("127.0.0.1"));
//! assert_eq!(record.get_entry(Some("referer")), Some(None));
//! assert_eq!(record.get_entry(Some("ua")), None);
//! ```

use indexmap::{Equivalent, IndexMap};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

type Key = Option<String>;
type Value = Option<String>;

/// Borrowed lookup key; hashes exactly like the owned `Option<String>`.
#[derive(Hash)]
struct KeyRef<'a>(Option<&'a str>);

impl Equivalent<Key> for KeyRef<'_> {
    fn equivalent(&self, key: &Key) -> bool {
        self.0 == key.as_deref()
    }
}

/// One line of LTSV input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record(IndexMap<Key, Value>);

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Record(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Record(IndexMap::with_capacity(capacity))
    }

    /// Inserts a pair, returning the previous value if the key was already present.
    pub fn insert(&mut self, key: Option<String>, value: Option<String>) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns the value for `key`, or `None` if the key is absent or has no value.
    ///
    /// Use [`Record::get_entry`] to tell those two cases apart.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_entry(Some(key)).flatten()
    }

    /// Looks up an entry by optional key.
    ///
    /// Returns `None` when the key is absent, `Some(None)` when it is present
    /// without a value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ltsv_stream::record;
    ///
    /// let record = record! { "a" => "1", "b" => null, null => "orphan" };
    /// assert_eq!(record.get_entry(Some("a")), Some(Some("1")));
    /// assert_eq!(record.get_entry(Some("b")), Some(None));
    /// assert_eq!(record.get_entry(None), Some(Some("orphan")));
    /// assert_eq!(record.get_entry(Some("c")), None);
    /// ```
    #[must_use]
    pub fn get_entry(&self, key: Option<&str>) -> Option<Option<&str>> {
        self.0.get(&KeyRef(key)).map(|value| value.as_deref())
    }

    /// Returns `true` if `key` is present, with or without a value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(&KeyRef(Some(key)))
    }

    /// The value that was recorded without a key, if any.
    #[must_use]
    pub fn unlabeled(&self) -> Option<&str> {
        self.get_entry(None).flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the entries in the order their keys first appeared.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, Option<&str>)> + '_ {
        self.0
            .iter()
            .map(|(key, value)| (key.as_deref(), value.as_deref()))
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.0.keys().map(|key| key.as_deref())
    }

    /// Consumes the record, returning the backing map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<Key, Value> {
        self.0
    }
}

/// Serializes as a string-keyed map; the unlabeled value is written under `""`.
impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.unwrap_or(""), &value)?;
        }
        map.end()
    }
}

impl From<Record> for HashMap<Key, Value> {
    fn from(record: Record) -> Self {
        record.0.into_iter().collect()
    }
}

impl IntoIterator for Record {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(Key, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (Key, Value)>>(iter: T) -> Self {
        Record(IndexMap::from_iter(iter))
    }
}
