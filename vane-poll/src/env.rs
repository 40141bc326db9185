//! Flat `KEY=VALUE` environment file parsing
//!
//! The configuration surface is a plain text file with one `KEY=VALUE`
//! pair per line - no escaping, no quoting, no comments. Values are kept
//! as strings; callers coerce as needed.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{PollError, Result};
use crate::fs::FileReader;

/// An immutable string-to-string map built once at startup
///
/// # Example
///
/// ```rust
/// use vane_poll::EnvMap;
///
/// let env = EnvMap::parse("CITY=Paris\nOPENWEATHERAPIKEY=abc123\n");
/// assert_eq!(env.get("CITY"), Some("Paris"));
/// assert_eq!(env.get("MISSING"), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EnvMap {
    entries: HashMap<String, String>,
}

impl EnvMap {
    /// Parse raw file contents into a map
    ///
    /// Each line is split once on the first `=`; values may themselves
    /// contain `=` and are preserved in full. Lines without `=`, with an
    /// empty key, or with an empty value are silently skipped. On
    /// duplicate keys the last occurrence wins.
    pub fn parse(contents: &str) -> Self {
        let mut entries = HashMap::new();
        for line in contents.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key.is_empty() || value.is_empty() {
                continue;
            }
            entries.insert(key.to_string(), value.to_string());
        }
        Self { entries }
    }

    /// Read a file through the given reader and parse it
    ///
    /// A missing or unreadable file surfaces as
    /// [`PollError::SourceUnavailable`] - an explicit failure, never a
    /// silently empty map.
    pub async fn load(reader: &dyn FileReader, path: &Path) -> Result<Self> {
        let contents = reader.read_text(path).await?;
        Ok(Self::parse(&contents))
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Look up a value by key, failing with [`PollError::MissingKey`]
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| PollError::MissingKey(key.to_string()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
