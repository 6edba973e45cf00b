use core::fmt::Display;

use serde::{Deserialize, Serialize};
use thisisplural::Plural;

/// Address of a schema node, as the property names walked from the root.
///
/// Array `items` hops are implicit: a path never names them. The segment
/// sequence is the canonical form; the dot-joined string produced by
/// `Display` is for display and for callers that only ever deal with keys
/// free of `.` (see [`SchemaPath::from_dotted`]).
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Plural, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SchemaPath(pub Vec<String>);

impl SchemaPath {
    /// Create an empty path representing the schema root
    pub fn root() -> Self {
        SchemaPath(Vec::new())
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse the dot-joined form. The empty string is the root.
    ///
    /// Dots are never escaped, so a key containing `.` cannot round-trip
    /// through this function. Build such paths from segments instead.
    pub fn from_dotted(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        SchemaPath(path.split('.').map(str::to_string).collect())
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SchemaPath(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// The last segment, i.e. the property key this path addresses.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Everything but the last segment. The root has no parent.
    pub fn parent(&self) -> Option<SchemaPath> {
        let (_, init) = self.0.split_last()?;
        Some(SchemaPath(init.to_vec()))
    }

    pub fn child(&self, key: impl Into<String>) -> SchemaPath {
        let mut segments = self.0.clone();
        segments.push(key.into());
        SchemaPath(segments)
    }

    /// True when `self` is `other` or one of its ancestors.
    pub fn is_prefix_of(&self, other: &SchemaPath) -> bool {
        other.0.starts_with(&self.0)
    }

    /// True when `self` is `ancestor` or one of its descendants.
    pub fn starts_with(&self, ancestor: &SchemaPath) -> bool {
        ancestor.is_prefix_of(self)
    }

    /// The part of `self` below `ancestor`, if `ancestor` is a prefix.
    pub fn strip_prefix(&self, ancestor: &SchemaPath) -> Option<SchemaPath> {
        self.0
            .strip_prefix(ancestor.0.as_slice())
            .map(|rest| SchemaPath(rest.to_vec()))
    }
}

impl Display for SchemaPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl AsRef<SchemaPath> for SchemaPath {
    fn as_ref(&self) -> &SchemaPath {
        self
    }
}

impl From<&str> for SchemaPath {
    fn from(path: &str) -> Self {
        SchemaPath::from_dotted(path)
    }
}
