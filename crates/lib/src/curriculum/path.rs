//! # Path Keys
//!
//! A `PathKey` identifies one node inside a subject's tree by its ancestry:
//! subject key, grade key, then every intermediate key down to the node.
//!
//! Keys are kept as a segment list and only flattened to a string when they
//! need to live in a flat map/set or travel inside the export payload. The
//! serialized form joins segments with `-`; a segment that itself contains `-`
//! (or the `\` escape) is escaped, so decoding is always unambiguous while
//! ordinary keys (`kimya-9-0-0`) look exactly like the source data.

use crate::constants::{PATH_DELIMITER, PATH_ESCAPE};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey(Vec<String>);

impl PathKey {
    /// Builds a key from root-to-node ancestry segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// A key pointing at a grade: `<subject>-<grade>`.
    pub fn grade(subject: &str, grade: &str) -> Self {
        Self(vec![subject.to_string(), grade.to_string()])
    }

    /// Returns a new key one level deeper.
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn subject(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn grade_key(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }

    /// Segments below the grade, i.e. the walk through topics and objectives.
    pub fn below_grade(&self) -> &[String] {
        self.0.get(2..).unwrap_or(&[])
    }

    /// The flat string form used as a map/set key and in the export payload.
    pub fn encode(&self) -> String {
        encode(&self.0)
    }

    /// Parses the flat string form back into segments.
    pub fn decode(raw: &str) -> Self {
        Self(decode(raw))
    }
}

/// Joins ancestry keys into one delimited string, escaping delimiter
/// characters that appear inside a segment.
pub fn encode<S: AsRef<str>>(ancestry: &[S]) -> String {
    let mut out = String::new();
    for (i, segment) in ancestry.iter().enumerate() {
        if i > 0 {
            out.push(PATH_DELIMITER);
        }
        for c in segment.as_ref().chars() {
            if c == PATH_DELIMITER || c == PATH_ESCAPE {
                out.push(PATH_ESCAPE);
            }
            out.push(c);
        }
    }
    out
}

/// Splits a delimited key into its ancestry segments, honouring escapes.
///
/// A trailing lone escape character is kept as a literal.
pub fn decode(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == PATH_ESCAPE {
            match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push(PATH_ESCAPE),
            }
        } else if c == PATH_DELIMITER {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    segments.push(current);
    segments
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for PathKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::decode(s))
    }
}

impl Serialize for PathKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for PathKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::decode(&raw))
    }
}
