//! Hierarchical state paths.
//!
//! A path is the sequence of segment names from the (synthetic, unnamed)
//! top of the tree down to a state. Its full name joins the segments with
//! [`StatePath::SEPARATOR`], so the path `["0", "2", "1"]` is written `0_2_1`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A full state name that cannot be split into path segments.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid state path `{name}`: segments must be non-empty")]
pub struct InvalidPath {
    pub name: String,
}

/// Sequence of segment names from the top of the tree to a state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatePath {
    segments: Vec<String>,
}

impl StatePath {
    /// Separator between segments in a full name.
    pub const SEPARATOR: char = '_';

    /// The empty path naming the top of the tree.
    pub fn root() -> Self {
        Self::default()
    }

    /// Split a full name such as `0_2_1` into its segments.
    ///
    /// The empty string and names with empty segments (`a__b`, `_a`) are
    /// rejected: the top of the tree cannot be registered as a state.
    pub fn parse(name: &str) -> Result<Self, InvalidPath> {
        let segments: Vec<String> = name.split(Self::SEPARATOR).map(str::to_owned).collect();
        if segments.iter().any(String::is_empty) {
            return Err(InvalidPath {
                name: name.to_owned(),
            });
        }
        Ok(Self { segments })
    }

    pub fn from_segments<I, T>(segments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments, which equals the depth of the state below the top.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn parent(&self) -> Option<StatePath> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn child(&self, segment: impl Into<String>) -> StatePath {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// True if `self` is a (non-strict) prefix of `other`.
    pub fn contains(&self, other: &StatePath) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// Longest prefix shared by both paths.
    pub fn common_prefix(&self, other: &StatePath) -> StatePath {
        let segments = self
            .segments
            .iter()
            .zip(&other.segments)
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.clone())
            .collect();
        Self { segments }
    }

    /// Segments joined with the separator; empty for the root.
    pub fn full_name(&self) -> String {
        self.segments.join(&Self::SEPARATOR.to_string())
    }
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("<top>");
        }
        f.write_str(&self.full_name())
    }
}

impl TryFrom<String> for StatePath {
    type Error = InvalidPath;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        if name.is_empty() {
            return Ok(Self::root());
        }
        Self::parse(&name)
    }
}

impl From<StatePath> for String {
    fn from(path: StatePath) -> Self {
        path.full_name()
    }
}
