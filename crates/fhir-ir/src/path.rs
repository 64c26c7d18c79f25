//! Data paths into JSON values

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One step of a data path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Named field of a record
    Key(String),
    /// Position in a sequence
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Sequence of field names and indices from a root value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Create an empty (root) path
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment
    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.segments.push(segment.into());
    }

    /// Remove the last segment
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Return a new path with one more segment
    #[must_use]
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    /// Segments from the root
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// True for the root path
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Same as [`Path::is_root`]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Parses `a/b/0/c` and `a/b[0]/c`. Purely numeric segments become indices;
/// empty segments are skipped.
impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut path = Path::new();

        for segment in s.split('/') {
            if segment.is_empty() {
                continue;
            }

            if let Some(open_bracket) = segment.find('[') {
                let name = &segment[..open_bracket];
                let close_bracket = segment
                    .find(']')
                    .ok_or_else(|| Error::invalid_path(s, format!("unclosed bracket in '{segment}'")))?;
                if close_bracket < open_bracket || close_bracket != segment.len() - 1 {
                    return Err(Error::invalid_path(
                        s,
                        format!("malformed index in '{segment}'"),
                    ));
                }
                let index: usize = segment[open_bracket + 1..close_bracket]
                    .parse()
                    .map_err(|_| Error::invalid_path(s, format!("invalid index in '{segment}'")))?;

                if !name.is_empty() {
                    path.push(name);
                }
                path.push(index);
            } else if let Ok(index) = segment.parse::<usize>() {
                path.push(index);
            } else {
                path.push(segment);
            }
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let mut path = Path::new();
        path.push("section");
        path.push(0);
        path.push("title");
        assert_eq!(path.to_string(), "section/0/title");
        assert_eq!(Path::new().to_string(), "");
    }

    #[test]
    fn test_parse_slash_form() {
        let path: Path = "section/2/title".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Key("section".to_string()),
                PathSegment::Index(2),
                PathSegment::Key("title".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_bracket_form() {
        let path: Path = "section[1]/entry[0]".parse().unwrap();
        assert_eq!(path.to_string(), "section/1/entry/0");
    }

    #[test]
    fn test_parse_skips_empty_segments() {
        let path: Path = "//code//".parse().unwrap();
        assert_eq!(path.len(), 1);
        assert!("".parse::<Path>().unwrap().is_root());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "item[0".parse::<Path>(),
            Err(Error::InvalidPath { .. })
        ));
        assert!(matches!(
            "item[abc]".parse::<Path>(),
            Err(Error::InvalidPath { .. })
        ));
        assert!(matches!(
            "item[0]x".parse::<Path>(),
            Err(Error::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_child_and_pop() {
        let root = Path::new();
        let child = root.child("note").child(3);
        assert_eq!(child.len(), 2);
        let mut popped = child.clone();
        assert_eq!(popped.pop(), Some(PathSegment::Index(3)));
        assert_eq!(popped.to_string(), "note");
    }

    #[test]
    fn test_serde_shape() {
        let path: Path = "a/0".parse().unwrap();
        assert_eq!(serde_json::to_string(&path).unwrap(), "[\"a\",0]");
    }
}
