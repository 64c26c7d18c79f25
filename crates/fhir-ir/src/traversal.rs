//! Cursor APIs for navigating JSON values

use crate::path::{Path, PathSegment};
use crate::value::{Value, ValueKind};
use crate::{Error, Result};
use tracing::trace;

/// A cursor pointing at one value inside a larger document
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    /// Current value
    value: &'a Value,

    /// Path from the document root (for error reporting)
    path: Path,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the document root
    pub fn new(value: &'a Value) -> Self {
        Self {
            value,
            path: Path::new(),
        }
    }

    /// Get the current value
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Get the path of the current value
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Navigate to a named field of the current record
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` when the current value is not a record and
    /// `NodeNotFound` when the field is absent.
    pub fn child(&self, name: &str) -> Result<Cursor<'a>> {
        let Value::Object(map) = self.value else {
            return Err(Error::TypeMismatch {
                expected: ValueKind::Object,
                found: ValueKind::of(self.value),
            });
        };

        match map.get(name) {
            Some(child) => Ok(Cursor {
                value: child,
                path: self.path.child(name),
            }),
            None => Err(Error::node_not_found(self.path.child(name).to_string())),
        }
    }

    /// Navigate to an element of the current sequence
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` when the current value is not a sequence and
    /// `NodeNotFound` when the index is out of bounds.
    pub fn child_at(&self, index: usize) -> Result<Cursor<'a>> {
        let Value::Array(items) = self.value else {
            return Err(Error::TypeMismatch {
                expected: ValueKind::Array,
                found: ValueKind::of(self.value),
            });
        };

        match items.get(index) {
            Some(child) => Ok(Cursor {
                value: child,
                path: self.path.child(index),
            }),
            None => Err(Error::node_not_found(self.path.child(index).to_string())),
        }
    }

    /// Follow a parsed path from the current value
    ///
    /// # Errors
    ///
    /// Fails on the first segment that cannot be followed.
    pub fn follow(&self, path: &Path) -> Result<Cursor<'a>> {
        let mut cursor = self.clone();
        for segment in path.segments() {
            cursor = match segment {
                PathSegment::Key(name) => cursor.child(name)?,
                PathSegment::Index(index) => cursor.child_at(*index)?,
            };
        }
        Ok(cursor)
    }

    /// Navigate using a textual path (e.g., `section[0]/entry/1`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` for malformed paths, otherwise the same errors
    /// as [`Cursor::follow`].
    pub fn navigate(&self, path: &str) -> Result<Cursor<'a>> {
        trace!(path, "navigating value");
        let parsed: Path = path.parse()?;
        self.follow(&parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn composition() -> Value {
        json!({
            "title": "Discharge summary",
            "section": [
                {"title": "Allergies"},
                {"title": "Medications", "section": [{"title": "Current"}]}
            ]
        })
    }

    #[test]
    fn test_cursor_creation() {
        let doc = composition();
        let cursor = Cursor::new(&doc);
        assert!(cursor.path().is_root());
        assert!(cursor.value().is_object());
    }

    #[test]
    fn test_cursor_child() {
        let doc = composition();
        let cursor = Cursor::new(&doc).child("title").unwrap();
        assert_eq!(cursor.value(), &json!("Discharge summary"));
        assert_eq!(cursor.path().to_string(), "title");
    }

    #[test]
    fn test_cursor_child_not_found() {
        let doc = composition();
        match Cursor::new(&doc).child("status") {
            Err(Error::NodeNotFound { path }) => assert_eq!(path, "status"),
            other => panic!("Expected NodeNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_cursor_child_on_scalar() {
        let doc = json!("plain");
        assert!(matches!(
            Cursor::new(&doc).child("x"),
            Err(Error::TypeMismatch {
                expected: ValueKind::Object,
                found: ValueKind::String
            })
        ));
    }

    #[test]
    fn test_cursor_child_at() {
        let doc = composition();
        let sections = Cursor::new(&doc).child("section").unwrap();
        let second = sections.child_at(1).unwrap();
        assert_eq!(second.path().to_string(), "section/1");
        assert!(sections.child_at(5).is_err());
    }

    #[test]
    fn test_cursor_navigate() {
        let doc = composition();
        let nested = Cursor::new(&doc).navigate("section[1]/section/0/title").unwrap();
        assert_eq!(nested.value(), &json!("Current"));
        assert_eq!(nested.path().to_string(), "section/1/section/0/title");
    }

    #[test]
    fn test_cursor_navigate_errors() {
        let doc = composition();
        let cursor = Cursor::new(&doc);
        assert!(matches!(
            cursor.navigate("section[9]"),
            Err(Error::NodeNotFound { .. })
        ));
        assert!(matches!(
            cursor.navigate("section[0"),
            Err(Error::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_cursor_navigate_empty_path() {
        let doc = composition();
        let cursor = Cursor::new(&doc).navigate("").unwrap();
        assert!(cursor.path().is_root());
    }
}
