use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A single step into the configuration document: an object key or an
/// array index.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// A [`FieldPath`] points at a node of the configuration document.
///
/// It is rendered with the dotted convention used by JSON Schema
/// validators, with 0-based array indices: `questions.1.marking_items.0.type`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The path of the document root. Rendered as `<root>` since there is no
    /// field name to show.
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend the path with an object key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Extend the path with a 0-based array index.
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                PathSegment::Key(key) => f.write_str(key)?,
                PathSegment::Index(index) => write!(f, "{}", index)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_root() {
        let path = FieldPath::root();
        assert!(path.is_root());
        assert_eq!(path.to_string(), "<root>");
    }

    #[test]
    fn test_nested() {
        let path = FieldPath::root()
            .key("questions")
            .index(2)
            .key("marking_items")
            .index(0)
            .key("total_mark");
        assert_eq!(path.to_string(), "questions.2.marking_items.0.total_mark");
    }

    #[test]
    fn test_clone_extends_independently() {
        let base = FieldPath::root().key("questions").index(0);
        let a = base.clone().key("name");
        let b = base.key("marking_items");
        assert_eq!(a.to_string(), "questions.0.name");
        assert_eq!(b.to_string(), "questions.0.marking_items");
    }
}
