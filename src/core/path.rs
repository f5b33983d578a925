//! Field paths: export-name segments from the outermost record inwards.

use std::fmt;

/// Location of a field, possibly through embedded sub-records.
///
/// Empty only for whole-record bindings and violations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// The path of the whole record.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Terminal (innermost) segment, or `""` for the whole record.
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// Path with `segment` placed in front of the existing segments.
    pub(crate) fn prefixed(mut self, segment: &str) -> Self {
        self.segments.insert(0, segment.to_string());
        self
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_terminal_segment() {
        let path = FieldPath::new(["outer", "inner", "deep"]);
        assert_eq!(path.name(), "deep");
        assert_eq!(path.len(), 3);
        assert_eq!(path.to_string(), "outer.inner.deep");
    }

    #[test]
    fn root_path_has_empty_name() {
        let path = FieldPath::root();
        assert!(path.is_empty());
        assert_eq!(path.name(), "");
    }

    #[test]
    fn prefixed_puts_segment_first() {
        let path = FieldPath::new(["deep"]).prefixed("inner").prefixed("outer");
        assert_eq!(path.segments(), ["outer", "inner", "deep"]);
    }
}
