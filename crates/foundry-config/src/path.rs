//! Field paths for addressing values inside a [`Config`](crate::Config)
//!
//! A [`FieldPath`] is an ordered, non-empty list of segments whose canonical
//! textual form is dot-joined (`form.ornamentation`).

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Address of a leaf or subtree within a config
///
/// # Invariants
/// - At least one segment (the root is not addressable)
/// - Every segment is non-empty and made of alphanumerics or `_`
///
/// # Examples
/// - `["item", "rarity"]` → `item.rarity`
/// - `["output", "resolution"]` → `output.resolution`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Create a path from segments
    ///
    /// # Errors
    /// - [`PathError::Empty`] if `segments` is empty
    /// - [`PathError::EmptySegment`] / [`PathError::InvalidSegment`] for a bad segment
    pub fn new<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments
            .into_iter()
            .map(|seg| {
                let seg = seg.into();
                check_segment(&seg)?;
                Ok(seg)
            })
            .collect::<Result<_, PathError>>()?;

        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self(segments))
    }

    /// Path with a single segment
    ///
    /// # Errors
    /// Returns error if the segment is empty or has invalid characters
    #[inline]
    pub fn single(segment: impl Into<String>) -> Result<Self, PathError> {
        Self::new([segment])
    }

    /// Path segments, root first
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments (always at least one)
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// First segment (the top-level group or field)
    #[inline]
    #[must_use]
    pub fn first(&self) -> &str {
        &self.0[0]
    }

    /// Check if this path is a prefix of (or equal to) another
    ///
    /// `camera` is a prefix of `camera.fov`; `camera` is not a prefix of `cameraHeight`.
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len() && self.0 == other.0[..self.0.len()]
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

fn check_segment(seg: &str) -> Result<(), PathError> {
    if seg.is_empty() {
        Err(PathError::EmptySegment)
    } else if seg.contains(|c: char| !c.is_alphanumeric() && c != '_') {
        Err(PathError::InvalidSegment(seg.to_string()))
    } else {
        Ok(())
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        Self::new(s.split('.'))
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors related to field paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Zero-length path
    #[error("invalid path: a field path needs at least one segment")]
    Empty,

    /// Empty segment in path (`a..b`)
    #[error("path contains empty segment")]
    EmptySegment,

    /// Invalid segment characters
    #[error("invalid segment: {0} (must be alphanumeric or underscore)")]
    InvalidSegment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_new_and_segments() {
        let path = FieldPath::new(["item", "rarity"]).unwrap();
        assert_eq!(path.segments(), &["item", "rarity"]);
        assert_eq!(path.depth(), 2);
    }

    #[test]
    fn path_new_rejects_zero_segments() {
        let result = FieldPath::new(Vec::<String>::new());
        assert_eq!(result, Err(PathError::Empty));
    }

    #[test]
    fn path_first_segment() {
        let path: FieldPath = "camera.fov".parse().unwrap();
        assert_eq!(path.first(), "camera");
    }

    #[test]
    fn path_prefix_is_segment_aware() {
        let camera: FieldPath = "camera".parse().unwrap();
        let fov: FieldPath = "camera.fov".parse().unwrap();
        let height: FieldPath = "cameraHeight".parse().unwrap();

        assert!(camera.is_prefix_of(&fov));
        assert!(camera.is_prefix_of(&camera));
        assert!(!camera.is_prefix_of(&height));
    }

    #[test]
    fn path_from_str_empty() {
        let result: Result<FieldPath, _> = "".parse();
        assert_eq!(result, Err(PathError::Empty));
    }

    #[test]
    fn path_from_str_empty_segment() {
        let result: Result<FieldPath, _> = "a..b".parse();
        assert_eq!(result, Err(PathError::EmptySegment));
    }

    #[test]
    fn path_from_str_invalid_chars() {
        let result: Result<FieldPath, _> = "a.b-c".parse();
        assert!(matches!(result, Err(PathError::InvalidSegment(_))));
    }

    #[test]
    fn path_serde_as_dotted_string() {
        let path: FieldPath = "surface.emissiveGlow".parse().unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"surface.emissiveGlow\"");

        let back: FieldPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
        assert!(serde_json::from_str::<FieldPath>("\"\"").is_err());
    }
}
