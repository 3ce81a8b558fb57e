//! Field declarations
//!
//! A [`FieldSpec`] is one leaf of a variant's schema: its address, the kind
//! of value it accepts and its default.

use std::fmt::{self, Display, Formatter};

use foundry_config::FieldPath;
use serde_json::Value;

/// Accepted values for a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Exactly this string
    Const(&'static str),
    /// One of these lower-case strings
    Enum(&'static [&'static str]),
    /// Number within `min..=max`
    Float { min: f64, max: f64 },
    /// Whole number within `min..=max`
    Integer { min: i64, max: i64 },
}

impl FieldKind {
    /// Short name used in messages
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Const(_) => "const",
            Self::Enum(_) => "enum",
            Self::Float { .. } => "float",
            Self::Integer { .. } => "integer",
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(value) => write!(f, "const {value:?}"),
            Self::Enum(members) => write!(f, "enum [{}]", members.join(", ")),
            Self::Float { min, max } => write!(f, "float {min}..={max}"),
            Self::Integer { min, max } => write!(f, "integer {min}..={max}"),
        }
    }
}

/// Default value of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Text(&'static str),
    Float(f64),
    Integer(i64),
    /// Chosen by the defaults provider
    Seed,
}

/// One declared leaf of a schema
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    segments: &'static [&'static str],
    kind: FieldKind,
    default: FieldDefault,
}

impl FieldSpec {
    pub(crate) const fn new(
        segments: &'static [&'static str],
        kind: FieldKind,
        default: FieldDefault,
    ) -> Self {
        Self {
            segments,
            kind,
            default,
        }
    }

    /// Path segments, root first
    #[inline]
    #[must_use]
    pub const fn segments(&self) -> &'static [&'static str] {
        self.segments
    }

    /// Dotted path (`form.ornamentation`)
    #[must_use]
    pub fn path(&self) -> String {
        self.segments.join(".")
    }

    /// Top-level group, `None` for top-level fields
    #[inline]
    #[must_use]
    pub fn group(&self) -> Option<&'static str> {
        match self.segments {
            [group, _, ..] => Some(*group),
            _ => None,
        }
    }

    /// Accepted values
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Declared default
    #[inline]
    #[must_use]
    pub const fn default_value(&self) -> FieldDefault {
        self.default
    }

    /// Whether this field lives at `path`
    #[inline]
    #[must_use]
    pub fn is_at(&self, path: &FieldPath) -> bool {
        path.iter().eq(self.segments.iter().copied())
    }

    /// Whether `path` addresses this field or one of its enclosing groups
    #[inline]
    #[must_use]
    pub fn is_within(&self, path: &FieldPath) -> bool {
        path.depth() <= self.segments.len()
            && path.iter().zip(self.segments.iter()).all(|(a, b)| a == *b)
    }

    /// Default rendered as JSON, with `seed` used for [`FieldDefault::Seed`]
    #[must_use]
    pub fn default_json(&self, seed: u64) -> Value {
        match self.default {
            FieldDefault::Text(text) => Value::from(text),
            FieldDefault::Float(value) => Value::from(value),
            FieldDefault::Integer(value) => Value::from(value),
            FieldDefault::Seed => Value::from(seed),
        }
    }
}

pub(crate) const fn text(
    segments: &'static [&'static str],
    members: &'static [&'static str],
    default: &'static str,
) -> FieldSpec {
    FieldSpec::new(segments, FieldKind::Enum(members), FieldDefault::Text(default))
}

pub(crate) const fn float(
    segments: &'static [&'static str],
    min: f64,
    max: f64,
    default: f64,
) -> FieldSpec {
    FieldSpec::new(segments, FieldKind::Float { min, max }, FieldDefault::Float(default))
}

pub(crate) const fn integer(
    segments: &'static [&'static str],
    min: i64,
    max: i64,
    default: i64,
) -> FieldSpec {
    FieldSpec::new(
        segments,
        FieldKind::Integer { min, max },
        FieldDefault::Integer(default),
    )
}
