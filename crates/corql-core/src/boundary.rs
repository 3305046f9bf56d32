//! Inclusive numeric ranges and the distance units that carry them.

use std::fmt;

use serde::Serialize;

/// Inclusive range `min..=max`; a missing `max` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "@type", rename = "boundary")]
pub struct Boundary {
    min: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<u32>,
}

impl Boundary {
    /// `{n, n}`.
    pub fn exact(n: u32) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    /// `{min, max}`, or `None` when `min > max`.
    pub fn range(min: u32, max: u32) -> Option<Self> {
        (min <= max).then_some(Self {
            min,
            max: Some(max),
        })
    }

    /// `{min, unbounded}`.
    pub fn at_least(min: u32) -> Self {
        Self { min, max: None }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> Option<u32> {
        self.max
    }

    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{}..", self.min),
        }
    }
}

/// Gap between two sequence operands, measured in `key` units (`w`, `s`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "@type", rename = "distance")]
pub struct Distance {
    pub key: String,
    pub boundary: Boundary,
}

impl Distance {
    pub fn new(key: impl Into<String>, boundary: Boundary) -> Self {
        Self {
            key: key.into(),
            boundary,
        }
    }

    /// Word distance, the default unit for token sequences.
    pub fn words(boundary: Boundary) -> Self {
        Self::new("w", boundary)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.boundary)
    }
}
