//! Grid templates
//!
//! A template is just a named grid size such as `"3x2"` (rows × columns).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Largest dimension a template may name.
pub const MAX_TEMPLATE_DIMENSION: usize = 12;

const BUILTIN: [(usize, usize); 9] = [
    (2, 2),
    (3, 3),
    (2, 3),
    (3, 2),
    (4, 2),
    (2, 4),
    (4, 3),
    (3, 4),
    (4, 4),
];

/// A grid size template, written `RxC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridTemplate {
    rows: usize,
    columns: usize,
}

impl GridTemplate {
    /// Creates a template, or `None` if a dimension is zero or too large.
    #[must_use]
    pub const fn new(rows: usize, columns: usize) -> Option<Self> {
        if rows == 0 || columns == 0 || rows > MAX_TEMPLATE_DIMENSION || columns > MAX_TEMPLATE_DIMENSION {
            return None;
        }
        Some(Self { rows, columns })
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(self) -> usize {
        self.columns
    }

    /// Returns true for one of the built-in templates.
    #[must_use]
    pub fn is_builtin(self) -> bool {
        BUILTIN.contains(&(self.rows, self.columns))
    }
}

/// The templates offered out of the box, in display order.
#[must_use]
pub fn builtin_templates() -> Vec<GridTemplate> {
    BUILTIN
        .iter()
        .map(|&(rows, columns)| GridTemplate { rows, columns })
        .collect()
}

impl fmt::Display for GridTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// Error returned when a template name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid template '{0}' (expected RxC with sizes 1-12)")]
pub struct TemplateParseError(pub String);

impl FromStr for GridTemplate {
    type Err = TemplateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TemplateParseError(s.to_string());
        let (rows, columns) = s
            .trim()
            .split_once(['x', 'X', '×'])
            .ok_or_else(invalid)?;
        let rows = rows.trim().parse().map_err(|_| invalid())?;
        let columns = columns.trim().parse().map_err(|_| invalid())?;
        Self::new(rows, columns).ok_or_else(invalid)
    }
}

impl Serialize for GridTemplate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GridTemplate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
