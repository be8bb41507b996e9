//! Value types shared by layout cells
//!
//! Identifiers, aspect/fit modes, alignment keywords and the `W:H` ratio
//! used by the positional layout manager.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::LayoutError;

/// Unique identifier of a layout cell.
///
/// Ids are allocated from a monotonic counter and are never reused, so an
/// id stays valid while other cells are merged or split around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(pub u32);

impl CellId {
    /// Creates a cell ID from its raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a cell constrains the aspect ratio of its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectMode {
    /// Content follows the cell's shape.
    #[default]
    Free,
    /// Content is locked to a [`Ratio`].
    Fixed,
}

impl AspectMode {
    /// Returns the keyword used in layout JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for AspectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectMode {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "fixed" => Ok(Self::Fixed),
            other => Err(LayoutError::MalformedLayout(format!(
                "unknown aspect mode '{other}'"
            ))),
        }
    }
}

/// How content is scaled into its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to fit entirely inside the cell (letterboxed).
    #[default]
    Fit,
    /// Scale to cover the cell (cropped).
    Fill,
}

impl FitMode {
    /// Returns the keyword used in layout JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fit => "fit",
            Self::Fill => "fill",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitMode {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fit" => Ok(Self::Fit),
            "fill" => Ok(Self::Fill),
            other => Err(LayoutError::MalformedLayout(format!(
                "unknown fit mode '{other}'"
            ))),
        }
    }
}

/// Alignment of content inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Align {
    /// Centered on both axes.
    #[default]
    Center,
    /// Top edge, horizontally centered.
    Top,
    /// Bottom edge, horizontally centered.
    Bottom,
    /// Left edge, vertically centered.
    Left,
    /// Right edge, vertically centered.
    Right,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl Align {
    /// Returns the keyword used in layout JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    /// Returns every alignment keyword.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Center,
            Self::Top,
            Self::Bottom,
            Self::Left,
            Self::Right,
            Self::TopLeft,
            Self::TopRight,
            Self::BottomLeft,
            Self::BottomRight,
        ]
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Align {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase().replace('_', "-");
        Self::all()
            .iter()
            .copied()
            .find(|align| align.as_str() == wanted)
            .ok_or_else(|| LayoutError::MalformedLayout(format!("unknown alignment '{s}'")))
    }
}

/// A fixed aspect ratio, always with two positive parts.
///
/// Serialized in layout JSON as the compact string `"W:H"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ratio {
    width: u32,
    height: u32,
}

impl Ratio {
    /// Creates a ratio.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::InvalidRatio` if either part is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, LayoutError> {
        if width == 0 || height == 0 {
            return Err(LayoutError::InvalidRatio(format!("{width}:{height}")));
        }
        Ok(Self { width, height })
    }

    /// Returns the width part.
    #[must_use]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Returns the height part.
    #[must_use]
    pub const fn height(self) -> u32 {
        self.height
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for Ratio {
    type Err = LayoutError;

    /// Parses `"W:H"`. Exactly two positive integer parts are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LayoutError::InvalidRatio(s.to_string());
        let mut parts = s.split(':');
        let (Some(w), Some(h), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
        Self::new(width, height).map_err(|_| invalid())
    }
}

impl Serialize for Ratio {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
