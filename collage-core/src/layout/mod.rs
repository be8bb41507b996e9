//! Positional grid layout
//!
//! A [`GridLayoutManager`] keeps a rectangular grid fully covered by
//! rectangular cells and edits it through positions and cell ids. Every
//! successful edit is undoable, and the whole layout serializes to a compact
//! JSON document.
//!
//! # Module Structure
//!
//! - `types` - Identifiers, aspect/fit modes, alignment and ratios
//! - `cell` - [`LayoutCell`] and its JSON record
//! - `manager` - [`GridLayoutManager`] and [`AspectSettings`]
//! - `error` - [`LayoutError`]
//!
//! # Example
//!
//! ```
//! use collage_core::layout::{GridLayoutManager, LayoutError};
//!
//! let mut layout = GridLayoutManager::new(3, 3).unwrap();
//! let merged = layout.merge(&[(0, 0), (0, 1), (1, 0), (1, 1)]).unwrap();
//! assert_eq!(layout.cells().len(), 6);
//!
//! // Diagonal selections never form a rectangle
//! assert_eq!(
//!     layout.merge(&[(2, 0), (2, 2)]),
//!     Err(LayoutError::NonRectangularSelection)
//! );
//!
//! layout.split(merged, 2, 2).unwrap();
//! assert_eq!(layout.cells().len(), 9);
//!
//! layout.undo().unwrap();
//! assert_eq!(layout.cell(merged).map(|c| c.row_span), Some(2));
//! ```

mod cell;
mod error;
mod manager;
mod types;

pub use cell::LayoutCell;
pub use error::{LayoutError, LayoutResult};
pub use manager::{AspectSettings, GridLayoutManager};
pub use types::{Align, AspectMode, CellId, FitMode, Ratio};
