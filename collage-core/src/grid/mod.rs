//! Live collage grid
//!
//! [`CollageGrid`] is the interactive counterpart of the positional layout
//! manager: merges are driven by the user's selection and the surviving
//! top-left cell keeps its image and captions. Cells carry an image of any
//! [`CellImage`](crate::codec::CellImage) type, caption texts and style, and
//! an autosave slot with a generation counter used to reject stale
//! background encodes.
//!
//! # Example
//!
//! ```
//! use collage_core::codec::RasterImage;
//! use collage_core::grid::CollageGrid;
//!
//! let mut grid: CollageGrid<RasterImage> = CollageGrid::new(2, 2).unwrap();
//! grid.set_selected(0, 0, true).unwrap();
//! grid.set_selected(0, 1, true).unwrap();
//! assert_eq!(grid.selected_rectangle(), Some((0, 0, 1, 2)));
//!
//! grid.merge_selected().unwrap();
//! assert_eq!(grid.cell_count(), 3);
//!
//! grid.split_cells(0, 0).unwrap();
//! assert_eq!(grid.cell_count(), 4);
//! ```

mod cell;
mod error;
mod model;

pub use cell::{
    AspectRatioMode, AutosaveToken, CaptionStyle, CaptionText, CollageCell, Rgba,
    TransformationMode,
};
pub use error::{GridError, GridResult};
pub use model::{CollageGrid, DEFAULT_SPACING, Position, Rect};
