//! Editable collage session
//!
//! [`CollageWorkspace`] bundles everything one collage editor window works
//! on: the grid, the control panel values, the caption defaults and the
//! codec used to persist images. It is the [`StateAdapter`] behind undo and
//! redo, and its state tree is the autosave document.

use crate::autosave::SessionSnapshot;
use crate::codec::ImageCodec;
use crate::controls::{CaptionDefaults, ControlsState};
use crate::grid::{CollageGrid, GridResult};
use crate::history::{AdapterError, StateAdapter, StateTree};
use crate::template::GridTemplate;

/// Grid, controls and caption defaults of one collage.
pub struct CollageWorkspace<C: ImageCodec> {
    grid: CollageGrid<C::Image>,
    controls: ControlsState,
    captions: CaptionDefaults,
    codec: C,
}

impl<C: ImageCodec> CollageWorkspace<C> {
    /// Creates a workspace with an empty `rows` × `columns` grid.
    ///
    /// # Errors
    ///
    /// Returns `GridError::InvalidDimension` if either dimension is zero.
    pub fn new(rows: usize, columns: usize, codec: C) -> GridResult<Self> {
        Ok(Self {
            grid: CollageGrid::new(rows, columns)?,
            controls: ControlsState {
                rows,
                columns,
                template: None,
            },
            captions: CaptionDefaults::default(),
            codec,
        })
    }

    /// The live grid.
    #[must_use]
    pub const fn grid(&self) -> &CollageGrid<C::Image> {
        &self.grid
    }

    /// The live grid, mutably.
    ///
    /// Use [`resize_grid`](Self::resize_grid) to change dimensions so the
    /// controls stay in sync.
    pub const fn grid_mut(&mut self) -> &mut CollageGrid<C::Image> {
        &mut self.grid
    }

    /// Control panel values.
    #[must_use]
    pub const fn controls(&self) -> &ControlsState {
        &self.controls
    }

    /// Caption defaults.
    #[must_use]
    pub const fn captions(&self) -> &CaptionDefaults {
        &self.captions
    }

    /// The image codec.
    #[must_use]
    pub const fn codec(&self) -> &C {
        &self.codec
    }

    /// Changes the grid dimensions and mirrors them in the controls.
    ///
    /// The template selection is cleared unless it names the new size.
    ///
    /// # Errors
    ///
    /// Returns `GridError::InvalidDimension` if either dimension is zero.
    pub fn resize_grid(&mut self, rows: usize, columns: usize) -> GridResult<()> {
        self.grid.update_grid(rows, columns)?;
        self.controls.rows = rows;
        self.controls.columns = columns;
        let still_matches = self
            .controls
            .template
            .as_deref()
            .and_then(|name| name.parse::<GridTemplate>().ok())
            .is_some_and(|t| t.rows() == rows && t.columns() == columns);
        if !still_matches {
            self.controls.template = None;
        }
        Ok(())
    }

    /// Resizes the grid to a template and records the selection.
    ///
    /// # Errors
    ///
    /// Same as [`resize_grid`](Self::resize_grid).
    pub fn apply_template(&mut self, template: GridTemplate) -> GridResult<()> {
        self.controls.template = Some(template.to_string());
        self.resize_grid(template.rows(), template.columns())?;
        tracing::debug!(template = %template, "Applied grid template");
        Ok(())
    }

    /// Replaces the caption defaults and applies them to every cell.
    ///
    /// Returns how many cells changed.
    pub fn set_caption_defaults(&mut self, captions: CaptionDefaults) -> usize {
        let changed = self
            .grid
            .cells_mut()
            .map(|(_, cell)| captions.apply_to(cell))
            .filter(|&changed| changed)
            .count();
        self.captions = captions;
        changed
    }

    /// Captures the whole session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            collage: crate::autosave::CollageAutosaveState::from_grid(&self.grid, &self.codec),
            controls: self.controls.clone(),
            captions: self.captions.clone(),
        }
    }

    /// Replaces the session with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns `GridError::InvalidDimension` if the snapshot has an empty
    /// grid; the workspace is untouched in that case.
    pub fn restore(&mut self, snapshot: &SessionSnapshot) -> GridResult<()> {
        let grid = snapshot.collage.restore_grid(&self.codec)?;
        self.grid = grid;
        self.controls = snapshot.controls.clone();
        self.captions = snapshot.captions.clone();
        Ok(())
    }
}

impl<C: ImageCodec> StateAdapter for CollageWorkspace<C> {
    fn read_state(&self) -> StateTree {
        match self.snapshot().to_state_tree() {
            Ok(tree) => tree,
            Err(e) => {
                tracing::error!(error = %e, "Failed to capture workspace state");
                StateTree::Null
            }
        }
    }

    fn apply_state(&mut self, state: StateTree) -> Result<(), AdapterError> {
        let snapshot = SessionSnapshot::from_state_tree(state)?;
        self.restore(&snapshot)?;
        Ok(())
    }
}

impl<C: ImageCodec> std::fmt::Debug for CollageWorkspace<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollageWorkspace")
            .field("rows", &self.grid.rows())
            .field("columns", &self.grid.columns())
            .field("controls", &self.controls)
            .finish_non_exhaustive()
    }
}
