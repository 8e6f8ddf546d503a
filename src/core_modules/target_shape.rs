// THEORY:
// The `target_shape` module turns a raw grid into the thing we search for.
//
// It is split in two:
// 1.  **TargetImage** is a plain data capability: a name, a trimmed grid, the
//     occupied cells of that grid and a local centroid. Any concrete target
//     type can implement it.
// 2.  **Free functions** (`trim_grid`, `occupied_cells`, `local_centroid`,
//     `global_centroid`, `has_defined_shape`) do the shape math over grids and
//     over any `TargetImage`. They hold no state.
//
// `TargetShape` is the one concrete target shipped with the engine. It is built
// once, never mutated, and then shared read-only by every scan that looks for
// it.
//
// The local centroid is the geometric centre of the trimmed bounding box,
// ((cols - 1) / 2, (rows - 1) / 2). It does not depend on which cells inside
// the box are occupied. Reported positions and tests rely on that exact value.

use crate::core_modules::coordinate::coordinate::{Axis, Cell, Coordinate};
use crate::core_modules::grid::Grid;
use crate::core_modules::grid_loader::GridSource;
use crate::error::{Result, SnapperError};
use tracing::debug;

/// What a scan needs to know about a target.
pub trait TargetImage {
    fn name(&self) -> &str;
    /// The trimmed grid that models the target.
    fn grid_representation(&self) -> &Grid;
    /// Cells of `grid_representation` that differ from the blank character.
    fn internal_coordinates(&self) -> &[Cell];
    fn local_centroid(&self) -> Coordinate;
}

/// Cuts `grid` down to the smallest rectangle that still holds every
/// non-blank cell. Returns `None` when the whole grid is blank.
pub fn trim_grid(grid: &Grid, blank: char) -> Option<Grid> {
    let mut top = usize::MAX;
    let mut bottom = 0;
    let mut left = usize::MAX;
    let mut right = 0;

    for row in 0..grid.rows() {
        let Some(cells) = grid.row(row) else { continue };
        for (col, &c) in cells.iter().enumerate() {
            if c != blank {
                top = top.min(row);
                bottom = bottom.max(row);
                left = left.min(col);
                right = right.max(col);
            }
        }
    }

    if top == usize::MAX {
        return None;
    }

    grid.window(top, left, bottom - top + 1, right - left + 1).ok()
}

/// Every cell of `grid` that is not `blank`, in row-major order.
pub fn occupied_cells(grid: &Grid, blank: char) -> Vec<Cell> {
    let mut cells = Vec::new();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if grid.get(row, col).is_some_and(|c| c != blank) {
                cells.push(Cell::new(row, col));
            }
        }
    }
    cells
}

pub fn has_defined_shape(cells: &[Cell]) -> bool {
    !cells.is_empty()
}

/// Geometric centre of the grid's bounding box, in local (x = col, y = row) space.
pub fn local_centroid(grid: &Grid) -> Coordinate {
    let x = (grid.cols() as Axis - 1.0) / 2.0;
    let y = (grid.rows() as Axis - 1.0) / 2.0;
    Coordinate::new(x, y)
}

/// The target's centroid expressed in the coordinates of the image it was
/// found in, for a window whose top-left corner is at (`horizontal`, `vertical`).
pub fn global_centroid<T: TargetImage + ?Sized>(
    target: &T,
    horizontal: usize,
    vertical: usize,
) -> Coordinate {
    target.local_centroid().translated(horizontal, vertical)
}

/// A target derived from a raw grid and a blank character.
#[derive(Debug, Clone)]
pub struct TargetShape {
    /// The name reported in scan summaries, e.g. "Starship".
    name: String,
    /// The character treated as background.
    blank_character: char,
    /// The raw grid trimmed to its non-blank bounding box.
    grid_representation: Grid,
    /// Occupied cells of `grid_representation`, never empty.
    internal_coordinates: Vec<Cell>,
    local_centroid: Coordinate,
}

impl TargetShape {
    pub fn new(name: impl Into<String>, grid: &Grid, blank_character: char) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SnapperError::ShapeDefinition {
                name,
                reason: "a target needs a name".to_string(),
            });
        }

        let shape_error = |name: String| SnapperError::ShapeDefinition {
            name,
            reason: "no occupied cells; please check the input".to_string(),
        };

        let Some(grid_representation) = trim_grid(grid, blank_character) else {
            return Err(shape_error(name));
        };
        let internal_coordinates = occupied_cells(&grid_representation, blank_character);
        if !has_defined_shape(&internal_coordinates) {
            return Err(shape_error(name));
        }
        let local_centroid = local_centroid(&grid_representation);

        debug!(
            target_name = %name,
            rows = grid_representation.rows(),
            cols = grid_representation.cols(),
            occupied = internal_coordinates.len(),
            "built target shape"
        );

        Ok(Self {
            name,
            blank_character,
            grid_representation,
            internal_coordinates,
            local_centroid,
        })
    }

    /// Builds a target from an injected grid source.
    pub fn from_source(
        name: impl Into<String>,
        source: &dyn GridSource,
        blank_character: char,
    ) -> Result<Self> {
        let grid = source.load_grid()?;
        Self::new(name, &grid, blank_character)
    }

    pub fn blank_character(&self) -> char {
        self.blank_character
    }

    pub fn occupied_count(&self) -> usize {
        self.internal_coordinates.len()
    }
}

impl TargetImage for TargetShape {
    fn name(&self) -> &str {
        &self.name
    }

    fn grid_representation(&self) -> &Grid {
        &self.grid_representation
    }

    fn internal_coordinates(&self) -> &[Cell] {
        &self.internal_coordinates
    }

    fn local_centroid(&self) -> Coordinate {
        self.local_centroid
    }
}
