// THEORY:
// Every failure the engine can report lives in one enum so that a caller can
// match on the kind instead of parsing messages. The core never panics on bad
// input: a target without a shape, a window that runs off the edge of the
// snapper image, or a ragged grid all come back as values.
//
// Construction is atomic. When any of these is returned, the `TargetShape`,
// `Scan` or `Grid` that was being built simply does not exist.

use std::path::PathBuf;
use thiserror::Error;

/// The error kinds raised by grid loading, shape analysis and scanning.
#[derive(Debug, Error)]
pub enum SnapperError {
    /// The target has no occupied cells (or no usable name).
    #[error("target '{name}' is not defined by a shape: {reason}")]
    ShapeDefinition { name: String, reason: String },

    /// A window of `rows x cols` at (`row_offset`, `col_offset`) does not fit
    /// inside a grid of `grid_rows x grid_cols`.
    #[error(
        "window {rows}x{cols} at row {row_offset}, col {col_offset} exceeds grid {grid_rows}x{grid_cols}"
    )]
    OutOfBounds {
        row_offset: usize,
        col_offset: usize,
        rows: usize,
        cols: usize,
        grid_rows: usize,
        grid_cols: usize,
    },

    /// Input that cannot form a rectangular grid.
    #[error("malformed grid: {0}")]
    MalformedGrid(String),

    #[error("minimum confidence must lie within [0, 1], got {0}")]
    InvalidConfidence(f64),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("worker pool failure: {0}")]
    WorkerPool(&'static str),
}

pub type Result<T> = std::result::Result<T, SnapperError>;
