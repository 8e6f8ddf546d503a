// THEORY:
// Grids reach the engine through the `GridSource` trait. Shapes and snapper
// images are handed a source explicitly instead of calling a global file
// helper, so tests can feed rows from memory and the CLI can feed files
// without either side knowing about the other.
//
// The loader is the boundary where ragged text is rejected. Once a `Grid`
// exists it is rectangular, and nothing downstream re-checks that.

use crate::core_modules::grid::Grid;
use crate::error::{Result, SnapperError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Anything that can materialize a `Grid`.
pub trait GridSource {
    fn load_grid(&self) -> Result<Grid>;
}

/// Parses text where each line is one row of the grid.
pub struct TextGridLoader;

impl TextGridLoader {
    /// Parses already-read text. A trailing `\r` on each line is dropped and
    /// empty lines at the end of the text do not add rows.
    pub fn parse(text: &str) -> Result<Grid> {
        let mut rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line).chars().collect())
            .collect();
        while rows.last().is_some_and(Vec::is_empty) {
            rows.pop();
        }

        if rows.is_empty() {
            return Err(SnapperError::MalformedGrid("no rows".to_string()));
        }
        if rows[0].is_empty() {
            return Err(SnapperError::MalformedGrid("first row is empty".to_string()));
        }

        Grid::from_rows(rows)
    }

    pub fn load(path: &Path) -> Result<Grid> {
        let text = std::fs::read_to_string(path).map_err(|source| SnapperError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let grid = Self::parse(&text)?;
        debug!(path = %path.display(), rows = grid.rows(), cols = grid.cols(), "loaded grid");
        Ok(grid)
    }
}

/// A grid stored in a text file on disk.
#[derive(Debug, Clone)]
pub struct TextFileSource {
    pub path: PathBuf,
}

impl TextFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GridSource for TextFileSource {
    fn load_grid(&self) -> Result<Grid> {
        TextGridLoader::load(&self.path)
    }
}

/// A grid held as text rows in memory.
#[derive(Debug, Clone)]
pub struct InMemoryGridSource {
    pub rows: Vec<String>,
}

impl InMemoryGridSource {
    pub fn new<S: Into<String>>(rows: impl IntoIterator<Item = S>) -> Self {
        Self {
            rows: rows.into_iter().map(Into::into).collect(),
        }
    }
}

impl GridSource for InMemoryGridSource {
    fn load_grid(&self) -> Result<Grid> {
        TextGridLoader::parse(&self.rows.join("\n"))
    }
}
