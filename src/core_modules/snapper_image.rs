// THEORY:
// A `SnapperImage` is the larger grid being searched, paired with a name for
// reporting. It is a "dumb" container: scans read from it and never change it.

use crate::core_modules::grid::Grid;
use crate::core_modules::grid_loader::GridSource;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct SnapperImage {
    pub name: String,
    pub grid: Grid,
}

impl SnapperImage {
    pub fn new(name: impl Into<String>, grid: Grid) -> Self {
        Self {
            name: name.into(),
            grid,
        }
    }

    pub fn from_source(name: impl Into<String>, source: &dyn GridSource) -> Result<Self> {
        Ok(Self::new(name, source.load_grid()?))
    }

    pub fn grid_dimensions(&self) -> String {
        self.grid.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::grid_loader::InMemoryGridSource;

    #[test]
    fn reports_its_dimensions() {
        let source = InMemoryGridSource::new(["abc", "def"]);
        let image = SnapperImage::from_source("feed", &source).expect("image");
        assert_eq!(image.name, "feed");
        assert_eq!(image.grid_dimensions(), "Grid Size (Rows x Cols = 2,3)");
    }
}
