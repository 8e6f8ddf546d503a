// THEORY:
// The `coordinate` module holds the two positional primitives of the engine.
//
// 1.  **Coordinate**: a real-valued (x, y) pair. Centroids land between cells
//     (a 2x2 target is centred on 0.5, 0.5), so positions reported to the
//     outside world are always real-valued. `x` runs along columns and `y`
//     along rows.
// 2.  **Cell**: an integer (row, col) address inside a grid. Occupied-cell sets
//     and window indexing use cells, never coordinates, so no float-to-index
//     conversion ever happens on the comparison path.
//
// Both are "dumb" value types: `Copy`, compared by value, never mutated.

pub mod coordinate {
    use serde::Serialize;
    use std::fmt;

    pub type Axis = f64;

    /// A real-valued position; `x` is the column axis, `y` the row axis.
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
    pub struct Coordinate {
        pub x: Axis,
        pub y: Axis,
    }

    impl Coordinate {
        pub fn new(x: Axis, y: Axis) -> Self {
            Self { x, y }
        }

        /// Shifts this coordinate by a column and row offset.
        pub fn translated(&self, horizontal: usize, vertical: usize) -> Self {
            Self {
                x: self.x + horizontal as Axis,
                y: self.y + vertical as Axis,
            }
        }
    }

    impl fmt::Display for Coordinate {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{},{}", self.x, self.y)
        }
    }

    /// An integer cell address inside a grid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
    pub struct Cell {
        pub row: usize,
        pub col: usize,
    }

    impl Cell {
        pub fn new(row: usize, col: usize) -> Self {
            Self { row, col }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::coordinate::*;

    #[test]
    fn coordinates_compare_by_value() {
        assert_eq!(Coordinate::new(0.5, 1.5), Coordinate::new(0.5, 1.5));
        assert_ne!(Coordinate::new(0.5, 1.5), Coordinate::new(1.5, 0.5));
    }

    #[test]
    fn translation_adds_column_to_x_and_row_to_y() {
        let moved = Coordinate::new(0.5, 0.5).translated(2, 3);
        assert_eq!(moved, Coordinate::new(2.5, 3.5));
    }

    #[test]
    fn display_uses_shortest_form() {
        assert_eq!(Coordinate::new(3.0, 9.5).to_string(), "3,9.5");
    }

    #[test]
    fn cells_order_row_major() {
        let mut cells = vec![Cell::new(1, 0), Cell::new(0, 1), Cell::new(0, 0)];
        cells.sort();
        assert_eq!(cells, vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0)]);
    }
}
