use proptest::prelude::*;
use snapper_vision::{Coordinate, Grid, Scan, SnapperError, TargetImage, TargetShape};

const BLANK: char = ' ';

fn grid_strategy(max_rows: usize, max_cols: usize) -> impl Strategy<Value = Grid> {
    (1..=max_rows, 1..=max_cols).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::sample::select(vec![BLANK, 'X', 'O']), rows * cols)
            .prop_map(move |cells| Grid::new(rows, cols, cells).expect("generated grid"))
    })
}

fn occupied_in(grid: &Grid) -> usize {
    (0..grid.rows())
        .flat_map(|r| (0..grid.cols()).map(move |c| (r, c)))
        .filter(|&(r, c)| grid.get(r, c) != Some(BLANK))
        .count()
}

proptest! {
    #[test]
    fn shape_invariants(raw in grid_strategy(6, 6)) {
        let occupied = occupied_in(&raw);
        match TargetShape::new("t", &raw, BLANK) {
            Ok(shape) => {
                let g = shape.grid_representation();
                let cells = shape.internal_coordinates();
                prop_assert!(!cells.is_empty());
                // trimming never drops an occupied cell
                prop_assert_eq!(cells.len(), occupied);
                for cell in cells {
                    prop_assert!(cell.row < g.rows() && cell.col < g.cols());
                    prop_assert_ne!(g.at(*cell), Some(BLANK));
                }
                // no blank border row or column survives
                let last_row = g.rows() - 1;
                let last_col = g.cols() - 1;
                prop_assert!(cells.iter().any(|c| c.row == 0));
                prop_assert!(cells.iter().any(|c| c.row == last_row));
                prop_assert!(cells.iter().any(|c| c.col == 0));
                prop_assert!(cells.iter().any(|c| c.col == last_col));
                prop_assert_eq!(
                    shape.local_centroid(),
                    Coordinate::new((g.cols() as f64 - 1.0) / 2.0, (g.rows() as f64 - 1.0) / 2.0)
                );
            }
            Err(err) => {
                prop_assert_eq!(occupied, 0);
                prop_assert!(matches!(err, SnapperError::ShapeDefinition { .. }), "unexpected error kind");
            }
        }
    }

    #[test]
    fn scan_invariants(
        source in grid_strategy(8, 8),
        raw in grid_strategy(4, 4),
        h in 0..8usize,
        v in 0..8usize,
        minimum in 0.0..=1.0f64,
    ) {
        prop_assume!(occupied_in(&raw) > 0);
        let target = TargetShape::new("t", &raw, BLANK).expect("target");
        let fits = Scan::window_fits(&source, &target, h, v);

        match Scan::new(&source, &target, h, v, minimum) {
            Ok(scan) => {
                prop_assert!(fits);
                prop_assert!((0.0..=1.0).contains(&scan.confidence()));
                prop_assert_eq!(scan.matches() + scan.differences(), target.internal_coordinates().len());
                prop_assert_eq!(scan.target_found(), scan.confidence() >= minimum);
                prop_assert_eq!(scan.global_centroid(), target.local_centroid().translated(h, v));

                let again = Scan::new(&source, &target, h, v, minimum).expect("repeat");
                prop_assert_eq!(again, scan);
            }
            Err(err) => {
                prop_assert!(!fits);
                prop_assert!(matches!(err, SnapperError::OutOfBounds { .. }), "unexpected error kind");
            }
        }
    }
}
