// THEORY:
// This file is the main entry point for the `snapper_vision` library crate.
// It exposes the engine as three layers:
//
// 1.  **Core** (`core_modules`): grids, target shapes and the single-offset
//     `Scan`. Pure, synchronous and free of I/O beyond the injected grid loader.
// 2.  **Sweeps** (`pipeline`, `parallel_pipeline`): drivers that slide a scan
//     across every offset of a snapper image, sequentially or on a worker pool.
// 3.  **Ambient** (`config`, `logging`, `error`): configuration files, tracing
//     setup, console echoing and the error kinds shared by everything above.
//
// The binary in `main.rs` is a thin CLI over these layers.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod logging;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::coordinate::coordinate::{Cell, Coordinate};
pub use core_modules::grid::Grid;
pub use core_modules::grid_loader::{GridSource, InMemoryGridSource, TextFileSource, TextGridLoader};
pub use core_modules::scan::{Confidence, Scan};
pub use core_modules::snapper_image::SnapperImage;
pub use core_modules::target_shape::{
    TargetImage, TargetShape, global_centroid, has_defined_shape, local_centroid, occupied_cells,
    trim_grid,
};
pub use error::SnapperError;
