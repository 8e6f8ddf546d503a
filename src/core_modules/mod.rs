pub mod coordinate;
pub mod grid;
pub mod grid_loader;
pub mod scan;
pub mod snapper_image;
pub mod target_shape;
