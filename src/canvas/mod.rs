pub mod color;
pub mod edit;
pub mod grid;

pub use color::Color;
pub use edit::{EditIntent, PixelEdit};
pub use grid::Grid;
