use crate::canvas::{Color, Grid, PixelEdit};

/// The canonical canvas. All writes go through [`CanvasStore::apply_edit`].
#[derive(Debug, Clone)]
pub struct CanvasStore {
    grid: Grid,
}

impl CanvasStore {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            grid: Grid::new(width, height),
        }
    }

    /// Full copy of the current grid, sent to newly connected viewers
    pub fn snapshot(&self) -> Grid {
        self.grid.clone()
    }

    /// Write `color` at (x, y), overwriting whatever was there.
    ///
    /// Out of range coordinates are dropped and yield `None`; the caller
    /// has nothing to broadcast in that case.
    pub fn apply_edit(&mut self, x: i64, y: i64, color: Color) -> Option<PixelEdit> {
        let (x, y) = self.grid.locate(x, y)?;
        self.grid.set(x, y, color);
        Some(PixelEdit::new(x, y, color))
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.grid.get(x, y)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.grid.width(), self.grid.height())
    }
}
