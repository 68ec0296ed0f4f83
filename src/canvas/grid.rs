use serde::{Deserialize, Serialize, Serializer};

use crate::canvas::Color;

/// Fixed-size grid of cells.
///
/// Cells are stored column by column so that the serialized form is
/// `columns[x][y]`, which is what viewers index into.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Vec<Color>>")]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Color>,
}

impl Grid {
    /// Create a grid with every cell set to white
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::WHITE)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            cells: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Map signed coordinates onto the grid, `None` when outside `[0,W)x[0,H)`
    pub fn locate(&self, x: i64, y: i64) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.width && y < self.height).then_some((x, y))
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Overwrite a cell. Returns false when the coordinates are out of bounds.
    pub fn set(&mut self, x: u32, y: u32, color: Color) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = color;
                true
            }
            None => false,
        }
    }

    /// Iterate over columns, one slice of `height` cells per x
    pub fn columns(&self) -> impl Iterator<Item = &[Color]> {
        // chunks() panics on zero; a zero-height grid has no cells anyway
        self.cells.chunks(self.height.max(1) as usize)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(x as usize * self.height as usize + y as usize)
        } else {
            None
        }
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.columns())
    }
}

impl TryFrom<Vec<Vec<Color>>> for Grid {
    type Error = String;

    fn try_from(columns: Vec<Vec<Color>>) -> Result<Self, Self::Error> {
        let width = u32::try_from(columns.len()).map_err(|_| "grid too wide".to_string())?;
        let height = columns.first().map_or(0, Vec::len);
        let height = u32::try_from(height).map_err(|_| "grid too tall".to_string())?;

        if width == 0 || height == 0 {
            return Err("grid must have at least one cell".to_string());
        }

        if let Some(x) = columns.iter().position(|c| c.len() != height as usize) {
            return Err(format!(
                "column {} has {} cells, expected {}",
                x,
                columns[x].len(),
                height
            ));
        }

        Ok(Self {
            width,
            height,
            cells: columns.into_iter().flatten().collect(),
        })
    }
}
