use serde::{Deserialize, Serialize};

use crate::canvas::Color;

/// An edit request from a viewer. Not yet authoritative, coordinates are unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditIntent {
    pub x: i64,
    pub y: i64,
    pub color: Color,
}

/// An edit accepted by the hub, with coordinates known to be in bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelEdit {
    pub x: u32,
    pub y: u32,
    pub color: Color,
}

impl EditIntent {
    pub fn new(x: i64, y: i64, color: Color) -> Self {
        Self { x, y, color }
    }
}

impl PixelEdit {
    pub fn new(x: u32, y: u32, color: Color) -> Self {
        Self { x, y, color }
    }
}

impl From<PixelEdit> for EditIntent {
    fn from(edit: PixelEdit) -> Self {
        Self {
            x: i64::from(edit.x),
            y: i64::from(edit.y),
            color: edit.color,
        }
    }
}
