use std::collections::BTreeSet;

use crate::canvas::{Color, EditIntent, Grid, PixelEdit};
use crate::websocket::message::ServerMessage;

/// What has to be repainted since the last call to [`Mirror::take_redraw`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Redraw {
    #[default]
    None,
    Full,
    /// Changed cells, each listed once, ordered by (x, y)
    Cells(Vec<(u32, u32)>),
}

/// A viewer's local copy of the hub's grid.
///
/// Local edits are applied optimistically before the hub has seen them.
/// There is no intent tracking; the hub's echo of an edit simply writes
/// the same value again.
#[derive(Debug, Default)]
pub struct Mirror {
    grid: Option<Grid>,
    full_redraw: bool,
    dirty: BTreeSet<(u32, u32)>,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole mirror with a snapshot from the hub
    pub fn apply_snapshot(&mut self, grid: Grid) {
        self.grid = Some(grid);
        self.full_redraw = true;
        self.dirty.clear();
    }

    /// Optimistically apply a local edit.
    ///
    /// Returns the intent to send to the hub, or `None` if there is no
    /// snapshot yet or the coordinates fall outside the grid.
    pub fn place_local(&mut self, x: i64, y: i64, color: Color) -> Option<EditIntent> {
        let grid = self.grid.as_mut()?;
        let (cx, cy) = grid.locate(x, y)?;
        grid.set(cx, cy, color);
        self.mark_cell(cx, cy);
        Some(EditIntent::new(x, y, color))
    }

    /// Apply an edit committed by the hub, whoever made it
    pub fn apply_remote(&mut self, edit: PixelEdit) -> bool {
        let applied = self
            .grid
            .as_mut()
            .is_some_and(|grid| grid.set(edit.x, edit.y, edit.color));
        if applied {
            self.mark_cell(edit.x, edit.y);
        }
        applied
    }

    /// Apply any hub message
    pub fn apply(&mut self, message: &ServerMessage) {
        match message {
            ServerMessage::FullCanvas(grid) => self.apply_snapshot(grid.clone()),
            ServerMessage::PixelUpdate(edit) => {
                self.apply_remote(*edit);
            }
        }
    }

    /// Take the pending repaint work, leaving nothing pending
    pub fn take_redraw(&mut self) -> Redraw {
        let dirty = std::mem::take(&mut self.dirty);
        if std::mem::take(&mut self.full_redraw) {
            Redraw::Full
        } else if dirty.is_empty() {
            Redraw::None
        } else {
            Redraw::Cells(dirty.into_iter().collect())
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.grid.as_ref()?.get(x, y)
    }

    /// Dimensions learned from the last snapshot
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.grid.as_ref().map(|g| (g.width(), g.height()))
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    fn mark_cell(&mut self, x: u32, y: u32) {
        // A pending full repaint already covers the cell
        if !self.full_redraw {
            self.dirty.insert((x, y));
        }
    }
}
