use crate::geometry::Geometry;
use crate::pieces::PieceId;
use crate::types::Coord;

/// Direction indices into [`SlotSnapshot::links`]
pub const DIR_UP: usize = 0;
pub const DIR_RIGHT: usize = 1;
pub const DIR_DOWN: usize = 2;
pub const DIR_LEFT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSnapshot {
    pub piece: PieceId,
    pub correct: Coord,
    pub locked: bool,
    /// Connected to the neighbouring slot's piece, indexed by `DIR_*`
    pub links: [bool; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSnapshot {
    pub piece: PieceId,
    pub origin: Coord,
    /// Top-left pixel of the floating piece
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleSnapshot {
    pub grid_size: u8,
    pub level: u32,
    pub geometry: Option<Geometry>,
    /// Locked pieces should be drawn dimmed
    pub dim_locked: bool,
    /// Row-major
    pub slots: Vec<SlotSnapshot>,
    pub drag: Option<DragSnapshot>,
    pub correct: u32,
    pub locked: u32,
    pub total: u32,
    pub complete: bool,
}

impl PuzzleSnapshot {
    pub fn clear(&mut self) {
        self.grid_size = 0;
        self.level = 0;
        self.geometry = None;
        self.dim_locked = false;
        self.slots.clear();
        self.drag = None;
        self.correct = 0;
        self.locked = 0;
        self.total = 0;
        self.complete = false;
    }

    pub fn slot(&self, slot: Coord) -> Option<&SlotSnapshot> {
        if slot.row >= self.grid_size || slot.col >= self.grid_size {
            return None;
        }
        self.slots
            .get(slot.row as usize * self.grid_size as usize + slot.col as usize)
    }

    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.correct)
    }

    pub fn playable(&self) -> bool {
        !self.complete
    }
}

impl Default for PuzzleSnapshot {
    fn default() -> Self {
        Self {
            grid_size: 0,
            level: 0,
            geometry: None,
            dim_locked: false,
            slots: Vec::new(),
            drag: None,
            correct: 0,
            locked: 0,
            total: 0,
            complete: false,
        }
    }
}
