//! Move controller - turns a pick → drag → drop gesture into a grid mutation.
//!
//! Two states per gesture: `Idle` and `Dragging`. The grid is never touched
//! while dragging; the only mutation happens on drop.
//!
//! # Group policy
//!
//! Multi-piece connected groups are never relocated as a unit. When the
//! dragged piece belongs to a larger group it is disconnected from its
//! neighbours and swapped on its own. [`can_move_group`] is the single place
//! that decides this.

use crate::connectivity::connected_group;
use crate::geometry::Geometry;
use crate::grid::Grid;
use crate::pieces::{PieceId, PieceSet};
use crate::types::Coord;

/// Transient state between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub piece: PieceId,
    pub origin: Coord,
    /// Pointer position relative to the origin slot's top-left at pick time
    pub offset_x: f32,
    pub offset_y: f32,
    /// Last pointer position
    pub x: f32,
    pub y: f32,
}

impl DragSession {
    /// Top-left pixel where the dragged piece should be drawn.
    pub fn piece_origin(&self) -> (f32, f32) {
        (self.x - self.offset_x, self.y - self.offset_y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Grid mutation performed by a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub piece: PieceId,
    pub from: Coord,
    pub to: Coord,
    /// Size of the dragged piece's connected group before the move
    pub group_size: usize,
    /// The dragged piece was split off a larger group
    pub group_broken: bool,
}

/// Whether a connected group may be relocated intact.
///
/// Only singleton groups qualify, so larger groups are always broken apart.
pub fn can_move_group(group: &[PieceId]) -> bool {
    group.len() == 1
}

#[derive(Debug, Clone, Default)]
pub struct MoveController {
    state: DragState,
}

impl MoveController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(s) => Some(s),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Pointer-down. Starts a drag if `(x, y)` is inside the grid on an unlocked
    /// piece. Returns whether a drag session started.
    pub fn pick(&mut self, grid: &Grid, pieces: &PieceSet, geometry: &Geometry, x: f32, y: f32) -> bool {
        if self.is_dragging() {
            return false;
        }
        let Some(origin) = geometry.slot_at(x, y) else {
            return false;
        };
        let Some(piece) = grid.at(origin) else {
            return false;
        };
        if pieces.is_locked(piece) {
            return false;
        }
        let (sx, sy) = geometry.slot_origin(origin);
        self.state = DragState::Dragging(DragSession {
            piece,
            origin,
            offset_x: x - sx,
            offset_y: y - sy,
            x,
            y,
        });
        true
    }

    /// Pointer-move. Only the rendered position changes.
    pub fn drag(&mut self, x: f32, y: f32) -> bool {
        match &mut self.state {
            DragState::Dragging(s) => {
                s.x = x;
                s.y = y;
                true
            }
            DragState::Idle => false,
        }
    }

    /// Abandon the current gesture without touching the grid.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Pointer-up. Always ends the gesture; returns the mutation if one happened.
    ///
    /// The target is the slot nearest to the dragged piece's top-left corner,
    /// clamped into the grid. Dropping back on the origin, or onto a locked
    /// piece, leaves the grid untouched.
    pub fn drop(
        &mut self,
        grid: &mut Grid,
        pieces: &mut PieceSet,
        geometry: &Geometry,
        x: f32,
        y: f32,
    ) -> Option<MoveResult> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };

        if grid.at(session.origin) != Some(session.piece) {
            return None;
        }

        let target = geometry.nearest_slot_clamped(x - session.offset_x, y - session.offset_y);
        if target == session.origin {
            return None;
        }
        let occupant = grid.at(target)?;
        if pieces.is_locked(occupant) {
            return None;
        }

        let group = connected_group(pieces, session.piece);
        let group_broken = group.len() > 1 && !can_move_group(&group);
        if group_broken {
            pieces.disconnect(session.piece);
        }
        grid.swap(session.origin, target);

        Some(MoveResult {
            piece: session.piece,
            from: session.origin,
            to: target,
            group_size: group.len(),
            group_broken,
        })
    }
}
