//! Connectivity engine
//!
//! Two horizontally or vertically adjacent slots are connected when the pieces
//! they hold are offset in the solved image exactly as the slots are offset in
//! the grid. Connections are derived state: after any grid mutation the whole
//! graph is rebuilt with [`recompute`]. Groups are computed on demand.

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::pieces::{PieceId, PieceSet};
use crate::types::Coord;

/// True if `a` (at `a_slot`) and `b` (at `b_slot`) sit with the same row/col
/// delta as in the solved image.
pub fn is_connectable(pieces: &PieceSet, a: PieceId, a_slot: Coord, b: PieceId, b_slot: Coord) -> bool {
    let (Some(pa), Some(pb)) = (pieces.get(a), pieces.get(b)) else {
        return false;
    };
    let slot_dr = b_slot.row as i16 - a_slot.row as i16;
    let slot_dc = b_slot.col as i16 - a_slot.col as i16;
    let correct_dr = pb.correct().row as i16 - pa.correct().row as i16;
    let correct_dc = pb.correct().col as i16 - pa.correct().col as i16;
    slot_dr == correct_dr && slot_dc == correct_dc
}

/// Rebuild every connection from the current placement.
///
/// Each undirected edge is tested once, from the left/top slot towards its
/// right/bottom neighbour. Lock state does not matter. With `auto_connect`
/// disabled the graph is simply left empty.
pub fn recompute(grid: &Grid, pieces: &mut PieceSet, auto_connect: bool) {
    pieces.clear_connections();
    if !auto_connect {
        return;
    }

    for (slot, id) in grid.iter() {
        for neighbor_slot in [grid.right_of(slot), grid.below(slot)].into_iter().flatten() {
            let Some(neighbor) = grid.at(neighbor_slot) else {
                continue;
            };
            if is_connectable(pieces, id, slot, neighbor, neighbor_slot) {
                pieces.connect(id, neighbor);
            }
        }
    }
}

/// Reachability closure of `start` under the connection edges, breadth-first.
///
/// The start piece is always the first element.
pub fn connected_group(pieces: &PieceSet, start: PieceId) -> Vec<PieceId> {
    if pieces.get(start).is_none() {
        return Vec::new();
    }
    let mut visited = vec![false; pieces.len()];
    let mut queue = VecDeque::new();
    let mut group = Vec::new();
    visited[start.0] = true;
    queue.push_back(start);

    while let Some(id) = queue.pop_front() {
        group.push(id);
        let Some(piece) = pieces.get(id) else {
            continue;
        };
        for &next in piece.connections() {
            if let Some(seen) = visited.get_mut(next.0) {
                if !*seen {
                    *seen = true;
                    queue.push_back(next);
                }
            }
        }
    }
    group
}

/// Partition every piece into connected groups (each sorted by id).
pub fn groups(pieces: &PieceSet) -> Vec<Vec<PieceId>> {
    let mut assigned = vec![false; pieces.len()];
    let mut out = Vec::new();
    for id in pieces.ids() {
        if assigned[id.0] {
            continue;
        }
        let mut group = connected_group(pieces, id);
        for member in &group {
            assigned[member.0] = true;
        }
        group.sort_unstable();
        out.push(group);
    }
    out
}
