//! Lock engine - promotes correctly placed pieces to locked.
//!
//! Locking is monotonic: nothing here ever clears a lock flag.

use crate::grid::Grid;
use crate::pieces::{PieceId, PieceSet};

/// Lock every unlocked piece sitting in its correct slot.
///
/// Returns the pieces that became locked, in row-major slot order.
pub fn apply_auto_lock(grid: &Grid, pieces: &mut PieceSet) -> Vec<PieceId> {
    let mut newly_locked = Vec::new();
    for (slot, id) in grid.iter() {
        let in_place = pieces.get(id).map(|p| p.correct() == slot).unwrap_or(false);
        if in_place && pieces.lock(id) {
            newly_locked.push(id);
        }
    }
    newly_locked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use crate::pieces::Piece;
    use crate::types::Coord;

    fn pieces(size: u8) -> PieceSet {
        let mut set = PieceSet::new();
        for row in 0..size {
            for col in 0..size {
                set.push(Piece::new(Bitmap::from_fn(1, 1, |_, _| [0; 3]), Coord::new(row, col)));
            }
        }
        set
    }

    #[test]
    fn locks_only_correct_pieces() {
        let mut grid = Grid::solved(2);
        grid.swap(Coord::new(0, 0), Coord::new(0, 1));
        let mut set = pieces(2);
        let locked = apply_auto_lock(&grid, &mut set);
        assert_eq!(locked, vec![PieceId(2), PieceId(3)]);
        assert!(!set.is_locked(PieceId(0)));
    }

    #[test]
    fn second_pass_locks_nothing_new() {
        let grid = Grid::solved(2);
        let mut set = pieces(2);
        assert_eq!(apply_auto_lock(&grid, &mut set).len(), 4);
        assert!(apply_auto_lock(&grid, &mut set).is_empty());
    }

    #[test]
    fn displaced_locked_piece_stays_locked() {
        let mut grid = Grid::solved(2);
        let mut set = pieces(2);
        apply_auto_lock(&grid, &mut set);
        grid.swap(Coord::new(0, 0), Coord::new(1, 1));
        apply_auto_lock(&grid, &mut set);
        assert_eq!(set.locked_count(), 4);
    }
}
