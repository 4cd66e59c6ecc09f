//! Grid, piece arena and connectivity tests

use tui_jigsaw::core::connectivity::{connected_group, groups, recompute};
use tui_jigsaw::core::{Bitmap, Grid, Piece, PieceId, PieceSet, SimpleRng};
use tui_jigsaw::types::Coord;

fn pieces(size: u8) -> PieceSet {
    let mut set = PieceSet::new();
    for row in 0..size {
        for col in 0..size {
            set.push(Piece::new(Bitmap::from_fn(2, 2, |_, _| [row, col, 0]), Coord::new(row, col)));
        }
    }
    set
}

#[test]
fn test_solved_grid_maps_slots_to_matching_pieces() {
    let grid = Grid::solved(4);
    let set = pieces(4);
    assert_eq!(grid.len(), 16);
    for (slot, id) in grid.iter() {
        assert_eq!(set.get(id).unwrap().correct(), slot);
    }
}

#[test]
fn test_out_of_bounds_access() {
    let mut grid = Grid::solved(3);
    assert_eq!(grid.get(3, 0), None);
    assert_eq!(grid.at(Coord::new(0, 3)), None);
    assert!(!grid.swap(Coord::new(0, 0), Coord::new(5, 5)));
    assert!(!grid.set(9, 9, PieceId(0)));
    assert!(grid.is_permutation());
}

#[test]
fn test_from_slots_requires_permutation() {
    assert!(Grid::from_slots(2, vec![PieceId(0), PieceId(0), PieceId(1), PieceId(2)]).is_none());
    assert!(Grid::from_slots(2, vec![PieceId(0), PieceId(1), PieceId(2)]).is_none());
    let grid = Grid::from_slots(2, vec![PieceId(3), PieceId(2), PieceId(1), PieceId(0)]).unwrap();
    assert_eq!(grid.position_of(PieceId(3)), Some(Coord::new(0, 0)));
}

#[test]
fn test_shuffle_subset_leaves_other_slots_alone() {
    let mut grid = Grid::solved(4);
    let movable = [Coord::new(0, 0), Coord::new(1, 1), Coord::new(2, 2), Coord::new(3, 3)];
    let mut rng = SimpleRng::new(99);
    for _ in 0..20 {
        grid.shuffle_subset(&movable, &mut rng);
        for (slot, id) in grid.iter() {
            if !movable.contains(&slot) {
                assert_eq!(id.index(), slot.row as usize * 4 + slot.col as usize);
            }
        }
        assert!(grid.is_permutation());
    }
}

#[test]
fn test_solved_grid_connects_every_neighbour_pair() {
    let grid = Grid::solved(4);
    let mut set = pieces(4);
    recompute(&grid, &mut set, true);
    // 2 * n * (n - 1) undirected edges
    assert_eq!(set.edge_count(), 24);
    assert_eq!(connected_group(&set, PieceId(0)).len(), 16);
    assert_eq!(groups(&set).len(), 1);
}

#[test]
fn test_auto_connect_off_leaves_no_edges() {
    let grid = Grid::solved(3);
    let mut set = pieces(3);
    recompute(&grid, &mut set, false);
    assert_eq!(set.edge_count(), 0);
    assert_eq!(groups(&set).len(), 9);
}

#[test]
fn test_offset_pair_connects_away_from_home() {
    // Pieces (0,0) and (0,1) side by side in the bottom row.
    let mut grid = Grid::solved(3);
    grid.swap(Coord::new(0, 0), Coord::new(2, 0));
    grid.swap(Coord::new(0, 1), Coord::new(2, 1));
    let mut set = pieces(3);
    recompute(&grid, &mut set, true);

    let a = set.find_by_correct(Coord::new(0, 0)).unwrap();
    let b = set.find_by_correct(Coord::new(0, 1)).unwrap();
    assert!(set.get(a).unwrap().is_connected_to(b));
    assert!(set.get(b).unwrap().is_connected_to(a));
    let group = connected_group(&set, a);
    assert_eq!(group[0], a);
    assert_eq!(group.len(), 2);
}
