//! Randomised gesture sequences checked against the grid invariants

use std::collections::BTreeSet;

use tui_jigsaw::core::connectivity::recompute;
use tui_jigsaw::core::completion::is_complete;
use tui_jigsaw::core::{Bitmap, Grid, Piece, PieceId, PieceSet, PuzzleSession, SessionOptions, SimpleRng};
use tui_jigsaw::types::{Coord, Difficulty, PuzzleConfig};

fn image() -> Bitmap {
    Bitmap::from_fn(60, 60, |x, y| [(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8])
}

fn new_session(difficulty: Difficulty, size: u8, seed: u32) -> PuzzleSession {
    let config = PuzzleConfig::preset(difficulty, size);
    let options = SessionOptions {
        seed,
        ..SessionOptions::default()
    };
    PuzzleSession::new(&image(), config, options).unwrap()
}

fn slot_centre(s: &PuzzleSession, slot: Coord) -> (f32, f32) {
    let g = s.geometry();
    let (x, y) = g.slot_origin(slot);
    (x + g.cell_size / 2.0, y + g.cell_size / 2.0)
}

fn random_slot(rng: &mut SimpleRng, size: u8) -> Coord {
    Coord::new(rng.next_range(size as u32) as u8, rng.next_range(size as u32) as u8)
}

fn locked_set(s: &PuzzleSession) -> BTreeSet<PieceId> {
    s.pieces().ids().filter(|&id| s.pieces().is_locked(id)).collect()
}

/// One random step; never calls `reset`, the only operation allowed to unlock.
fn step(s: &mut PuzzleSession, rng: &mut SimpleRng) {
    let size = s.grid().size();
    match rng.next_range(10) {
        0 => {
            s.auto_solve_one_piece();
        }
        1 => {
            s.shuffle_remaining_pieces();
        }
        2 => {
            let record = s.save_at(0);
            s.restore(&record).unwrap();
        }
        _ => {
            let (x, y) = slot_centre(s, random_slot(rng, size));
            if s.pick(x, y) {
                let (tx, ty) = slot_centre(s, random_slot(rng, size));
                s.drag(tx, ty);
                s.drop(tx, ty);
            }
        }
    }
}

#[test]
fn bijection_holds_after_every_operation() {
    for (difficulty, seed) in [
        (Difficulty::Easy, 1),
        (Difficulty::Normal, 2),
        (Difficulty::Hard, 3),
        (Difficulty::Insane, 4),
    ] {
        let mut s = new_session(difficulty, 5, seed);
        let mut rng = SimpleRng::new(seed * 7919);
        for _ in 0..300 {
            step(&mut s, &mut rng);
            assert!(s.grid().is_permutation(), "{:?} seed {}", difficulty, seed);
            assert_eq!(s.total_pieces_count(), 25);
        }
    }
}

#[test]
fn locks_are_monotonic() {
    let mut s = new_session(Difficulty::Easy, 4, 11);
    let mut rng = SimpleRng::new(5);
    let mut locked = locked_set(&s);
    for _ in 0..400 {
        step(&mut s, &mut rng);
        let now = locked_set(&s);
        assert!(locked.is_subset(&now));
        locked = now;
    }
}

#[test]
fn locked_pieces_always_sit_in_their_home_slot() {
    let mut s = new_session(Difficulty::Easy, 4, 21);
    let mut rng = SimpleRng::new(8);
    for _ in 0..200 {
        step(&mut s, &mut rng);
        for (slot, id) in s.grid().iter() {
            let piece = s.piece(id).unwrap();
            if piece.is_locked() {
                assert_eq!(piece.correct(), slot);
            }
        }
    }
}

#[test]
fn connectivity_recompute_is_idempotent() {
    let mut s = new_session(Difficulty::Hard, 5, 17);
    let mut rng = SimpleRng::new(3);
    for _ in 0..50 {
        step(&mut s, &mut rng);
        let mut once = s.pieces().clone();
        recompute(s.grid(), &mut once, true);
        let mut twice = once.clone();
        recompute(s.grid(), &mut twice, true);
        for id in once.ids() {
            assert_eq!(
                once.get(id).unwrap().connections(),
                twice.get(id).unwrap().connections()
            );
        }
    }
}

#[test]
fn connections_are_symmetric() {
    let mut s = new_session(Difficulty::Normal, 4, 29);
    let mut rng = SimpleRng::new(13);
    for _ in 0..100 {
        step(&mut s, &mut rng);
        for (id, piece) in s.pieces().iter() {
            for &other in piece.connections() {
                assert!(s.piece(other).unwrap().is_connected_to(id));
            }
        }
    }
}

#[test]
fn completion_flips_on_any_displacing_swap() {
    let size = 4;
    let mut pieces = PieceSet::new();
    for row in 0..size {
        for col in 0..size {
            pieces.push(Piece::new(Bitmap::from_fn(1, 1, |_, _| [0; 3]), Coord::new(row, col)));
        }
    }
    let grid = Grid::solved(size);
    assert!(is_complete(&grid, &pieces));

    for a in 0..16u8 {
        for b in (a + 1)..16u8 {
            let mut g = grid.clone();
            g.swap(Coord::new(a / 4, a % 4), Coord::new(b / 4, b % 4));
            assert!(!is_complete(&g, &pieces));
        }
    }
}

#[test]
fn fixed_seed_sequences_are_reproducible() {
    let run = || {
        let mut s = new_session(Difficulty::Normal, 5, 77);
        let mut rng = SimpleRng::new(77);
        for _ in 0..100 {
            step(&mut s, &mut rng);
        }
        s.grid().clone()
    };
    assert_eq!(run(), run());
}
