//! Grid module - the N×N slot array
//!
//! The grid is a flat, row-major array of piece ids. After construction every
//! slot holds exactly one piece and every piece sits in exactly one slot; the
//! only mutation that keeps this true unconditionally is [`Grid::swap`], which
//! is what gameplay uses. [`Grid::set`] exists for restore and tests and callers
//! are responsible for re-establishing the permutation.

use crate::pieces::PieceId;
use crate::rng::SimpleRng;
use crate::types::Coord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: u8,
    /// Flat array of slots, row-major order (row * size + col)
    slots: Vec<PieceId>,
}

impl Grid {
    /// Grid with piece `i` in slot `i` (the solved arrangement when pieces were
    /// created row-major).
    pub fn solved(size: u8) -> Self {
        let n = (size as usize) * (size as usize);
        Self {
            size,
            slots: (0..n).map(PieceId).collect(),
        }
    }

    /// Build from an explicit row-major slot list. Returns `None` unless the list
    /// is a permutation of `0..size²`.
    pub fn from_slots(size: u8, slots: Vec<PieceId>) -> Option<Self> {
        let n = (size as usize) * (size as usize);
        if slots.len() != n {
            return None;
        }
        let mut seen = vec![false; n];
        for id in &slots {
            if id.0 >= n || seen[id.0] {
                return None;
            }
            seen[id.0] = true;
        }
        Some(Self { size, slots })
    }

    /// Calculate flat index from (row, col)
    #[inline(always)]
    fn index(&self, row: u8, col: u8) -> Option<usize> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some((row as usize) * (self.size as usize) + (col as usize))
    }

    #[inline(always)]
    fn coord_of(&self, idx: usize) -> Coord {
        let size = self.size as usize;
        Coord::new((idx / size) as u8, (idx % size) as u8)
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, slot: Coord) -> bool {
        slot.row < self.size && slot.col < self.size
    }

    /// Piece in slot (row, col); `None` if out of bounds
    pub fn get(&self, row: u8, col: u8) -> Option<PieceId> {
        self.index(row, col).map(|i| self.slots[i])
    }

    pub fn at(&self, slot: Coord) -> Option<PieceId> {
        self.get(slot.row, slot.col)
    }

    /// Overwrite a slot. Returns false if out of bounds.
    pub fn set(&mut self, row: u8, col: u8, piece: PieceId) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.slots[i] = piece;
                true
            }
            None => false,
        }
    }

    /// Exchange the contents of two slots. Returns false (and does nothing) if
    /// either slot is out of bounds.
    pub fn swap(&mut self, a: Coord, b: Coord) -> bool {
        match (self.index(a.row, a.col), self.index(b.row, b.col)) {
            (Some(i), Some(j)) => {
                self.slots.swap(i, j);
                true
            }
            _ => false,
        }
    }

    /// Visit every slot in row-major order
    pub fn for_each(&self, mut visitor: impl FnMut(Coord, PieceId)) {
        for (i, &id) in self.slots.iter().enumerate() {
            visitor(self.coord_of(i), id);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, PieceId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, &id)| (self.coord_of(i), id))
    }

    /// Current slot of a piece
    pub fn position_of(&self, piece: PieceId) -> Option<Coord> {
        self.slots
            .iter()
            .position(|&id| id == piece)
            .map(|i| self.coord_of(i))
    }

    pub fn slots(&self) -> &[PieceId] {
        &self.slots
    }

    /// Right neighbour slot
    pub fn right_of(&self, slot: Coord) -> Option<Coord> {
        (slot.col + 1 < self.size && slot.row < self.size)
            .then(|| Coord::new(slot.row, slot.col + 1))
    }

    /// Bottom neighbour slot
    pub fn below(&self, slot: Coord) -> Option<Coord> {
        (slot.row + 1 < self.size && slot.col < self.size)
            .then(|| Coord::new(slot.row + 1, slot.col))
    }

    /// Uniformly permute every piece over every slot.
    ///
    /// A result that happens to be solved is accepted.
    pub fn shuffle(&mut self, rng: &mut SimpleRng) {
        rng.shuffle(&mut self.slots);
    }

    /// Uniformly permute only the pieces in `slots` among those same slots.
    pub fn shuffle_subset(&mut self, slots: &[Coord], rng: &mut SimpleRng) {
        let indices: Vec<usize> = slots
            .iter()
            .filter_map(|s| self.index(s.row, s.col))
            .collect();
        let mut pieces: Vec<PieceId> = indices.iter().map(|&i| self.slots[i]).collect();
        rng.shuffle(&mut pieces);
        for (&i, id) in indices.iter().zip(pieces) {
            self.slots[i] = id;
        }
    }

    /// True if every piece id `0..len` appears exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut seen = vec![false; self.slots.len()];
        for id in &self.slots {
            match seen.get_mut(id.0) {
                Some(s) if !*s => *s = true,
                _ => return false,
            }
        }
        true
    }
}
