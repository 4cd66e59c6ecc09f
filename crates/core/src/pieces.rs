//! Pieces module - the piece arena
//!
//! Every piece is created once when an image is sliced and lives in a
//! [`PieceSet`] for the rest of the session. Pieces are addressed by a stable
//! [`PieceId`]; connections are stored as id sets, so the connection graph
//! never holds references into the arena.

use std::collections::BTreeSet;

use crate::bitmap::Bitmap;
use crate::types::Coord;

/// Stable index of a piece in its [`PieceSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub usize);

impl PieceId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One tile of the sliced image.
#[derive(Debug, Clone)]
pub struct Piece {
    image: Bitmap,
    correct: Coord,
    pub(crate) locked: bool,
    pub(crate) connections: BTreeSet<PieceId>,
}

impl Piece {
    pub fn new(image: Bitmap, correct: Coord) -> Self {
        Self {
            image,
            correct,
            locked: false,
            connections: BTreeSet::new(),
        }
    }

    pub fn image(&self) -> &Bitmap {
        &self.image
    }

    /// Slot this piece occupied in the unshuffled image
    pub fn correct(&self) -> Coord {
        self.correct
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn connections(&self) -> &BTreeSet<PieceId> {
        &self.connections
    }

    pub fn is_connected_to(&self, other: PieceId) -> bool {
        self.connections.contains(&other)
    }
}

/// Arena owning every piece of a puzzle.
#[derive(Debug, Clone, Default)]
pub struct PieceSet {
    pieces: Vec<Piece>,
}

impl PieceSet {
    pub fn new() -> Self {
        Self { pieces: Vec::new() }
    }

    /// Add a piece and return its id.
    pub fn push(&mut self, piece: Piece) -> PieceId {
        self.pieces.push(piece);
        PieceId(self.pieces.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0)
    }

    pub fn ids(&self) -> impl Iterator<Item = PieceId> + '_ {
        (0..self.pieces.len()).map(PieceId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces.iter().enumerate().map(|(i, p)| (PieceId(i), p))
    }

    /// Find a piece by its correct coordinates.
    pub fn find_by_correct(&self, correct: Coord) -> Option<PieceId> {
        self.pieces
            .iter()
            .position(|p| p.correct == correct)
            .map(PieceId)
    }

    pub fn is_locked(&self, id: PieceId) -> bool {
        self.get(id).map(|p| p.locked).unwrap_or(false)
    }

    /// Lock a piece. Returns true if it was not locked before.
    pub fn lock(&mut self, id: PieceId) -> bool {
        match self.pieces.get_mut(id.0) {
            Some(p) if !p.locked => {
                p.locked = true;
                true
            }
            _ => false,
        }
    }

    /// Clear every lock flag. Only a full reset does this.
    pub(crate) fn unlock_all(&mut self) {
        for p in &mut self.pieces {
            p.locked = false;
        }
    }

    pub(crate) fn set_locked(&mut self, id: PieceId, locked: bool) {
        if let Some(p) = self.pieces.get_mut(id.0) {
            p.locked = locked;
        }
    }

    /// Add an undirected edge. Both endpoints always see each other.
    pub fn connect(&mut self, a: PieceId, b: PieceId) {
        if a == b || a.0 >= self.pieces.len() || b.0 >= self.pieces.len() {
            return;
        }
        self.pieces[a.0].connections.insert(b);
        self.pieces[b.0].connections.insert(a);
    }

    /// Remove every edge touching `id`, on both ends.
    pub fn disconnect(&mut self, id: PieceId) {
        let Some(piece) = self.pieces.get_mut(id.0) else {
            return;
        };
        let neighbors = std::mem::take(&mut piece.connections);
        for other in neighbors {
            if let Some(p) = self.pieces.get_mut(other.0) {
                p.connections.remove(&id);
            }
        }
    }

    pub fn clear_connections(&mut self) {
        for p in &mut self.pieces {
            p.connections.clear();
        }
    }

    pub fn locked_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.locked).count()
    }

    /// Number of undirected connection edges
    pub fn edge_count(&self) -> usize {
        self.pieces.iter().map(|p| p.connections.len()).sum::<usize>() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(n: u8) -> PieceSet {
        let mut set = PieceSet::new();
        for i in 0..n {
            set.push(Piece::new(Bitmap::from_fn(1, 1, |_, _| [i, 0, 0]), Coord::new(0, i)));
        }
        set
    }

    #[test]
    fn connections_are_symmetric() {
        let mut set = set_of(3);
        set.connect(PieceId(0), PieceId(1));
        assert!(set.get(PieceId(0)).unwrap().is_connected_to(PieceId(1)));
        assert!(set.get(PieceId(1)).unwrap().is_connected_to(PieceId(0)));
        assert_eq!(set.edge_count(), 1);
    }

    #[test]
    fn self_edges_are_ignored() {
        let mut set = set_of(1);
        set.connect(PieceId(0), PieceId(0));
        assert_eq!(set.edge_count(), 0);
    }

    #[test]
    fn disconnect_removes_both_ends() {
        let mut set = set_of(3);
        set.connect(PieceId(0), PieceId(1));
        set.connect(PieceId(1), PieceId(2));
        set.disconnect(PieceId(1));
        assert!(set.iter().all(|(_, p)| p.connections().is_empty()));
    }

    #[test]
    fn lock_reports_first_transition_only() {
        let mut set = set_of(2);
        assert!(set.lock(PieceId(1)));
        assert!(!set.lock(PieceId(1)));
        assert!(!set.lock(PieceId(9)));
        assert_eq!(set.locked_count(), 1);
    }

    #[test]
    fn find_by_correct_coordinates() {
        let set = set_of(3);
        assert_eq!(set.find_by_correct(Coord::new(0, 2)), Some(PieceId(2)));
        assert_eq!(set.find_by_correct(Coord::new(1, 0)), None);
    }
}
