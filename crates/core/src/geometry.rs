//! Pixel geometry of the grid.
//!
//! Pointer coordinates and saved positions are in surface pixels. The grid is a
//! square of `cell_size * grid_size` pixels anchored at `(origin_x, origin_y)`.

use crate::error::{PuzzleError, Result};
use crate::types::Coord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub origin_x: f32,
    pub origin_y: f32,
    pub cell_size: f32,
    pub grid_size: u8,
}

impl Geometry {
    /// Lay a `grid_size`×`grid_size` grid over a square surface of `surface` pixels.
    ///
    /// `cell_size = floor(surface / grid_size)`; a cell size of zero is refused.
    pub fn new(surface: u32, grid_size: u8) -> Result<Self> {
        Self::with_origin(surface, grid_size, 0.0, 0.0)
    }

    pub fn with_origin(surface: u32, grid_size: u8, origin_x: f32, origin_y: f32) -> Result<Self> {
        if grid_size == 0 {
            return Err(PuzzleError::InvalidGridSize(grid_size));
        }
        let cell = surface / grid_size as u32;
        if cell == 0 {
            return Err(PuzzleError::ZeroSurface { surface, grid_size });
        }
        Ok(Self {
            origin_x,
            origin_y,
            cell_size: cell as f32,
            grid_size,
        })
    }

    /// Side length of the whole grid in pixels
    pub fn grid_pixels(&self) -> f32 {
        self.cell_size * self.grid_size as f32
    }

    /// Top-left pixel of a slot
    pub fn slot_origin(&self, slot: Coord) -> (f32, f32) {
        (
            self.origin_x + slot.col as f32 * self.cell_size,
            self.origin_y + slot.row as f32 * self.cell_size,
        )
    }

    /// Slot containing a pixel, or `None` if the pixel is outside the grid.
    pub fn slot_at(&self, x: f32, y: f32) -> Option<Coord> {
        let col = ((x - self.origin_x) / self.cell_size).floor();
        let row = ((y - self.origin_y) / self.cell_size).floor();
        self.checked_slot(row, col)
    }

    /// Slot whose top-left corner is nearest to `(x, y)`, clamped into the grid.
    pub fn nearest_slot_clamped(&self, x: f32, y: f32) -> Coord {
        let max = (self.grid_size - 1) as f32;
        let col = ((x - self.origin_x) / self.cell_size).round().clamp(0.0, max);
        let row = ((y - self.origin_y) / self.cell_size).round().clamp(0.0, max);
        Coord::new(row as u8, col as u8)
    }

    /// Slot whose top-left corner is nearest to `(x, y)`, or `None` when that slot
    /// would fall outside the grid.
    pub fn nearest_slot(&self, x: f32, y: f32) -> Option<Coord> {
        let col = ((x - self.origin_x) / self.cell_size).round();
        let row = ((y - self.origin_y) / self.cell_size).round();
        self.checked_slot(row, col)
    }

    fn checked_slot(&self, row: f32, col: f32) -> Option<Coord> {
        let n = self.grid_size as f32;
        if !row.is_finite() || !col.is_finite() {
            return None;
        }
        if row < 0.0 || col < 0.0 || row >= n || col >= n {
            return None;
        }
        Some(Coord::new(row as u8, col as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_size_is_floored() {
        let g = Geometry::new(100, 3).unwrap();
        assert_eq!(g.cell_size, 33.0);
        assert_eq!(g.grid_pixels(), 99.0);
    }

    #[test]
    fn zero_surface_is_refused() {
        assert_eq!(
            Geometry::new(0, 3),
            Err(PuzzleError::ZeroSurface {
                surface: 0,
                grid_size: 3
            })
        );
        assert!(matches!(
            Geometry::new(2, 3),
            Err(PuzzleError::ZeroSurface { .. })
        ));
        assert_eq!(Geometry::new(10, 0), Err(PuzzleError::InvalidGridSize(0)));
    }

    #[test]
    fn slot_at_respects_bounds_and_origin() {
        let g = Geometry::with_origin(30, 3, 5.0, 5.0).unwrap();
        assert_eq!(g.slot_at(5.0, 5.0), Some(Coord::new(0, 0)));
        assert_eq!(g.slot_at(34.9, 16.0), Some(Coord::new(1, 2)));
        assert_eq!(g.slot_at(4.9, 10.0), None);
        assert_eq!(g.slot_at(35.0, 10.0), None);
        assert_eq!(g.slot_at(f32::NAN, 10.0), None);
    }

    #[test]
    fn nearest_slot_rounds_and_clamps() {
        let g = Geometry::new(30, 3).unwrap();
        assert_eq!(g.nearest_slot_clamped(14.0, 16.0), Coord::new(2, 1));
        assert_eq!(g.nearest_slot_clamped(-50.0, 500.0), Coord::new(2, 0));
        assert_eq!(g.nearest_slot(29.0, 0.0), None);
        assert_eq!(g.nearest_slot(20.0, 10.0), Some(Coord::new(1, 2)));
    }
}
