//! PuzzleView: maps a [`PuzzleSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Each slot is a `tile_w`×`tile_h` block of terminal cells with
//! `tile_w = 2 * tile_h`; half blocks give every cell two pixels, so a tile is
//! `tile_w`×`tile_w` image pixels and stays square on a typical 1:2 glyph.

use crate::core::{Bitmap, Geometry, PieceSet, PuzzleSnapshot, DIR_DOWN, DIR_RIGHT};
use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Where the board landed in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    /// Top-left cell of the first tile (inside the border)
    pub x: u16,
    pub y: u16,
    pub tile_w: u16,
    pub tile_h: u16,
    pub grid_size: u8,
}

impl BoardLayout {
    pub fn board_w(&self) -> u16 {
        self.tile_w * self.grid_size as u16
    }

    pub fn board_h(&self) -> u16 {
        self.tile_h * self.grid_size as u16
    }

    /// Surface pixel under the centre of terminal cell `(col, row)`.
    ///
    /// Cells outside the board map to pixels outside the grid; the session
    /// decides what that means.
    pub fn cell_to_pixel(&self, geometry: &Geometry, col: u16, row: u16) -> (f32, f32) {
        let fx = (col as f32 - self.x as f32 + 0.5) / self.tile_w as f32;
        let fy = (row as f32 - self.y as f32 + 0.5) / self.tile_h as f32;
        (
            geometry.origin_x + fx * geometry.cell_size,
            geometry.origin_y + fy * geometry.cell_size,
        )
    }

    /// Terminal cell holding surface pixel `(x, y)`, possibly off-board.
    pub fn pixel_to_cell(&self, geometry: &Geometry, x: f32, y: f32) -> (i32, i32) {
        let fx = (x - geometry.origin_x) / geometry.cell_size;
        let fy = (y - geometry.origin_y) / geometry.cell_size;
        (
            self.x as i32 + (fx * self.tile_w as f32).round() as i32,
            self.y as i32 + (fy * self.tile_h as f32).round() as i32,
        )
    }
}

/// Renders the board, a floating dragged piece and a status panel.
pub struct PuzzleView {
    panel_w: u16,
    seam: f32,
    dim: f32,
}

impl Default for PuzzleView {
    fn default() -> Self {
        Self {
            panel_w: 22,
            seam: 0.55,
            dim: 0.45,
        }
    }
}

const BG: Rgb = Rgb::new(24, 24, 32);

fn border_style() -> CellStyle {
    CellStyle::plain(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0))
}

fn label_style() -> CellStyle {
    CellStyle {
        bold: true,
        ..CellStyle::default()
    }
}

fn value_style() -> CellStyle {
    CellStyle::plain(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0))
}

impl PuzzleView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest square tiles that fit next to the side panel.
    pub fn layout(&self, grid_size: u8, viewport: Viewport) -> BoardLayout {
        let n = grid_size.max(1) as u16;
        let avail_w = viewport.width.saturating_sub(self.panel_w + 4);
        let avail_h = viewport.height.saturating_sub(2);
        let tile_h = (avail_h / n).min(avail_w / (2 * n)).max(1);
        let tile_w = tile_h * 2;

        let frame_w = tile_w * n + 2;
        let frame_h = tile_h * n + 2;
        let total_w = frame_w + 2 + self.panel_w;
        let start_x = viewport.width.saturating_sub(total_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;
        BoardLayout {
            x: start_x + 1,
            y: start_y + 1,
            tile_w,
            tile_h,
            grid_size: grid_size.max(1),
        }
    }

    /// Render into an existing framebuffer.
    ///
    /// `pieces` supplies tile images, indexed by the ids in `snap`. `sample`
    /// is the full image for the reference thumbnail, `None` to hide it.
    pub fn render_into(
        &self,
        snap: &PuzzleSnapshot,
        pieces: &PieceSet,
        sample: Option<&Bitmap>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));
        if snap.grid_size == 0 {
            fb.put_str(1, 0, "loading...", value_style());
            return;
        }

        let layout = self.layout(snap.grid_size, viewport);
        let frame_x = layout.x - 1;
        let frame_y = layout.y - 1;
        let frame_w = layout.board_w() + 2;
        let frame_h = layout.board_h() + 2;

        fb.fill_rect(
            layout.x,
            layout.y,
            layout.board_w(),
            layout.board_h(),
            ' ',
            CellStyle::plain(BG, BG),
        );
        fb.draw_border(frame_x, frame_y, frame_w, frame_h, border_style());

        let dragged = snap.drag.map(|d| d.piece);
        let dim_locked = snap.dim_locked;
        for (i, slot) in snap.slots.iter().enumerate() {
            if Some(slot.piece) == dragged {
                continue;
            }
            let Some(piece) = pieces.get(slot.piece) else {
                continue;
            };
            let n = snap.grid_size as usize;
            let x = layout.x + (i % n) as u16 * layout.tile_w;
            let y = layout.y + (i / n) as u16 * layout.tile_h;
            let shade = if dim_locked && slot.locked { self.dim } else { 1.0 };
            let seam_right = !slot.links[DIR_RIGHT] && i % n + 1 < n;
            let seam_down = !slot.links[DIR_DOWN] && i / n + 1 < n;
            self.draw_tile(fb, &layout, x as i32, y as i32, piece.image(), shade, seam_right, seam_down);
        }

        if let (Some(drag), Some(geometry)) = (snap.drag, snap.geometry) {
            if let Some(piece) = pieces.get(drag.piece) {
                let (cx, cy) = layout.pixel_to_cell(&geometry, drag.x, drag.y);
                self.draw_tile(fb, &layout, cx, cy, piece.image(), 1.0, true, true);
            }
        }

        self.draw_side_panel(fb, snap, sample, viewport, frame_x + frame_w + 2, frame_y);

        if snap.complete {
            self.draw_overlay_text(fb, frame_x, frame_y, frame_w, frame_h, " COMPLETE ");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &PuzzleSnapshot,
        pieces: &PieceSet,
        sample: Option<&Bitmap>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, pieces, sample, viewport, &mut fb);
        fb
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        layout: &BoardLayout,
        x: i32,
        y: i32,
        image: &Bitmap,
        shade: f32,
        seam_right: bool,
        seam_down: bool,
    ) {
        let w = layout.tile_w as u32;
        let px_h = layout.tile_h as u32 * 2;
        for row in 0..layout.tile_h as u32 {
            for col in 0..w {
                let (cx, cy) = (x + col as i32, y + row as i32);
                if cx < 0 || cy < 0 {
                    continue;
                }
                let edge_right = seam_right && col + 1 == w;
                let pixel = |sub: u32| {
                    let u = (col as f32 + 0.5) / w as f32;
                    let v = (sub as f32 + 0.5) / px_h as f32;
                    let mut f = shade;
                    if edge_right || (seam_down && sub + 1 == px_h) {
                        f *= self.seam;
                    }
                    Rgb::from_pixel(image.sample(u, v)).scaled(f)
                };
                fb.put_pixels(cx as u16, cy as u16, pixel(row * 2), pixel(row * 2 + 1));
            }
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &PuzzleSnapshot,
        sample: Option<&Bitmap>,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }
        let label = label_style();
        let value = value_style();

        let mut y = start_y;
        fb.put_str(panel_x, y, "LEVEL", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.level, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "CORRECT", label);
        y = y.saturating_add(1);
        let w = fb.put_u32(panel_x, y, snap.correct, value);
        fb.put_char(panel_x + w, y, '/', value);
        fb.put_u32(panel_x + w + 1, y, snap.total, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LOCKED", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.locked, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "REMAINING", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.remaining(), value);
        y = y.saturating_add(2);

        if let Some(image) = sample {
            fb.put_str(panel_x, y, "SAMPLE", label);
            y = y.saturating_add(1);
            let side = (self.panel_w / 2).min(viewport.height.saturating_sub(y + 8) * 2);
            if side >= 4 {
                self.draw_thumbnail(fb, image, panel_x, y, side);
                y = y.saturating_add(side / 2 + 1);
            }
        }

        let keys = CellStyle { dim: true, ..value };
        for line in ["h hint  s shuffle", "w save  r reset", "t sample  q quit"] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, keys);
            y = y.saturating_add(1);
        }
    }

    fn draw_thumbnail(&self, fb: &mut FrameBuffer, image: &Bitmap, x: u16, y: u16, side: u16) {
        let rows = side / 2;
        for row in 0..rows {
            for col in 0..side {
                let u = (col as f32 + 0.5) / side as f32;
                let top = (row as f32 * 2.0 + 0.5) / side as f32;
                let bottom = (row as f32 * 2.0 + 1.5) / side as f32;
                fb.put_pixels(
                    x + col,
                    y + row,
                    Rgb::from_pixel(image.sample(u, top)),
                    Rgb::from_pixel(image.sample(u, bottom)),
                );
            }
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        fb.put_str(x, mid_y, text, style);
    }
}
