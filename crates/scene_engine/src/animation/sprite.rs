//! Sprite sheets and cell-stepping sprite animations

use crate::foundation::collections::TextureKey;
use crate::render::{MatrixGuard, MeshHandle, RenderBackend, RenderState, SpriteDraw};
use crate::scene::Drawable;

/// Texture divided into a grid of `size_m` columns by `size_n` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSheet {
    texture: TextureKey,
    size_m: u32,
    size_n: u32,
}

impl SpriteSheet {
    /// Create a sheet; zero dimensions are raised to one
    pub fn new(texture: TextureKey, size_m: u32, size_n: u32) -> Self {
        Self {
            texture,
            size_m: size_m.max(1),
            size_n: size_n.max(1),
        }
    }

    /// Sheet texture
    pub fn texture(&self) -> TextureKey {
        self.texture
    }

    /// Layout as `(columns, rows)`
    pub fn grid(&self) -> (u32, u32) {
        (self.size_m, self.size_n)
    }

    /// Total number of cells, saturating at `u32::MAX`
    pub fn cell_count(&self) -> u32 {
        self.size_m.saturating_mul(self.size_n)
    }

    /// `(column, row)` of a cell numbered row-major from zero
    pub fn cell_position(&self, cell: u32) -> (u32, u32) {
        (cell % self.size_m, cell / self.size_m)
    }

    /// Draw request for one cell onto `surface`
    pub fn draw_request(&self, cell: u32, surface: MeshHandle) -> SpriteDraw {
        SpriteDraw {
            texture: self.texture,
            grid: self.grid(),
            cell: self.cell_position(cell),
            surface,
            state: RenderState::BLEND | RenderState::NO_DEPTH_WRITE,
        }
    }
}

/// Leaf that cycles through a range of sprite sheet cells
///
/// The range `start_cell..=end_cell` is covered in `duration_s` seconds.
/// After the end cell the animation wraps to the start cell and immediately
/// steps past it, so the start cell only shows before the first switch.
#[derive(Debug, Clone)]
pub struct SpriteAnimation {
    sheet: SpriteSheet,
    surface: MeshHandle,
    start_cell: u32,
    end_cell: u32,
    current_cell: u32,
    transition_ms: f64,
    last_switch_ms: f64,
}

impl SpriteAnimation {
    /// Create an animation over `start_cell..=end_cell` drawn on `surface`
    pub fn new(sheet: SpriteSheet, surface: MeshHandle, duration_s: f64, start_cell: u32, end_cell: u32) -> Self {
        let transition_ms = match end_cell.checked_sub(start_cell) {
            Some(steps) if steps > 0 => duration_s * 1000.0 / f64::from(steps),
            _ => f64::INFINITY,
        };
        Self {
            sheet,
            surface,
            start_cell,
            end_cell,
            current_cell: start_cell,
            transition_ms,
            last_switch_ms: 0.0,
        }
    }

    /// Cell currently shown
    pub fn current_cell(&self) -> u32 {
        self.current_cell
    }

    /// Milliseconds each cell stays on screen
    pub fn transition_ms(&self) -> f64 {
        self.transition_ms
    }

    /// Sheet the cells come from
    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    /// Switch cells if the transition time has passed since the last switch
    pub fn update(&mut self, time_ms: f64) {
        if time_ms - self.last_switch_ms < self.transition_ms {
            return;
        }
        if self.current_cell == self.end_cell {
            self.current_cell = self.start_cell;
        }
        self.current_cell += 1;
        self.last_switch_ms = time_ms;
    }
}

impl Drawable for SpriteAnimation {
    fn display<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        let mut scope = MatrixGuard::new(backend);
        scope.draw_sprite(&self.sheet.draw_request(self.current_cell, self.surface));
    }

    // Cells address the sheet directly, so amplification does not apply
    fn rescale_texture_coordinates<B: RenderBackend + ?Sized>(&mut self, _afs: f32, _aft: f32, _backend: &mut B) {}
}
