//! Decorative background: drifting particles joined by fading lines, plus an
//! optional rain or snow overlay picked from the current conditions.
//!
//! The simulation is renderer-agnostic; anything implementing [`Surface`] can
//! draw it.

pub mod overlay;
pub mod particles;
pub mod runner;

pub use overlay::{Overlay, Streak};
pub use particles::{DEFAULT_PARTICLE_COUNT, LINK_DISTANCE, Link, Particle, ParticleField};
pub use runner::{AnimationHandle, spawn_animation};

/// Drawing area, in abstract units (pixels on a canvas, sub-cells in a terminal).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    /// Dimensions below one unit are raised to one so wrapping stays defined.
    pub fn new(width: f64, height: f64) -> Self {
        let clamp = |v: f64| if v.is_finite() && v >= 1.0 { v } else { 1.0 };
        Self { width: clamp(width), height: clamp(height) }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

/// Lavender used for particles and links.
pub const PARTICLE_COLOR: Rgba = Rgba::new(167, 139, 250, 1.0);

/// Target of one rendered frame.
pub trait Surface {
    fn clear(&mut self, viewport: Viewport);

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba);

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgba);

    fn draw_streak(&mut self, _x: f64, _y: f64, _overlay: Overlay) {}

    /// Called once everything for the frame has been drawn.
    fn present(&mut self) {}
}
