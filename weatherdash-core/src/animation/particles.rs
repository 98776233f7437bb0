use rand::Rng;

use super::{PARTICLE_COLOR, Surface, Viewport};

pub const DEFAULT_PARTICLE_COUNT: usize = 50;

/// Pairs at or beyond this distance are not connected.
pub const LINK_DISTANCE: f64 = 150.0;

const MAX_LINK_OPACITY: f64 = 0.2;
const LINK_WIDTH: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub opacity: f64,
}

impl Particle {
    pub fn random<R: Rng>(rng: &mut R, viewport: Viewport) -> Self {
        Self {
            x: rng.random_range(0.0..viewport.width()),
            y: rng.random_range(0.0..viewport.height()),
            size: rng.random_range(1.0..4.0),
            vx: rng.random_range(-0.25..0.25),
            vy: rng.random_range(-0.25..0.25),
            opacity: rng.random_range(0.2..0.7),
        }
    }

    /// Move one frame; leaving through an edge re-enters at the opposite one.
    pub fn advance(&mut self, viewport: Viewport) {
        self.x = wrap(self.x + self.vx, viewport.width());
        self.y = wrap(self.y + self.vy, viewport.height());
    }
}

/// `value` mapped into `[0, bound)`.
fn wrap(value: f64, bound: f64) -> f64 {
    let wrapped = value.rem_euclid(bound);
    // rem_euclid can round up to `bound` for tiny negative inputs.
    if wrapped >= bound { 0.0 } else { wrapped }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub opacity: f64,
}

/// Line opacity for two particles `distance` apart, if they are close enough.
pub fn link_opacity(distance: f64) -> Option<f64> {
    (distance < LINK_DISTANCE).then(|| MAX_LINK_OPACITY * (1.0 - distance / LINK_DISTANCE))
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    viewport: Viewport,
}

impl ParticleField {
    pub fn new<R: Rng>(count: usize, viewport: Viewport, rng: &mut R) -> Self {
        let particles = (0..count).map(|_| Particle::random(rng, viewport)).collect();
        Self { particles, viewport }
    }

    pub fn from_particles(particles: Vec<Particle>, viewport: Viewport) -> Self {
        Self { particles, viewport }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// New bounds for subsequent frames. Particles keep their positions.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn step(&mut self) {
        let viewport = self.viewport;
        for particle in &mut self.particles {
            particle.advance(viewport);
        }
    }

    /// Every unordered pair closer than [`LINK_DISTANCE`].
    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = (a.x - b.x).hypot(a.y - b.y);
                if let Some(opacity) = link_opacity(distance) {
                    links.push(Link { from: (a.x, a.y), to: (b.x, b.y), opacity });
                }
            }
        }
        links
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear(self.viewport);
        for p in &self.particles {
            surface.fill_circle(p.x, p.y, p.size, PARTICLE_COLOR.with_alpha(p.opacity));
        }
        for link in self.links() {
            surface.stroke_line(
                link.from,
                link.to,
                LINK_WIDTH,
                PARTICLE_COLOR.with_alpha(link.opacity),
            );
        }
    }
}
