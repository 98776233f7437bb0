//! Character-grid [`Surface`] for drawing the particle background in a terminal.
//!
//! The field is simulated in abstract units; every terminal cell covers
//! `CELL_WIDTH` x `CELL_HEIGHT` of them, which keeps link distances and speeds
//! close to their on-canvas look.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use tracing::warn;
use weatherdash_core::animation::{Overlay, PARTICLE_COLOR, Rgba, Surface, Viewport};

pub const CELL_WIDTH: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 16.0;

const BLANK: char = ' ';

/// Viewport covering a terminal of `cols` x `rows` cells.
pub fn viewport_for(cols: u16, rows: u16) -> Viewport {
    Viewport::new(f64::from(cols) * CELL_WIDTH, f64::from(rows) * CELL_HEIGHT)
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    glyph: char,
    alpha: f64,
}

impl Cell {
    const EMPTY: Cell = Cell { glyph: BLANK, alpha: 0.0 };
}

#[derive(Debug)]
pub struct TerminalCanvas<W> {
    out: W,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    write_failed: bool,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W) -> Self {
        Self { out, cols: 0, rows: 0, cells: Vec::new(), write_failed: false }
    }

    /// Current grid, one string per terminal row.
    pub fn frame_lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols.max(1))
            .map(|row| row.iter().map(|cell| cell.glyph).collect())
            .collect()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Brighter marks win over fainter ones in the same cell.
    fn plot(&mut self, x: f64, y: f64, glyph: char, alpha: f64) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let col = (x / CELL_WIDTH) as usize;
        let row = (y / CELL_HEIGHT) as usize;
        if col >= self.cols || row >= self.rows {
            return;
        }

        let cell = &mut self.cells[row * self.cols + col];
        if alpha >= cell.alpha {
            *cell = Cell { glyph, alpha };
        }
    }

    fn write_frame(&mut self) -> io::Result<()> {
        let Rgba { r, g, b, .. } = PARTICLE_COLOR;
        queue!(self.out, SetForegroundColor(Color::Rgb { r, g, b }))?;

        for (row, line) in self.frame_lines().into_iter().enumerate() {
            let row = u16::try_from(row).unwrap_or(u16::MAX);
            queue!(self.out, MoveTo(0, row), Print(line))?;
        }

        queue!(self.out, ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> Surface for TerminalCanvas<W> {
    fn clear(&mut self, viewport: Viewport) {
        self.cols = (viewport.width() / CELL_WIDTH).round().max(1.0) as usize;
        self.rows = (viewport.height() / CELL_HEIGHT).round().max(1.0) as usize;
        self.cells.clear();
        self.cells.resize(self.cols * self.rows, Cell::EMPTY);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        let glyph = match radius {
            r if r < 2.0 => '·',
            r if r < 3.0 => '•',
            _ => '●',
        };
        self.plot(x, y, glyph, color.a);
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), _width: f64, color: Rgba) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = (dx.abs() / CELL_WIDTH).max(dy.abs() / CELL_HEIGHT).ceil().max(1.0) as usize;

        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.plot(from.0 + dx * t, from.1 + dy * t, '.', color.a);
        }
    }

    fn draw_streak(&mut self, x: f64, y: f64, overlay: Overlay) {
        match overlay {
            Overlay::Rain => self.plot(x, y, '|', 0.6),
            Overlay::Snow => self.plot(x, y, '*', 0.8),
            Overlay::None => {}
        }
    }

    fn present(&mut self) {
        if let Err(err) = self.write_frame() {
            // One warning is enough; later frames will most likely fail the same way.
            if !self.write_failed {
                warn!(error = %err, "failed to draw background frame");
                self.write_failed = true;
            }
        }
    }
}
