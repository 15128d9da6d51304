//! Layout engine: plot count -> non-overlapping rectangles in `[0,1]²`.
//!
//! Layouts are re-derived from scratch on every call; nothing about a
//! previous layout is remembered.

use serde::{Deserialize, Serialize};

/// A rectangle in normalized surface coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const UNIT: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True if the interiors intersect (shared edges do not count).
    pub fn overlaps(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-9;
        self.x + EPS < other.x + other.width
            && other.x + EPS < self.x + self.width
            && self.y + EPS < other.y + other.height
            && other.y + EPS < self.y + self.height
    }
}

/// How plots are arranged on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum LayoutMode {
    /// `ceil(sqrt(n))` columns, as many rows as needed.
    #[default]
    Dynamic,
    /// A fixed `rows x columns` grid; plots beyond capacity reuse cells.
    Fixed { rows: usize, columns: usize },
}

/// Column and row count of the dynamic grid for `n` plots.
pub fn dynamic_grid(n: usize) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let columns = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(columns);
    (columns, rows)
}

/// Compute one rectangle per plot, in plot order.
pub fn compute_layout(n: usize, mode: LayoutMode) -> Vec<Rect> {
    match mode {
        LayoutMode::Dynamic => dynamic_layout(n),
        LayoutMode::Fixed { rows, columns } => fixed_layout(n, rows, columns),
    }
}

// Row-major cells of width 1/columns and height 1/rows. A partially filled
// last row stretches its cells across the full width so the rectangles
// always tile the unit square.
fn dynamic_layout(n: usize) -> Vec<Rect> {
    let (columns, rows) = dynamic_grid(n);
    let mut rects = Vec::with_capacity(n);
    let height = 1.0 / rows.max(1) as f64;
    for i in 0..n {
        let row = i / columns;
        let col = i % columns;
        let in_row = if row + 1 == rows {
            n - row * columns
        } else {
            columns
        };
        let width = 1.0 / in_row as f64;
        rects.push(Rect::new(
            col as f64 * width,
            row as f64 * height,
            width,
            height,
        ));
    }
    rects
}

// Only the `n` occupied cells are built; grid dimensions may be huge.
fn fixed_layout(n: usize, rows: usize, columns: usize) -> Vec<Rect> {
    let rows = rows.max(1);
    let columns = columns.max(1);
    let cells = rows.saturating_mul(columns);
    let width = 1.0 / columns as f64;
    let height = 1.0 / rows as f64;
    (0..n)
        .map(|i| {
            let cell = i % cells;
            Rect::new(
                (cell % columns) as f64 * width,
                (cell / columns) as f64 * height,
                width,
                height,
            )
        })
        .collect()
}
