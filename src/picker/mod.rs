//! Interactive point/line picking over a 2-D data array. The click state
//! machine lives here, free of any GUI types, so it is testable headless;
//! the egui front-end in [`app`] feeds it translated pointer events.
use tracing::debug;

#[cfg(feature = "gui")]
pub mod app;

/// A connected sequence of picked data coordinates, `(x, y)` pairs.
pub type Polyline = Vec<(f64, f64)>;

/// How a click relates to the polyline under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    /// Plain click: extend the current polyline.
    Extend,
    /// Modifier held: this point closes the current polyline.
    NewLine,
    /// Skip key held: the click is ignored entirely.
    Skip,
}

/// Accumulates clicked coordinates over an array of the given shape and
/// partitions them into polylines on demand.
#[derive(Debug, Clone)]
pub struct PointBrowser {
    /// Data shape as `(rows, cols)`.
    shape: (usize, usize),
    coordinates: Vec<(f64, f64)>,
    /// Per-point flag: `true` extends the line, `false` closes it.
    connect: Vec<bool>,
}

impl PointBrowser {
    pub fn new(shape: (usize, usize)) -> Self {
        Self {
            shape,
            coordinates: Vec::new(),
            connect: Vec::new(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.coordinates
    }

    /// Register one click in data coordinates. Out-of-bounds positions and
    /// [`ClickKind::Skip`] clicks are ignored.
    pub fn click(&mut self, x: f64, y: f64, kind: ClickKind) {
        if kind == ClickKind::Skip {
            return;
        }
        let (rows, cols) = self.shape;
        if x < 0.0 || y < 0.0 || x >= cols as f64 || y >= rows as f64 {
            debug!("click outside data bounds ignored: ({x}, {y})");
            return;
        }
        self.coordinates.push((x, y));
        self.connect.push(kind == ClickKind::Extend);
    }

    /// Partition the accumulated points into polylines. A point flagged as
    /// closing (a [`ClickKind::NewLine`] click) is the last point of its
    /// line; the first point always opens a line regardless of its flag.
    pub fn polylines(&self) -> Vec<Polyline> {
        let mut lines = Vec::new();
        let mut current: Polyline = Vec::new();
        for (i, (&point, &connect)) in
            self.coordinates.iter().zip(&self.connect).enumerate()
        {
            current.push(point);
            if i > 0 && !connect {
                lines.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}
