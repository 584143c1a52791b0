//! C8: the abstract drawing surface the render driver (C7) emits to
//! (spec.md §4.8). The core never renders pixels itself — an embedding
//! program supplies a `Backend` impl for its output surface (pixel
//! buffer, SVG document, …). `RecordingBackend` is an in-memory
//! implementation used by tests and by `cfdg-cli`, which has no image
//! back-end of its own (spec.md §1 explicitly puts that out of scope).

use crate::color::Hsva;
use crate::transform::Affine;

/// All geometry is in the primitive's local frame; `m` is the transform
/// the back-end is expected to pre-multiply into its current device
/// transform before drawing (spec.md §4.8).
pub trait Backend {
    fn fill_background(&mut self, color: Hsva);
    fn fill_square(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, m: Affine, color: Hsva);
    fn fill_circle(&mut self, x: f64, y: f64, r: f64, m: Affine, color: Hsva);
    fn fill_triangle(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64, m: Affine, color: Hsva);

    fn path_init(&mut self);
    fn path_move_to(&mut self, x: f64, y: f64);
    fn path_line_to(&mut self, x: f64, y: f64);
    fn path_curve_to(&mut self, x2: f64, y2: f64, x3: f64, y3: f64, x4: f64, y4: f64);
    fn path_close(&mut self);
    fn path_stroke(&mut self, color: Hsva, m: Affine, width: f64);
    fn path_fill(&mut self, color: Hsva, m: Affine);
    fn path_term(&mut self);

    /// Called once per BFS generation during expand, and may be polled
    /// by the back-end during render; `false` requests early stop
    /// (spec.md §5).
    fn tick(&mut self) -> bool {
        true
    }
}

/// What `RecordingBackend` remembers about one draw call, for tests and
/// for `cfdg-cli`'s summary output.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Background(Hsva),
    Square { x1: f64, y1: f64, x2: f64, y2: f64, m: Affine, color: Hsva },
    Circle { x: f64, y: f64, r: f64, m: Affine, color: Hsva },
    Triangle { x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64, m: Affine, color: Hsva },
    PathStroke { color: Hsva, m: Affine, width: f64, segment_count: usize },
    PathFill { color: Hsva, m: Affine, segment_count: usize },
}

/// An in-memory `Backend` that just records every call it receives, in
/// order. `cfdg-cli` uses this for its `--dry-run`/summary mode; the
/// test suite uses it to assert on emitted geometry without a real
/// rendering surface.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<DrawCall>,
    path_segment_count: usize,
}

impl RecordingBackend {
    #[must_use]
    pub fn new() -> Self {
        RecordingBackend::default()
    }

    #[must_use]
    pub fn square_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Square { .. })).count()
    }

    #[must_use]
    pub fn circle_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Circle { .. })).count()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Triangle { .. })).count()
    }
}

impl Backend for RecordingBackend {
    fn fill_background(&mut self, color: Hsva) {
        self.calls.push(DrawCall::Background(color));
    }

    fn fill_square(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, m: Affine, color: Hsva) {
        self.calls.push(DrawCall::Square { x1, y1, x2, y2, m, color });
    }

    fn fill_circle(&mut self, x: f64, y: f64, r: f64, m: Affine, color: Hsva) {
        self.calls.push(DrawCall::Circle { x, y, r, m, color });
    }

    fn fill_triangle(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64, m: Affine, color: Hsva) {
        self.calls.push(DrawCall::Triangle { x1, y1, x2, y2, x3, y3, m, color });
    }

    fn path_init(&mut self) {
        self.path_segment_count = 0;
    }

    fn path_move_to(&mut self, _x: f64, _y: f64) {
        self.path_segment_count += 1;
    }

    fn path_line_to(&mut self, _x: f64, _y: f64) {
        self.path_segment_count += 1;
    }

    fn path_curve_to(&mut self, _x2: f64, _y2: f64, _x3: f64, _y3: f64, _x4: f64, _y4: f64) {
        self.path_segment_count += 1;
    }

    fn path_close(&mut self) {
        self.path_segment_count += 1;
    }

    fn path_stroke(&mut self, color: Hsva, m: Affine, width: f64) {
        self.calls.push(DrawCall::PathStroke { color, m, width, segment_count: self.path_segment_count });
    }

    fn path_fill(&mut self, color: Hsva, m: Affine) {
        self.calls.push(DrawCall::PathFill { color, m, segment_count: self.path_segment_count });
    }

    fn path_term(&mut self) {
        self.path_segment_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_backend_counts_shapes_by_kind() {
        let mut backend = RecordingBackend::new();
        backend.fill_square(-0.5, -0.5, 0.5, 0.5, Affine::IDENTITY, Hsva::BLACK);
        backend.fill_circle(0.0, 0.0, 0.5, Affine::IDENTITY, Hsva::BLACK);
        backend.fill_square(-0.5, -0.5, 0.5, 0.5, Affine::IDENTITY, Hsva::BLACK);
        assert_eq!(backend.square_count(), 2);
        assert_eq!(backend.circle_count(), 1);
    }

    #[test]
    fn path_stroke_records_segment_count_since_last_init() {
        let mut backend = RecordingBackend::new();
        backend.path_init();
        backend.path_move_to(0.0, 0.0);
        backend.path_line_to(1.0, 1.0);
        backend.path_stroke(Hsva::BLACK, Affine::IDENTITY, 0.2);
        match &backend.calls[0] {
            DrawCall::PathStroke { segment_count, .. } => assert_eq!(*segment_count, 2),
            other => panic!("expected PathStroke, got {other:?}"),
        }
    }
}
