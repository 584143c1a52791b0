//! C6: the path sub-engine. Accumulates MoveTo/LineTo/ArcTo/CurveTo/Close
//! segments into local-space geometry and dispatches Stroke/Fill ops
//! (spec.md §4.6).

use crate::ast::{PathAction, PathPart, Point};
use crate::engine::BBox;
use crate::state::{apply, State};
use rand::RngCore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    /// Cubic Bezier, matching the back-end's `pathCurveTo(x2,y2,x3,y3,x4,y4)`
    /// (spec.md §4.8): two controls plus an end point.
    CurveTo { c1: (f64, f64), c2: (f64, f64), end: (f64, f64) },
    Close,
}

/// One Stroke or Fill invocation inside a path body: the geometry
/// accumulated since the last reset, the resolved State (for color and
/// the composed matrix), and the operation's own parameters.
#[derive(Debug, Clone)]
pub struct PathOp {
    pub segments: Vec<Segment>,
    pub state: State,
    pub kind: OpKind,
}

#[derive(Debug, Clone, Copy)]
pub enum OpKind {
    Stroke { width: f64 },
    Fill { evenodd: bool },
}

/// The fully-expanded result of a `path` rule invocation: every
/// Stroke/Fill op it produced (explicit or implicit) plus the path's
/// overall bbox in global coordinates.
#[derive(Debug, Clone, Default)]
pub struct BuiltPath {
    pub ops: Vec<PathOp>,
    pub bbox: BBox,
}

/// Accumulator threaded while walking a path body's parts: current
/// geometry, current point (with "unset" as the default per spec.md §9),
/// and the stroked/filled flags that decide whether the next MoveTo
/// starts a fresh sub-path.
struct PathBuilder {
    segments: Vec<Segment>,
    current: Option<(f64, f64)>,
    closed: bool,
    stroked: bool,
    filled: bool,
    local_bbox: BBox,
}

impl PathBuilder {
    fn new() -> Self {
        PathBuilder {
            segments: vec![],
            current: None,
            closed: false,
            stroked: false,
            filled: false,
            local_bbox: BBox::default(),
        }
    }

    fn reset_if_consumed(&mut self) {
        if self.stroked || self.filled {
            self.segments.clear();
            self.local_bbox = BBox::default();
            self.stroked = false;
            self.filled = false;
            self.closed = false;
        }
    }

    fn ensure_current(&mut self) {
        if self.current.is_none() {
            let (x, y) = (0.0, 0.0);
            self.segments.push(Segment::MoveTo(x, y));
            self.local_bbox.add_point(x, y);
            self.current = Some((x, y));
        }
    }

    fn move_to(&mut self, p: Point) {
        self.reset_if_consumed();
        self.segments.push(Segment::MoveTo(p.x, p.y));
        self.local_bbox.add_point(p.x, p.y);
        self.current = Some((p.x, p.y));
        self.closed = false;
    }

    fn line_to(&mut self, p: Point) {
        self.reset_if_consumed();
        self.ensure_current();
        self.segments.push(Segment::LineTo(p.x, p.y));
        self.local_bbox.add_point(p.x, p.y);
        self.current = Some((p.x, p.y));
    }

    fn curve_to(&mut self, c1: (f64, f64), c2: (f64, f64), end: (f64, f64)) {
        self.reset_if_consumed();
        self.ensure_current();
        self.segments.push(Segment::CurveTo { c1, c2, end });
        self.local_bbox.add_point(c1.0, c1.1);
        self.local_bbox.add_point(c2.0, c2.1);
        self.local_bbox.add_point(end.0, end.1);
        self.current = Some(end);
    }

    fn close(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.segments.push(Segment::Close);
        self.closed = true;
    }
}

/// Walks a path body's parts, threading `state` the way rule actions
/// thread it (each Stroke/Fill/LoopPart applies its own adjustment to the
/// running state), and collects every Stroke/Fill op plus an implicit
/// fill if neither was ever invoked (spec.md §4.6).
pub fn build_path(path: &PathAction, outer_state: &State, rng: &mut dyn RngCore) -> BuiltPath {
    let mut builder = PathBuilder::new();
    let mut ops = vec![];
    let mut state = *outer_state;
    let mut explicit_op = false;

    walk_parts(&path.parts, &mut builder, &mut state, &mut ops, &mut explicit_op, rng);

    if !explicit_op {
        ops.push(PathOp {
            segments: builder.segments.clone(),
            state,
            kind: OpKind::Fill { evenodd: false },
        });
    }

    let mut bbox = BBox::default();
    for op in &ops {
        let width = match op.kind {
            OpKind::Stroke { width } => width,
            OpKind::Fill { .. } => 0.0,
        };
        for corner in segments_bbox_corners(&op.segments, width) {
            let (gx, gy) = op.state.m.apply(corner.0, corner.1);
            bbox.add_point(gx, gy);
        }
    }

    BuiltPath { ops, bbox }
}

fn walk_parts(
    parts: &[PathPart],
    builder: &mut PathBuilder,
    state: &mut State,
    ops: &mut Vec<PathOp>,
    explicit_op: &mut bool,
    rng: &mut dyn RngCore,
) {
    for part in parts {
        walk_part(part, builder, state, ops, explicit_op, rng);
    }
}

fn walk_part(
    part: &PathPart,
    builder: &mut PathBuilder,
    state: &mut State,
    ops: &mut Vec<PathOp>,
    explicit_op: &mut bool,
    rng: &mut dyn RngCore,
) {
    match part {
        PathPart::MoveTo(p) => builder.move_to(*p),
        PathPart::LineTo(p) => builder.line_to(*p),
        PathPart::ArcTo { to, rx, ry, x_axis_rotation_deg, large_arc, sweep } => {
            builder.reset_if_consumed();
            builder.ensure_current();
            let from = builder.current.unwrap();
            for (c1, c2, end) in arc_to_beziers(from, (to.x, to.y), *rx, *ry, *x_axis_rotation_deg, *large_arc, *sweep) {
                builder.curve_to(c1, c2, end);
            }
        }
        PathPart::CurveTo { control1, control2, end } => {
            let c1 = (control1.x, control1.y);
            let c2 = control2.map_or(c1, |c| (c.x, c.y));
            builder.curve_to(c1, c2, (end.x, end.y));
        }
        PathPart::Close => builder.close(),
        PathPart::Stroke { width, adjustment } => {
            *state = apply(*state, adjustment);
            builder.stroked = true;
            ops.push(PathOp { segments: builder.segments.clone(), state: *state, kind: OpKind::Stroke { width: *width } });
            *explicit_op = true;
        }
        PathPart::Fill { evenodd, adjustment } => {
            *state = apply(*state, adjustment);
            builder.filled = true;
            ops.push(PathOp { segments: builder.segments.clone(), state: *state, kind: OpKind::Fill { evenodd: *evenodd } });
            *explicit_op = true;
        }
        PathPart::LoopPart { count, adjustment, inner } => {
            for _ in 0..*count {
                walk_part(inner, builder, state, ops, explicit_op, rng);
                *state = apply(*state, adjustment);
            }
        }
        PathPart::LoopPartList { count, adjustment, parts } => {
            for _ in 0..*count {
                walk_parts(parts, builder, state, ops, explicit_op, rng);
                *state = apply(*state, adjustment);
            }
        }
        PathPart::Unimplemented(_) => {}
    }
}

fn segments_bbox_corners(segments: &[Segment], stroke_width: f64) -> Vec<(f64, f64)> {
    let mut bbox = BBox::default();
    for seg in segments {
        match seg {
            Segment::MoveTo(x, y) | Segment::LineTo(x, y) => bbox.add_point(*x, *y),
            Segment::CurveTo { c1, c2, end } => {
                bbox.add_point(c1.0, c1.1);
                bbox.add_point(c2.0, c2.1);
                bbox.add_point(end.0, end.1);
            }
            Segment::Close => {}
        }
    }
    if stroke_width > 0.0 {
        bbox.expand(stroke_width / 2.0, stroke_width / 2.0);
    }
    match (bbox.min(), bbox.max()) {
        (Some(min), Some(max)) => vec![min, max, (min.0, max.1), (max.0, min.1)],
        _ => vec![],
    }
}

impl BuiltPath {
    /// The path's global bbox corners, already folded in at build time
    /// (every op's geometry is transformed by its own resolved `state.m`
    /// as it's built) — for the engine to add to the design-wide bbox.
    #[must_use]
    pub fn bbox_corners(&self) -> Vec<(f64, f64)> {
        match (self.bbox.min(), self.bbox.max()) {
            (Some(min), Some(max)) => vec![min, max],
            _ => vec![],
        }
    }
}

/// SVG-style endpoint-to-center arc parameterization, subdivided into
/// cubic Beziers of at most 90 degrees each (spec.md §4.6). `from`/`to`
/// are in the path's local space; `rotation_deg` rotates the ellipse's
/// own axes (always 0 here, see `parse::path_body`'s note on
/// `x_axis_rotation_deg`).
fn arc_to_beziers(
    from: (f64, f64),
    to: (f64, f64),
    rx: f64,
    ry: f64,
    rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
) -> Vec<((f64, f64), (f64, f64), (f64, f64))> {
    if (from.0 - to.0).abs() < 1e-12 && (from.1 - to.1).abs() < 1e-12 {
        return vec![];
    }
    if rx.abs() < 1e-12 || ry.abs() < 1e-12 {
        return vec![(from, to, to)];
    }

    let phi = rotation_deg.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let dx2 = (from.0 - to.0) / 2.0;
    let dy2 = (from.1 - to.1) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    let mut rx = rx.abs();
    let mut ry = ry.abs();
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let scale = lambda.sqrt();
        rx *= scale;
        ry *= scale;
    }

    let sign = if large_arc != sweep { 1.0 } else { -1.0 };
    let num = (rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p).max(0.0);
    let den = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
    let co = if den.abs() < 1e-12 { 0.0 } else { sign * (num / den).sqrt() };
    let cxp = co * rx * y1p / ry;
    let cyp = -co * ry * x1p / rx;

    let cx = cos_phi * cxp - sin_phi * cyp + (from.0 + to.0) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (from.1 + to.1) / 2.0;

    let angle = |ux: f64, uy: f64, vx: f64, vy: f64| -> f64 {
        let dot = ux * vx + uy * vy;
        let len = ((ux * ux + uy * uy) * (vx * vx + vy * vy)).sqrt();
        let mut a = (dot / len).clamp(-1.0, 1.0).acos();
        if ux * vy - uy * vx < 0.0 {
            a = -a;
        }
        a
    };

    let theta1 = angle(1.0, 0.0, (x1p - cxp) / rx, (y1p - cyp) / ry);
    let mut delta_theta = angle((x1p - cxp) / rx, (y1p - cyp) / ry, (-x1p - cxp) / rx, (-y1p - cyp) / ry);
    if !sweep && delta_theta > 0.0 {
        delta_theta -= 2.0 * std::f64::consts::PI;
    } else if sweep && delta_theta < 0.0 {
        delta_theta += 2.0 * std::f64::consts::PI;
    }

    let num_segments = (delta_theta.abs() / (std::f64::consts::FRAC_PI_2) + 1e-9).ceil().max(1.0) as usize;
    let segment_angle = delta_theta / num_segments as f64;
    let k = 4.0 / 3.0 * (segment_angle / 4.0).tan();

    let point_at = |theta: f64| -> (f64, f64, f64, f64) {
        let (s, c) = theta.sin_cos();
        let ex = cx + rx * c * cos_phi - ry * s * sin_phi;
        let ey = cy + rx * c * sin_phi + ry * s * cos_phi;
        let dex = -rx * s * cos_phi - ry * c * sin_phi;
        let dey = -rx * s * sin_phi + ry * c * cos_phi;
        (ex, ey, dex, dey)
    };

    let mut beziers = vec![];
    let mut theta_i = theta1;
    for _ in 0..num_segments {
        let theta_next = theta_i + segment_angle;
        let (x0, y0, dx0, dy0) = point_at(theta_i);
        let (x1, y1, dx1, dy1) = point_at(theta_next);
        let c1 = (x0 + k * dx0, y0 + k * dy0);
        let c2 = (x1 - k * dx1, y1 - k * dy1);
        beziers.push((c1, c2, (x1, y1)));
        theta_i = theta_next;
    }
    beziers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Adjustment, PathPart};
    use crate::color::Hsva;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn white_state() -> State {
        State::identity(Hsva { hue: 0.0, saturation: 0.0, value: 1.0, alpha: 1.0 })
    }

    #[test]
    fn moveto_lineto_closepoly_auto_fills() {
        let path = PathAction {
            parts: vec![
                PathPart::MoveTo(Point { x: 0.0, y: 0.0 }),
                PathPart::LineTo(Point { x: 1.0, y: 0.0 }),
                PathPart::LineTo(Point { x: 1.0, y: 1.0 }),
                PathPart::Close,
            ],
        };
        let mut rng = StdRng::seed_from_u64(0);
        let built = build_path(&path, &white_state(), &mut rng);
        assert_eq!(built.ops.len(), 1);
        assert!(matches!(built.ops[0].kind, OpKind::Fill { evenodd: false }));
    }

    #[test]
    fn explicit_stroke_is_not_duplicated_with_implicit_fill() {
        let path = PathAction {
            parts: vec![
                PathPart::MoveTo(Point { x: 0.0, y: 0.0 }),
                PathPart::LineTo(Point { x: 1.0, y: 1.0 }),
                PathPart::Stroke { width: 0.2, adjustment: Adjustment::default() },
            ],
        };
        let mut rng = StdRng::seed_from_u64(0);
        let built = build_path(&path, &white_state(), &mut rng);
        assert_eq!(built.ops.len(), 1);
        assert!(matches!(built.ops[0].kind, OpKind::Stroke { width } if (width - 0.2).abs() < 1e-9));
    }

    #[test]
    fn stroke_bbox_expands_by_half_width() {
        let path = PathAction {
            parts: vec![
                PathPart::MoveTo(Point { x: 0.0, y: 0.0 }),
                PathPart::LineTo(Point { x: 1.0, y: 1.0 }),
                PathPart::Stroke { width: 0.2, adjustment: Adjustment::default() },
            ],
        };
        let mut rng = StdRng::seed_from_u64(0);
        let built = build_path(&path, &white_state(), &mut rng);
        let (min, max) = (built.bbox.min().unwrap(), built.bbox.max().unwrap());
        assert!((min.0 - (-0.1)).abs() < 1e-9);
        assert!((max.0 - 1.1).abs() < 1e-9);
    }

    #[test]
    fn arcto_with_large_flag_emits_multiple_bezier_segments() {
        let beziers = arc_to_beziers((0.0, 0.0), (0.0, 2.0), 1.0, 1.0, 0.0, true, true);
        assert!(beziers.len() >= 3);
    }

    #[test]
    fn movereal_variants_are_parsed_no_ops_in_path_engine() {
        let path = PathAction {
            parts: vec![
                PathPart::MoveTo(Point { x: 0.0, y: 0.0 }),
                PathPart::Unimplemented("MOVEREL"),
                PathPart::LineTo(Point { x: 1.0, y: 0.0 }),
                PathPart::Close,
            ],
        };
        let mut rng = StdRng::seed_from_u64(0);
        let built = build_path(&path, &white_state(), &mut rng);
        assert_eq!(built.ops.len(), 1);
    }
}
