//! C7: replays a finished [`ExpansionResult`] against a [`Backend`], in
//! tiled or non-tiled mode (spec.md §4.7).

use crate::ast::{Program, RuleKind};
use crate::backend::Backend;
use crate::engine::{circle_samples, square_corners, triangle_corners, BBox, ExpansionResult, PathRuleState, RuleState};
use crate::path_engine::{OpKind, Segment};
use crate::transform::Affine;

pub fn render(result: &ExpansionResult, program: &Program, backend: &mut dyn Backend) {
    backend.fill_background(program.background);
    match &program.tile {
        None => render_bucket_set(result, Affine::IDENTITY, program, backend),
        Some(tile) => render_tiled(result, &tile.m, program, backend),
    }
}

enum Drawable<'e> {
    Primitive(&'e RuleState),
    Path(&'e PathRuleState),
}

impl Drawable<'_> {
    fn area(&self) -> f64 {
        match self {
            Drawable::Primitive(rs) => rs.area,
            Drawable::Path(prs) => prs.area,
        }
    }
}

/// Non-tiled mode (spec.md §4.7): z-buckets ascending, within a bucket
/// area-descending so smaller shapes paint on top of larger ones.
fn render_bucket_set(result: &ExpansionResult, adjust_matrix: Affine, program: &Program, backend: &mut dyn Backend) {
    let mut keys: Vec<i64> =
        result.primitive_buckets.keys().chain(result.path_buckets.keys()).copied().collect();
    keys.sort_unstable();
    keys.dedup();

    for key in keys {
        let mut drawables = vec![];
        if let Some(primitives) = result.primitive_buckets.get(&key) {
            drawables.extend(primitives.iter().map(Drawable::Primitive));
        }
        if let Some(paths) = result.path_buckets.get(&key) {
            drawables.extend(paths.iter().map(Drawable::Path));
        }
        drawables.sort_by(|a, b| b.area().partial_cmp(&a.area()).expect("area is never NaN"));

        for drawable in drawables {
            match drawable {
                Drawable::Primitive(rs) => emit_primitive(rs, program, adjust_matrix, backend),
                Drawable::Path(prs) => emit_path(prs, adjust_matrix, backend),
            }
        }
    }
}

fn emit_primitive(rule_state: &RuleState, program: &Program, adjust_matrix: Affine, backend: &mut dyn Backend) {
    let m = rule_state.state.m.compose(&adjust_matrix);
    let color = rule_state.state.color;
    match program.rule(rule_state.rule).kind {
        RuleKind::Square => {
            let corners = square_corners();
            backend.fill_square(corners[0].0, corners[0].1, corners[2].0, corners[2].1, m, color);
        }
        RuleKind::Circle => backend.fill_circle(0.0, 0.0, 0.5, m, color),
        RuleKind::Triangle => {
            let corners = triangle_corners();
            backend.fill_triangle(
                corners[0].0,
                corners[0].1,
                corners[1].0,
                corners[1].1,
                corners[2].0,
                corners[2].1,
                m,
                color,
            );
        }
        RuleKind::User | RuleKind::Path => {}
    }
}

fn emit_path(path_rule_state: &PathRuleState, adjust_matrix: Affine, backend: &mut dyn Backend) {
    for op in &path_rule_state.built.ops {
        backend.path_init();
        for segment in &op.segments {
            match segment {
                Segment::MoveTo(x, y) => backend.path_move_to(*x, *y),
                Segment::LineTo(x, y) => backend.path_line_to(*x, *y),
                Segment::CurveTo { c1, c2, end } => backend.path_curve_to(c1.0, c1.1, c2.0, c2.1, end.0, end.1),
                Segment::Close => backend.path_close(),
            }
        }
        let m = op.state.m.compose(&adjust_matrix);
        match op.kind {
            OpKind::Stroke { width } => backend.path_stroke(op.state.color, m, width),
            OpKind::Fill { .. } => backend.path_fill(op.state.color, m),
        }
        backend.path_term();
    }
}

/// The fundamental tile rectangle: `tile.m` applied to the unit square
/// (-0.5,-0.5)-(0.5,0.5) (spec.md §4.7).
fn fundamental_tile_rect(tile_m: &Affine) -> (f64, f64, f64, f64) {
    let mut bbox = BBox::default();
    for (x, y) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
        let (gx, gy) = tile_m.apply(x, y);
        bbox.add_point(gx, gy);
    }
    let (min, max) = (bbox.min().unwrap(), bbox.max().unwrap());
    (min.0, min.1, max.0, max.1)
}

/// Replicates the fundamental tile across the design's bbox: extend
/// left/right/bottom/top one tile width/height at a time until the tile
/// rectangle covers the bbox, then emit the whole z-ordered drawing once
/// per offset (spec.md §4.7, grounded on colinw7/CContextFree's
/// `updateBBox` tile-extension loop).
fn render_tiled(result: &ExpansionResult, tile_m: &Affine, program: &Program, backend: &mut dyn Backend) {
    let (Some(bbox_min), Some(bbox_max)) = (result.bbox.min(), result.bbox.max()) else {
        return;
    };

    let (mut xmin, mut ymin, mut xmax, mut ymax) = fundamental_tile_rect(tile_m);
    let width = xmax - xmin;
    let height = ymax - ymin;
    if width.abs() < 1e-9 || height.abs() < 1e-9 {
        render_bucket_set(result, Affine::IDENTITY, program, backend);
        return;
    }

    let mut left = 0i64;
    while xmin > bbox_min.0 {
        xmin -= width;
        left += 1;
    }
    let mut right = 0i64;
    while xmax < bbox_max.0 {
        xmax += width;
        right += 1;
    }
    let mut bottom = 0i64;
    while ymin > bbox_min.1 {
        ymin -= height;
        bottom += 1;
    }
    let mut top = 0i64;
    while ymax < bbox_max.1 {
        ymax += height;
        top += 1;
    }

    for iy in -bottom..=top {
        for ix in -left..=right {
            let adjust_matrix = Affine::translate(ix as f64 * width, iy as f64 * height);
            render_bucket_set(result, adjust_matrix, program, backend);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ActionList, Action, Adjustment, RuleRef, TileSpec};
    use crate::backend::RecordingBackend;
    use crate::color::Hsva;
    use crate::config::EngineConfig;
    use crate::engine::Engine;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square_program() -> Program {
        let mut program = Program { start_shape: "S".to_string(), background: Hsva::BLACK, ..Program::default() };
        let s = program.rule_or_insert("S");
        let square = program.rule_or_insert("SQUARE");
        program.rule_mut(s).action_lists.push(ActionList {
            weight: 1.0,
            actions: vec![Action::Simple { target: RuleRef::Resolved(square), adjustment: Adjustment::default() }],
        });
        program
    }

    #[test]
    fn single_square_renders_one_fill_square_call() {
        let program = square_program();
        let result = Engine::new(&program, EngineConfig::default(), Box::new(StdRng::seed_from_u64(0))).expand(|| true);
        let mut backend = RecordingBackend::new();
        render(&result, &program, &mut backend);
        assert_eq!(backend.square_count(), 1);
    }

    #[test]
    fn tile_scale_two_with_unit_square_bbox_draws_exactly_one_instance() {
        let mut program = square_program();
        program.tile = Some(TileSpec { m: Affine::scale(2.0, 2.0) });
        let result = Engine::new(&program, EngineConfig::default(), Box::new(StdRng::seed_from_u64(0))).expand(|| true);
        let mut backend = RecordingBackend::new();
        render(&result, &program, &mut backend);
        assert_eq!(backend.square_count(), 1);
    }

    #[test]
    fn larger_area_primitive_paints_before_smaller_one_in_the_same_bucket() {
        let mut program = square_program();
        let triangle = program.rule_or_insert("TRIANGLE");
        let s = program.find_rule("S").unwrap();
        program.rule_mut(s).action_lists[0].actions.push(Action::Simple {
            target: RuleRef::Resolved(triangle),
            adjustment: Adjustment { m: Affine::scale(0.1, 0.1), ..Adjustment::default() },
        });
        let result = Engine::new(&program, EngineConfig::default(), Box::new(StdRng::seed_from_u64(0))).expand(|| true);
        let mut backend = RecordingBackend::new();
        render(&result, &program, &mut backend);
        assert!(matches!(backend.calls[1], crate::backend::DrawCall::Square { .. }));
        assert!(matches!(backend.calls[2], crate::backend::DrawCall::Triangle { .. }));
    }
}
