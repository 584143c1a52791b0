//! C5: the breadth-first, weighted, stochastic expansion engine.
//!
//! Drives a program's `start_shape` down to a bounded population of
//! primitive [`RuleState`]s, bucketed by `floor(100*z)` (spec.md §4.5,
//! §9 "Z-bucket map ... preserved exactly").

use crate::ast::{Action, Adjustment, PathAction, Program, RuleEntry, RuleId, RuleKind, RuleRef};
use crate::config::EngineConfig;
use crate::state::{apply, State};
use crate::transform::Affine;
use rand::RngCore;
use std::collections::BTreeMap;

/// An axis-aligned bounding box in the design's global coordinate space.
/// `None` (unset) until the first point is added, matching the original
/// "not yet set" bbox state (spec.md §9, same pattern as the path
/// builder's current-point flag).
#[derive(Debug, Clone, Copy, Default)]
pub struct BBox {
    min: Option<(f64, f64)>,
    max: Option<(f64, f64)>,
}

impl BBox {
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.min.is_some()
    }

    pub fn add_point(&mut self, x: f64, y: f64) {
        self.min = Some(match self.min {
            Some((mx, my)) => (mx.min(x), my.min(y)),
            None => (x, y),
        });
        self.max = Some(match self.max {
            Some((mx, my)) => (mx.max(x), my.max(y)),
            None => (x, y),
        });
    }

    pub fn add_points(&mut self, points: &[(f64, f64)]) {
        for &(x, y) in points {
            self.add_point(x, y);
        }
    }

    #[must_use]
    pub fn min(&self) -> Option<(f64, f64)> {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Option<(f64, f64)> {
        self.max
    }

    /// `width * height`, `0.0` if unset — used both as a primitive's
    /// local-bbox area (spec.md §4.5) and by the path engine's stroke/fill
    /// bbox.
    #[must_use]
    pub fn area(&self) -> f64 {
        match (self.min, self.max) {
            (Some((x0, y0)), Some((x1, y1))) => (x1 - x0) * (y1 - y0),
            _ => 0.0,
        }
    }

    pub fn expand(&mut self, dx: f64, dy: f64) {
        if let (Some((x0, y0)), Some((x1, y1))) = (self.min, self.max) {
            self.min = Some((x0 - dx, y0 - dy));
            self.max = Some((x1 + dx, y1 + dy));
        }
    }
}

/// `(rule_ref, state, area)`: a planned primitive instantiation, awaiting
/// render in its z-bucket (spec.md §3).
#[derive(Debug, Clone)]
pub struct RuleState {
    pub rule: RuleId,
    pub state: State,
    pub area: f64,
}

/// One `path` rule's planned instantiation: the path's own State plus the
/// composite geometry that [`crate::path_engine`] already built while
/// expanding it (stroking/filling is resolved at expand time, not deferred
/// to render, since a path's geometry never changes once expanded).
#[derive(Debug, Clone)]
pub struct PathRuleState {
    pub state: State,
    pub built: crate::path_engine::BuiltPath,
    pub area: f64,
}

/// Everything the render driver (C7) needs out of an expand pass: the
/// z-bucketed primitives, the z-bucketed paths, and the global bbox.
#[derive(Debug, Default)]
pub struct ExpansionResult {
    pub primitive_buckets: BTreeMap<i64, Vec<RuleState>>,
    pub path_buckets: BTreeMap<i64, Vec<PathRuleState>>,
    pub bbox: BBox,
    pub shapes_produced: u32,
}

/// One BFS frontier entry: a not-yet-expanded `(rule, state)` rewrite.
type Frontier = Vec<(RuleId, State)>;

pub struct Engine<'p> {
    program: &'p Program,
    config: EngineConfig,
    rng: Box<dyn RngCore>,
    shapes_produced: u32,
    result: ExpansionResult,
}

impl<'p> Engine<'p> {
    #[must_use]
    pub fn new(program: &'p Program, config: EngineConfig, rng: Box<dyn RngCore>) -> Self {
        Engine { program, config, rng, shapes_produced: 0, result: ExpansionResult::default() }
    }

    /// Runs the BFS loop to completion (or until `tick` returns `false`).
    /// `tick` is invoked once per generation per spec.md §4.5 and §5 and
    /// may abandon remaining frontier work.
    pub fn expand(mut self, mut tick: impl FnMut() -> bool) -> ExpansionResult {
        let seed_state = apply(
            State::identity(self.program.background),
            &self.program.start_adjustment,
        );
        let Some(start) = self.program.find_rule(&self.program.start_shape) else {
            // resolve_program already validated this; defend anyway so
            // the engine never panics on a malformed caller.
            return self.result;
        };

        let mut frontiers: [Frontier; 2] = [vec![(start, seed_state)], vec![]];
        let mut active = 0usize;
        let mut generation = 0u64;

        while !frontiers[active].is_empty() {
            let inactive = 1 - active;
            frontiers[inactive].clear();

            let current = std::mem::take(&mut frontiers[active]);
            tracing::debug!(generation, frontier_size = current.len(), shapes_produced = self.shapes_produced, "bfs generation");
            for (rule_id, state) in current {
                self.expand_rule(rule_id, state, &mut frontiers[inactive]);
            }

            active = inactive;
            generation += 1;
            if !tick() {
                tracing::debug!(generation, "tick requested stop");
                break;
            }
        }

        self.result.shapes_produced = self.shapes_produced;
        self.result
    }

    fn at_shape_cap(&self) -> bool {
        self.config.max_shapes != 0 && self.shapes_produced >= self.config.max_shapes
    }

    fn below_size_limit(&self, state: &State) -> bool {
        let (sx, sy) = state.m.approx_scale();
        sx.abs().max(sy.abs()) / self.config.pixel_size < self.config.min_size
    }

    /// `Rule.expand(state)` (spec.md §4.5): pick one ActionList (weighted
    /// roulette when there's more than one), run its actions in order.
    fn expand_rule(&mut self, rule_id: RuleId, state: State, next: &mut Frontier) {
        if self.at_shape_cap() {
            return;
        }
        let rule = self.program.rule(rule_id);
        if rule.action_lists.is_empty() {
            self.emit_terminal(rule_id, rule, state);
            return;
        }
        let chosen = choose_action_list_index(&mut *self.rng, &rule.action_lists);
        let actions = rule.action_lists[chosen].actions.clone();
        for action in &actions {
            self.expand_action(action, state, next);
        }
    }

    fn expand_action(&mut self, action: &Action, state: State, next: &mut Frontier) {
        if self.at_shape_cap() {
            return;
        }
        match action {
            Action::Simple { target, adjustment } => self.expand_simple(target, adjustment, state, next),
            Action::Loop { count, loop_adjustment, target, adjustment } => {
                // spec.md §4.5: expand the inner (target, adjustment) at
                // each state_i; expand_simple does its own apply+size
                // check, so this only pre-checks state_i itself to abort
                // a long loop early once it's shrunk past the gate.
                let mut state_i = state;
                for _ in 0..*count {
                    if self.at_shape_cap() || self.below_size_limit(&state_i) {
                        return;
                    }
                    self.expand_simple(target, adjustment, state_i, next);
                    state_i = apply(state_i, loop_adjustment);
                }
            }
            Action::ComplexLoop { count, loop_adjustment, inner } => {
                let mut state_i = state;
                for _ in 0..*count {
                    if self.at_shape_cap() || self.below_size_limit(&state_i) {
                        return;
                    }
                    self.expand_action(inner, state_i, next);
                    state_i = apply(state_i, loop_adjustment);
                }
            }
            Action::PathAction(path) => self.expand_path(path, state),
        }
    }

    /// `SimpleAction.expand(state)` (spec.md §4.5): apply the adjustment,
    /// check the size gate, then either emit (terminal primitive) or
    /// enqueue onto the next frontier (user rule).
    fn expand_simple(&mut self, target: &RuleRef, adjustment: &Adjustment, state: State, next: &mut Frontier) {
        let state = apply(state, adjustment);
        if self.below_size_limit(&state) {
            return;
        }
        match target {
            RuleRef::BuiltinEmpty => {}
            RuleRef::Resolved(id) => {
                let rule = self.program.rule(*id);
                if rule.is_terminal_primitive() {
                    self.emit_terminal(*id, rule, state);
                } else {
                    next.push((*id, state));
                }
            }
            RuleRef::Unresolved(_) => {
                // resolve_program runs before expand(); an unresolved ref
                // here means the caller skipped resolution.
            }
        }
    }

    fn emit_terminal(&mut self, rule_id: RuleId, rule: &RuleEntry, state: State) {
        match rule.kind {
            RuleKind::Square => self.emit_primitive(rule_id, state, square_corners()),
            RuleKind::Circle => self.emit_primitive(rule_id, state, circle_samples()),
            RuleKind::Triangle => self.emit_primitive(rule_id, state, triangle_corners()),
            RuleKind::Path => {
                if let Some(path) = &rule.path {
                    self.expand_path(path, state);
                }
            }
            RuleKind::User => {}
        }
    }

    /// Primitive emission (spec.md §4.5): transform the unit shape's
    /// corners/samples, fold them into the global bbox, and append a
    /// `RuleState` to the z-bucket keyed by `floor(100*state.z)`. `area`
    /// is this shape's own (not the running global) bbox, of its
    /// transformed points — used later for area-descending sort within a
    /// z-bucket (spec.md §4.7).
    fn emit_primitive(&mut self, rule: RuleId, state: State, local_points: &[(f64, f64)]) {
        let mut shape_bbox = BBox::default();
        let mut global_points = Vec::with_capacity(local_points.len());
        for &(x, y) in local_points {
            let transformed = state.m.apply(x, y);
            shape_bbox.add_point(transformed.0, transformed.1);
            global_points.push(transformed);
        }
        self.result.bbox.add_points(&global_points);

        let bucket = self.result.primitive_buckets.entry(z_bucket_key(state.z)).or_default();
        bucket.push(RuleState { rule, state, area: shape_bbox.area() });
        self.shapes_produced += 1;
        if self.shapes_produced == self.config.max_shapes {
            tracing::debug!(shapes_produced = self.shapes_produced, "shape cap reached");
        }
    }

    fn expand_path(&mut self, path: &PathAction, state: State) {
        let built = crate::path_engine::build_path(path, &state, &mut *self.rng);
        self.result.bbox.add_points(&built.bbox_corners());
        let bucket = self.result.path_buckets.entry(z_bucket_key(state.z)).or_default();
        let area = built.bbox.area();
        bucket.push(PathRuleState { state, built, area });
        self.shapes_produced += 1;
    }
}

#[must_use]
pub fn z_bucket_key(z: f64) -> i64 {
    (z * 100.0).floor() as i64
}

/// Translates `CContextFree::Rule::getActionList()` (colinw7's original
/// C++ engine) directly: accumulate `t1`/`t2` across all lists in order,
/// assigning the candidate index before testing rejection, so a roll that
/// never satisfies `t1 <= r <= t2` for any earlier list naturally falls
/// through to the last one (spec.md §9 Open Question — this boundary
/// bias is observable and preserved verbatim).
fn choose_action_list_index(rng: &mut dyn RngCore, lists: &[crate::ast::ActionList]) -> usize {
    if lists.len() <= 1 {
        return 0;
    }
    let total: f64 = lists.iter().map(|l| l.weight).sum();
    let r = rng.gen_range(0.0..total);

    let mut t1 = 0.0_f64;
    let mut t2 = 0.0_f64;
    let mut chosen = 0;
    for (i, list) in lists.iter().enumerate() {
        chosen = i;
        t1 = t2;
        t2 = t1 + list.weight;
        if r < t1 || r > t2 {
            continue;
        }
        break;
    }
    chosen
}

/// Unit square, corners at +/-0.5 (spec.md §4.5).
pub(crate) fn square_corners() -> &'static [(f64, f64)] {
    &[(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)]
}

/// Equilateral triangle centered at the origin, height `1/sqrt(3)`
/// (spec.md §4.5). The centroid sits at the origin, so the apex is
/// `2/3` of the height above center and each base vertex is `1/3` of the
/// height below, at +/-0.5 in x.
pub(crate) fn triangle_corners() -> &'static [(f64, f64)] {
    use std::sync::OnceLock;
    static CORNERS: OnceLock<[(f64, f64); 3]> = OnceLock::new();
    CORNERS.get_or_init(|| {
        let h = 1.0 / 3.0_f64.sqrt();
        [(0.0, 2.0 / 3.0 * h), (-0.5, -1.0 / 3.0 * h), (0.5, -1.0 / 3.0 * h)]
    })
}

/// 13 points around a unit circle of radius 0.5, sampled every 30
/// degrees (spec.md §4.5's "4-Bezier unit circle approximation" is a
/// rendering detail of the back-end; the engine only needs a bbox/area
/// estimate, for which even samples at the cardinal and intercardinal
/// angles plus the closing point suffice).
pub(crate) fn circle_samples() -> &'static [(f64, f64)] {
    use std::sync::OnceLock;
    static SAMPLES: OnceLock<[(f64, f64); 13]> = OnceLock::new();
    SAMPLES.get_or_init(|| {
        let mut points = [(0.0, 0.0); 13];
        for (i, point) in points.iter_mut().enumerate() {
            let theta = (i as f64) * 30.0_f64.to_radians();
            *point = (0.5 * theta.cos(), 0.5 * theta.sin());
        }
        points
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ActionList;
    use crate::color::Hsva;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn white() -> Hsva {
        Hsva { hue: 0.0, saturation: 0.0, value: 1.0, alpha: 1.0 }
    }

    fn program_with_start(start: &str) -> Program {
        Program { start_shape: start.to_string(), background: Hsva::BLACK, ..Program::default() }
    }

    fn engine(program: &Program, config: EngineConfig) -> Engine<'_> {
        Engine::new(program, config, Box::new(StdRng::seed_from_u64(0)))
    }

    #[test]
    fn single_square_emits_one_primitive() {
        let mut program = program_with_start("S");
        program.rule_or_insert("S");
        let square = program.rule_or_insert("SQUARE");
        let id = program.find_rule("S").unwrap();
        program.rule_mut(id).action_lists.push(ActionList {
            weight: 1.0,
            actions: vec![Action::Simple { target: RuleRef::Resolved(square), adjustment: Adjustment::default() }],
        });

        let result = engine(&program, EngineConfig::default()).expand(|| true);
        assert_eq!(result.shapes_produced, 1);
        let (min, max) = (result.bbox.min().unwrap(), result.bbox.max().unwrap());
        assert_eq!(min, (-0.5, -0.5));
        assert_eq!(max, (0.5, 0.5));
    }

    #[test]
    fn size_gate_terminates_self_recursion() {
        // rule S { SQUARE {} S { s 0.8 x 1 } }, min_size=0.3: terminates
        // once max(|sx|,|sy|) / pixel_size < 0.3, i.e. 0.8^n < 0.3.
        let mut program = program_with_start("S");
        let s = program.rule_or_insert("S");
        let square = program.rule_or_insert("SQUARE");
        let recurse_adj = Adjustment { m: Affine::scale(0.8, 0.8).compose(&Affine::translate(1.0, 0.0)), ..Adjustment::default() };
        program.rule_mut(s).action_lists.push(ActionList {
            weight: 1.0,
            actions: vec![
                Action::Simple { target: RuleRef::Resolved(square), adjustment: Adjustment::default() },
                Action::Simple { target: RuleRef::Resolved(s), adjustment: recurse_adj },
            ],
        });

        let config = EngineConfig { min_size: 0.3, pixel_size: 1.0, max_shapes: 0, seed: Some(0) };
        let result = engine(&program, config).expand(|| true);
        // 0.8^(n-1) >= 0.3 > 0.8^n => n = 6
        assert_eq!(result.shapes_produced, 6);
    }

    #[test]
    fn shape_cap_stops_expansion() {
        let mut program = program_with_start("S");
        let s = program.rule_or_insert("S");
        let square = program.rule_or_insert("SQUARE");
        let recurse_adj = Adjustment { m: Affine::scale(0.99, 0.99), ..Adjustment::default() };
        program.rule_mut(s).action_lists.push(ActionList {
            weight: 1.0,
            actions: vec![
                Action::Simple { target: RuleRef::Resolved(square), adjustment: Adjustment::default() },
                Action::Simple { target: RuleRef::Resolved(s), adjustment: recurse_adj },
            ],
        });

        let config = EngineConfig { min_size: 0.0001, pixel_size: 1.0, max_shapes: 10, seed: Some(0) };
        let result = engine(&program, config).expand(|| true);
        assert_eq!(result.shapes_produced, 10);
    }

    #[test]
    fn loop_action_emits_four_rotated_squares() {
        let mut program = program_with_start("S");
        let s = program.rule_or_insert("S");
        let square = program.rule_or_insert("SQUARE");
        let loop_adj = Adjustment { m: Affine::rotate_degrees(90.0), ..Adjustment::default() };
        program.rule_mut(s).action_lists.push(ActionList {
            weight: 1.0,
            actions: vec![Action::Loop {
                count: 4,
                loop_adjustment: loop_adj,
                target: RuleRef::Resolved(square),
                adjustment: Adjustment::default(),
            }],
        });

        let result = engine(&program, EngineConfig::default()).expand(|| true);
        assert_eq!(result.shapes_produced, 4);
    }

    #[test]
    fn boundary_roll_falls_through_per_original_rejection_test() {
        // A rejection test of `r < t1 || r > t2` with `r` exactly at the
        // shared boundary (1.0) is accepted by list 0's `r > t2` check
        // (1.0 is not > 1.0) and breaks there, matching getActionList().
        // gen_range(0.0..total) never actually produces `total` itself,
        // so this exercises the boundary arithmetic directly rather than
        // through the RNG.
        let lists = vec![
            ActionList { weight: 1.0, actions: vec![] },
            ActionList { weight: 1.0, actions: vec![] },
        ];
        let r = 1.0;
        let mut t1 = 0.0_f64;
        let mut t2 = 0.0_f64;
        let mut chosen = 0;
        for (i, list) in lists.iter().enumerate() {
            chosen = i;
            t1 = t2;
            t2 = t1 + list.weight;
            if r < t1 || r > t2 {
                continue;
            }
            break;
        }
        assert_eq!(chosen, 0);
    }

    #[test]
    fn z_bucket_key_quantizes_by_100() {
        assert_eq!(z_bucket_key(0.015), 1);
        assert_eq!(z_bucket_key(-0.015), -2);
    }
}
