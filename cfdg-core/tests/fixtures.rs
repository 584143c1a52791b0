//! End-to-end `parse -> resolve -> expand -> render` runs over the
//! sample grammars in `cfdg-fixtures` (spec.md §9's worked scenarios
//! S1-S6, plus the pinwheel smoke test and an error-path fixture).

use cfdg_core::backend::RecordingBackend;
use cfdg_core::config::EngineConfig;
use cfdg_core::error_reporting::EngineError;

fn run_fixture(name: &str, config: EngineConfig) -> (cfdg_core::engine::ExpansionResult, RecordingBackend) {
    let source = cfdg_fixtures::load_fixture(name);
    let mut backend = RecordingBackend::new();
    let result = cfdg_core::run(&source, config, &mut backend, || true).unwrap();
    (result, backend)
}

#[test]
fn s1_single_square_emits_exactly_one_fill() {
    let (result, backend) = run_fixture("s1_single_square.cfdg", EngineConfig::default().with_seed(0));
    assert_eq!(result.shapes_produced, 1);
    assert_eq!(backend.square_count(), 1);
}

#[test]
fn s2_size_gate_terminates_self_recursion() {
    let (result, _) = run_fixture("s2_size_gate.cfdg", EngineConfig::default().with_seed(0));
    assert!(result.shapes_produced > 1);
    assert!(result.shapes_produced < 100, "size gate should stop the recursion well short of the shape cap");
}

#[test]
fn s3_weighted_choice_picks_one_branch_per_seed() {
    let (result, backend) = run_fixture("s3_weighted_choice.cfdg", EngineConfig::default().with_seed(1));
    assert_eq!(result.shapes_produced, 1);
    assert_eq!(backend.square_count() + backend.circle_count(), 1);
}

#[test]
fn s4_loop_action_emits_four_rotated_squares() {
    let (result, backend) = run_fixture("s4_loop_action.cfdg", EngineConfig::default().with_seed(0));
    assert_eq!(result.shapes_produced, 4);
    assert_eq!(backend.square_count(), 4);
}

#[test]
fn s5_tile_replication_draws_exactly_one_instance_of_a_unit_square() {
    let (result, backend) = run_fixture("s5_tile_replication.cfdg", EngineConfig::default().with_seed(0));
    assert_eq!(result.shapes_produced, 1);
    assert_eq!(backend.square_count(), 1);
}

#[test]
fn s6_path_stroke_emits_one_stroke_call() {
    let (result, backend) = run_fixture("s6_path_stroke.cfdg", EngineConfig::default().with_seed(0));
    assert_eq!(result.shapes_produced, 1);
    assert_eq!(backend.calls.len(), 2, "background fill plus one path stroke");
}

#[test]
fn pinwheel_expands_without_hitting_the_shape_cap() {
    let (result, _) = run_fixture("pinwheel.cfdg", EngineConfig::default().with_seed(42));
    assert!(result.shapes_produced > 1);
    assert!(result.shapes_produced < EngineConfig::default().max_shapes);
}

#[test]
fn pinwheel_is_deterministic_under_a_fixed_seed() {
    let (first, _) = run_fixture("pinwheel.cfdg", EngineConfig::default().with_seed(7));
    let (second, _) = run_fixture("pinwheel.cfdg", EngineConfig::default().with_seed(7));
    assert_eq!(first.shapes_produced, second.shapes_produced);
    assert_eq!(first.bbox.min(), second.bbox.min());
    assert_eq!(first.bbox.max(), second.bbox.max());
}

#[test]
fn unknown_start_shape_is_reported_as_an_engine_error() {
    let source = cfdg_fixtures::load_fixture("unknown_start.cfdg");
    let mut backend = RecordingBackend::new();
    let err = cfdg_core::run(&source, EngineConfig::default().with_seed(0), &mut backend, || true).unwrap_err();
    assert_eq!(err, EngineError::UnknownStartShape("NOT_DEFINED".to_string()));
}
