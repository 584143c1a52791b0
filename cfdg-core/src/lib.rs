//! Parser, stochastic expansion engine, and path/transform algebra for
//! the cfdg shape-grammar family (spec.md §1-9).

pub mod ast;
pub mod backend;
pub mod color;
pub mod config;
pub mod engine;
pub mod error_reporting;
pub mod eval;
pub mod parse;
pub mod path_engine;
pub mod render;
pub mod resolve;
pub mod state;
pub mod transform;

use backend::Backend;
use config::EngineConfig;
use error_reporting::EngineError;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Parses `source`, resolves every rule reference, expands the start
/// shape under `config`, and replays the result against `backend` —
/// the full C2-through-C8 pipeline in one call, for a simple embedding
/// program (spec.md §6). `tick` is invoked once per BFS generation; see
/// [`engine::Engine::expand`].
///
/// # Errors
///
/// Returns [`EngineError`] if the program's start shape (or a rule it
/// references) can't be resolved. Parse/eval errors inside `source` are
/// not fatal: they're printed to stderr and the offending directive is
/// skipped (spec.md §7).
pub fn run(
    source: &str,
    config: EngineConfig,
    backend: &mut dyn Backend,
    tick: impl FnMut() -> bool,
) -> Result<engine::ExpansionResult, EngineError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut program = parse::program::parse_source(source, &mut rng);
    resolve::resolve_program(&mut program)?;

    let result = engine::Engine::new(&program, config, Box::new(rng)).expand(tick);
    render::render(&result, &program, backend);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::RecordingBackend;

    #[test]
    fn run_parses_expands_and_renders_a_single_square() {
        let config = EngineConfig { seed: Some(0), ..EngineConfig::default() };
        let mut backend = RecordingBackend::new();
        let result = run("startshape S\nrule S { SQUARE { } }", config, &mut backend, || true).unwrap();
        assert_eq!(result.shapes_produced, 1);
        assert_eq!(backend.square_count(), 1);
    }

    #[test]
    fn run_reports_unknown_start_shape() {
        let config = EngineConfig { seed: Some(0), ..EngineConfig::default() };
        let mut backend = RecordingBackend::new();
        let err = run("rule S { SQUARE { } }", config, &mut backend, || true).unwrap_err();
        assert_eq!(err, EngineError::UnknownStartShape(String::new()));
    }
}
