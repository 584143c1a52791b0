//! Reference command-line harness: parses one or more grammar files,
//! runs them through `cfdg_core::run` against a `RecordingBackend`, and
//! prints a textual summary instead of pixels (spec.md §6 puts the
//! actual pixel/SVG back-end out of the core's scope).

use std::path::PathBuf;
use std::process::ExitCode;

use cfdg_core::backend::RecordingBackend;
use cfdg_core::config::EngineConfig;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Settings {
    /// Output width in pixels.
    #[arg(long, short = 'w', default_value_t = 1000)]
    pub width: u32,

    /// Output height in pixels.
    #[arg(long, short = 'H', default_value_t = 1000)]
    pub height: u32,

    /// Shorthand for `--width N --height N`.
    #[arg(long, short = 's')]
    pub size: Option<u32>,

    /// Hard cap on emitted primitives; 0 disables the cap.
    #[arg(long = "max-shapes", short = 'm', default_value_t = 500_000)]
    pub max_shapes: u32,

    /// Minimum shape size, in pixels, below which a shape is dropped.
    #[arg(long = "min-size", short = 'x', default_value_t = 0.3)]
    pub min_size: f64,

    /// Border width in pixels, reserved around the design.
    #[arg(long, short = 'b', default_value_t = 0)]
    pub border: u32,

    #[arg(long, conflicts_with = "noantialias")]
    pub antialias: bool,

    #[arg(long)]
    pub noantialias: bool,

    /// Seed the RNG for reproducible output instead of system entropy.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable `tracing` output (also respected via `RUST_LOG`).
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// One or more `.cfdg` grammar files to run, in order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

fn install_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn engine_config(settings: &Settings) -> EngineConfig {
    let (width, _height) = match settings.size {
        Some(size) => (size, size),
        None => (settings.width, settings.height),
    };
    EngineConfig {
        max_shapes: settings.max_shapes,
        min_size: settings.min_size,
        pixel_size: 1.0 / width.max(1) as f64,
        seed: settings.seed,
    }
}

fn summarize(path: &PathBuf, result: &cfdg_core::engine::ExpansionResult, backend: &RecordingBackend) {
    println!("{}:", path.display());
    println!("  shapes produced: {}", result.shapes_produced);
    if let (Some(min), Some(max)) = (result.bbox.min(), result.bbox.max()) {
        println!("  bbox: ({:.4}, {:.4}) - ({:.4}, {:.4})", min.0, min.1, max.0, max.1);
    } else {
        println!("  bbox: empty");
    }
    println!("  z-buckets: {} primitive, {} path", result.primitive_buckets.len(), result.path_buckets.len());
    println!(
        "  draw calls: {} squares, {} circles, {} triangles",
        backend.square_count(),
        backend.circle_count(),
        backend.triangle_count(),
    );
}

fn main() -> ExitCode {
    let settings = Settings::parse();
    install_tracing(settings.verbose);

    let config = engine_config(&settings);

    for path in &settings.files {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("{}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        };

        let mut backend = RecordingBackend::new();
        match cfdg_core::run(&source, config.clone(), &mut backend, || true) {
            Ok(result) => summarize(path, &result, &backend),
            Err(err) => {
                eprintln!("{}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
