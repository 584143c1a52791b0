/// Engine configuration, supplied by the embedding program before `parse`
/// (spec.md §6). A plain struct, passed by value down into the engine —
/// no config file format of its own.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Hard cap on emitted primitives. `0` disables the cap.
    pub max_shapes: u32,
    /// Minimum `max(|sx|, |sy|) / pixel_size` a primitive must clear to
    /// be emitted.
    pub min_size: f64,
    /// Set by the render driver from the output dimensions.
    pub pixel_size: f64,
    /// `Some` for deterministic runs (tests); `None` seeds from the
    /// system entropy source.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_shapes: 500_000,
            min_size: 0.3,
            pixel_size: 1.0,
            seed: None,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
