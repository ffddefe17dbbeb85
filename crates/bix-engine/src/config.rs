use serde::{Deserialize, Serialize};

/// Tuning knobs for midpoint selection.
///
/// Higher numbers mean longer per-round runtimes. Correctness does not
/// depend on any of these values; a configuration that forces exhaustive
/// scoring at every size is merely slower on large graphs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ParamConfig {
    /// Graph order at or below which every vertex is scored exhaustively.
    pub limit: usize,
    /// Sample density per branch in sampled mode: the middle slice of
    /// each leaf's ancestor walk is strided down to roughly this many
    /// candidates.
    pub divisions: usize,
    /// Number of merge commits included in the sampled candidate pool.
    pub merges: usize,
}

impl Default for ParamConfig {
    fn default() -> Self {
        Self {
            limit: 1000,
            divisions: 300,
            merges: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_knobs() {
        let config = ParamConfig::default();
        assert_eq!(config.limit, 1000);
        assert_eq!(config.divisions, 300);
        assert_eq!(config.merges, 2000);
    }
}
