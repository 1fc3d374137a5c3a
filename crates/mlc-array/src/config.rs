use serde::{Deserialize, Serialize};

/// Central configuration for the array engine.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Element count at or above which elementwise passes run on rayon.
    pub parallel_threshold: usize,

    pub tabular: TabularConfig,
}

impl EngineConfig {
    /// Elements per rayon task for the flat elementwise passes.
    pub(crate) const PARALLEL_CHUNK: usize = 4096;

    pub fn new(parallel_threshold: usize, tabular: TabularConfig) -> Self {
        Self {
            parallel_threshold,
            tabular,
        }
    }

    /// Configuration that never takes the parallel path.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            ..Self::default()
        }
    }

    pub(crate) fn use_parallel(&self, size: usize) -> bool {
        size >= self.parallel_threshold
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 1 << 16,
            tabular: TabularConfig::default(),
        }
    }
}

/// Settings for reading delimited text into a 2-D array.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TabularConfig {
    /// Field separator.
    pub delimiter: u8,
    /// Elements reserved before the first doubling.
    pub initial_capacity: usize,
    /// Strip surrounding whitespace from each field before parsing.
    pub trim_fields: bool,
}

impl TabularConfig {
    pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter,
            ..Self::default()
        }
    }
}

impl Default for TabularConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            trim_fields: true,
        }
    }
}
