use linfit_linear::BatchWindow;
use linfit_preprocessing::ShuffleMode;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Pairs of `(actual, predicted)` kept per trained model by default.
pub const DEFAULT_SAMPLE_COUNT: usize = 10;

/// Run configuration.
///
/// Only the source of randomness and the two algorithm variants are
/// configurable; every training hyperparameter is a constant of
/// `linfit-linear`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Seed for shuffling and parameter initialization. `None` draws from
    /// the operating system.
    pub seed: Option<u64>,
    pub shuffle: ShuffleMode,
    pub batch_window: BatchWindow,
    pub sample_count: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            seed: None,
            shuffle: ShuffleMode::default(),
            batch_window: BatchWindow::default(),
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

impl TrainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_shuffle(mut self, shuffle: ShuffleMode) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_batch_window(mut self, window: BatchWindow) -> Self {
        self.batch_window = window;
        self
    }

    pub fn with_sample_count(mut self, count: usize) -> Self {
        self.sample_count = count;
        self
    }

    /// The random source for one run.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
