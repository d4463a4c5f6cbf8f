//! # linfit
//!
//! Turn a comma separated table into a numeric matrix and fit linear models
//! to its last column, with no hyperparameters to choose.
//!
//! ## Modules
//!
//! - **core**: Errors and the dense row-major `Matrix`
//! - **io**: Table parsing, `.data` file discovery, matrix CSV export
//! - **preprocessing**: Column profiling, one-hot/numeric encoding, matrix building, shuffling and holdout split
//! - **linear**: Linear model, regularized cost, mini-batch descent, annealing and λ search
//! - **pipeline**: Run configuration, training orchestration (regression or one-vs-rest), run summary

/// Errors and the dense matrix.
pub use linfit_core as core;

/// Table parsing and file helpers.
pub use linfit_io as io;

/// Column profiling and encoding.
pub use linfit_preprocessing as preprocessing;

/// Linear model and trainer.
pub use linfit_linear as linear;

/// End-to-end runs.
pub use linfit_pipeline as pipeline;

pub use linfit_core::{LinfitError, LinfitResult, Matrix};
pub use linfit_pipeline::{Pipeline, RunSummary, TrainConfig};
