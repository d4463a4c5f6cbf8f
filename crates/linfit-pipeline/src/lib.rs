//! Ingestion and training orchestration: raw text in, trained linear
//! models and a read-only run summary out.

pub mod config;
pub mod dataset;
pub mod orchestrator;
pub mod pipeline;

pub use config::TrainConfig;
pub use dataset::EncodedDataset;
pub use orchestrator::{target_kind, train, Sample, TargetKind, TargetReport, TrainingReport};
pub use pipeline::{ColumnSummary, Pipeline, RunSummary};
