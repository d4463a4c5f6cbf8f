use crate::config::TrainConfig;
use crate::dataset::EncodedDataset;
use crate::orchestrator::{target_kind, train, TargetKind, TrainingReport};
use linfit_core::LinfitResult;
use linfit_preprocessing::{ColumnKind, ColumnProfile};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read-only description of one raw column: its statistics and where it
/// landed in the encoded matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub index: usize,
    pub kind: ColumnKind,
    pub profile: ColumnProfile,
    pub categorical: bool,
    pub offset: usize,
    pub width: usize,
    /// Dictionary of a categorical column; `None` stands for missing cells.
    pub categories: Vec<Option<String>>,
}

impl ColumnSummary {
    pub fn describe(dataset: &EncodedDataset) -> Vec<ColumnSummary> {
        let mapper = &dataset.mapper;
        dataset
            .profiles
            .iter()
            .enumerate()
            .map(|(index, profile)| {
                let encoding = mapper.encoding(index);
                ColumnSummary {
                    index,
                    kind: profile.kind(),
                    profile: profile.clone(),
                    categorical: encoding.is_categorical(),
                    offset: mapper.offset(index),
                    width: encoding.width(),
                    categories: encoding
                        .categories()
                        .map(|dict| dict.values().to_vec())
                        .unwrap_or_default(),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub columns: Vec<ColumnSummary>,
    pub target: TargetKind,
    pub report: TrainingReport,
}

/// Ingest a table and train on it with one configuration.
///
/// # Example
/// ```no_run
/// use linfit_pipeline::{Pipeline, TrainConfig};
///
/// let pipeline = Pipeline::new(TrainConfig::new().with_seed(42));
/// let summary = pipeline.run_path("files/houses.data").unwrap();
/// for target in &summary.report.targets {
///     println!("{}: {} -> {}", target.label, target.cost_before, target.cost_after);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: TrainConfig,
}

impl Pipeline {
    pub fn new(config: TrainConfig) -> Self {
        Pipeline { config }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn run_path<P: AsRef<Path>>(&self, path: P) -> LinfitResult<RunSummary> {
        let dataset = EncodedDataset::from_path(path)?;
        self.run(&dataset)
    }

    pub fn run_text(&self, raw: &str) -> LinfitResult<RunSummary> {
        let dataset = EncodedDataset::from_text(raw)?;
        self.run(&dataset)
    }

    /// Train on an already encoded table, drawing from a fresh random
    /// source built from the configuration.
    pub fn run(&self, dataset: &EncodedDataset) -> LinfitResult<RunSummary> {
        let mut rng = self.config.rng();
        let report = train(dataset, &self.config, &mut rng)?;
        Ok(RunSummary {
            columns: ColumnSummary::describe(dataset),
            target: target_kind(&dataset.mapper),
            report,
        })
    }
}
