use crate::config::TrainConfig;
use crate::dataset::EncodedDataset;
use linfit_core::{LinfitError, LinfitResult, Matrix};
use linfit_linear::{CandidateScore, LinearModel, Trainer};
use linfit_preprocessing::{shuffle_rows, ColumnEncoding, Mapper};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// What the last column asks to be trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetKind {
    /// One regression model on the column's value slot.
    Numeric,
    /// One binary model per class (one-vs-rest), in dictionary order.
    Categorical { classes: Vec<Option<String>> },
}

impl TargetKind {
    pub fn n_models(&self) -> usize {
        match self {
            TargetKind::Numeric => 1,
            TargetKind::Categorical { classes } => classes.len(),
        }
    }
}

/// Decide the training plan from the encoding of the last column.
pub fn target_kind(mapper: &Mapper) -> TargetKind {
    match mapper.encodings().last() {
        Some(ColumnEncoding::Categorical(dict)) => TargetKind::Categorical {
            classes: dict.values().to_vec(),
        },
        _ => TargetKind::Numeric,
    }
}

/// One `(actual, predicted)` pair, in encoded units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub actual: f64,
    pub predicted: f64,
}

/// Outcome of training against one target column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetReport {
    /// Slot label of the target column, e.g. `c3` or `c3=red`.
    pub label: String,
    /// Matrix column used as `y`.
    pub column: usize,
    pub lambda: f64,
    /// `J(0)` on every row for a model with `bias = 1` and zero weights.
    pub cost_before: f64,
    /// `J(0)` on every row for the trained model.
    pub cost_after: f64,
    pub holdout_cost: f64,
    pub candidates: Vec<CandidateScore>,
    pub model: LinearModel,
    pub samples: Vec<Sample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub rows: usize,
    pub features: usize,
    pub targets: Vec<TargetReport>,
}

/// Shuffle the encoded rows once, split off the target block and fit one
/// model per target column.
///
/// Features are every matrix column before the last raw column's block. A
/// numeric target trains on the block's value slot only, so its missing
/// indicator is neither a feature nor a target. A categorical target trains
/// each one-hot slot independently against the same features.
pub fn train<R: Rng + ?Sized>(
    dataset: &EncodedDataset,
    config: &TrainConfig,
    rng: &mut R,
) -> LinfitResult<TrainingReport> {
    let mapper = &dataset.mapper;
    let last = mapper
        .n_columns()
        .checked_sub(1)
        .ok_or_else(|| LinfitError::ShapeMismatch {
            expected: vec![1],
            got: vec![0],
        })?;
    let block = mapper.block(last);
    let target_columns: Vec<usize> = match mapper.encoding(last) {
        ColumnEncoding::Numeric { .. } => vec![block.start],
        ColumnEncoding::Categorical(_) => block.clone().collect(),
    };

    let mut matrix = dataset.matrix.clone();
    shuffle_rows(&mut matrix, config.shuffle, rng);
    let x = matrix.column_range(0, block.start)?;
    let labels = mapper.slot_labels();
    let trainer = Trainer::new(config.batch_window);

    info!(
        rows = x.rows(),
        features = x.cols(),
        models = target_columns.len(),
        "training started"
    );

    let mut targets = Vec::with_capacity(target_columns.len());
    for column in target_columns {
        let y = matrix.column(column)?;
        let label = labels[column].clone();
        targets.push(train_target(&trainer, &x, &y, label, column, config.sample_count, rng)?);
    }

    Ok(TrainingReport {
        rows: x.rows(),
        features: x.cols(),
        targets,
    })
}

fn train_target<R: Rng + ?Sized>(
    trainer: &Trainer,
    x: &Matrix,
    y: &[f64],
    label: String,
    column: usize,
    sample_count: usize,
    rng: &mut R,
) -> LinfitResult<TargetReport> {
    let mut model = LinearModel::new(x.cols());
    let cost_before = model.cost(x, y, 0.0);
    let fit = trainer.fit(&mut model, x, y, rng)?;
    let cost_after = model.cost(x, y, 0.0);
    info!(target = %label, lambda = fit.lambda, cost_before, cost_after, "target trained");

    let samples = x
        .iter_rows()
        .zip(y)
        .take(sample_count)
        .map(|(row, &actual)| Sample {
            actual,
            predicted: model.hypothesis(row),
        })
        .collect();

    Ok(TargetReport {
        label,
        column,
        lambda: fit.lambda,
        cost_before,
        cost_after,
        holdout_cost: fit.holdout_cost,
        candidates: fit.candidates,
        model,
        samples,
    })
}
