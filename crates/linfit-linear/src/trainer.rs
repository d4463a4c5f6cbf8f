use crate::gradient::{batch_step, BatchWindow, StepConfig};
use crate::model::LinearModel;
use linfit_core::{LinfitError, LinfitResult, Matrix};
use linfit_preprocessing::holdout_split;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Learning rate every annealing run starts with.
pub const INITIAL_LEARNING_RATE: f64 = 0.1;
/// Factor the learning rate is divided by after a round that did not help.
pub const LEARNING_RATE_DECAY: f64 = 10.0;
/// Descent runs per annealing.
pub const ANNEAL_ROUNDS: usize = 10;
/// Share of rows used for training during the regularization search.
pub const TRAIN_RATIO: f64 = 0.7;
/// Regularization strengths tried, in order.
pub const LAMBDA_CANDIDATES: [f64; 13] = [
    0.0, 0.001, 0.003, 0.01, 0.03, 0.1, 0.3, 1.0, 3.0, 10.0, 30.0, 100.0, 300.0,
];

/// Result of [`Trainer::anneal`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnealOutcome {
    /// Regularized training cost of the returned parameters.
    pub cost: f64,
    /// Learning rate after the last round.
    pub learning_rate: f64,
    /// Rounds that lowered the cost.
    pub improved_rounds: usize,
}

/// Holdout cost reached by one regularization strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub lambda: f64,
    pub holdout_cost: f64,
}

/// Result of [`Trainer::fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitOutcome {
    /// Selected regularization strength.
    pub lambda: f64,
    /// Unregularized cost of the selected parameters on the holdout rows.
    pub holdout_cost: f64,
    pub candidates: Vec<CandidateScore>,
}

/// Self-tuning trainer for [`LinearModel`].
///
/// Gradient descent is wrapped twice: annealing picks the learning rate,
/// and a holdout search over [`LAMBDA_CANDIDATES`] picks the
/// regularization strength.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Trainer {
    pub window: BatchWindow,
}

impl Trainer {
    pub fn new(window: BatchWindow) -> Self {
        Trainer { window }
    }

    /// Descend with a learning rate that starts at 0.1 and shrinks tenfold
    /// whenever a round fails to lower the cost.
    ///
    /// A round that does not improve is rolled back, so the returned cost is
    /// never above the cost of the parameters passed in.
    pub fn anneal(&self, model: &mut LinearModel, x: &Matrix, y: &[f64], lambda: f64) -> AnnealOutcome {
        let mut config = StepConfig::for_rows(y.len(), INITIAL_LEARNING_RATE, lambda, self.window);
        let mut best = model.clone();
        let mut best_cost = model.cost(x, y, lambda);
        let mut improved_rounds = 0;

        for round in 0..ANNEAL_ROUNDS {
            batch_step(model, x, y, &config);
            let cost = model.cost(x, y, lambda);
            trace!(round, learning_rate = config.learning_rate, cost, "anneal round");

            if cost < best_cost {
                best_cost = cost;
                best.clone_from(model);
                improved_rounds += 1;
            } else {
                config.learning_rate /= LEARNING_RATE_DECAY;
                model.clone_from(&best);
            }
        }

        model.clone_from(&best);
        AnnealOutcome {
            cost: best_cost,
            learning_rate: config.learning_rate,
            improved_rounds,
        }
    }

    /// Randomize the model, then search the regularization strength.
    ///
    /// See [`Trainer::fit_from_current`].
    pub fn fit<R: Rng + ?Sized>(
        &self,
        model: &mut LinearModel,
        x: &Matrix,
        y: &[f64],
        rng: &mut R,
    ) -> LinfitResult<FitOutcome> {
        model.randomize(rng);
        self.fit_from_current(model, x, y)
    }

    /// Search the regularization strength starting from the current
    /// parameters.
    ///
    /// The first 70% of rows train, the rest score. Every candidate anneals
    /// from the same starting parameters; the candidate with the lowest
    /// unregularized holdout cost wins, and only a strict improvement over
    /// the starting parameters replaces them. The model ends up holding the
    /// winning parameters.
    pub fn fit_from_current(&self, model: &mut LinearModel, x: &Matrix, y: &[f64]) -> LinfitResult<FitOutcome> {
        if x.cols() != model.n_features() {
            return Err(LinfitError::ShapeMismatch {
                expected: vec![model.n_features()],
                got: vec![x.cols()],
            });
        }
        let (x_train, x_test, y_train, y_test) = holdout_split(x, y, TRAIN_RATIO)?;

        let initial = model.clone();
        let mut best = model.clone();
        let mut best_lambda = LAMBDA_CANDIDATES[0];
        let mut best_cost = model.cost(&x_test, &y_test, 0.0);
        let mut candidates = Vec::with_capacity(LAMBDA_CANDIDATES.len());

        for &lambda in LAMBDA_CANDIDATES.iter() {
            model.clone_from(&initial);
            let annealed = self.anneal(model, &x_train, &y_train, lambda);
            let holdout_cost = model.cost(&x_test, &y_test, 0.0);
            debug!(
                lambda,
                train_cost = annealed.cost,
                holdout_cost,
                "regularization candidate"
            );
            candidates.push(CandidateScore { lambda, holdout_cost });

            if holdout_cost < best_cost {
                best_cost = holdout_cost;
                best_lambda = lambda;
                best.clone_from(model);
            }
        }

        model.clone_from(&best);
        info!(lambda = best_lambda, holdout_cost = best_cost, "regularization selected");

        Ok(FitOutcome {
            lambda: best_lambda,
            holdout_cost: best_cost,
            candidates,
        })
    }
}
