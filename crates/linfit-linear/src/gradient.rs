use crate::model::LinearModel;
use linfit_core::Matrix;
use serde::{Deserialize, Serialize};

/// Gradient steps taken per training row in one descent run.
pub const STEPS_PER_ROW: usize = 1000;

/// Mini-batch size for a training set of `m` rows.
pub fn batch_size_for(m: usize) -> usize {
    match m {
        0..=9 => 1,
        10..=19 => 4,
        20..=49 => 10,
        50..=199 => 20,
        _ => 50,
    }
}

/// Which rows each mini-batch covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchWindow {
    /// Every step uses rows `0..batch`.
    #[default]
    Fixed,
    /// Each step starts where the previous one stopped, wrapping around.
    Advancing,
}

/// Parameters of one descent run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepConfig {
    pub learning_rate: f64,
    pub lambda: f64,
    pub batch: usize,
    pub steps: usize,
    pub window: BatchWindow,
}

impl StepConfig {
    /// Batch size and step count derived from the number of training rows.
    pub fn for_rows(m: usize, learning_rate: f64, lambda: f64, window: BatchWindow) -> Self {
        StepConfig {
            learning_rate,
            lambda,
            batch: batch_size_for(m),
            steps: m * STEPS_PER_ROW,
            window,
        }
    }
}

/// Run mini-batch gradient descent with weight decay.
///
/// Each step averages the residual gradient over one batch, then updates
/// `bias -= α·g₀` and `θⱼ = θⱼ·(1 - αλ) - α·gⱼ`.
pub fn batch_step(model: &mut LinearModel, x: &Matrix, y: &[f64], config: &StepConfig) {
    let m = x.rows();
    let n = x.cols();
    assert_eq!(m, y.len(), "X rows must match y length");
    assert_eq!(n, model.theta.len(), "X columns must match theta length");
    if m == 0 || config.batch == 0 {
        return;
    }

    let alpha = config.learning_rate;
    let decay = 1.0 - alpha * config.lambda;
    let mut grad = vec![0.0; n + 1];
    let mut start = 0;

    for _ in 0..config.steps {
        grad.iter_mut().for_each(|g| *g = 0.0);

        let mut i = start;
        for _ in 0..config.batch {
            let row = x.row(i);
            let residual = model.hypothesis(row) - y[i];
            grad[0] += residual;
            for (g, v) in grad[1..].iter_mut().zip(row) {
                *g += residual * v;
            }
            i += 1;
            if i == m {
                i = 0;
            }
        }
        if config.window == BatchWindow::Advancing {
            start = i;
        }

        if config.batch > 1 {
            let b = config.batch as f64;
            grad.iter_mut().for_each(|g| *g /= b);
        }

        model.bias -= alpha * grad[0];
        for (t, g) in model.theta.iter_mut().zip(&grad[1..]) {
            *t = *t * decay - alpha * g;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line(m: usize) -> (Matrix, Vec<f64>) {
        let rows: Vec<Vec<f64>> = (0..m).map(|i| vec![i as f64 / m as f64]).collect();
        let y = (0..m).map(|i| 2.0 * i as f64 / m as f64 - 0.5).collect();
        (Matrix::from_vec2d(&rows).unwrap(), y)
    }

    #[test]
    fn test_batch_size_thresholds() {
        assert_eq!(batch_size_for(1), 1);
        assert_eq!(batch_size_for(9), 1);
        assert_eq!(batch_size_for(10), 4);
        assert_eq!(batch_size_for(19), 4);
        assert_eq!(batch_size_for(20), 10);
        assert_eq!(batch_size_for(49), 10);
        assert_eq!(batch_size_for(50), 20);
        assert_eq!(batch_size_for(199), 20);
        assert_eq!(batch_size_for(200), 50);
        assert_eq!(batch_size_for(100_000), 50);
    }

    #[test]
    fn test_step_config_for_rows() {
        let config = StepConfig::for_rows(12, 0.1, 0.3, BatchWindow::Fixed);
        assert_eq!(config.batch, 4);
        assert_eq!(config.steps, 12_000);
    }

    #[test]
    fn test_descent_reduces_cost() {
        let (x, y) = line(8);
        let mut model = LinearModel::new(1);
        let before = model.cost(&x, &y, 0.0);
        let config = StepConfig {
            learning_rate: 0.1,
            lambda: 0.0,
            batch: 8,
            steps: 2000,
            window: BatchWindow::Fixed,
        };
        batch_step(&mut model, &x, &y, &config);
        assert!(model.cost(&x, &y, 0.0) < before * 0.01);
        assert_relative_eq!(model.theta[0], 2.0, epsilon = 1e-3);
        assert_relative_eq!(model.bias, -0.5, epsilon = 1e-3);
    }

    #[test]
    fn test_weight_decay_without_residual() {
        // bias already fits y and X is zero: only the decay term moves theta
        let x = Matrix::zeros(5, 2);
        let y = vec![1.0; 5];
        let mut model = LinearModel { bias: 1.0, theta: vec![1.0, -2.0] };
        let config = StepConfig {
            learning_rate: 0.1,
            lambda: 1.0,
            batch: 1,
            steps: 3,
            window: BatchWindow::Fixed,
        };
        batch_step(&mut model, &x, &y, &config);
        assert_eq!(model.bias, 1.0);
        assert_relative_eq!(model.theta[0], 0.729, epsilon = 1e-12);
        assert_relative_eq!(model.theta[1], -1.458, epsilon = 1e-12);
    }

    #[test]
    fn test_fixed_window_only_sees_first_batch() {
        let (x, y) = line(10);
        let mut y_tail = y.clone();
        for v in y_tail[4..].iter_mut() {
            *v += 100.0;
        }
        let config = StepConfig::for_rows(10, 0.1, 0.0, BatchWindow::Fixed);
        assert_eq!(config.batch, 4);

        let mut a = LinearModel::new(1);
        let mut b = LinearModel::new(1);
        batch_step(&mut a, &x, &y, &config);
        batch_step(&mut b, &x, &y_tail, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_advancing_window_sees_every_row() {
        let (x, y) = line(10);
        let mut y_tail = y.clone();
        for v in y_tail[4..].iter_mut() {
            *v += 100.0;
        }
        let config = StepConfig {
            steps: 50,
            ..StepConfig::for_rows(10, 0.1, 0.0, BatchWindow::Advancing)
        };

        let mut a = LinearModel::new(1);
        let mut b = LinearModel::new(1);
        batch_step(&mut a, &x, &y, &config);
        batch_step(&mut b, &x, &y_tail, &config);
        assert_ne!(a, b);
    }

    #[test]
    fn test_batch_wraps_around() {
        // batch larger than the data revisits rows from the top
        let (x, y) = line(3);
        let config = StepConfig {
            learning_rate: 0.05,
            lambda: 0.0,
            batch: 7,
            steps: 500,
            window: BatchWindow::Advancing,
        };
        let mut model = LinearModel::new(1);
        let before = model.cost(&x, &y, 0.0);
        batch_step(&mut model, &x, &y, &config);
        assert!(model.cost(&x, &y, 0.0) < before);
    }
}
