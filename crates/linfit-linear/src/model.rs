use linfit_core::Matrix;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Linear hypothesis `h(x) = bias + Σ theta[i] * x[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub bias: f64,
    pub theta: Vec<f64>,
}

impl LinearModel {
    /// Bias every fresh or re-initialized model starts from.
    pub const INITIAL_BIAS: f64 = 1.0;

    /// A model with `bias = 1` and all weights zero.
    pub fn new(n_features: usize) -> Self {
        LinearModel {
            bias: Self::INITIAL_BIAS,
            theta: vec![0.0; n_features],
        }
    }

    /// A model with `bias = 1` and weights drawn uniformly from `[-1, 1]`.
    pub fn randomized<R: Rng + ?Sized>(n_features: usize, rng: &mut R) -> Self {
        let mut model = Self::new(n_features);
        model.randomize(rng);
        model
    }

    /// Reset to `bias = 1` and uniform weights in `[-1, 1]`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.bias = Self::INITIAL_BIAS;
        for t in self.theta.iter_mut() {
            *t = rng.gen_range(-1.0..=1.0);
        }
    }

    pub fn n_features(&self) -> usize {
        self.theta.len()
    }

    pub fn hypothesis(&self, x: &[f64]) -> f64 {
        self.theta
            .iter()
            .zip(x)
            .fold(self.bias, |acc, (t, v)| acc + t * v)
    }

    pub fn predict(&self, x: &Matrix) -> Vec<f64> {
        x.iter_rows().map(|row| self.hypothesis(row)).collect()
    }

    /// Regularized cost `(1/2m) * [Σ (h(x) - y)² + λ Σ theta²]`.
    ///
    /// The bias is never regularized; `lambda = 0` is the plain squared
    /// error over `2m`.
    pub fn cost(&self, x: &Matrix, y: &[f64], lambda: f64) -> f64 {
        assert_eq!(x.rows(), y.len(), "X rows must match y length");
        assert_eq!(x.cols(), self.theta.len(), "X columns must match theta length");

        let m = x.rows();
        let mut sum: f64 = x
            .iter_rows()
            .zip(y)
            .map(|(row, &yi)| {
                let d = self.hypothesis(row) - yi;
                d * d
            })
            .sum();

        if lambda != 0.0 {
            let reg: f64 = self.theta.iter().map(|t| t * t).sum();
            sum += lambda * reg;
        }

        sum / (2 * m) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn data() -> (Matrix, Vec<f64>) {
        let x = Matrix::from_vec2d(&[
            vec![1.0, 2.0],
            vec![0.5, -1.0],
            vec![-2.0, 0.0],
            vec![3.0, 1.5],
        ])
        .unwrap();
        (x, vec![1.0, -2.0, 0.5, 4.0])
    }

    #[test]
    fn test_new_model() {
        let model = LinearModel::new(3);
        assert_eq!(model.bias, 1.0);
        assert_eq!(model.theta, vec![0.0; 3]);
        assert_eq!(model.hypothesis(&[5.0, 6.0, 7.0]), 1.0);
    }

    #[test]
    fn test_randomize_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut model = LinearModel::new(200);
        model.bias = 5.0;
        model.randomize(&mut rng);
        assert_eq!(model.bias, 1.0);
        assert!(model.theta.iter().all(|t| (-1.0..=1.0).contains(t)));
        assert!(model.theta.iter().any(|&t| t != 0.0));

        let again = LinearModel::randomized(200, &mut StdRng::seed_from_u64(11));
        assert_eq!(again, model);
    }

    #[test]
    fn test_hypothesis_and_predict() {
        let (x, _) = data();
        let model = LinearModel { bias: 0.5, theta: vec![2.0, -1.0] };
        assert_eq!(model.hypothesis(&[1.0, 2.0]), 0.5);
        assert_eq!(model.predict(&x), vec![0.5, 2.5, -3.5, 5.0]);
    }

    #[test]
    fn test_unregularized_cost_is_half_mse() {
        let (x, y) = data();
        let model = LinearModel { bias: 0.25, theta: vec![0.5, 1.0] };
        let preds = model.predict(&x);
        let sq: f64 = preds.iter().zip(&y).map(|(p, t)| (p - t) * (p - t)).sum();
        assert_relative_eq!(model.cost(&x, &y, 0.0), sq / (2.0 * 4.0), epsilon = 1e-12);
    }

    #[test]
    fn test_bias_is_not_regularized() {
        let (x, y) = data();
        let model = LinearModel { bias: 3.0, theta: vec![0.0, 0.0] };
        assert_eq!(model.cost(&x, &y, 0.0), model.cost(&x, &y, 100.0));
    }

    #[test]
    fn test_cost_non_decreasing_in_lambda() {
        let (x, y) = data();
        let model = LinearModel { bias: -0.3, theta: vec![0.7, -0.2] };
        let lambdas = [0.0, 0.001, 0.01, 0.1, 1.0, 10.0, 300.0];
        let costs: Vec<f64> = lambdas.iter().map(|&l| model.cost(&x, &y, l)).collect();
        for pair in costs.windows(2) {
            assert!(pair[0] <= pair[1], "{:?}", costs);
        }
        let reg = 0.7 * 0.7 + 0.2 * 0.2;
        assert_relative_eq!(costs[4] - costs[0], reg / 8.0, epsilon = 1e-12);
    }
}
