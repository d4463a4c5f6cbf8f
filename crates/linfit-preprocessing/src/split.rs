use linfit_core::{LinfitError, LinfitResult, Matrix};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Row shuffling algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShuffleMode {
    /// Uniform permutation (Fisher-Yates).
    #[default]
    FisherYates,
    /// Swap each row `i` with a row drawn uniformly from the whole matrix.
    /// Not a uniform permutation; kept to reproduce earlier runs.
    Legacy,
}

/// Shuffle the rows of a matrix in place.
pub fn shuffle_rows<R: Rng + ?Sized>(matrix: &mut Matrix, mode: ShuffleMode, rng: &mut R) {
    let m = matrix.rows();
    if m < 2 {
        return;
    }
    match mode {
        ShuffleMode::FisherYates => {
            for i in (1..m).rev() {
                let j = rng.gen_range(0..=i);
                matrix.swap_rows(i, j);
            }
        }
        ShuffleMode::Legacy => {
            for i in 0..m {
                let j = rng.gen_range(0..m);
                matrix.swap_rows(i, j);
            }
        }
    }
}

/// Split data into a training prefix and a test suffix without shuffling.
///
/// The first `floor(train_ratio * m)` rows are for training. Returns
/// `(X_train, X_test, y_train, y_test)`.
pub fn holdout_split(
    x: &Matrix,
    y: &[f64],
    train_ratio: f64,
) -> LinfitResult<(Matrix, Matrix, Vec<f64>, Vec<f64>)> {
    let m = x.rows();
    if m != y.len() {
        return Err(LinfitError::ShapeMismatch {
            expected: vec![m],
            got: vec![y.len()],
        });
    }
    let cut = (m as f64 * train_ratio).floor() as usize;

    let x_train = x.row_range(0, cut)?;
    let x_test = x.row_range(cut, m)?;
    Ok((x_train, x_test, y[..cut].to_vec(), y[cut..].to_vec()))
}
