use crate::encoder::{ColumnEncoding, Mapper};
use crate::profile::{parse_number, ColumnProfile};
use linfit_core::{LinfitError, LinfitResult, Matrix};
use linfit_io::Grid;
use tracing::debug;

/// Materialize the dense encoded matrix of a grid.
///
/// Numeric cells are normalized into their column's first slot; a missing
/// numeric cell sets the indicator slot instead. Categorical cells set the
/// slot of their dictionary index. Every other slot stays zero.
pub fn build_matrix(grid: &Grid, profiles: &[ColumnProfile], mapper: &Mapper) -> LinfitResult<Matrix> {
    let cols = grid.n_cols();
    if profiles.len() != cols || mapper.n_columns() != cols {
        return Err(LinfitError::ShapeMismatch {
            expected: vec![cols, cols],
            got: vec![profiles.len(), mapper.n_columns()],
        });
    }

    let offsets: Vec<usize> = (0..cols).map(|col| mapper.offset(col)).collect();
    let mut matrix = Matrix::zeros(grid.n_rows(), mapper.total_width());

    for (i, row) in grid.iter_rows().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            let cell = cell.as_deref();
            let encoding = mapper.encoding(col);
            let encoding_error = || LinfitError::Encoding {
                column: col,
                value: cell.map(str::to_string),
            };

            let local = encoding.local_slot(cell).ok_or_else(encoding_error)?;
            let value = match (encoding, cell) {
                (ColumnEncoding::Numeric { .. }, Some(text)) => {
                    let v = parse_number(text).ok_or_else(encoding_error)?;
                    profiles[col].normalize(v)
                }
                _ => 1.0,
            };
            matrix.set(i, offsets[col] + local, value);
        }
    }

    debug!(rows = matrix.rows(), cols = matrix.cols(), "matrix created");
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::CategoryDictionary;
    use crate::profile::profile_grid;
    use approx::assert_relative_eq;

    fn sample_grid() -> Grid {
        let raw = [
            "1, red, 10",
            ", blue, 11",
            "3, red, 12",
            "4, , 13",
            "5, green, 14",
            "6, blue, 15",
            ", red, 16",
            "8, red, 17",
            "9, blue, 18",
            "10, , 19",
        ]
        .join("\n");
        Grid::parse(&raw).unwrap()
    }

    fn encode(grid: &Grid) -> (Vec<ColumnProfile>, Mapper, Matrix) {
        let profiles = profile_grid(grid);
        let mapper = Mapper::fit(grid, &profiles).unwrap();
        let matrix = build_matrix(grid, &profiles, &mapper).unwrap();
        (profiles, mapper, matrix)
    }

    #[test]
    fn test_matrix_width_matches_mapper() {
        let (_, mapper, matrix) = encode(&sample_grid());
        assert_eq!(matrix.shape(), (10, 2 + 4 + 1));
        assert_eq!(matrix.cols(), mapper.total_width());
    }

    #[test]
    fn test_one_hot_blocks() {
        let grid = sample_grid();
        let (_, mapper, matrix) = encode(&grid);
        let block = mapper.block(1);
        for i in 0..matrix.rows() {
            let slots = &matrix.row(i)[block.clone()];
            assert_eq!(slots.iter().filter(|&&v| v == 1.0).count(), 1, "row {}", i);
            assert_eq!(slots.iter().filter(|&&v| v == 0.0).count(), slots.len() - 1);
        }
        // missing city on rows 3 and 9 lands on the same slot
        let missing_slot = mapper.slot(1, None).unwrap();
        assert_eq!(matrix.get(3, missing_slot), 1.0);
        assert_eq!(matrix.get(9, missing_slot), 1.0);
    }

    #[test]
    fn test_missing_indicator_is_exclusive() {
        let (profiles, mapper, matrix) = encode(&sample_grid());
        let base = mapper.offset(0);
        for i in 0..matrix.rows() {
            let value = matrix.get(i, base);
            let indicator = matrix.get(i, base + 1);
            assert!((value != 0.0) ^ (indicator == 1.0), "row {}", i);
        }
        assert_eq!(matrix.get(1, base + 1), 1.0);
        assert_eq!(matrix.get(1, base), 0.0);
        assert_relative_eq!(matrix.get(0, base), profiles[0].normalize(1.0));
    }

    #[test]
    fn test_numeric_column_normalized() {
        let (profiles, mapper, matrix) = encode(&sample_grid());
        let label = mapper.offset(2);
        let mean = profiles[2].mean.unwrap();
        let variance = profiles[2].variance.unwrap();
        assert_relative_eq!(mean, 14.5, epsilon = 1e-12);
        for i in 0..matrix.rows() {
            let raw = 10.0 + i as f64;
            assert_relative_eq!(matrix.get(i, label), (raw - mean) / variance, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_unknown_category_is_encoding_error() {
        let grid = sample_grid();
        let profiles = profile_grid(&grid);
        let mut dict = CategoryDictionary::new();
        dict.insert(Some("red"));
        let mapper = Mapper::from_encodings(vec![
            ColumnEncoding::Numeric { missing_indicator: true },
            ColumnEncoding::Categorical(dict),
            ColumnEncoding::Numeric { missing_indicator: false },
        ]);
        let err = build_matrix(&grid, &profiles, &mapper).unwrap_err();
        assert_eq!(
            err,
            LinfitError::Encoding { column: 1, value: Some("blue".into()) }
        );
    }

    #[test]
    fn test_mismatched_inputs() {
        let grid = sample_grid();
        let profiles = profile_grid(&grid);
        let mapper = Mapper::from_encodings(vec![]);
        assert!(matches!(
            build_matrix(&grid, &profiles, &mapper),
            Err(LinfitError::ShapeMismatch { .. })
        ));
    }
}
