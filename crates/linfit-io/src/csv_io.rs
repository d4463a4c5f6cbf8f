use crate::grid::Grid;
use linfit_core::{Matrix, ParseError};
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read a whole file and parse it into a [`Grid`].
///
/// An unreadable or non UTF-8 file is reported as [`ParseError::Unreadable`].
pub fn read_grid<P: AsRef<Path>>(path: P) -> Result<Grid, ParseError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| ParseError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), bytes = raw.len(), "read file content");
    Grid::parse(&raw)
}

/// Write an encoded matrix to a CSV file with optional headers.
pub fn write_matrix_csv<P: AsRef<Path>>(
    path: P,
    data: &Matrix,
    headers: Option<&[String]>,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;

    if let Some(h) = headers {
        if h.len() != data.cols() {
            return Err(format!("{} headers for {} columns", h.len(), data.cols()).into());
        }
        wtr.write_record(h)?;
    }

    for row in data.iter_rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_grid_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        for i in 0..12 {
            writeln!(file, "{},{}", i, if i % 2 == 0 { "even" } else { "odd" }).unwrap();
        }
        file.flush().unwrap();

        let grid = read_grid(file.path()).unwrap();
        assert_eq!(grid.n_rows(), 12);
        assert_eq!(grid.cell(11, 1), Some("odd"));
    }

    #[test]
    fn test_read_grid_missing_file() {
        let err = read_grid("/definitely/not/here.data").unwrap_err();
        assert!(matches!(err, ParseError::Unreadable { .. }));
    }

    #[test]
    fn test_write_matrix_csv() {
        let file = NamedTempFile::new().unwrap();
        let m = Matrix::from_vec2d(&[vec![1.0, 0.5], vec![0.0, -2.0]]).unwrap();
        let headers = vec!["a".to_string(), "b".to_string()];
        write_matrix_csv(file.path(), &m, Some(headers.as_slice())).unwrap();

        let written = fs::read_to_string(file.path()).unwrap();
        assert_eq!(written, "a,b\n1,0.5\n0,-2\n");

        let short = vec!["a".to_string()];
        assert!(write_matrix_csv(file.path(), &m, Some(short.as_slice())).is_err());
    }
}
