use linfit_core::{LinfitResult, Matrix};
use linfit_io::{read_grid, Grid};
use linfit_preprocessing::{build_matrix, profile_grid, ColumnProfile, Mapper};
use std::path::Path;
use tracing::{debug, info};

/// A parsed, profiled and encoded table.
///
/// The grid is dropped once the matrix is built; the profiles and the
/// mapper stay for reporting and for locating the target block.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedDataset {
    pub profiles: Vec<ColumnProfile>,
    pub mapper: Mapper,
    pub matrix: Matrix,
}

impl EncodedDataset {
    /// Read and encode a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> LinfitResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "reading dataset");
        let grid = read_grid(path)?;
        Self::from_grid(&grid)
    }

    /// Encode raw file contents.
    pub fn from_text(raw: &str) -> LinfitResult<Self> {
        let grid = Grid::parse(raw)?;
        Self::from_grid(&grid)
    }

    pub fn from_grid(grid: &Grid) -> LinfitResult<Self> {
        let profiles = profile_grid(grid);
        debug!(columns = profiles.len(), "columns profiled");
        let mapper = Mapper::fit(grid, &profiles)?;
        let matrix = build_matrix(grid, &profiles, &mapper)?;
        info!(
            rows = matrix.rows(),
            columns = grid.n_cols(),
            width = matrix.cols(),
            "dataset encoded"
        );
        Ok(EncodedDataset {
            profiles,
            mapper,
            matrix,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.matrix.rows()
    }

    /// Profile of the last raw column, which is always the target.
    pub fn target_profile(&self) -> Option<&ColumnProfile> {
        self.profiles.last()
    }
}
