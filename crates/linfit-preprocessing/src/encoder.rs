use crate::profile::ColumnProfile;
use linfit_core::{LinfitError, LinfitResult};
use linfit_io::{Cell, Grid};
use serde::Serialize;
use std::collections::HashMap;
use std::ops::Range;
use tracing::debug;

/// Ordered set of the distinct values of a categorical column.
///
/// Values keep the order in which they were first encountered; a missing
/// cell is a value of its own.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CategoryDictionary {
    values: Vec<Cell>,
    #[serde(skip)]
    value_to_idx: HashMap<String, usize>,
    #[serde(skip)]
    missing_idx: Option<usize>,
}

impl CategoryDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the dictionary from cells in row order.
    pub fn from_cells<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut dict = CategoryDictionary::new();
        for cell in cells {
            dict.insert(cell);
        }
        dict
    }

    /// Add a value if it is not known yet and return its index.
    pub fn insert(&mut self, cell: Option<&str>) -> usize {
        if let Some(idx) = self.index_of(cell) {
            return idx;
        }
        let idx = self.values.len();
        match cell {
            Some(text) => {
                self.value_to_idx.insert(text.to_string(), idx);
            }
            None => self.missing_idx = Some(idx),
        }
        self.values.push(cell.map(str::to_string));
        idx
    }

    pub fn index_of(&self, cell: Option<&str>) -> Option<usize> {
        match cell {
            Some(text) => self.value_to_idx.get(text).copied(),
            None => self.missing_idx,
        }
    }

    pub fn values(&self) -> &[Cell] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// How one grid column is laid out in the encoded matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnEncoding {
    /// One normalized slot, plus a missing-indicator slot when the column
    /// has missing cells.
    Numeric { missing_indicator: bool },
    /// One slot per dictionary value.
    Categorical(CategoryDictionary),
}

impl ColumnEncoding {
    /// A column with any word cell is categorical, numeric-looking cells
    /// included; everything else is numeric.
    pub fn for_column(grid: &Grid, col: usize, profile: &ColumnProfile) -> Self {
        if profile.words > 0 {
            ColumnEncoding::Categorical(CategoryDictionary::from_cells(grid.column(col)))
        } else {
            ColumnEncoding::Numeric {
                missing_indicator: profile.missing > 0,
            }
        }
    }

    /// Number of matrix columns this encoding occupies.
    pub fn width(&self) -> usize {
        match self {
            ColumnEncoding::Numeric { missing_indicator } => 1 + usize::from(*missing_indicator),
            ColumnEncoding::Categorical(dict) => dict.len(),
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnEncoding::Categorical(_))
    }

    pub fn categories(&self) -> Option<&CategoryDictionary> {
        match self {
            ColumnEncoding::Categorical(dict) => Some(dict),
            ColumnEncoding::Numeric { .. } => None,
        }
    }

    /// Position of the slot a cell writes to, relative to the column block.
    pub fn local_slot(&self, cell: Option<&str>) -> Option<usize> {
        match (self, cell) {
            (ColumnEncoding::Numeric { .. }, Some(_)) => Some(0),
            (ColumnEncoding::Numeric { missing_indicator: true }, None) => Some(1),
            (ColumnEncoding::Numeric { missing_indicator: false }, None) => None,
            (ColumnEncoding::Categorical(dict), cell) => dict.index_of(cell),
        }
    }
}

/// Per-column encodings of a grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mapper {
    encodings: Vec<ColumnEncoding>,
}

impl Mapper {
    /// Decide the encoding of every column.
    pub fn fit(grid: &Grid, profiles: &[ColumnProfile]) -> LinfitResult<Self> {
        if profiles.len() != grid.n_cols() {
            return Err(LinfitError::ShapeMismatch {
                expected: vec![grid.n_cols()],
                got: vec![profiles.len()],
            });
        }
        let encodings: Vec<ColumnEncoding> = profiles
            .iter()
            .enumerate()
            .map(|(col, p)| ColumnEncoding::for_column(grid, col, p))
            .collect();
        let mapper = Mapper { encodings };
        debug!(
            columns = mapper.n_columns(),
            width = mapper.total_width(),
            "mapper created"
        );
        Ok(mapper)
    }

    pub fn from_encodings(encodings: Vec<ColumnEncoding>) -> Self {
        Mapper { encodings }
    }

    pub fn n_columns(&self) -> usize {
        self.encodings.len()
    }

    pub fn encodings(&self) -> &[ColumnEncoding] {
        &self.encodings
    }

    pub fn encoding(&self, col: usize) -> &ColumnEncoding {
        &self.encodings[col]
    }

    /// First matrix column of grid column `col`: the sum of the widths of
    /// every column before it. All absolute positions derive from this.
    pub fn offset(&self, col: usize) -> usize {
        self.encodings[..col].iter().map(ColumnEncoding::width).sum()
    }

    /// Width of the whole encoded matrix.
    pub fn total_width(&self) -> usize {
        self.offset(self.encodings.len())
    }

    /// Matrix columns occupied by grid column `col`.
    pub fn block(&self, col: usize) -> Range<usize> {
        let start = self.offset(col);
        start..start + self.encodings[col].width()
    }

    /// Absolute matrix column a cell of grid column `col` writes to.
    pub fn slot(&self, col: usize, cell: Option<&str>) -> LinfitResult<usize> {
        let local = self.encodings[col]
            .local_slot(cell)
            .ok_or_else(|| LinfitError::Encoding {
                column: col,
                value: cell.map(str::to_string),
            })?;
        Ok(self.offset(col) + local)
    }

    /// A readable name for every matrix column, e.g. `c1`, `c1:missing`,
    /// `c3=red` or `c3=<missing>`.
    pub fn slot_labels(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.total_width());
        for (col, encoding) in self.encodings.iter().enumerate() {
            let name = format!("c{}", col + 1);
            match encoding {
                ColumnEncoding::Numeric { missing_indicator } => {
                    if *missing_indicator {
                        labels.push(name.clone());
                        labels.push(format!("{}:missing", name));
                    } else {
                        labels.push(name);
                    }
                }
                ColumnEncoding::Categorical(dict) => {
                    for value in dict.values() {
                        labels.push(format!(
                            "{}={}",
                            name,
                            value.as_deref().unwrap_or("<missing>")
                        ));
                    }
                }
            }
        }
        labels
    }
}
