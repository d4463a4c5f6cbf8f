use linfit_io::Grid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parse a cell as a number: the whole trimmed text must be a finite `f64`.
pub fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Running mean and sum of squared deviations, updated one value at a time
/// (Welford's online algorithm).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OnlineStats {
    count: usize,
    mean: f64,
    m2: f64,
}

impl OnlineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// `M2 / (n - 1)`; needs at least two values.
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as f64)
    }
}

impl Extend<f64> for OnlineStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.push(x);
        }
    }
}

/// How a column reads to a human: the type shown in the column table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Integer,
    Float,
    Word,
    Empty,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnKind::Integer => "int",
            ColumnKind::Float => "float",
            ColumnKind::Word => "word",
            ColumnKind::Empty => "empty",
        };
        f.pad(label)
    }
}

/// Statistics of one grid column.
///
/// `min`/`max` cover the numeric cells. `mean`/`variance` are only defined
/// for columns without any word cell and with at least two numeric cells.
/// `variance` is the sum of squared deviations over `n - 1`, with no square
/// root; it is the divisor used when the column is normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub missing: usize,
    pub numeric: usize,
    pub words: usize,
    pub discrete: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub variance: Option<f64>,
}

impl ColumnProfile {
    /// Profile one column of the grid.
    pub fn from_grid(grid: &Grid, col: usize) -> Self {
        let mut missing = 0;
        let mut numeric = 0;
        let mut words = 0;
        let mut discrete_count = 0;
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;

        for cell in grid.column(col) {
            let Some(text) = cell else {
                missing += 1;
                continue;
            };
            match parse_number(text) {
                Some(v) => {
                    numeric += 1;
                    if v.fract() == 0.0 {
                        discrete_count += 1;
                    }
                    min = Some(min.map_or(v, |m| m.min(v)));
                    max = Some(max.map_or(v, |m| m.max(v)));
                }
                None => words += 1,
            }
        }

        let (mean, variance) = if words == 0 {
            let mut stats = OnlineStats::new();
            stats.extend(grid.column(col).flatten().filter_map(parse_number));
            (
                stats.sample_variance().and(stats.mean()),
                stats.sample_variance(),
            )
        } else {
            (None, None)
        };

        ColumnProfile {
            missing,
            numeric,
            words,
            discrete: numeric > 0 && discrete_count == numeric,
            min,
            max,
            mean,
            variance,
        }
    }

    /// Non-missing cells.
    pub fn count(&self) -> usize {
        self.numeric + self.words
    }

    pub fn kind(&self) -> ColumnKind {
        if self.words > 0 {
            ColumnKind::Word
        } else if self.numeric == 0 {
            ColumnKind::Empty
        } else if self.discrete {
            ColumnKind::Integer
        } else {
            ColumnKind::Float
        }
    }

    /// `(value - mean) / variance`, or `value` unchanged when the column has
    /// no statistics. A zero spread (constant column) is treated as 1.
    pub fn normalize(&self, value: f64) -> f64 {
        match (self.mean, self.variance) {
            (Some(mean), Some(spread)) => (value - mean) / safe_spread(spread),
            _ => value,
        }
    }
}

fn safe_spread(spread: f64) -> f64 {
    if spread == 0.0 {
        1.0
    } else {
        spread
    }
}

/// Profile every column of the grid.
pub fn profile_grid(grid: &Grid) -> Vec<ColumnProfile> {
    (0..grid.n_cols())
        .map(|col| ColumnProfile::from_grid(grid, col))
        .collect()
}
