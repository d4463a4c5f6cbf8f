use linfit_core::ParseError;
use tracing::debug;

/// Column separator of the input format.
pub const DELIMITER: char = ',';
/// Smallest accepted number of rows.
pub const MIN_ROWS: usize = 10;
/// Smallest accepted number of columns.
pub const MIN_COLUMNS: usize = 2;

/// A trimmed text value, or `None` when the cell is missing.
pub type Cell = Option<String>;

/// Rectangular table of optional text cells parsed from a delimited buffer.
///
/// A `Grid` always has at least [`MIN_ROWS`] rows and [`MIN_COLUMNS`]
/// columns, every row has the same width, and no row is entirely missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
    columns: usize,
}

impl Grid {
    /// Parse a comma separated buffer.
    pub fn parse(raw: &str) -> Result<Grid, ParseError> {
        Self::parse_with_delimiter(raw, DELIMITER)
    }

    /// Parse raw file bytes, which must be valid UTF-8.
    pub fn parse_bytes(raw: &[u8]) -> Result<Grid, ParseError> {
        let text = std::str::from_utf8(raw).map_err(|e| ParseError::Unreadable {
            path: "<bytes>".to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(text)
    }

    /// Parse a buffer split into rows on `\n` and into columns on `delimiter`.
    ///
    /// The column count is taken from the first line. A single line break at
    /// the very end of the buffer terminates the last row instead of opening
    /// an empty one, so such a buffer has `count('\n')` rows rather than
    /// `count('\n') + 1`. A reader that always counted the extra row would
    /// reject it as an all-missing row.
    pub fn parse_with_delimiter(raw: &str, delimiter: char) -> Result<Grid, ParseError> {
        if !raw.contains('\n') {
            return Err(ParseError::NoNewline);
        }

        let body = raw.strip_suffix('\n').unwrap_or(raw);
        let lines: Vec<&str> = body
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();

        let columns = lines[0].matches(delimiter).count() + 1;
        if columns < MIN_COLUMNS {
            return Err(ParseError::TooFewColumns {
                found: columns,
                min: MIN_COLUMNS,
            });
        }
        if lines.len() < MIN_ROWS {
            return Err(ParseError::TooFewRows {
                found: lines.len(),
                min: MIN_ROWS,
            });
        }

        let mut cells = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            cells.push(split_row(line, i + 1, columns, delimiter)?);
        }

        debug!(rows = cells.len(), columns, "grid parsed");
        Ok(Grid { cells, columns })
    }

    pub fn n_rows(&self) -> usize {
        self.cells.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns
    }

    /// The text of a cell, `None` when missing.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.cells[row][col].as_deref()
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.cells.iter().map(move |r| r[col].as_deref())
    }
}

fn split_row(
    line: &str,
    number: usize,
    columns: usize,
    delimiter: char,
) -> Result<Vec<Cell>, ParseError> {
    if line.is_empty() {
        return Err(ParseError::BlankLine { line: number });
    }

    let row: Vec<Cell> = line.split(delimiter).map(to_cell).collect();
    if row.len() != columns {
        return Err(ParseError::ColumnCount {
            line: number,
            expected: columns,
            found: row.len(),
        });
    }
    if row.iter().all(Option::is_none) {
        return Err(ParseError::EmptyRow { line: number });
    }
    Ok(row)
}

fn to_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(rows: &[&str]) -> String {
        rows.join("\n")
    }

    fn ten_rows() -> Vec<String> {
        (0..10).map(|i| format!("{}, v{}", i, i % 3)).collect()
    }

    #[test]
    fn test_parse_valid_grid() {
        let raw = ten_rows().join("\n");
        let grid = Grid::parse(&raw).unwrap();
        assert_eq!(grid.n_rows(), 10);
        assert_eq!(grid.n_cols(), 2);
        assert_eq!(grid.cell(0, 0), Some("0"));
        assert_eq!(grid.cell(4, 1), Some("v1"));
    }

    #[test]
    fn test_cells_are_trimmed_and_blank_cells_missing() {
        let mut rows = ten_rows();
        rows[2] = "  7  ,   ".to_string();
        rows[3] = ",x".to_string();
        let grid = Grid::parse(&rows.join("\n")).unwrap();
        assert_eq!(grid.cell(2, 0), Some("7"));
        assert_eq!(grid.cell(2, 1), None);
        assert_eq!(grid.cell(3, 0), None);
        assert_eq!(grid.cell(3, 1), Some("x"));
    }

    #[test]
    fn test_trailing_newline_and_crlf() {
        let raw = format!("{}\r\n", ten_rows().join("\r\n"));
        let grid = Grid::parse(&raw).unwrap();
        assert_eq!(grid.n_rows(), 10);
        assert_eq!(grid.cell(9, 1), Some("v0"));
    }

    #[test]
    fn test_only_one_trailing_newline_is_dropped() {
        let raw = format!("{}\n", ten_rows().join("\n"));
        let grid = Grid::parse(&raw).unwrap();
        assert_eq!(grid.n_rows(), raw.matches('\n').count());

        let doubled = format!("{}\n", raw);
        assert_eq!(
            Grid::parse(&doubled).unwrap_err(),
            ParseError::BlankLine { line: 11 }
        );
    }

    #[test]
    fn test_no_newline() {
        assert_eq!(Grid::parse("a,b,c").unwrap_err(), ParseError::NoNewline);
    }

    #[test]
    fn test_too_few_columns() {
        let raw = lines(&["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]);
        assert_eq!(
            Grid::parse(&raw).unwrap_err(),
            ParseError::TooFewColumns { found: 1, min: 2 }
        );
    }

    #[test]
    fn test_too_few_rows() {
        let raw = ten_rows()[..9].join("\n");
        assert_eq!(
            Grid::parse(&raw).unwrap_err(),
            ParseError::TooFewRows { found: 9, min: 10 }
        );
    }

    #[test]
    fn test_blank_line() {
        let mut rows = ten_rows();
        rows[5] = String::new();
        assert_eq!(
            Grid::parse(&rows.join("\n")).unwrap_err(),
            ParseError::BlankLine { line: 6 }
        );
    }

    #[test]
    fn test_wrong_column_count() {
        let mut rows = ten_rows();
        rows[3] = "1".to_string();
        assert_eq!(
            Grid::parse(&rows.join("\n")).unwrap_err(),
            ParseError::ColumnCount { line: 4, expected: 2, found: 1 }
        );

        let mut rows = ten_rows();
        rows[7] = "1,2,3".to_string();
        assert_eq!(
            Grid::parse(&rows.join("\n")).unwrap_err(),
            ParseError::ColumnCount { line: 8, expected: 2, found: 3 }
        );
    }

    #[test]
    fn test_all_missing_row() {
        let mut rows = ten_rows();
        rows[0] = " , ".to_string();
        assert_eq!(
            Grid::parse(&rows.join("\n")).unwrap_err(),
            ParseError::EmptyRow { line: 1 }
        );
    }

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        let err = Grid::parse_bytes(&[0xff, 0xfe, b'\n']).unwrap_err();
        assert!(matches!(err, ParseError::Unreadable { .. }));
    }
}
