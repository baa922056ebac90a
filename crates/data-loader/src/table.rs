//! A small header-addressed table of CSV cells.
//!
//! Both the stored profile and the catalog have columns that are only known
//! at runtime (genre flags, extra catalog fields), so they are handled as
//! string cells looked up by header name. Typed access goes through
//! `numeric_column` / `text_column`, where a missing or malformed cell
//! becomes `None` instead of an error.

use serde::Serialize;

/// Cell spellings treated as missing, in addition to the empty string.
const MISSING_MARKERS: [&str; 7] = ["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Returns true if a raw cell carries no value
pub fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || MISSING_MARKERS.contains(&cell)
}

/// Parse a cell as a finite number, `None` if missing or malformed.
///
/// Boolean flags (`True`/`False`, as pandas writes one-hot columns) read as
/// 1.0 and 0.0.
pub fn parse_number(cell: &str) -> Option<f64> {
    if is_missing(cell) {
        return None;
    }
    match cell.trim() {
        "True" | "true" => Some(1.0),
        "False" | "false" => Some(0.0),
        text => text.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, padding short rows with empty (missing) cells
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with this header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// The cell at (row, col), `None` if out of range or missing
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|c| c.as_str())
            .filter(|c| !is_missing(c))
    }

    /// Numeric view of a column, `None` if the column does not exist
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(|r| parse_number(&r[col])).collect())
    }

    /// Text view of a column, `None` if the column does not exist
    pub fn text_column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let col = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|r| Some(r[col].as_str()).filter(|c| !is_missing(c)))
                .collect(),
        )
    }

    /// Whether every present cell of the column parses as a number
    pub fn is_numeric_column(&self, name: &str) -> bool {
        match self.column_index(name) {
            Some(col) => self
                .rows
                .iter()
                .all(|r| is_missing(&r[col]) || parse_number(&r[col]).is_some()),
            None => false,
        }
    }

    /// New table holding the given rows, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["Title".to_string(), "Year".to_string()],
            vec![
                vec!["Heat".to_string(), "1995".to_string()],
                vec!["".to_string(), "n/a year".to_string()],
                vec!["Alien".to_string()],
            ],
        )
    }

    #[test]
    fn test_missing_markers() {
        assert!(is_missing(""));
        assert!(is_missing("  "));
        assert!(is_missing("NaN"));
        assert!(!is_missing("0"));
    }

    #[test]
    fn test_parse_number_degrades_to_none() {
        assert_eq!(parse_number("7.5"), Some(7.5));
        assert_eq!(parse_number(" 12 "), Some(12.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_boolean_flags_are_numeric() {
        assert_eq!(parse_number("True"), Some(1.0));
        assert_eq!(parse_number("False"), Some(0.0));
        assert_eq!(parse_number(" true "), Some(1.0));
        assert_eq!(parse_number("yes"), None);

        let table = Table::new(
            vec!["Drama".to_string()],
            vec![vec!["True".to_string()], vec!["False".to_string()], vec![String::new()]],
        );
        assert!(table.is_numeric_column("Drama"));
        assert_eq!(
            table.numeric_column("Drama").unwrap(),
            vec![Some(1.0), Some(0.0), None]
        );
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = sample();
        assert_eq!(table.rows()[2].len(), 2);
        assert_eq!(table.cell(2, 1), None);
    }

    #[test]
    fn test_column_views() {
        let table = sample();
        assert_eq!(
            table.numeric_column("Year").unwrap(),
            vec![Some(1995.0), None, None]
        );
        assert_eq!(
            table.text_column("Title").unwrap(),
            vec![Some("Heat"), None, Some("Alien")]
        );
        assert!(table.numeric_column("Runtime").is_none());
        assert!(!table.is_numeric_column("Year"));
        assert!(!table.is_numeric_column("Title"));
    }

    #[test]
    fn test_select_rows_keeps_order() {
        let table = sample().select_rows(&[2, 0]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 0), Some("Alien"));
        assert_eq!(table.cell(1, 0), Some("Heat"));
    }
}
