//! In-memory tabular data model.
//!
//! A [`Table`] is an ordered list of named [`Column`]s of equal length. Every
//! value is kept as text; a missing value is the explicit [`Cell::Missing`]
//! marker and is never confused with an empty string.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CleaningError, Result};

/// A single value of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    /// No value was supplied.
    Missing,
    /// A raw text value (possibly the empty string).
    Text(String),
    /// Placeholder written into a date column that has no observed date.
    UnknownDate,
}

impl Cell {
    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Whether this cell is the missing marker.
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// The text value, if this cell holds one.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(s) => Cell::Text(s.to_string()),
            None => Cell::Missing,
        }
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(s) => Cell::Text(s),
            None => Cell::Missing,
        }
    }
}

/// A named, ordered sequence of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    cells: Vec<Cell>,
}

impl Column {
    /// Create a column from prepared cells.
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Create a column from optional text values; `None` becomes missing.
    ///
    /// ```rust
    /// use autoclean::Column;
    ///
    /// let age = Column::from_values("age", [Some("10"), None, Some("30")]);
    /// assert_eq!(age.missing_count(), 1);
    /// ```
    pub fn from_values<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let cells = values
            .into_iter()
            .map(|v| match v {
                Some(s) => Cell::Text(s.into()),
                None => Cell::Missing,
            })
            .collect();
        Self::new(name, cells)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of [`Cell::Missing`] cells.
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// Iterator over the text of every non-missing text cell, in row order.
    pub fn present_values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().filter_map(Cell::as_text)
    }

    /// Number of distinct non-missing text values (exact comparison).
    pub fn distinct_count(&self) -> usize {
        self.present_values().collect::<HashSet<_>>().len()
    }

    /// Replace the cells, keeping the name.
    pub fn with_cells(&self, cells: Vec<Cell>) -> Self {
        Self::new(self.name.clone(), cells)
    }
}

/// An ordered collection of equal-length, uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table, failing fast on unequal column lengths or repeated
    /// column names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let table = Self { columns };
        table.validate()?;
        Ok(table)
    }

    /// Create a table with the given column names and no rows.
    pub fn empty<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .map(|name| Column::new(name, Vec::new()))
                .collect(),
        )
    }

    /// Create a table from a header and row-major records.
    ///
    /// Every record must have exactly one value per header entry.
    pub fn from_rows<S>(header: &[&str], rows: &[Vec<Option<S>>]) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let mut columns: Vec<Vec<Cell>> = vec![Vec::with_capacity(rows.len()); header.len()];
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(CleaningError::MalformedTable {
                    column: format!("<row {}>", row_idx),
                    expected: header.len(),
                    actual: row.len(),
                });
            }
            for (col_idx, value) in row.iter().enumerate() {
                let cell = match value {
                    Some(s) => Cell::text(AsRef::<str>::as_ref(s)),
                    None => Cell::Missing,
                };
                columns[col_idx].push(cell);
            }
        }

        Self::new(
            header
                .iter()
                .zip(columns)
                .map(|(name, cells)| Column::new(*name, cells))
                .collect(),
        )
    }

    /// Check the table invariants.
    ///
    /// Tables built through [`Table::new`] always pass; deserialized tables
    /// may not.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if !seen.insert(column.name()) {
                return Err(CleaningError::DuplicateColumn(column.name().to_string()));
            }
        }

        if let Some(first) = self.columns.first() {
            let expected = first.len();
            if let Some(bad) = self.columns.iter().find(|c| c.len() != expected) {
                return Err(CleaningError::MalformedTable {
                    column: bad.name().to_string(),
                    expected,
                    actual: bad.len(),
                });
            }
        }

        Ok(())
    }

    /// Number of records.
    pub fn height(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| CleaningError::ColumnNotFound(name.to_string()))
    }

    /// The cells of record `idx`, one per column.
    pub fn row(&self, idx: usize) -> Vec<&Cell> {
        self.columns.iter().map(|c| &c.cells()[idx]).collect()
    }

    /// A new table holding only the records at `indices`, in that order.
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|column| {
                let cells = indices.iter().map(|&i| column.cells()[i].clone()).collect();
                column.with_cells(cells)
            })
            .collect();
        Self { columns }
    }

    /// A new table with every column passed through `f`.
    ///
    /// `f` must return a column of the same length; the name is kept.
    pub(crate) fn map_columns<F>(&self, mut f: F) -> Self
    where
        F: FnMut(usize, &Column) -> Vec<Cell>,
    {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let cells = f(idx, column);
                debug_assert_eq!(cells.len(), column.len());
                column.with_cells(cells)
            })
            .collect();
        Self { columns }
    }

    /// Same column names, zero rows.
    pub fn truncated(&self) -> Self {
        self.take_rows(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(vec![
            Column::from_values("name", [Some("A"), Some("B"), None]),
            Column::from_values("age", [Some("10"), None, Some("")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_missing_is_not_empty_string() {
        let table = sample();
        let age = table.column("age").unwrap();
        assert_eq!(age.missing_count(), 1);
        assert_eq!(age.cells()[2], Cell::text(""));
        assert!(!age.cells()[2].is_missing());
    }

    #[test]
    fn test_shape() {
        let table = sample();
        assert_eq!(table.height(), 3);
        assert_eq!(table.width(), 2);
        assert!(!table.is_empty());
        assert_eq!(table.column_names(), vec!["name", "age"]);
    }

    #[test]
    fn test_unequal_lengths_rejected() {
        let result = Table::new(vec![
            Column::from_values("a", [Some("1"), Some("2")]),
            Column::from_values("b", [Some("1")]),
        ]);
        match result.unwrap_err() {
            CleaningError::MalformedTable {
                column,
                expected,
                actual,
            } => {
                assert_eq!(column, "b");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_repeated_name_rejected() {
        let result = Table::new(vec![
            Column::from_values("a", [Some("1")]),
            Column::from_values("a", [Some("2")]),
        ]);
        assert!(matches!(result.unwrap_err(), CleaningError::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn test_deserialized_table_is_validated() {
        let json = r#"{"columns":[
            {"name":"a","cells":[{"text":"1"},"missing"]},
            {"name":"b","cells":["missing"]}
        ]}"#;
        let table: Table = serde_json::from_str(json).unwrap();
        assert!(table.validate().unwrap_err().is_malformed_input());
    }

    #[test]
    fn test_from_rows() {
        let table = Table::from_rows(
            &["x", "y"],
            &[vec![Some("1"), None], vec![Some("2"), Some("b")]],
        )
        .unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(table.row(0), vec![&Cell::text("1"), &Cell::Missing]);
        assert_eq!(table.column("y").unwrap().missing_count(), 1);

        let ragged = Table::from_rows(&["x", "y"], &[vec![Some("1")]]);
        assert!(ragged.is_err());
    }

    #[test]
    fn test_take_rows_and_truncate() {
        let table = sample();
        let picked = table.take_rows(&[2, 0]);
        assert_eq!(picked.height(), 2);
        assert_eq!(picked.row(1), vec![&Cell::text("A"), &Cell::text("10")]);

        let empty = table.truncated();
        assert_eq!(empty.height(), 0);
        assert_eq!(empty.width(), 2);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_distinct_count_ignores_missing() {
        let column = Column::from_values("c", [Some("a"), Some("a"), None, Some("b")]);
        assert_eq!(column.distinct_count(), 2);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::empty(["a", "b", "c"]).unwrap();
        assert_eq!(table.height(), 0);
        assert_eq!(table.width(), 3);
        assert!(Table::default().is_empty());
    }
}
