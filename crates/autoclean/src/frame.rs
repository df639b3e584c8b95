//! Conversion between polars `DataFrame`s and [`Table`]s.
//!
//! Every column is read as text. Nulls map to [`Cell::Missing`]; on the way
//! back both missing cells and the unknown-date marker become null.

use polars::prelude::{DataFrame, DataType, IntoColumn, NamedFrom, Series};

use crate::error::{Result, ResultExt};
use crate::table::{Cell, Column, Table};

impl Table {
    /// Build a table from a DataFrame, casting every column to text.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let mut columns = Vec::with_capacity(df.width());
        for col in df.get_columns() {
            let name = col.name().as_str();
            let series = col
                .as_materialized_series()
                .cast(&DataType::String)
                .context(format!("Failed to read column '{}' as text", name))?;
            let cells: Vec<Cell> = series.str()?.into_iter().map(Cell::from).collect();
            columns.push(Column::new(name, cells));
        }
        Table::new(columns)
    }

    /// Build a DataFrame with one string column per table column.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns = self
            .columns()
            .iter()
            .map(|column| {
                let values: Vec<Option<&str>> = column.cells().iter().map(Cell::as_text).collect();
                Series::new(column.name().into(), values).into_column()
            })
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}
