// Pie chart domain models and aggregation
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PieError {
    #[error("CSV file not found: {0}")]
    NotFound(String),
    #[error("Failed to read CSV {path}: {reason}")]
    Read { path: String, reason: String },
    #[error("Table needs at least two columns, found {0}")]
    NotEnoughColumns(usize),
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    #[error("Value {value:?} in column {column} (row {row}) is not numeric")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },
}

/// Raw CSV contents: a header row plus string cells
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    fn column_index(&self, name: &str) -> Result<usize, PieError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| PieError::UnknownColumn(name.to_string()))
    }

    /// Resolve the (category, value) columns, defaulting to the first and second.
    pub fn resolve_columns(
        &self,
        category: Option<&str>,
        value: Option<&str>,
    ) -> Result<(usize, usize), PieError> {
        let defaults_needed = category.is_none() || value.is_none();
        if defaults_needed && self.columns.len() < 2 {
            return Err(PieError::NotEnoughColumns(self.columns.len()));
        }

        let category_idx = match category {
            Some(name) => self.column_index(name)?,
            None => 0,
        };
        let value_idx = match value {
            Some(name) => self.column_index(name)?,
            None => 1,
        };

        Ok((category_idx, value_idx))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub category_column: String,
    pub value_column: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    /// Sum the value column per category, in order of first appearance.
    pub fn from_table(
        table: &DataTable,
        title: String,
        category_idx: usize,
        value_idx: usize,
    ) -> Result<Self, PieError> {
        let value_column = table.columns[value_idx].clone();
        let mut totals: Vec<(String, f64)> = Vec::new();

        for (row_idx, row) in table.rows.iter().enumerate() {
            let label = row.get(category_idx).cloned().unwrap_or_default();
            let raw = row.get(value_idx).map(|v| v.trim()).unwrap_or_default();
            // Blank cells are skipped the same way a missing value would be
            if raw.is_empty() {
                continue;
            }
            let value: f64 = raw.parse().map_err(|_| PieError::NonNumeric {
                column: value_column.clone(),
                row: row_idx + 1,
                value: raw.to_string(),
            })?;

            match totals.iter_mut().find(|(l, _)| *l == label) {
                Some((_, total)) => *total += value,
                None => totals.push((label, value)),
            }
        }

        let sum: f64 = totals.iter().map(|(_, v)| v).sum();
        let slices = totals
            .into_iter()
            .map(|(label, value)| PieSlice {
                label,
                value,
                share: if sum == 0.0 { 0.0 } else { value / sum },
            })
            .collect();

        Ok(Self {
            title,
            category_column: table.columns[category_idx].clone(),
            value_column,
            slices,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PiePage {
    pub csv_path: String,
    pub preview: DataTable,
    pub chart: PieChart,
}
