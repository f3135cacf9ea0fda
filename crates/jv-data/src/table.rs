//! Column-oriented in-memory table shared by the file readers.

use std::collections::{BTreeMap, HashMap};

use jv_core::{Error, Result};

/// A single typed column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Numeric values; `None` marks a missing value.
    Numeric(Vec<Option<f64>>),
    /// String values.
    Text(Vec<String>),
}

impl Column {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn kind(&self) -> &'static str {
        match self {
            Column::Numeric(_) => "numeric",
            Column::Text(_) => "text",
        }
    }
}

/// Named columns of equal length, plus optional value labels for numeric columns.
#[derive(Debug, Clone, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    value_labels: HashMap<String, BTreeMap<i64, String>>,
}

impl Table {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. All columns must have the same length.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if let Some(first) = self.columns.first()
            && first.len() != column.len()
        {
            return Err(Error::Validation(format!(
                "column '{name}' has {} rows, expected {}",
                column.len(),
                first.len()
            )));
        }
        if self.names.contains(&name) {
            return Err(Error::Validation(format!("duplicate column '{name}'")));
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Attach a code → text mapping to a numeric column.
    pub fn set_value_labels(&mut self, column: &str, labels: BTreeMap<i64, String>) {
        self.value_labels.insert(column.to_string(), labels);
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Column names in file order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Look a column up by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.names.iter().position(|n| n == name).map(|i| &self.columns[i]).ok_or_else(|| {
            Error::Validation(format!(
                "missing column '{name}' (available: {})",
                self.names.join(", ")
            ))
        })
    }

    /// Numeric view of a column.
    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>]> {
        match self.column(name)? {
            Column::Numeric(v) => Ok(v),
            other => Err(Error::Validation(format!(
                "column '{name}' is {}, expected numeric",
                other.kind()
            ))),
        }
    }

    /// Text view of a column. Labelled numeric columns decode through their
    /// value labels; unlabelled codes and missing values become `None`.
    pub fn text(&self, name: &str) -> Result<Vec<Option<String>>> {
        match self.column(name)? {
            Column::Text(v) => Ok(v.iter().map(|s| Some(s.clone())).collect()),
            Column::Numeric(v) => {
                let labels = self.value_labels.get(name).ok_or_else(|| {
                    Error::Validation(format!(
                        "column '{name}' is numeric without value labels, expected text"
                    ))
                })?;
                Ok(v.iter()
                    .map(|code| code.and_then(|c| labels.get(&(c as i64)).cloned()))
                    .collect())
            }
        }
    }
}
