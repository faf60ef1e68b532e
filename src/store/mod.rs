//! Repository interface for persisting extracted frames as named-column rows.
//!
//! Rows travel as values, never as interpolated statement text; a SQL-backed implementation
//! binds every cell as a parameter.

use crate::extract::frame::NumericFrame;
use crate::foundation::error::{ThermaError, ThermaResult};
use std::collections::BTreeMap;

/// A frame in the textual, named-column form handed to a table store.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TableRows {
    /// Column names, `col1..colN`.
    pub columns: Vec<String>,
    /// Cell text per row; missing cells are empty strings.
    pub rows: Vec<Vec<String>>,
}

impl TableRows {
    /// Convert a frame, formatting each value with the shortest round-tripping representation.
    pub fn from_frame(frame: &NumericFrame) -> Self {
        let columns = (1..=frame.cols()).map(|i| format!("col{i}")).collect();
        let rows = frame
            .iter_rows()
            .map(|row| {
                row.iter()
                    .map(|v| if v.is_nan() { String::new() } else { v.to_string() })
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of [`TableStore::insert_frame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Rows were stored.
    Inserted {
        /// Number of rows stored.
        rows: usize,
    },
    /// A frame from a source of the same name is already stored; nothing was written.
    AlreadyPresent,
}

/// Persistent destination for extracted frames, keyed by source file name.
pub trait TableStore {
    /// Store `rows` under `source_name` unless that name is already present.
    fn insert_frame(&mut self, source_name: &str, rows: &TableRows)
    -> ThermaResult<InsertOutcome>;

    /// Whether `source_name` has been stored.
    fn contains(&self, source_name: &str) -> bool;
}

/// Table name for a source file: extension dropped, lowercased, spaces to `_`, and anything
/// outside `[a-z0-9_]` removed.
pub fn table_name_for(file_name: &str) -> ThermaResult<String> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let stem = match base.rfind('.') {
        Some(i) if i > 0 => &base[..i],
        _ => base,
    };
    let name: String = stem
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect();
    if name.is_empty() {
        return Err(ThermaError::validation(format!(
            "cannot derive a table name from \"{file_name}\""
        )));
    }
    Ok(name)
}

/// Store that keeps tables in memory, keyed by table name.
#[derive(Clone, Debug, Default)]
pub struct InMemoryTableStore {
    sources: BTreeMap<String, String>,
    tables: BTreeMap<String, TableRows>,
}

impl InMemoryTableStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows stored for `source_name`.
    pub fn table(&self, source_name: &str) -> Option<&TableRows> {
        self.sources
            .get(source_name)
            .and_then(|table| self.tables.get(table))
    }

    /// Number of stored tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableStore for InMemoryTableStore {
    fn insert_frame(
        &mut self,
        source_name: &str,
        rows: &TableRows,
    ) -> ThermaResult<InsertOutcome> {
        if self.sources.contains_key(source_name) {
            return Ok(InsertOutcome::AlreadyPresent);
        }
        let table = table_name_for(source_name)?;
        if self.tables.contains_key(&table) {
            return Err(ThermaError::validation(format!(
                "table \"{table}\" for \"{source_name}\" is already used by another source"
            )));
        }
        if rows.rows.iter().any(|r| r.len() != rows.columns.len()) {
            return Err(ThermaError::validation(
                "every row must have one cell per column",
            ));
        }
        self.tables.insert(table.clone(), rows.clone());
        self.sources.insert(source_name.to_owned(), table);
        tracing::debug!(source_name, rows = rows.len(), "stored frame");
        Ok(InsertOutcome::Inserted { rows: rows.len() })
    }

    fn contains(&self, source_name: &str) -> bool {
        self.sources.contains_key(source_name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/mod.rs"]
mod tests;
