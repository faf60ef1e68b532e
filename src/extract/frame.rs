use crate::foundation::error::{ThermaError, ThermaResult};

/// Sentinel stored for cells that were padded in rather than read from the source.
pub const MISSING: f64 = f64::NAN;

/// Counters collected while classifying the lines of one source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ExtractStats {
    /// 0-based line number of the data marker, if one was found.
    pub marker_line: Option<usize>,
    /// Rows that made it into the frame.
    pub rows_kept: usize,
    /// Non-blank lines after the marker with at least one non-numeric token.
    pub rows_non_numeric: usize,
    /// Numeric rows discarded by the width policy.
    pub rows_wrong_width: usize,
    /// Rows right-padded with [`MISSING`] cells.
    pub rows_padded: usize,
}

/// Rectangular matrix of sensor readings parsed from one source.
///
/// Row-major, at least one row and one column, every row the same width. Immutable once built.
#[derive(Clone, Debug)]
pub struct NumericFrame {
    cols: usize,
    data: Vec<f64>,
    stats: ExtractStats,
}

impl NumericFrame {
    /// Build a frame from rows, rejecting empty input and ragged rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> ThermaResult<Self> {
        let Some(first) = rows.first() else {
            return Err(ThermaError::no_data("frame must have at least one row"));
        };
        let cols = first.len();
        let stats = ExtractStats {
            rows_kept: rows.len(),
            ..Default::default()
        };
        Self::from_parts(cols, rows, stats)
    }

    pub(crate) fn from_parts(
        cols: usize,
        rows: Vec<Vec<f64>>,
        stats: ExtractStats,
    ) -> ThermaResult<Self> {
        if rows.is_empty() {
            return Err(ThermaError::no_data("frame must have at least one row"));
        }
        if cols == 0 {
            return Err(ThermaError::validation(
                "frame must have at least one column",
            ));
        }

        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(ThermaError::ShapeMismatch {
                    expected: cols,
                    found: row.len(),
                    row: i,
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Self { cols, data, stats })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.data.len() / self.cols
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell value; [`MISSING`] cells read back as NaN.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if col >= self.cols {
            return None;
        }
        let idx = row.checked_mul(self.cols)?.checked_add(col)?;
        self.data.get(idx).copied()
    }

    /// Borrow one row.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        let start = row.checked_mul(self.cols)?;
        self.data.get(start..start.checked_add(self.cols)?)
    }

    /// Iterate rows top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols)
    }

    /// All cells in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Copy out as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }

    /// Number of [`MISSING`] cells.
    pub fn missing_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }

    /// Global `(min, max)` over finite cells, or `None` if every cell is missing.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Classification counters from extraction.
    pub fn stats(&self) -> &ExtractStats {
        &self.stats
    }
}

// Bitwise comparison so that two frames holding the missing sentinel in the same cells compare
// equal.
impl PartialEq for NumericFrame {
    fn eq(&self, other: &Self) -> bool {
        self.cols == other.cols
            && self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}
