use crate::extract::frame::{ExtractStats, MISSING, NumericFrame};
use crate::foundation::error::{ThermaError, ThermaResult};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

/// Line marker that separates capture metadata from the numeric payload.
pub const IMAGE_DATA_MARKER: &str = "Image Data";

/// Column count of the sensor captures the tool was built for.
pub const DEFAULT_EXPECTED_COLS: usize = 20;

/// How rows whose token count differs from the frame width are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowWidthPolicy {
    /// Keep the first `expected_cols` values; drop rows that are shorter.
    #[default]
    Truncate,
    /// Keep the first `expected_cols` values; right-pad shorter rows with the missing sentinel.
    PadMissing,
    /// Ignore `expected_cols` and keep only rows of the most common width (ties go wider).
    Majority,
}

/// Options for [`extract_with`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExtractOpts {
    /// Frame width for the fixed-width policies.
    pub expected_cols: usize,
    /// Row width policy.
    pub policy: RowWidthPolicy,
    /// Substring that starts the data section.
    pub marker: String,
}

impl Default for ExtractOpts {
    fn default() -> Self {
        Self {
            expected_cols: DEFAULT_EXPECTED_COLS,
            policy: RowWidthPolicy::Truncate,
            marker: IMAGE_DATA_MARKER.to_owned(),
        }
    }
}

impl ExtractOpts {
    /// Truncating options with the given width.
    pub fn with_cols(expected_cols: usize) -> Self {
        Self {
            expected_cols,
            ..Default::default()
        }
    }

    /// Check that the options can describe a frame.
    pub fn validate(&self) -> ThermaResult<()> {
        if self.expected_cols == 0 && self.policy != RowWidthPolicy::Majority {
            return Err(ThermaError::validation(
                "expected_cols must be >= 1 for fixed-width policies",
            ));
        }
        if self.marker.is_empty() {
            return Err(ThermaError::validation("data marker must not be empty"));
        }
        Ok(())
    }
}

/// Parse `text` into a frame of exactly `expected_cols` columns, truncating longer rows and
/// dropping shorter ones.
pub fn extract(text: &str, expected_cols: usize) -> ThermaResult<NumericFrame> {
    extract_with(text, &ExtractOpts::with_cols(expected_cols))
}

/// Parse `text` into a frame.
///
/// Lines up to and including the first one containing `opts.marker` are skipped. After that,
/// blank lines are ignored and every other line must consist only of plain decimal tokens
/// separated by `;` to count as a row. Rows are then reconciled to a single width according to
/// `opts.policy`.
pub fn extract_with(text: &str, opts: &ExtractOpts) -> ThermaResult<NumericFrame> {
    opts.validate()?;

    let text: Cow<'_, str> = if text.contains('\r') {
        Cow::Owned(text.replace('\r', ""))
    } else {
        Cow::Borrowed(text)
    };

    let mut stats = ExtractStats::default();
    let mut numeric = Vec::<Vec<f64>>::new();
    for (n, line) in text.split('\n').enumerate() {
        if stats.marker_line.is_none() {
            if line.contains(opts.marker.as_str()) {
                stats.marker_line = Some(n);
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Some(row) => numeric.push(row),
            None => stats.rows_non_numeric += 1,
        }
    }

    if stats.marker_line.is_none() {
        return Err(ThermaError::no_data(format!(
            "data marker \"{}\" not found",
            opts.marker
        )));
    }

    let width = match opts.policy {
        RowWidthPolicy::Truncate | RowWidthPolicy::PadMissing => opts.expected_cols,
        RowWidthPolicy::Majority => majority_width(&numeric).ok_or_else(|| {
            ThermaError::no_data("no numeric rows after the data marker")
        })?,
    };

    let mut rows = Vec::with_capacity(numeric.len());
    for mut row in numeric {
        match opts.policy {
            RowWidthPolicy::Truncate => {
                if row.len() < width {
                    stats.rows_wrong_width += 1;
                    continue;
                }
                row.truncate(width);
            }
            RowWidthPolicy::PadMissing => {
                if row.len() < width {
                    row.resize(width, MISSING);
                    stats.rows_padded += 1;
                } else {
                    row.truncate(width);
                }
            }
            RowWidthPolicy::Majority => {
                if row.len() != width {
                    stats.rows_wrong_width += 1;
                    continue;
                }
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ThermaError::no_data(format!(
            "no rows of width {width} after the data marker ({} non-numeric, {} wrong width)",
            stats.rows_non_numeric, stats.rows_wrong_width
        )));
    }

    stats.rows_kept = rows.len();
    tracing::debug!(
        rows = stats.rows_kept,
        cols = width,
        non_numeric = stats.rows_non_numeric,
        wrong_width = stats.rows_wrong_width,
        padded = stats.rows_padded,
        "extracted frame"
    );
    NumericFrame::from_parts(width, rows, stats)
}

/// Read `path` (lossily decoded as UTF-8) and extract it.
pub fn extract_path(path: &Path, opts: &ExtractOpts) -> ThermaResult<NumericFrame> {
    let bytes = std::fs::read(path).map_err(|e| ThermaError::io(path, e))?;
    extract_with(&String::from_utf8_lossy(&bytes), opts)
}

fn parse_row(line: &str) -> Option<Vec<f64>> {
    let mut row = Vec::new();
    for tok in line.split(';').map(str::trim).filter(|t| !t.is_empty()) {
        if !is_plain_decimal(tok) {
            return None;
        }
        row.push(tok.parse::<f64>().ok().filter(|v| v.is_finite())?);
    }
    if row.is_empty() { None } else { Some(row) }
}

/// ASCII digits with at most one `.`; no sign, no exponent.
fn is_plain_decimal(tok: &str) -> bool {
    let mut dots = 0usize;
    let mut digits = 0usize;
    for b in tok.bytes() {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

fn majority_width(rows: &[Vec<f64>]) -> Option<usize> {
    let mut counts = BTreeMap::<usize, usize>::new();
    for row in rows {
        *counts.entry(row.len()).or_default() += 1;
    }
    // BTreeMap iterates ascending, so `max_by_key` keeps the widest of equally common widths.
    counts
        .into_iter()
        .max_by_key(|&(_, count)| count)
        .map(|(width, _)| width)
}

#[cfg(test)]
#[path = "../../tests/unit/extract/parser.rs"]
mod tests;
