use crate::foundation::error::{ThermaError, ThermaResult};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// File names the user has hidden from listings and video assembly.
///
/// Passed explicitly to every operation that lists sources; persisted as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
}

impl ExclusionSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path`; a missing file is an empty set.
    pub fn load(path: &Path) -> ThermaResult<Self> {
        use anyhow::Context as _;
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(ThermaError::io(path, e)),
        };
        let set: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse exclusion list '{}'", path.display()))?;
        Ok(set)
    }

    /// Write to `path` as pretty JSON.
    pub fn save(&self, path: &Path) -> ThermaResult<()> {
        crate::encode::ffmpeg::ensure_parent_dir(path)?;
        let json = serde_json::to_vec_pretty(self).map_err(anyhow::Error::from)?;
        std::fs::write(path, json).map_err(|e| ThermaError::io(path, e))
    }

    /// Hide `name`. Returns `false` if it was already hidden.
    pub fn exclude(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Unhide `name`, e.g. after it is uploaded again. Returns `false` if it was not hidden.
    pub fn restore(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    /// Whether `name` is hidden.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of hidden names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is hidden.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Hidden names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Sort paths lexicographically by file name, then by full path.
pub fn sort_sources(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
}

/// Regular files in `dir` with `extension` that are not excluded, sorted by name.
pub fn list_source_files(
    dir: &Path,
    extension: &str,
    exclusions: &ExclusionSet,
) -> ThermaResult<Vec<PathBuf>> {
    let extension = extension.trim_start_matches('.');
    let entries = std::fs::read_dir(dir).map_err(|e| ThermaError::io(dir, e))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ThermaError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if !matches_ext {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::debug!(path = %path.display(), "skipping source with a non-UTF-8 name");
            continue;
        };
        if exclusions.contains(name) {
            tracing::debug!(name, "skipping excluded source");
            continue;
        }
        out.push(path);
    }

    sort_sources(&mut out);
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/sources.rs"]
mod tests;
