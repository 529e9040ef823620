use crate::catalog::{CatalogEntry, CatalogError, CatalogResult};
use crate::telemetry::log::LogManager;
use std::fs;
use std::path::Path;

const NAME_PREFIX: &str = "spectrogram_ch";
const NAME_SUFFIX: &str = "m.png";

/// Catalog of spectrogram images keyed by the fiber distance encoded in each
/// filename.
///
/// Entries keep lexicographic filename order, not distance order: lookups are
/// a full scan, so a sorted structure buys nothing, and filename order gives
/// stable tie-breaking.
#[derive(Debug, Clone)]
pub struct ImageCatalog {
    entries: Vec<CatalogEntry>,
}

impl ImageCatalog {
    /// Scans `dir` for files named `spectrogram_ch<digits>[_<digits>]m.png`,
    /// the underscore standing in for a decimal point. Non-matching names are
    /// skipped; an unreadable directory or a directory with no matches is an
    /// error.
    pub fn scan(dir: &Path) -> CatalogResult<Self> {
        let listing =
            fs::read_dir(dir).map_err(|err| CatalogError::Io(dir.display().to_string(), err))?;

        let mut names = Vec::new();
        for dir_entry in listing {
            let dir_entry =
                dir_entry.map_err(|err| CatalogError::Io(dir.display().to_string(), err))?;
            names.push(dir_entry.file_name().to_string_lossy().to_string());
        }
        names.sort();

        let mut entries = Vec::new();
        for name in names {
            if let Some(distance_m) = parse_distance(&name) {
                entries.push(CatalogEntry::new(distance_m, dir.join(&name)));
            }
        }

        if entries.is_empty() {
            return Err(CatalogError::Empty(dir.display().to_string()));
        }

        LogManager::new("catalog").record(&format!(
            "indexed {} spectrograms",
            entries.len()
        ));
        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extracts the encoded distance from a catalog filename, or `None` when the
/// name does not follow the pattern.
fn parse_distance(name: &str) -> Option<f64> {
    let encoded = name.strip_prefix(NAME_PREFIX)?.strip_suffix(NAME_SUFFIX)?;
    if encoded.is_empty()
        || !encoded
            .chars()
            .all(|c| c.is_ascii_digit() || c == '_' || c == '.')
    {
        return None;
    }
    encoded.replace('_', ".").parse().ok()
}
