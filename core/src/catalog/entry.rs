use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One catalogued spectrogram image and the fiber distance encoded in its
/// filename.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub distance_m: f64,
    pub path: PathBuf,
}

impl CatalogEntry {
    pub fn new(distance_m: f64, path: PathBuf) -> Self {
        Self { distance_m, path }
    }
}
