use crate::catalog::{CatalogEntry, ImageCatalog};
use crate::math::sampling::argmin_abs;

impl ImageCatalog {
    /// Entry whose encoded distance is closest to `query_m` by absolute
    /// difference. Ties resolve to the earliest entry in filename order.
    /// O(n) over the catalog, which stays in the hundreds of entries.
    pub fn nearest(&self, query_m: f64) -> Option<&CatalogEntry> {
        let distances: Vec<f64> = self
            .entries()
            .iter()
            .map(|entry| entry.distance_m)
            .collect();
        argmin_abs(&distances, query_m).map(|index| &self.entries()[index])
    }
}
