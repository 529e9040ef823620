use crate::config::ViewerConfig;
use anyhow::Context;
use cablecore::catalog::ImageCatalog;
use cablecore::route::RoutePlan;
use std::fs;

/// Immutable per-process context: route geometry plus the image catalog,
/// built once at startup and only read afterwards.
pub struct Session {
    plan: RoutePlan,
    catalog: ImageCatalog,
}

/// Result of resolving one clicked route point.
pub struct Selection {
    pub index: usize,
    pub distance_m: f64,
    pub label: String,
    pub image: Vec<u8>,
}

impl Session {
    pub fn new(config: &ViewerConfig) -> anyhow::Result<Self> {
        let route_config = config.to_route_config()?;
        let plan = RoutePlan::generate(&route_config).context("laying out cable route")?;
        let catalog = ImageCatalog::scan(&config.image_dir).with_context(|| {
            format!(
                "indexing spectrogram directory {}",
                config.image_dir.display()
            )
        })?;
        Ok(Self { plan, catalog })
    }

    pub fn plan(&self) -> &RoutePlan {
        &self.plan
    }

    pub fn catalog(&self) -> &ImageCatalog {
        &self.catalog
    }

    /// Maps a clicked route point to the nearest catalogued spectrogram and
    /// reads its bytes. A file deleted since indexing surfaces as an error.
    pub fn select(&self, index: usize) -> anyhow::Result<Selection> {
        let clicked_m = self
            .plan
            .distance_at(index)
            .with_context(|| format!("route point {} out of range", index))?;
        let entry = self
            .catalog
            .nearest(clicked_m)
            .context("spectrogram catalog is empty")?;
        let image = fs::read(&entry.path)
            .with_context(|| format!("reading spectrogram {}", entry.path.display()))?;
        let label = format!("Channel {} — {:.2} m", index, entry.distance_m);
        Ok(Selection {
            index,
            distance_m: entry.distance_m,
            label,
            image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_image(dir: &Path, name: &str, contents: &[u8]) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(contents).unwrap();
    }

    fn test_config(image_dir: &Path) -> ViewerConfig {
        let mut cfg =
            ViewerConfig::from_args(1.0, 100.0, image_dir.to_path_buf(), 9000);
        cfg.loop_starts_m = vec![40.0];
        cfg.loop_lengths_m = vec![20.0];
        cfg
    }

    #[test]
    fn session_builds_route_and_catalog() {
        let dir = tempdir().unwrap();
        write_image(dir.path(), "spectrogram_ch10_5m.png", b"near");
        write_image(dir.path(), "spectrogram_ch90m.png", b"far");

        let session = Session::new(&test_config(dir.path())).unwrap();
        assert!(session.plan().len() > 100);
        assert_eq!(session.catalog().len(), 2);
    }

    #[test]
    fn select_returns_nearest_image_and_label() {
        let dir = tempdir().unwrap();
        write_image(dir.path(), "spectrogram_ch10_5m.png", b"near");
        write_image(dir.path(), "spectrogram_ch90m.png", b"far");

        let session = Session::new(&test_config(dir.path())).unwrap();
        // Point 0 sits at virtual distance 0, closest to the 10.5 m image.
        let selection = session.select(0).unwrap();
        assert_eq!(selection.index, 0);
        assert_eq!(selection.distance_m, 10.5);
        assert_eq!(selection.label, "Channel 0 — 10.50 m");
        assert_eq!(selection.image, b"near");
    }

    #[test]
    fn select_rejects_out_of_range_index() {
        let dir = tempdir().unwrap();
        write_image(dir.path(), "spectrogram_ch10_5m.png", b"near");

        let session = Session::new(&test_config(dir.path())).unwrap();
        assert!(session.select(usize::MAX).is_err());
    }

    #[test]
    fn session_fails_without_images() {
        let dir = tempdir().unwrap();
        assert!(Session::new(&test_config(dir.path())).is_err());
    }
}
