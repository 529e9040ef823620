use anyhow::{ensure, Context};
use cablecore::route::{LoopSpec, RouteConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Coiled sections of the surveyed route, meters along the fiber.
const DEFAULT_LOOP_STARTS_M: [f64; 9] = [
    118.0, 147.0, 271.0, 400.0, 466.0, 510.0, 630.0, 1300.0, 1800.0,
];
const DEFAULT_LOOP_LENGTHS_M: [f64; 9] = [30.0, 60.0, 60.0, 30.0, 30.0, 30.0, 30.0, 60.0, 60.0];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub channel_spacing_m: f64,
    pub total_length_m: f64,
    #[serde(default = "default_loop_starts")]
    pub loop_starts_m: Vec<f64>,
    #[serde(default = "default_loop_lengths")]
    pub loop_lengths_m: Vec<f64>,
    pub image_dir: PathBuf,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_loop_starts() -> Vec<f64> {
    DEFAULT_LOOP_STARTS_M.to_vec()
}

fn default_loop_lengths() -> Vec<f64> {
    DEFAULT_LOOP_LENGTHS_M.to_vec()
}

fn default_port() -> u16 {
    9000
}

impl ViewerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading viewer config {}", path_ref.display()))?;
        let config: ViewerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing viewer config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        channel_spacing_m: f64,
        total_length_m: f64,
        image_dir: PathBuf,
        port: u16,
    ) -> Self {
        Self {
            channel_spacing_m,
            total_length_m,
            loop_starts_m: default_loop_starts(),
            loop_lengths_m: default_loop_lengths(),
            image_dir,
            port,
        }
    }

    pub fn to_route_config(&self) -> anyhow::Result<RouteConfig> {
        ensure!(
            self.loop_starts_m.len() == self.loop_lengths_m.len(),
            "loop starts ({}) and lengths ({}) must pair up",
            self.loop_starts_m.len(),
            self.loop_lengths_m.len()
        );
        let loops = self
            .loop_starts_m
            .iter()
            .zip(self.loop_lengths_m.iter())
            .map(|(&start_m, &arc_length_m)| LoopSpec::new(start_m, arc_length_m))
            .collect();
        Ok(RouteConfig {
            channel_spacing_m: self.channel_spacing_m,
            total_length_m: self.total_length_m,
            loops,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_uses_surveyed_loops() {
        let cfg = ViewerConfig::from_args(3.19, 1920.0, PathBuf::from("/tmp/spec"), 9000);
        let route = cfg.to_route_config().unwrap();
        assert_eq!(route.loops.len(), 9);
        assert_eq!(route.loops[0].start_m, 118.0);
        assert_eq!(route.loops[8].arc_length_m, 60.0);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"channel_spacing_m: 2.0\n\
              total_length_m: 100.0\n\
              loop_starts_m: [40.0]\n\
              loop_lengths_m: [20.0]\n\
              image_dir: /tmp/spectrograms\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = ViewerConfig::load(&path).unwrap();
        assert_eq!(cfg.channel_spacing_m, 2.0);
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.loop_starts_m, vec![40.0]);
    }

    #[test]
    fn mismatched_loop_arrays_are_rejected() {
        let mut cfg = ViewerConfig::from_args(3.19, 1920.0, PathBuf::from("/tmp/spec"), 9000);
        cfg.loop_lengths_m.pop();
        assert!(cfg.to_route_config().is_err());
    }
}
