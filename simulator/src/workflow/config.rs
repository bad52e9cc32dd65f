use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::generator::profile::GeneratorConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub residents: u64,
    pub samples_per_resident: usize,
    pub bucket: f64,
    pub threshold_minutes: i64,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(residents: u64, samples_per_resident: usize, bucket: f64) -> Self {
        Self {
            residents,
            samples_per_resident,
            bucket,
            threshold_minutes: 5,
        }
    }

    pub fn to_generator_config(&self, seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            residents: self.residents,
            samples_per_resident: self.samples_per_resident,
            seed,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_generator_config() {
        let cfg = WorkflowConfig::from_args(4, 120, 20.0);
        let generator = cfg.to_generator_config(42);
        assert_eq!(generator.residents, 4);
        assert_eq!(generator.samples_per_resident, 120);
        assert_eq!(generator.seed, 42);
        assert_eq!(cfg.threshold_minutes, 5);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"residents: 3\nsamples_per_resident: 60\nbucket: 10.0\nthreshold_minutes: 15\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.residents, 3);
        assert_eq!(cfg.threshold_minutes, 15);
    }
}
