use crate::framework::errors::{CinderRefineryError, Result};

use serde::{Deserialize, Serialize};

fn default_tolerance() -> f64 {
    1e-9
}

fn default_top_n() -> usize {
    5
}

/// Number of CPUs on the host, used when no worker count is configured.
pub fn default_worker_count() -> usize {
    match sys_info::cpu_num() {
        Ok(cpus) if cpus > 0 => cpus as usize,
        _ => std::thread::available_parallelism()
            .map(|cpus| cpus.get())
            .unwrap_or(1),
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RefineryConfig {
    /// Size of the map worker pool. Defaults to the host CPU count.
    #[serde(rename = "number.of.workers", default)]
    pub number_of_workers: Option<usize>,

    /// Relative tolerance used when comparing results of different strategies.
    #[serde(rename = "validation.tolerance", default = "default_tolerance")]
    pub validation_tolerance: f64,

    #[serde(rename = "report.top.n", default = "default_top_n")]
    pub report_top_n: usize,
}

impl Default for RefineryConfig {
    fn default() -> Self {
        RefineryConfig {
            number_of_workers: None,
            validation_tolerance: default_tolerance(),
            report_top_n: default_top_n(),
        }
    }
}

impl RefineryConfig {
    pub fn from_xml_file(file_path: &str) -> Result<Self> {
        let xml_str = std::fs::read_to_string(file_path)
            .map_err(|err| CinderRefineryError::ConfigError(format!("{}: {}", file_path, err)))?;
        Self::from_xml_str(&xml_str)
    }

    pub fn from_xml_str(xml_str: &str) -> Result<Self> {
        let config: RefineryConfig = serde_xml_rs::from_str(xml_str)?;
        config.worker_count()?;
        if !(config.validation_tolerance.is_finite() && config.validation_tolerance >= 0.0) {
            return Err(CinderRefineryError::ConfigError(format!(
                "validation.tolerance must be a non-negative number, got {}",
                config.validation_tolerance
            )));
        }
        Ok(config)
    }

    pub fn worker_count(&self) -> Result<usize> {
        match self.number_of_workers {
            Some(0) => Err(CinderRefineryError::InvalidWorkerCount(0)),
            Some(workers) => Ok(workers),
            None => Ok(default_worker_count()),
        }
    }
}
