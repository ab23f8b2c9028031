//! Configuration of network model construction and of the analyzer

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Seconds};

/// Settings used while building a [`crate::NetworkModel`]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Edge types that cannot carry a route endpoint on their own
    pub excluded_types: Vec<String>,
    /// Keep only the shortest route between each entrance and exit
    pub shortest_paths: bool,
    /// Simple paths kept per entrance/exit pair
    pub max_paths_per_route: Option<usize>,
    /// Intermediate nodes allowed in a single path
    pub max_path_nodes: Option<usize>,
    /// Path systems kept for the whole network
    pub max_paths: Option<usize>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            excluded_types: vec![
                "highway.residential".to_string(),
                "highway.service".to_string(),
            ],
            shortest_paths: false,
            max_paths_per_route: Some(1_000),
            max_path_nodes: None,
            max_paths: Some(10_000),
        }
    }
}

/// Settings of the streaming analyzer
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Cycle length in seconds
    pub calculation_rate: Seconds,
    /// Floor speed in m/s applied to stalled traffic
    pub min_speed: f64,
    /// Boundary of the first cycle
    pub start_time: Seconds,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            calculation_rate: 1.0,
            min_speed: 1.0,
            start_time: 0.0,
        }
    }
}

impl AnalyzerConfig {
    /// # Errors
    ///
    /// Returns an error if the cycle length or the floor speed is not strictly positive
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.calculation_rate > 0.0) || !self.calculation_rate.is_finite() {
            return Err(Error::InvalidData(format!(
                "calculation_rate must be a positive number of seconds, got {}",
                self.calculation_rate
            )));
        }
        if !(self.min_speed > 0.0) || !self.min_speed.is_finite() {
            return Err(Error::InvalidData(format!(
                "min_speed must be a positive speed, got {}",
                self.min_speed
            )));
        }
        if !self.start_time.is_finite() {
            return Err(Error::InvalidData(format!(
                "start_time must be finite, got {}",
                self.start_time
            )));
        }
        Ok(())
    }
}

/// Full configuration, as read from a TOML document
///
/// ```toml
/// [model]
/// excluded_types = ["highway.service"]
/// shortest_paths = true
///
/// [analyzer]
/// calculation_rate = 60.0
/// min_speed = 1.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub analyzer: AnalyzerConfig,
}

impl Config {
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or holds invalid values
    pub fn from_toml_str(document: &str) -> Result<Self, Error> {
        let config: Config = toml::from_str(document)?;
        config.analyzer.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let document = std::fs::read_to_string(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Failed to open config '{}': {}", path.display(), e),
            )
        })?;
        Self::from_toml_str(&document)
    }
}
