use thiserror::Error;

use crate::Seconds;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Model error: {0}")]
    ModelError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Unknown edge: {0}")]
    UnknownEdge(String),
    #[error("Timestep {time} arrived after {previous}")]
    OutOfOrder { previous: Seconds, time: Seconds },
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),
}
