use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;

use super::records::NetworkRecords;
use crate::{Error, ModelConfig, NetworkModel};

/// Read network records from a JSON document with `edges` and `junctions` arrays
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not a valid document
pub fn read_network_records(path: &Path) -> Result<NetworkRecords, Error> {
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open network '{}': {}", path.display(), e),
        )
    })?;
    let records: NetworkRecords = serde_json::from_reader(BufReader::new(file))?;
    Ok(records)
}

/// Build a network model straight from a JSON network description
///
/// # Errors
///
/// Returns an error if reading the file or constructing the model fails
pub fn load_network_model(path: &Path, config: &ModelConfig) -> Result<NetworkModel, Error> {
    info!("Reading road network: {}", path.display());
    let records = read_network_records(path)?;
    info!(
        "Read {} edges and {} junctions",
        records.edges.len(),
        records.junctions.len()
    );
    NetworkModel::from_records(&records, config)
}
