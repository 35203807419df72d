//! JSON encoding of entity state snapshots.
//!
//! A snapshot is a JSON array of entities tagged by `kind`:
//!
//! ```json
//! [
//!   {"kind": "sensor", "object_id": "temp1", "name": "Living Room Temp",
//!    "state": 21.47, "unit_of_measurement": "°C", "accuracy_decimals": 2},
//!   {"kind": "switch", "object_id": "relay1", "name": "Relay", "state": true}
//! ]
//! ```

use std::path::Path;

use tracing::debug;

use crate::entity::Entity;
use crate::error::Result;

/// Encode entities as a pretty-printed JSON array.
pub fn encode(entities: &[Entity]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(entities)?)
}

/// Decode a JSON array of entities.
pub fn decode(data: &[u8]) -> Result<Vec<Entity>> {
    Ok(serde_json::from_slice(data)?)
}

/// Read and decode a snapshot file.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Vec<Entity>> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let entities = decode(&data)?;
    debug!(
        path = %path.display(),
        entities = entities.len(),
        "Loaded entity snapshot"
    );
    Ok(entities)
}
