use serde::{Deserialize, Serialize};

use crate::sensors::{Status, ThermocoupleFrame};

/// One published thermocouple sample
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReadingMessage {
    /// Sensor identifier from the configuration (e.g., "kiln", "tc0")
    pub sensor_id: String,
    /// Sequence number for message ordering, starts at 1 per sensor
    pub seq: u64,
    /// UTC timestamp in nanoseconds
    pub t_utc_ns: u64,
    /// Hot-junction temperature (°C)
    pub hot_junction: f32,
    /// Hot minus cold junction (°C)
    pub junction_delta: f32,
    /// Cold-junction temperature (°C)
    pub cold_junction: f32,
    pub status: Status,
}

impl ReadingMessage {
    pub fn new(sensor_id: String, seq: u64, frame: &ThermocoupleFrame) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let t_utc_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;

        Self {
            sensor_id,
            seq,
            t_utc_ns,
            hot_junction: frame.hot_junction,
            junction_delta: frame.junction_delta,
            cold_junction: frame.cold_junction,
            status: frame.status,
        }
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
