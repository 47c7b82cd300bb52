use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Satellite catalog entry from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteEntry {
    pub norad_cat_id: Option<u32>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_frequency_violator: bool,
}

impl SatelliteEntry {
    pub fn is_alive(&self) -> bool {
        self.status == "alive"
    }
}

/// Transmitter entry from the database.
#[derive(Debug, Clone, Deserialize)]
pub struct TransmitterEntry {
    pub uuid: String,
    pub norad_cat_id: Option<u32>,
    #[serde(default)]
    pub status: String,
    pub downlink_low: Option<u64>,
    pub mode: Option<String>,
}

/// Per-transmitter observation statistics from the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransmitterStats {
    pub uuid: String,
    pub stats: ObservationStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationStats {
    /// Percentage of observations vetted good, in [0, 100].
    pub success_rate: f64,
    pub good_count: u32,
    pub total_count: u32,
}

/// Ground station record from the network.
#[derive(Debug, Clone, Deserialize)]
pub struct StationInfo {
    pub id: u32,
    pub status: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub altitude: f64,
    #[serde(default, rename = "antenna")]
    pub antennas: Vec<Antenna>,
}

/// One antenna's receivable frequency range, in Hz.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Antenna {
    pub frequency: u64,
    pub frequency_max: u64,
}

/// A scheduled observation as returned by the network.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationEntry {
    pub norad_cat_id: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub max_altitude: Option<f64>,
    pub transmitter: Option<String>,
}

/// A new observation to be committed to the network.
#[derive(Debug, Clone)]
pub struct ObservationRequest {
    pub ground_station: u32,
    pub norad_cat_id: u32,
    pub transmitter_uuid: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ObservationRequest {
    /// The payload shape the scheduling endpoint expects.
    pub fn payload(&self) -> serde_json::Value {
        serde_json::json!({
            "ground_station": self.ground_station,
            "transmitter_uuid": self.transmitter_uuid,
            "start": self.start.format("%Y-%m-%d %H:%M:%S").to_string(),
            "end": self.end.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }
}
