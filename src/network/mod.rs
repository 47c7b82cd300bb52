mod client;
mod error;
mod types;

pub use client::{check_station_availability, NetworkClient};
pub use error::NetworkError;
pub use types::{
    Antenna, ObservationRequest, ObservationStats, SatelliteEntry, StationInfo, TransmitterEntry,
    TransmitterStats,
};
