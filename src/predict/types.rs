use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::catalog::Transmitter;

/// Identifies the satellite a pass belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct SatelliteRef {
    pub norad_id: u32,
    pub name: String,
}

/// One visibility window of a satellite at the station.
///
/// Created by pass discovery, narrowed (or rejected) by the constraint
/// stages, annotated with a priority by the classifier, and finally either
/// accepted into the reservation set or discarded. Reservations fetched from
/// the network use the same shape with `scheduled` set.
#[derive(Debug, Clone, Serialize)]
pub struct PassCandidate {
    pub satellite: SatelliteRef,
    pub transmitter: Transmitter,
    pub rise_time: DateTime<Utc>,
    pub rise_azimuth_deg: f64,
    pub transit_time: DateTime<Utc>,
    pub transit_elevation_deg: f64,
    pub set_time: DateTime<Utc>,
    pub set_azimuth_deg: f64,
    /// Assigned by the priority classifier; `None` before that.
    pub priority: Option<f64>,
    /// True only for reservations that already exist on the network.
    pub scheduled: bool,
}

impl PassCandidate {
    pub fn duration(&self) -> Duration {
        self.set_time - self.rise_time
    }
}

/// Satellite sky position as seen from the station.
#[derive(Debug, Clone, Copy)]
pub struct SkyPosition {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

impl SkyPosition {
    /// Great-circle separation between two sky positions, in degrees.
    pub fn separation_deg(&self, other: &SkyPosition) -> f64 {
        let el0 = self.elevation_deg.to_radians();
        let el1 = other.elevation_deg.to_radians();
        let delta_az = (self.azimuth_deg - other.azimuth_deg).to_radians();

        let cos_sep = el0.sin() * el1.sin() + el0.cos() * el1.cos() * delta_az.cos();
        cos_sep.clamp(-1.0, 1.0).acos().to_degrees()
    }
}

/// One rise/set event as reported by a propagator.
#[derive(Debug, Clone)]
pub struct PassEvent {
    pub rise_time: DateTime<Utc>,
    pub rise_azimuth_deg: f64,
    pub transit_time: DateTime<Utc>,
    pub transit_elevation_deg: f64,
    pub set_time: DateTime<Utc>,
    pub set_azimuth_deg: f64,
}

/// Outcome of asking a propagator for the next pass. Both non-`Found`
/// outcomes end enumeration for that satellite; neither fails the batch.
#[derive(Debug, Clone)]
pub enum PassStep {
    Found(PassEvent),
    NoMorePasses,
    PropagationError(String),
}
