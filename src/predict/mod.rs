mod error;
mod ground_station;
mod pass_finder;
mod propagation;
mod propagator;
mod types;

pub use error::PredictError;
pub use ground_station::GroundStation;
pub use pass_finder::{find_constrained_passes, find_passes};
pub use propagation::observe;
pub use propagator::{Propagator, Sgp4Propagator};
pub use types::{PassCandidate, PassEvent, PassStep, SatelliteRef, SkyPosition};
