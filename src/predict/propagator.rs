use chrono::{DateTime, Duration, Utc};
use sgp4::{Constants, Elements};

use crate::catalog::Tle;
use crate::predict::error::PredictError;
use crate::predict::ground_station::GroundStation;
use crate::predict::propagation::observe;
use crate::predict::types::{PassEvent, PassStep, SkyPosition};

const COARSE_STEP_SECONDS: i64 = 60;
const FINE_STEP_SECONDS: i64 = 1;
const HORIZON_ELEVATION_DEG: f64 = 0.0;
/// Give up looking for the descending horizon crossing after this long; a
/// satellite that stays up (geostationary geometry) cannot be scheduled as
/// discrete passes.
const MAX_PASS_SCAN_HOURS: i64 = 12;

/// Enumerates visibility windows and re-samples the trajectory during
/// constraint narrowing.
pub trait Propagator {
    /// The next visibility window starting at or after `from`. Enumeration
    /// ends once no rise happens before `until`.
    fn next_pass(&self, from: DateTime<Utc>, until: DateTime<Utc>) -> PassStep;

    /// Sky position at an instant, `None` when the orbit cannot be
    /// propagated there.
    fn position_at(&self, timestamp: DateTime<Utc>) -> Option<SkyPosition>;
}

/// SGP4-backed propagator for one satellite at one station.
pub struct Sgp4Propagator {
    station: GroundStation,
    elements: Elements,
    constants: Constants,
}

impl Sgp4Propagator {
    pub fn from_tle(station: GroundStation, tle: &Tle) -> Result<Self, PredictError> {
        let invalid = |message: String| PredictError::InvalidTle {
            name: tle.name().trim().to_string(),
            message,
        };

        let elements = Elements::from_tle(
            Some(tle.name().to_string()),
            tle.tle1.as_bytes(),
            tle.tle2.as_bytes(),
        )
        .map_err(|e| invalid(e.to_string()))?;

        let constants = Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

        Ok(Self { station, elements, constants })
    }

    fn sample(&self, timestamp: DateTime<Utc>) -> Result<SkyPosition, PredictError> {
        observe(&self.station, &self.elements, &self.constants, timestamp)
    }

    /// Binary search for the exact horizon crossing between two coarse
    /// samples. Returns the crossing time and the azimuth there.
    fn refine_crossing(
        &self,
        before: DateTime<Utc>,
        after: DateTime<Utc>,
        rising: bool,
    ) -> Result<(DateTime<Utc>, f64), PredictError> {
        let mut low = before;
        let mut high = after;

        while (high - low).num_seconds() > FINE_STEP_SECONDS {
            let mid = low + (high - low) / 2;
            let above = self.sample(mid)?.elevation_deg >= HORIZON_ELEVATION_DEG;
            if above == rising {
                high = mid;
            } else {
                low = mid;
            }
        }

        let position = self.sample(high)?;
        Ok((high, position.azimuth_deg))
    }
}

impl Propagator for Sgp4Propagator {
    fn next_pass(&self, from: DateTime<Utc>, until: DateTime<Utc>) -> PassStep {
        let coarse = Duration::seconds(COARSE_STEP_SECONDS);
        let mut cursor = from;

        // Skip a pass already in progress at `from`.
        loop {
            match self.sample(cursor) {
                Ok(position) if position.elevation_deg < HORIZON_ELEVATION_DEG => break,
                Ok(_) => cursor += coarse,
                Err(e) => return PassStep::PropagationError(e.to_string()),
            }
            if cursor > until {
                return PassStep::NoMorePasses;
            }
        }

        // Coarse scan for the rise.
        let mut below = cursor;
        let rise_sample = loop {
            cursor += coarse;
            if cursor > until {
                return PassStep::NoMorePasses;
            }
            match self.sample(cursor) {
                Ok(position) if position.elevation_deg >= HORIZON_ELEVATION_DEG => break position,
                Ok(_) => below = cursor,
                Err(e) => return PassStep::PropagationError(e.to_string()),
            }
        };

        let (rise_time, rise_azimuth) = match self.refine_crossing(below, cursor, true) {
            Ok(crossing) => crossing,
            Err(e) => return PassStep::PropagationError(e.to_string()),
        };

        // Follow the pass to its set, tracking the culmination. The pass is
        // allowed to run past `until`.
        let mut max_elevation = rise_sample.elevation_deg;
        let mut max_elevation_time = cursor;
        let scan_limit = cursor + Duration::hours(MAX_PASS_SCAN_HOURS);
        let mut above = cursor;

        loop {
            cursor += coarse;
            if cursor > scan_limit {
                return PassStep::PropagationError("satellite does not set".to_string());
            }
            match self.sample(cursor) {
                Ok(position) if position.elevation_deg >= HORIZON_ELEVATION_DEG => {
                    if position.elevation_deg > max_elevation {
                        max_elevation = position.elevation_deg;
                        max_elevation_time = cursor;
                    }
                    above = cursor;
                }
                Ok(_) => break,
                Err(e) => return PassStep::PropagationError(e.to_string()),
            }
        }

        let (set_time, set_azimuth) = match self.refine_crossing(above, cursor, false) {
            Ok(crossing) => crossing,
            Err(e) => return PassStep::PropagationError(e.to_string()),
        };

        PassStep::Found(PassEvent {
            rise_time,
            rise_azimuth_deg: round2(rise_azimuth),
            transit_time: max_elevation_time,
            transit_elevation_deg: round2(max_elevation),
            set_time,
            set_azimuth_deg: round2(set_azimuth),
        })
    }

    fn position_at(&self, timestamp: DateTime<Utc>) -> Option<SkyPosition> {
        self.sample(timestamp).ok()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
