use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::catalog::Satellite;
use crate::constraint::{
    constrain_to_angular_separation, constrain_to_azimuth_window, constrain_to_max_duration,
    ConstraintConfig,
};
use crate::predict::propagator::Propagator;
use crate::predict::types::{PassCandidate, PassEvent, PassStep, SatelliteRef};

/// Restart the search this long after a pass sets, so the same event is not
/// found twice.
const RESTART_AFTER_SET_SECONDS: i64 = 60;

/// Enumerate raw visibility windows for one satellite over the horizon.
///
/// Windows whose culmination stays below `min_culmination_deg` or that are
/// shorter than `min_pass_duration` are skipped. Propagation trouble ends
/// the enumeration for this satellite only.
pub fn find_passes(
    satellite: &Satellite,
    propagator: &dyn Propagator,
    tmin: DateTime<Utc>,
    tmax: DateTime<Utc>,
    min_culmination_deg: f64,
    min_pass_duration: Duration,
) -> Vec<PassCandidate> {
    let mut passes = Vec::new();
    let mut cursor = tmin;

    loop {
        match propagator.next_pass(cursor, tmax) {
            PassStep::Found(event) => {
                if event.rise_time >= tmax {
                    break;
                }

                let keep = event.transit_elevation_deg >= min_culmination_deg
                    && event.rise_time < event.set_time
                    && event.set_time - event.rise_time > min_pass_duration;

                cursor = event.set_time + Duration::seconds(RESTART_AFTER_SET_SECONDS);
                if keep {
                    passes.push(candidate_from_event(satellite, event));
                }
            }
            PassStep::NoMorePasses => break,
            PassStep::PropagationError(message) => {
                debug!("{}: pass search stopped: {}", satellite.name, message);
                break;
            }
        }
    }

    passes
}

/// Full discovery for one satellite: raw windows piped through the azimuth
/// window, angular separation and maximum duration constraints.
pub fn find_constrained_passes(
    satellite: &Satellite,
    propagator: &dyn Propagator,
    constraints: &ConstraintConfig,
) -> Vec<PassCandidate> {
    find_passes(
        satellite,
        propagator,
        constraints.tmin,
        constraints.tmax,
        constraints.min_culmination_deg,
        constraints.min_pass_duration,
    )
    .into_iter()
    .filter_map(|pass| {
        constrain_to_azimuth_window(
            pass,
            propagator,
            &constraints.azimuth_window,
            constraints.min_pass_duration,
            constraints.azimuth_sweep_step,
        )
    })
    .filter_map(|pass| {
        constrain_to_angular_separation(
            pass,
            propagator,
            constraints.pointing.as_ref(),
            constraints.separation_samples,
        )
    })
    .map(|pass| match constraints.max_pass_duration {
        Some(max) => constrain_to_max_duration(pass, max, constraints.tmin, constraints.tmax),
        None => pass,
    })
    .collect()
}

fn candidate_from_event(satellite: &Satellite, event: PassEvent) -> PassCandidate {
    PassCandidate {
        satellite: SatelliteRef {
            norad_id: satellite.norad_id,
            name: satellite.name.clone(),
        },
        transmitter: satellite.transmitter.clone(),
        rise_time: event.rise_time,
        rise_azimuth_deg: event.rise_azimuth_deg,
        transit_time: event.transit_time,
        transit_elevation_deg: event.transit_elevation_deg,
        set_time: event.set_time,
        set_azimuth_deg: event.set_azimuth_deg,
        priority: None,
        scheduled: false,
    }
}
