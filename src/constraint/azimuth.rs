use chrono::Duration;

use crate::predict::{PassCandidate, Propagator};

/// The arc of usable azimuths, swept clockwise from `start_deg` to
/// `stop_deg`. A window with `start_deg > stop_deg` wraps through north.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AzimuthWindow {
    pub start_deg: f64,
    pub stop_deg: f64,
}

impl AzimuthWindow {
    /// The whole horizon; disables the constraint.
    pub const FULL: AzimuthWindow = AzimuthWindow { start_deg: 0.0, stop_deg: 360.0 };

    pub fn new(start_deg: f64, stop_deg: f64) -> Self {
        Self { start_deg, stop_deg }
    }

    pub fn is_full(&self) -> bool {
        self.start_deg == 0.0 && self.stop_deg == 360.0
    }

    pub fn contains(&self, azimuth_deg: f64) -> bool {
        if self.start_deg > self.stop_deg {
            // Wrapping arc: membership in the complementary arc, inverted.
            !(azimuth_deg > self.stop_deg && azimuth_deg < self.start_deg)
        } else {
            azimuth_deg >= self.start_deg && azimuth_deg <= self.stop_deg
        }
    }
}

/// Trim a pass until both edges lie inside the azimuth window.
///
/// The rise edge is swept forward and the set edge backward in `step`
/// increments, re-sampling the trajectory at every step. The candidate is
/// rejected as soon as the remaining window would drop below
/// `min_pass_duration`, or when the trajectory cannot be sampled. The full
/// window is an identity transform.
pub fn constrain_to_azimuth_window(
    mut pass: PassCandidate,
    propagator: &dyn Propagator,
    window: &AzimuthWindow,
    min_pass_duration: Duration,
    step: Duration,
) -> Option<PassCandidate> {
    if window.is_full() {
        return Some(pass);
    }

    let mut rise = pass.rise_time;
    let mut rise_azimuth = propagator.position_at(rise)?.azimuth_deg;
    while !window.contains(rise_azimuth) {
        rise += step;
        if pass.set_time - rise < min_pass_duration {
            return None;
        }
        rise_azimuth = propagator.position_at(rise)?.azimuth_deg;
    }

    let mut set = pass.set_time;
    let mut set_azimuth = propagator.position_at(set)?.azimuth_deg;
    while !window.contains(set_azimuth) {
        set -= step;
        if set - rise < min_pass_duration {
            return None;
        }
        set_azimuth = propagator.position_at(set)?.azimuth_deg;
    }

    pass.rise_time = rise;
    pass.rise_azimuth_deg = rise_azimuth;
    pass.set_time = set;
    pass.set_azimuth_deg = set_azimuth;
    Some(pass)
}
