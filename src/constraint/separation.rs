use crate::predict::{PassCandidate, Propagator, SkyPosition};

/// A fixed pointing direction together with the maximum angular separation
/// the recorded trajectory may keep from it.
#[derive(Debug, Clone, Copy)]
pub struct PointingConstraint {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub max_separation_deg: f64,
}

/// Admit a pass only if its closest approach to the pointing direction is
/// within the configured separation.
///
/// The trajectory is sampled at `samples` evenly spaced instants across the
/// pass, endpoints included, and the minimum great-circle separation is
/// compared against the limit. The pass itself is never narrowed. Without a
/// pointing constraint this is a pass-through.
pub fn constrain_to_angular_separation(
    pass: PassCandidate,
    propagator: &dyn Propagator,
    pointing: Option<&PointingConstraint>,
    samples: usize,
) -> Option<PassCandidate> {
    let pointing = match pointing {
        Some(pointing) => pointing,
        None => return Some(pass),
    };

    let target = SkyPosition {
        azimuth_deg: pointing.azimuth_deg,
        elevation_deg: pointing.elevation_deg,
    };

    let span = pass.duration();
    let mut closest = f64::INFINITY;
    for i in 0..samples {
        let t = pass.rise_time + span * i as i32 / (samples - 1) as i32;
        let position = propagator.position_at(t)?;
        closest = closest.min(position.separation_deg(&target));
    }

    if closest > pointing.max_separation_deg {
        return None;
    }
    Some(pass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Transmitter;
    use crate::predict::{PassStep, SatelliteRef};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    /// Rises from the horizon to a fixed peak elevation at mid-pass and back
    /// down, at constant azimuth.
    struct ArcSky {
        start: DateTime<Utc>,
        length_s: i64,
        azimuth_deg: f64,
        peak_elevation_deg: f64,
    }

    impl Propagator for ArcSky {
        fn next_pass(&self, _from: DateTime<Utc>, _until: DateTime<Utc>) -> PassStep {
            PassStep::NoMorePasses
        }

        fn position_at(&self, timestamp: DateTime<Utc>) -> Option<SkyPosition> {
            let elapsed = (timestamp - self.start).num_seconds() as f64;
            let half = self.length_s as f64 / 2.0;
            let fraction = 1.0 - (elapsed - half).abs() / half;
            Some(SkyPosition {
                azimuth_deg: self.azimuth_deg,
                elevation_deg: self.peak_elevation_deg * fraction,
            })
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
    }

    fn pass(length_s: i64) -> PassCandidate {
        PassCandidate {
            satellite: SatelliteRef { norad_id: 25544, name: "ISS (ZARYA)".to_string() },
            transmitter: Transmitter {
                norad_cat_id: 25544,
                uuid: "aBcDeF".to_string(),
                success_rate: 0.8,
                good_count: 10,
                data_count: 12,
                mode: "FM".to_string(),
            },
            rise_time: start(),
            rise_azimuth_deg: 150.0,
            transit_time: start() + Duration::seconds(length_s / 2),
            transit_elevation_deg: 60.0,
            set_time: start() + Duration::seconds(length_s),
            set_azimuth_deg: 150.0,
            priority: None,
            scheduled: false,
        }
    }

    #[test]
    fn no_pointing_constraint_is_a_pass_through() {
        let sky = ArcSky { start: start(), length_s: 600, azimuth_deg: 150.0, peak_elevation_deg: 60.0 };
        let input = pass(600);
        let output = constrain_to_angular_separation(input.clone(), &sky, None, 127).unwrap();
        assert_eq!(output.rise_time, input.rise_time);
        assert_eq!(output.set_time, input.set_time);
    }

    #[test]
    fn admits_a_pass_that_approaches_the_pointing_direction() {
        let sky = ArcSky { start: start(), length_s: 600, azimuth_deg: 150.0, peak_elevation_deg: 60.0 };
        // Peak sweeps right through the pointing direction.
        let pointing = PointingConstraint {
            azimuth_deg: 150.0,
            elevation_deg: 55.0,
            max_separation_deg: 10.0,
        };

        let output = constrain_to_angular_separation(pass(600), &sky, Some(&pointing), 127);
        assert!(output.is_some());
    }

    #[test]
    fn rejects_a_pass_that_stays_away() {
        let sky = ArcSky { start: start(), length_s: 600, azimuth_deg: 150.0, peak_elevation_deg: 20.0 };
        // Closest approach is 35° below the pointing elevation.
        let pointing = PointingConstraint {
            azimuth_deg: 150.0,
            elevation_deg: 55.0,
            max_separation_deg: 10.0,
        };

        let output = constrain_to_angular_separation(pass(600), &sky, Some(&pointing), 127);
        assert!(output.is_none());
    }

    #[test]
    fn never_narrows_the_window() {
        let sky = ArcSky { start: start(), length_s: 600, azimuth_deg: 150.0, peak_elevation_deg: 60.0 };
        let pointing = PointingConstraint {
            azimuth_deg: 150.0,
            elevation_deg: 30.0,
            max_separation_deg: 90.0,
        };

        let input = pass(600);
        let output = constrain_to_angular_separation(input.clone(), &sky, Some(&pointing), 127).unwrap();
        assert_eq!(output.rise_time, input.rise_time);
        assert_eq!(output.set_time, input.set_time);
        assert_eq!(output.duration(), input.duration());
    }
}
