use chrono::{DateTime, Duration, Utc};

use crate::predict::PassCandidate;

/// Trim a pass that exceeds the maximum recording duration.
///
/// Both edges give up `(duration - max_duration) / 2`, keeping the trim
/// centered, as long as the shrunk endpoints stay inside `[tmin, tmax]`.
/// Otherwise the end is clamped to the horizon and the recording window is
/// taken leading up to it. Always returns a pass.
pub fn constrain_to_max_duration(
    mut pass: PassCandidate,
    max_duration: Duration,
    tmin: DateTime<Utc>,
    tmax: DateTime<Utc>,
) -> PassCandidate {
    if pass.duration() <= max_duration {
        return pass;
    }

    let half = (pass.duration() - max_duration) / 2;
    let rise = pass.rise_time + half;
    let set = pass.set_time - half;

    if rise >= tmin && set <= tmax {
        pass.rise_time = rise;
        pass.set_time = set;
    } else {
        let set = pass.set_time.min(tmax);
        pass.set_time = set;
        pass.rise_time = set - max_duration;
    }
    pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Transmitter;
    use crate::predict::SatelliteRef;
    use chrono::TimeZone;

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn pass(rise_min: i64, set_min: i64) -> PassCandidate {
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
            rise_time: at(rise_min),
            rise_azimuth_deg: 30.0,
            transit_time: at((rise_min + set_min) / 2),
            transit_elevation_deg: 45.0,
            set_time: at(set_min),
            set_azimuth_deg: 200.0,
            priority: None,
            scheduled: false,
        }
    }

    #[test]
    fn short_passes_are_untouched() {
        let input = pass(10, 30);
        let output = constrain_to_max_duration(input.clone(), Duration::minutes(30), at(0), at(120));
        assert_eq!(output.rise_time, input.rise_time);
        assert_eq!(output.set_time, input.set_time);
    }

    #[test]
    fn long_passes_shrink_evenly_around_the_middle() {
        let output = constrain_to_max_duration(pass(10, 50), Duration::minutes(30), at(0), at(120));
        assert_eq!(output.rise_time, at(15));
        assert_eq!(output.set_time, at(45));
        assert_eq!(output.duration(), Duration::minutes(30));
    }

    #[test]
    fn clamps_to_the_horizon_end_when_the_even_shrink_leaves_it() {
        // 40 min pass running past the horizon end; the even trim would keep
        // the set at minute 125, outside [0, 120].
        let output = constrain_to_max_duration(pass(90, 130), Duration::minutes(30), at(0), at(120));
        assert_eq!(output.set_time, at(120));
        assert_eq!(output.rise_time, at(90));
        assert_eq!(output.duration(), Duration::minutes(30));
    }

    #[test]
    fn anchors_at_the_end_when_the_even_shrink_leaves_the_horizon_start() {
        let output = constrain_to_max_duration(pass(-10, 30), Duration::minutes(30), at(0), at(120));
        assert_eq!(output.set_time, at(30));
        assert_eq!(output.rise_time, at(0));
        assert_eq!(output.duration(), Duration::minutes(30));
    }
}
