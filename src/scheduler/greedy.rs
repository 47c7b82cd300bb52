use chrono::Duration;

use crate::predict::PassCandidate;
use crate::scheduler::overlap::overlaps;

/// First-fit selection over a caller-ordered pass list.
///
/// Each pass that does not conflict with the reservation set joins it, so
/// every acceptance constrains all later decisions. Callers run the
/// priority bucket first, then the normal bucket against the grown set.
pub fn ordered_scheduler(
    passes: Vec<PassCandidate>,
    mut reservations: Vec<PassCandidate>,
    guard: Duration,
) -> Vec<PassCandidate> {
    for pass in passes {
        if !overlaps(&pass, &reservations, guard) {
            reservations.push(pass);
        }
    }
    reservations
}

/// Stable descending-priority order; list order breaks ties.
pub fn sort_by_priority(passes: &mut [PassCandidate]) {
    passes.sort_by(|a, b| {
        b.priority
            .unwrap_or(0.0)
            .partial_cmp(&a.priority.unwrap_or(0.0))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Transmitter;
    use crate::predict::SatelliteRef;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn pass(rise_min: i64, set_min: i64, priority: f64, uuid: &str) -> PassCandidate {
        PassCandidate {
            satellite: SatelliteRef { norad_id: 25544, name: "ISS (ZARYA)".to_string() },
            transmitter: Transmitter {
                norad_cat_id: 25544,
                uuid: uuid.to_string(),
                success_rate: 0.8,
                good_count: 10,
                data_count: 12,
                mode: "FM".to_string(),
            },
            rise_time: at(rise_min),
            rise_azimuth_deg: 0.0,
            transit_time: at((rise_min + set_min) / 2),
            transit_elevation_deg: 45.0,
            set_time: at(set_min),
            set_azimuth_deg: 0.0,
            priority: Some(priority),
            scheduled: false,
        }
    }

    #[test]
    fn accepts_passes_that_fit_and_skips_conflicts() {
        let passes = vec![
            pass(0, 10, 0.9, "a"),
            pass(5, 15, 0.8, "b"),  // conflicts with "a"
            pass(20, 30, 0.7, "c"),
        ];

        let scheduled = ordered_scheduler(passes, Vec::new(), Duration::zero());
        let uuids: Vec<&str> = scheduled.iter().map(|p| p.transmitter.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["a", "c"]);
    }

    #[test]
    fn respects_preexisting_reservations() {
        let reservations = vec![pass(0, 10, 1.0, "reserved")];
        let passes = vec![pass(5, 15, 0.9, "a"), pass(12, 20, 0.8, "b")];

        let scheduled = ordered_scheduler(passes, reservations, Duration::zero());
        let uuids: Vec<&str> = scheduled.iter().map(|p| p.transmitter.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["reserved", "b"]);
    }

    #[test]
    fn is_idempotent_for_a_fixed_input_order() {
        let passes = vec![pass(0, 10, 0.9, "a"), pass(5, 15, 0.8, "b"), pass(20, 30, 0.7, "c")];

        let first = ordered_scheduler(passes.clone(), Vec::new(), Duration::seconds(60));
        let second = ordered_scheduler(passes, first.clone(), Duration::seconds(60));

        let first_uuids: Vec<&str> = first.iter().map(|p| p.transmitter.uuid.as_str()).collect();
        let second_uuids: Vec<&str> = second.iter().map(|p| p.transmitter.uuid.as_str()).collect();
        assert_eq!(first_uuids, second_uuids);
    }

    #[test]
    fn sort_is_stable_for_priority_ties() {
        let mut passes = vec![
            pass(0, 10, 0.5, "first"),
            pass(20, 30, 0.9, "top"),
            pass(40, 50, 0.5, "second"),
        ];
        sort_by_priority(&mut passes);

        let uuids: Vec<&str> = passes.iter().map(|p| p.transmitter.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["top", "first", "second"]);
    }
}
