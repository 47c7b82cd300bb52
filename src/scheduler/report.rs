use log::info;

use crate::predict::PassCandidate;

/// Aggregate utilization of a finished schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Efficiency {
    pub scheduled_seconds: i64,
    pub span_seconds: i64,
    pub percent: f64,
}

/// Utilization over the scheduled passes: total recorded time, the span
/// from the earliest rise to the latest set, and their ratio. `None` when
/// nothing was scheduled.
pub fn efficiency(scheduled: &[PassCandidate]) -> Option<Efficiency> {
    let first = scheduled.first()?;

    let mut recorded = first.duration();
    let mut span_start = first.rise_time;
    let mut span_end = first.set_time;

    for pass in &scheduled[1..] {
        recorded = recorded + pass.duration();
        span_start = span_start.min(pass.rise_time);
        span_end = span_end.max(pass.set_time);
    }

    let scheduled_seconds = recorded.num_seconds();
    let span_seconds = (span_end - span_start).num_seconds();

    Some(Efficiency {
        scheduled_seconds,
        span_seconds,
        percent: 100.0 * scheduled_seconds as f64 / span_seconds as f64,
    })
}

/// Log the utilization of the final schedule, or that nothing was found.
pub fn report_efficiency(scheduled: &[PassCandidate], candidate_count: usize) -> Option<Efficiency> {
    match efficiency(scheduled) {
        Some(e) => {
            info!(
                "{} passes selected out of {}, {} s out of {} s at {:.3}% efficiency",
                scheduled.len(),
                candidate_count,
                e.scheduled_seconds,
                e.span_seconds,
                e.percent
            );
            Some(e)
        }
        None => {
            info!("No appropriate passes found for scheduling.");
            None
        }
    }
}

/// Print the final schedule as a table, sorted by rise time.
pub fn print_schedule_summary(scheduled: &[PassCandidate], ground_station_id: u32) {
    println!(
        "  GS | Sch | NORAD | Start time          | End time            | AzR El AzS | Priority | Transmitter UUID       | Mode        | Satellite name"
    );

    let mut rows: Vec<&PassCandidate> = scheduled.iter().collect();
    rows.sort_by_key(|pass| pass.rise_time);

    for pass in rows {
        println!(
            "{:4} | {:3} | {:05} | {} | {} | {:3.0} {:2.0} {:3.0} | {:8.6} | {:<22} | {:<11} | {}",
            ground_station_id,
            if pass.scheduled { "Y" } else { "N" },
            pass.satellite.norad_id,
            pass.rise_time.format("%Y-%m-%dT%H:%M:%S"),
            pass.set_time.format("%Y-%m-%dT%H:%M:%S"),
            pass.rise_azimuth_deg,
            pass.transit_elevation_deg,
            pass.set_azimuth_deg,
            pass.priority.unwrap_or(0.0),
            pass.transmitter.uuid,
            pass.transmitter.mode,
            pass.satellite.name
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Transmitter;
    use crate::predict::SatelliteRef;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    fn pass(rise_s: i64, set_s: i64) -> PassCandidate {
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
            rise_time: at(rise_s),
            rise_azimuth_deg: 0.0,
            transit_time: at((rise_s + set_s) / 2),
            transit_elevation_deg: 45.0,
            set_time: at(set_s),
            set_azimuth_deg: 0.0,
            priority: None,
            scheduled: false,
        }
    }

    #[test]
    fn two_passes_over_a_thousand_second_span() {
        // 300 s + 200 s scheduled across a 1000 s span.
        let scheduled = vec![pass(0, 300), pass(800, 1000)];
        let e = efficiency(&scheduled).unwrap();

        assert_eq!(e.scheduled_seconds, 500);
        assert_eq!(e.span_seconds, 1000);
        assert!((e.percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn span_ignores_input_order() {
        let scheduled = vec![pass(800, 1000), pass(0, 300)];
        let e = efficiency(&scheduled).unwrap();
        assert_eq!(e.span_seconds, 1000);
    }

    #[test]
    fn empty_schedule_has_no_efficiency() {
        assert!(efficiency(&[]).is_none());
        assert!(report_efficiency(&[], 12).is_none());
    }
}
