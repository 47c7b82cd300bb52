use chrono::Duration;

use crate::predict::PassCandidate;

/// True when the candidate conflicts with any reservation.
///
/// The guard time is appended to every reservation's end before comparing,
/// leaving room to reconfigure the station between observations. Interval
/// endpoints that only touch a boundary do not conflict, so back-to-back
/// scheduling at exactly the guard distance is allowed.
pub fn overlaps(
    candidate: &PassCandidate,
    reservations: &[PassCandidate],
    guard: Duration,
) -> bool {
    let rise = candidate.rise_time;
    let set = candidate.set_time;

    reservations.iter().any(|reservation| {
        let reserved_rise = reservation.rise_time;
        let reserved_set = reservation.set_time + guard;

        // Candidate falls within the reservation
        (rise >= reserved_rise && set < reserved_set)
            // Reservation falls within the candidate
            || (reserved_rise >= rise && reserved_set < set)
            // Candidate start falls within the reservation
            || (rise >= reserved_rise && rise < reserved_set)
            // Candidate end falls within the reservation
            || (set > reserved_rise && set < reserved_set)
    })
}
