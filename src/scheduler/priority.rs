use std::collections::HashMap;

use crate::predict::PassCandidate;

/// Split candidate passes into a priority bucket and a normal bucket.
///
/// A pass lands in the priority bucket when its satellite has an operator
/// priority, the pass uses that satellite's favorite transmitter, and the
/// priority clears `min_priority`. Every other pass is scored from its
/// culmination elevation and the transmitter's track record, normalized per
/// satellite, and kept in the normal bucket when the score clears
/// `min_priority`. With `only_priority` set, non-priority passes are
/// dropped instead.
pub fn classify(
    passes: Vec<PassCandidate>,
    priorities: &HashMap<u32, f64>,
    favorite_transmitters: &HashMap<u32, String>,
    only_priority: bool,
    min_priority: f64,
) -> (Vec<PassCandidate>, Vec<PassCandidate>) {
    // Highest good-observation count per satellite, for normalization
    // across transmitter populations of different sizes.
    let mut max_good_count: HashMap<u32, u32> = HashMap::new();
    for pass in &passes {
        let best = max_good_count.entry(pass.satellite.norad_id).or_insert(0);
        *best = (*best).max(pass.transmitter.good_count);
    }

    let mut priority_bucket = Vec::new();
    let mut normal_bucket = Vec::new();

    for mut pass in passes {
        let norad_id = pass.satellite.norad_id;

        let favorite_match = match (priorities.get(&norad_id), favorite_transmitters.get(&norad_id)) {
            (Some(&assigned), Some(favorite)) => {
                (pass.transmitter.uuid == *favorite && assigned >= min_priority)
                    .then(|| (assigned, favorite.clone()))
            }
            _ => None,
        };

        if let Some((assigned, favorite)) = favorite_match {
            pass.priority = Some(assigned);
            pass.transmitter.uuid = favorite;
            priority_bucket.push(pass);
            continue;
        }

        if only_priority {
            continue;
        }

        let mut score = (pass.transit_elevation_deg / 90.0) * pass.transmitter.success_rate;
        let max_good = max_good_count.get(&norad_id).copied().unwrap_or(0);
        if max_good > 0 {
            score *= pass.transmitter.good_count as f64 / max_good as f64;
        }

        if score >= min_priority {
            pass.priority = Some(score);
            normal_bucket.push(pass);
        }
    }

    (priority_bucket, normal_bucket)
}
