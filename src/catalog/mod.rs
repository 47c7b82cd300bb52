mod error;
mod priorities;
mod tle;
mod transmitters;

pub use error::CatalogError;
pub use priorities::read_priorities;
pub use tle::{read_tles, Tle};
pub use transmitters::{read_transmitters, write_transmitters, Transmitter};

use std::collections::HashMap;

use crate::network::SatelliteEntry;

/// A satellite of interest: one TLE joined with one receivable transmitter.
///
/// A satellite with several receivable transmitters appears once per
/// transmitter, so each candidate pass carries the statistics of the
/// transmitter it would record.
#[derive(Debug, Clone)]
pub struct Satellite {
    pub norad_id: u32,
    pub name: String,
    pub tle: Tle,
    pub transmitter: Transmitter,
}

/// Join transmitters of interest with their TLEs.
pub fn satellites_from_transmitters(
    transmitters: &[Transmitter],
    tles: &[Tle],
) -> Vec<Satellite> {
    let mut satellites = Vec::new();
    for transmitter in transmitters {
        for tle in tles {
            if tle.norad_cat_id == transmitter.norad_cat_id {
                satellites.push(Satellite {
                    norad_id: tle.norad_cat_id,
                    name: tle.name().trim().to_string(),
                    tle: tle.clone(),
                    transmitter: transmitter.clone(),
                });
            }
        }
    }
    satellites
}

/// Select the satellites worth scheduling from the cached transmitters and
/// TLEs: transmitters below the success-rate floor are dropped, and
/// satellites flagged for frequency misuse are skipped unless explicitly
/// kept (scheduling those fails with a permission error anyway).
pub fn select_satellites(
    transmitters: &[Transmitter],
    tles: &[Tle],
    catalog: &HashMap<u32, SatelliteEntry>,
    min_success_rate: f64,
    keep_frequency_violators: bool,
) -> Vec<Satellite> {
    let of_interest: Vec<Transmitter> = transmitters
        .iter()
        .filter(|t| t.success_rate >= min_success_rate)
        .cloned()
        .collect();

    satellites_from_transmitters(&of_interest, tles)
        .into_iter()
        .filter(|sat| {
            keep_frequency_violators
                || !catalog
                    .get(&sat.norad_id)
                    .map(|entry| entry.is_frequency_violator)
                    .unwrap_or(false)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transmitter(norad_cat_id: u32, uuid: &str, success_rate: f64) -> Transmitter {
        Transmitter {
            norad_cat_id,
            uuid: uuid.to_string(),
            success_rate,
            good_count: 10,
            data_count: 20,
            mode: "FM".to_string(),
        }
    }

    fn tle(norad_cat_id: u32, name: &str) -> Tle {
        Tle {
            norad_cat_id,
            tle0: name.to_string(),
            tle1: format!("1 {:05}U 98067A   20029.54791435  .00016717  00000-0  10270-3 0  9000", norad_cat_id),
            tle2: format!("2 {:05}  51.6426 308.0305 0005181  69.9271 290.2451 15.49135461  9000", norad_cat_id),
        }
    }

    #[test]
    fn joins_transmitters_with_matching_tles() {
        let transmitters = vec![transmitter(25544, "aaaa", 0.8), transmitter(43017, "bbbb", 0.5)];
        let tles = vec![tle(25544, "ISS (ZARYA)")];

        let satellites = satellites_from_transmitters(&transmitters, &tles);
        assert_eq!(satellites.len(), 1);
        assert_eq!(satellites[0].norad_id, 25544);
        assert_eq!(satellites[0].name, "ISS (ZARYA)");
        assert_eq!(satellites[0].transmitter.uuid, "aaaa");
    }

    #[test]
    fn one_satellite_per_receivable_transmitter() {
        let transmitters = vec![transmitter(25544, "aaaa", 0.8), transmitter(25544, "bbbb", 0.5)];
        let tles = vec![tle(25544, "ISS (ZARYA)")];

        let satellites = satellites_from_transmitters(&transmitters, &tles);
        assert_eq!(satellites.len(), 2);
    }

    #[test]
    fn select_filters_success_rate_and_violators() {
        let transmitters = vec![transmitter(25544, "aaaa", 0.8), transmitter(43017, "bbbb", 0.1)];
        let tles = vec![tle(25544, "ISS (ZARYA)"), tle(43017, "FOX-1B")];
        let mut catalog = HashMap::new();
        catalog.insert(
            25544,
            SatelliteEntry {
                norad_cat_id: Some(25544),
                name: "ISS".to_string(),
                status: "alive".to_string(),
                is_frequency_violator: true,
            },
        );

        let selected = select_satellites(&transmitters, &tles, &catalog, 0.5, false);
        assert!(selected.is_empty());

        let kept = select_satellites(&transmitters, &tles, &catalog, 0.5, true);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].norad_id, 25544);
    }
}
