use std::fs;
use std::path::Path;

use log::warn;
use serde::Serialize;

use crate::catalog::CatalogError;

/// One receivable transmitter with its observation statistics, as stored in
/// the per-station transmitters cache file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transmitter {
    pub norad_cat_id: u32,
    pub uuid: String,
    /// Fraction of observations vetted good, in [0, 1].
    pub success_rate: f64,
    pub good_count: u32,
    pub data_count: u32,
    pub mode: String,
}

/// Read the whitespace-separated transmitters cache file:
/// `NNNNN uuid success_percent good_count data_count mode`.
/// Malformed lines are skipped with a warning.
pub fn read_transmitters(path: &Path) -> Result<Vec<Transmitter>, CatalogError> {
    let content = fs::read_to_string(path)?;

    let mut transmitters = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let item: Vec<&str> = line.split_whitespace().collect();
        if item.len() < 6 {
            warn!("transmitters file line {}: expected 6 fields, found {}", number + 1, item.len());
            continue;
        }

        let parsed = (|| {
            Some(Transmitter {
                norad_cat_id: item[0].parse().ok()?,
                uuid: item[1].to_string(),
                success_rate: item[2].parse::<f64>().ok()? / 100.0,
                good_count: item[3].parse().ok()?,
                data_count: item[4].parse().ok()?,
                mode: item[5].to_string(),
            })
        })();

        match parsed {
            Some(transmitter) => transmitters.push(transmitter),
            None => warn!("transmitters file line {}: unparseable fields", number + 1),
        }
    }

    Ok(transmitters)
}

/// Write the transmitters cache file in the format `read_transmitters` expects.
pub fn write_transmitters(path: &Path, transmitters: &[Transmitter]) -> Result<(), CatalogError> {
    let mut content = String::new();
    for t in transmitters {
        content.push_str(&format!(
            "{:05} {} {:.0} {} {} {}\n",
            t.norad_cat_id,
            t.uuid,
            t.success_rate * 100.0,
            t.good_count,
            t.data_count,
            t.mode
        ));
    }
    fs::write(path, content)?;
    Ok(())
}
