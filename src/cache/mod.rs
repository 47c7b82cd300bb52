use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use log::info;
use thiserror::Error;

use crate::catalog::{read_tles, read_transmitters, write_transmitters, CatalogError, Tle, Transmitter};
use crate::network::{Antenna, NetworkClient, NetworkError, SatelliteEntry, TransmitterEntry};

const LAST_UPDATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("network error: {0}")]
    Network(#[from] NetworkError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// On-disk cache of everything the planner needs from the network:
/// the satellite catalog, per-station receivable transmitters with their
/// statistics, and TLEs. Refreshed when older than `max_age_hours`.
pub struct CacheManager {
    ground_station_id: u32,
    antennas: Vec<Antenna>,
    cache_dir: PathBuf,
    max_age_hours: f64,
    /// Temporary catalog ids above this are never cached.
    max_norad_cat_id: u32,
}

impl CacheManager {
    pub fn new(
        ground_station_id: u32,
        antennas: Vec<Antenna>,
        cache_dir: PathBuf,
        max_age_hours: f64,
        max_norad_cat_id: u32,
    ) -> Result<Self, CacheError> {
        if !cache_dir.is_dir() {
            fs::create_dir_all(&cache_dir)?;
        }
        Ok(Self { ground_station_id, antennas, cache_dir, max_age_hours, max_norad_cat_id })
    }

    pub fn transmitters_file(&self) -> PathBuf {
        self.cache_dir.join(format!("transmitters_{}.txt", self.ground_station_id))
    }

    pub fn tles_file(&self) -> PathBuf {
        self.cache_dir.join(format!("tles_{}.json", self.ground_station_id))
    }

    pub fn satellites_file(&self) -> PathBuf {
        self.cache_dir.join("satellites.json")
    }

    pub fn transmitters_stats_file(&self) -> PathBuf {
        self.cache_dir.join("transmitters_stats.json")
    }

    fn last_update_file(&self) -> PathBuf {
        self.cache_dir.join(format!("last_update_{}.txt", self.ground_station_id))
    }

    /// When this station's cache was last refreshed, `None` for a cold cache.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        let line = fs::read_to_string(self.last_update_file()).ok()?;
        NaiveDateTime::parse_from_str(line.trim(), LAST_UPDATE_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn update_needed(&self) -> bool {
        let age_limit = Duration::seconds((self.max_age_hours * 3600.0) as i64);
        match self.last_update() {
            None => true,
            Some(last) if Utc::now() - last > age_limit => true,
            Some(_) => {
                !self.transmitters_file().is_file() || !self.tles_file().is_file()
            }
        }
    }

    /// Refresh the cache from the network if it is stale (or always, when
    /// `force` is set).
    pub fn update(&self, client: &NetworkClient, force: bool) -> Result<(), CacheError> {
        if !force && !self.update_needed() {
            return Ok(());
        }

        info!("Updating satellites, transmitters, transmitter statistics and TLEs");
        let refresh_time = Utc::now();

        let ids_of_interest = self.update_transmitters(client)?;
        self.update_tles(client, &ids_of_interest)?;

        fs::write(
            self.last_update_file(),
            format!("{}\n", refresh_time.format(LAST_UPDATE_FORMAT)),
        )?;
        Ok(())
    }

    /// Fetch the satellite catalog, transmitter statistics and receivable
    /// transmitters, and write the per-station transmitters file. Returns
    /// the NORAD ids worth fetching TLEs for.
    fn update_transmitters(&self, client: &NetworkClient) -> Result<Vec<u32>, CacheError> {
        let satellites = client.get_satellites()?;
        fs::write(self.satellites_file(), serde_json::to_string_pretty(&satellites)?)?;

        let alive: HashSet<u32> = satellites
            .iter()
            .filter(|entry| entry.is_alive())
            .filter_map(|entry| entry.norad_cat_id)
            .collect();

        info!("Fetching transmitter statistics...");
        let stats = client.get_transmitter_stats()?;
        fs::write(self.transmitters_stats_file(), serde_json::to_string_pretty(&stats)?)?;
        info!("Transmitter statistics received");

        // Active transmitters receivable by any of the station's antennas.
        let mut receivable: HashMap<String, TransmitterEntry> = HashMap::new();
        for antenna in &self.antennas {
            for transmitter in client.get_transmitters(antenna.frequency, antenna.frequency_max)? {
                receivable.insert(transmitter.uuid.clone(), transmitter);
            }
        }

        let mut ids_of_interest: Vec<u32> = receivable
            .values()
            .filter_map(|transmitter| transmitter.norad_cat_id)
            .filter(|id| *id < self.max_norad_cat_id && alive.contains(id))
            .collect::<HashSet<u32>>()
            .into_iter()
            .collect();
        ids_of_interest.sort_unstable();

        info!("Searching for interesting transmitters");
        let mut transmitters = Vec::new();
        for stat in &stats {
            let Some(entry) = receivable.get(&stat.uuid) else {
                continue;
            };
            let Some(norad_cat_id) = entry.norad_cat_id else {
                continue;
            };
            if !alive.contains(&norad_cat_id) {
                continue;
            }

            transmitters.push(Transmitter {
                norad_cat_id,
                uuid: stat.uuid.clone(),
                success_rate: stat.stats.success_rate / 100.0,
                good_count: stat.stats.good_count,
                data_count: stat.stats.total_count,
                // The mode field is whitespace-truncated in the cache file format.
                mode: entry
                    .mode
                    .as_deref()
                    .unwrap_or("-")
                    .split_whitespace()
                    .next()
                    .unwrap_or("-")
                    .to_string(),
            });
        }
        write_transmitters(&self.transmitters_file(), &transmitters)?;
        info!("Transmitter search finished, {} transmitters of interest", transmitters.len());

        Ok(ids_of_interest)
    }

    fn update_tles(&self, client: &NetworkClient, norad_cat_ids: &[u32]) -> Result<(), CacheError> {
        info!("Downloading TLEs from the database");
        let wanted: HashSet<u32> = norad_cat_ids.iter().copied().collect();
        let tles: Vec<Tle> = client
            .get_tles()?
            .into_iter()
            .filter(|tle| wanted.contains(&tle.norad_cat_id))
            .collect();

        fs::write(self.tles_file(), serde_json::to_string_pretty(&tles)?)?;
        info!("{} TLEs cached", tles.len());
        Ok(())
    }

    pub fn read_transmitters(&self) -> Result<Vec<Transmitter>, CatalogError> {
        read_transmitters(&self.transmitters_file())
    }

    pub fn read_tles(&self) -> Result<Vec<Tle>, CatalogError> {
        read_tles(&self.tles_file())
    }

    /// The cached satellite catalog, keyed by NORAD id.
    pub fn read_satellites(&self) -> Result<HashMap<u32, SatelliteEntry>, CacheError> {
        read_satellite_catalog(&self.satellites_file())
    }
}

fn read_satellite_catalog(path: &Path) -> Result<HashMap<u32, SatelliteEntry>, CacheError> {
    let content = fs::read_to_string(path)?;
    let entries: Vec<SatelliteEntry> = serde_json::from_str(&content)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| entry.norad_cat_id.map(|id| (id, entry)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(dir: &Path) -> CacheManager {
        CacheManager::new(40, Vec::new(), dir.to_path_buf(), 24.0, 90000).unwrap()
    }

    #[test]
    fn cold_cache_needs_an_update() {
        let dir = tempfile::tempdir().unwrap();
        let cache = manager(dir.path());
        assert!(cache.last_update().is_none());
        assert!(cache.update_needed());
    }

    #[test]
    fn fresh_stamp_with_files_needs_no_update() {
        let dir = tempfile::tempdir().unwrap();
        let cache = manager(dir.path());

        fs::write(
            dir.path().join("last_update_40.txt"),
            format!("{}\n", Utc::now().format(LAST_UPDATE_FORMAT)),
        )
        .unwrap();
        fs::write(cache.transmitters_file(), "").unwrap();
        fs::write(cache.tles_file(), "[]").unwrap();

        assert!(cache.last_update().is_some());
        assert!(!cache.update_needed());
    }

    #[test]
    fn stale_stamp_needs_an_update() {
        let dir = tempfile::tempdir().unwrap();
        let cache = manager(dir.path());

        let two_days_ago = Utc::now() - Duration::hours(48);
        fs::write(
            dir.path().join("last_update_40.txt"),
            format!("{}\n", two_days_ago.format(LAST_UPDATE_FORMAT)),
        )
        .unwrap();
        fs::write(cache.transmitters_file(), "").unwrap();
        fs::write(cache.tles_file(), "[]").unwrap();

        assert!(cache.update_needed());
    }

    #[test]
    fn missing_cache_files_force_an_update() {
        let dir = tempfile::tempdir().unwrap();
        let cache = manager(dir.path());

        fs::write(
            dir.path().join("last_update_40.txt"),
            format!("{}\n", Utc::now().format(LAST_UPDATE_FORMAT)),
        )
        .unwrap();

        assert!(cache.update_needed());
    }

    #[test]
    fn satellite_catalog_is_keyed_by_norad_id() {
        let dir = tempfile::tempdir().unwrap();
        let cache = manager(dir.path());
        fs::write(
            cache.satellites_file(),
            r#"[{"norad_cat_id": 25544, "name": "ISS", "status": "alive", "is_frequency_violator": false},
               {"norad_cat_id": null, "name": "UNKNOWN", "status": "dead", "is_frequency_violator": false}]"#,
        )
        .unwrap();

        let catalog = cache.read_satellites().unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog[&25544].is_alive());
    }
}
