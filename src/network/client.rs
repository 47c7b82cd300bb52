use chrono::{DateTime, Utc};
use log::{debug, error, info};
use reqwest::header::AUTHORIZATION;

use crate::catalog::{Tle, Transmitter};
use crate::network::error::NetworkError;
use crate::network::types::{
    ObservationEntry, ObservationRequest, SatelliteEntry, StationInfo, TransmitterEntry,
    TransmitterStats,
};
use crate::predict::{PassCandidate, SatelliteRef};

const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Blocking client for the satellite database and network APIs.
pub struct NetworkClient {
    http: reqwest::blocking::Client,
    db_base_url: String,
    network_base_url: String,
    /// Network token, needed to commit observations.
    api_token: Option<String>,
    /// Database token, needed to download TLEs.
    db_api_token: Option<String>,
}

impl NetworkClient {
    pub fn new(
        db_base_url: &str,
        network_base_url: &str,
        api_token: Option<String>,
        db_api_token: Option<String>,
    ) -> Result<Self, NetworkError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            http,
            db_base_url: db_base_url.trim_end_matches('/').to_string(),
            network_base_url: network_base_url.trim_end_matches('/').to_string(),
            api_token,
            db_api_token,
        })
    }

    /// Fetch every page of a paginated endpoint, following `Link:
    /// rel="next"` headers. An optional stop criterion over each fetched
    /// page ends the walk early (the page itself is still kept).
    fn get_paginated(
        &self,
        url: &str,
        token: Option<&str>,
        mut stop: Option<&mut dyn FnMut(&[serde_json::Value]) -> bool>,
    ) -> Result<Vec<serde_json::Value>, NetworkError> {
        let mut entries = Vec::new();
        let mut next = Some(url.to_string());

        while let Some(url) = next {
            let mut request = self.http.get(&url);
            if let Some(token) = token {
                request = request.header(AUTHORIZATION, format!("Token {}", token));
            }

            let response = request.send()?;
            let status = response.status();
            if !status.is_success() {
                return Err(NetworkError::Api {
                    url,
                    status: status.as_u16(),
                    body: response.text().unwrap_or_default(),
                });
            }

            next = response
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|header| header.to_str().ok())
                .and_then(parse_next_link);

            let page: Vec<serde_json::Value> = response.json()?;
            let done = match stop.as_mut() {
                Some(stop) => stop(&page),
                None => false,
            };

            entries.extend(page);
            if done {
                break;
            }
        }

        Ok(entries)
    }

    fn get_typed<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        token: Option<&str>,
    ) -> Result<Vec<T>, NetworkError> {
        let entries = self.get_paginated(url, token, None)?;
        Ok(serde_json::from_value(serde_json::Value::Array(entries))?)
    }

    /// The whole satellite catalog.
    pub fn get_satellites(&self) -> Result<Vec<SatelliteEntry>, NetworkError> {
        self.get_typed(&format!("{}/api/satellites", self.db_base_url), None)
    }

    /// Active transmitters with a downlink inside `(fmin, fmax]` Hz.
    pub fn get_transmitters(
        &self,
        fmin: u64,
        fmax: u64,
    ) -> Result<Vec<TransmitterEntry>, NetworkError> {
        let transmitters: Vec<TransmitterEntry> =
            self.get_typed(&format!("{}/api/transmitters", self.db_base_url), None)?;

        Ok(transmitters
            .into_iter()
            .filter(|t| t.status == "active")
            .filter(|t| t.norad_cat_id.is_some())
            .filter(|t| matches!(t.downlink_low, Some(downlink) if downlink > fmin && downlink <= fmax))
            .collect())
    }

    /// Observation statistics for all transmitters. Many pages; cache wisely.
    pub fn get_transmitter_stats(&self) -> Result<Vec<TransmitterStats>, NetworkError> {
        self.get_typed(&format!("{}/api/transmitters/", self.network_base_url), None)
    }

    /// Latest TLEs from the database. Requires the database API token.
    pub fn get_tles(&self) -> Result<Vec<Tle>, NetworkError> {
        let token = self
            .db_api_token
            .as_deref()
            .ok_or(NetworkError::MissingToken("downloading TLEs"))?;
        self.get_typed(&format!("{}/api/tle/", self.db_base_url), Some(token))
    }

    /// Scheduled observations of a station intersecting `(tmin, tmax)`,
    /// returned as reservations.
    ///
    /// The endpoint yields the most recent observations first, so the walk
    /// stops once a page ends entirely before `tmin`.
    pub fn get_scheduled_passes(
        &self,
        ground_station: u32,
        tmin: DateTime<Utc>,
        tmax: DateTime<Utc>,
    ) -> Result<Vec<PassCandidate>, NetworkError> {
        info!("Requesting scheduled passes for ground station {}", ground_station);

        let url = format!(
            "{}/api/observations/?ground_station={}",
            self.network_base_url, ground_station
        );

        let mut past_horizon = |page: &[serde_json::Value]| {
            page.last()
                .and_then(|entry| serde_json::from_value::<ObservationEntry>(entry.clone()).ok())
                .map(|observation| observation.end < tmin)
                .unwrap_or(false)
        };

        let entries = self.get_paginated(&url, None, Some(&mut past_horizon))?;
        let observations: Vec<ObservationEntry> =
            serde_json::from_value(serde_json::Value::Array(entries))?;

        let reservations = observations
            .into_iter()
            .filter(|observation| observation.end > tmin && observation.start < tmax)
            .map(reservation_from_observation)
            .collect();

        info!("Scheduled passes for ground station {} retrieved", ground_station);
        Ok(reservations)
    }

    /// Ground station record, `None` when the station does not exist.
    pub fn get_station_info(&self, ground_station: u32) -> Result<Option<StationInfo>, NetworkError> {
        let stations: Vec<StationInfo> = self.get_typed(
            &format!("{}/api/stations/?id={}", self.network_base_url, ground_station),
            None,
        )?;
        Ok(stations.into_iter().find(|s| s.id == ground_station))
    }

    /// Commit new observations: one batched POST, falling back to per-item
    /// submission when the batch is refused so one bad request cannot sink
    /// the rest.
    pub fn schedule_observations(
        &self,
        observations: &[ObservationRequest],
    ) -> Result<(), NetworkError> {
        if observations.is_empty() {
            return Ok(());
        }

        let batch: Vec<serde_json::Value> = observations.iter().map(|o| o.payload()).collect();
        match self.post_observations(&batch) {
            Ok(()) => {
                debug!("Scheduled {} passes", observations.len());
                Ok(())
            }
            Err(e) => {
                error!(
                    "Failed to batch schedule due to an error in one of the requested jobs, \
                     reason: {}. Falling back to single-pass scheduling.",
                    scheduling_failure_reason(&e)
                );
                for observation in observations {
                    match self.post_observations(&[observation.payload()]) {
                        Ok(()) => info!(
                            "Scheduled pass at {}",
                            observation.start.format("%Y-%m-%dT%H:%M:%S")
                        ),
                        Err(e) => error!(
                            "Failed to schedule pass at {}, {}",
                            observation.start.format("%Y-%m-%dT%H:%M:%S"),
                            scheduling_failure_reason(&e)
                        ),
                    }
                }
                Ok(())
            }
        }
    }

    fn post_observations(&self, payload: &[serde_json::Value]) -> Result<(), NetworkError> {
        let token = self
            .api_token
            .as_deref()
            .ok_or(NetworkError::MissingToken("scheduling observations"))?;

        let url = format!("{}/api/observations/", self.network_base_url);
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Token {}", token))
            .json(payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Api {
                url,
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(())
    }
}

/// Whether scheduling on this station is possible right now.
pub fn check_station_availability(station: &StationInfo, allow_testing: bool) -> bool {
    if station.status == "Online" || (station.status == "Testing" && allow_testing) {
        return true;
    }

    if station.status == "Testing" {
        info!(
            "Ground station {} is in testing mode but scheduling on testing stations \
             is not allowed. Pass --allow-testing to enable it.",
            station.id
        );
    } else {
        info!(
            "Ground station {} neither in 'Online' nor in 'Testing' mode, can't schedule!",
            station.id
        );
    }
    false
}

fn reservation_from_observation(observation: ObservationEntry) -> PassCandidate {
    let midpoint = observation.start + (observation.end - observation.start) / 2;

    PassCandidate {
        satellite: SatelliteRef { norad_id: observation.norad_cat_id, name: String::new() },
        transmitter: Transmitter {
            norad_cat_id: observation.norad_cat_id,
            uuid: observation.transmitter.unwrap_or_default(),
            success_rate: 0.0,
            good_count: 0,
            data_count: 0,
            mode: String::new(),
        },
        rise_time: observation.start,
        rise_azimuth_deg: 0.0,
        transit_time: midpoint,
        transit_elevation_deg: observation.max_altitude.unwrap_or(0.0),
        set_time: observation.end,
        set_azimuth_deg: 0.0,
        priority: Some(1.0),
        scheduled: true,
    }
}

/// Human-readable reason a scheduling POST was refused. Permission errors
/// are recognized from the response body.
fn scheduling_failure_reason(error: &NetworkError) -> String {
    if let NetworkError::Api { body, .. } = error {
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) {
            let permission_denied = parsed
                .get("non_field_errors")
                .and_then(|errors| errors.get(0))
                .and_then(|message| message.as_str())
                .map(|message| message.starts_with("No permission to schedule observations"))
                .unwrap_or(false);
            if permission_denied {
                return "permission error".to_string();
            }
            return format!("reason provided by the server: {}", parsed);
        }
    }
    error.to_string()
}

/// Target of the `rel="next"` entry of an RFC 5988 `Link` header.
fn parse_next_link(header: &str) -> Option<String> {
    for part in header.split(',') {
        let mut pieces = part.split(';').map(str::trim);
        let target = pieces.next().unwrap_or("");
        if pieces.any(|attribute| attribute == "rel=\"next\"") {
            return Some(target.trim_start_matches('<').trim_end_matches('>').to_string());
        }
    }
    None
}
