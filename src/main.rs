use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use log::{error, info, warn};
use thiserror::Error;

use pass_o_mat::cache::{CacheError, CacheManager};
use pass_o_mat::catalog::{read_priorities, select_satellites, CatalogError};
use pass_o_mat::config::{Config, ConfigError};
use pass_o_mat::constraint::{AzimuthWindow, ConstraintConfig, PointingConstraint};
use pass_o_mat::network::{
    check_station_availability, NetworkClient, NetworkError, ObservationRequest, StationInfo,
};
use pass_o_mat::predict::{find_constrained_passes, GroundStation, PassCandidate, Sgp4Propagator};
use pass_o_mat::scheduler::{
    classify, ordered_scheduler, print_schedule_summary, report_efficiency, sort_by_priority,
};

/// Lead time before the first schedulable pass, so the station has time to
/// pick the new observations up.
const SCHEDULING_LEAD_MINUTES: i64 = 5;

#[derive(Parser)]
#[command(name = "pass-o-mat")]
#[command(about = "Automatic observation scheduling for satellite ground stations")]
struct Cli {
    /// Station configuration file
    #[arg(short, long, default_value = "station.yaml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh the cached satellites, transmitters and TLEs
    Update {
        /// Refresh even if the cache is still fresh
        #[arg(long)]
        force: bool,
    },
    /// Plan observations over a time horizon
    Plan(PlanArgs),
}

#[derive(Args)]
struct PlanArgs {
    /// Schedule start (RFC 3339); defaults to now plus a short lead time
    #[arg(short = 't', long)]
    start: Option<DateTime<Utc>>,

    /// Schedule length
    #[arg(short = 'd', long, default_value = "24h", value_parser = parse_duration)]
    duration: Duration,

    /// Minimum culmination elevation in degrees
    #[arg(short = 'm', long, default_value_t = 10.0)]
    min_culmination: f64,

    /// Minimum pass duration
    #[arg(long, default_value = "3m", value_parser = parse_duration)]
    min_pass_duration: Duration,

    /// Maximum pass duration; longer passes are trimmed
    #[arg(long, value_parser = parse_duration)]
    max_pass_duration: Option<Duration>,

    /// Guard time between observations
    #[arg(short = 'w', long, default_value = "0s", value_parser = parse_duration)]
    guard_time: Duration,

    /// Start of the usable azimuth arc in degrees (clockwise to --azimuth-stop)
    #[arg(long, default_value_t = 0.0)]
    azimuth_start: f64,

    /// End of the usable azimuth arc in degrees
    #[arg(long, default_value_t = 360.0)]
    azimuth_stop: f64,

    /// Fixed pointing direction azimuth in degrees (with --max-separation)
    #[arg(long)]
    pointing_azimuth: Option<f64>,

    /// Fixed pointing direction elevation in degrees (with --max-separation)
    #[arg(long)]
    pointing_elevation: Option<f64>,

    /// Maximum angular separation from the pointing direction, in degrees
    #[arg(long)]
    max_separation: Option<f64>,

    /// Priorities file (lines of: norad id, priority, transmitter uuid)
    #[arg(short = 'f', long)]
    priorities: Option<PathBuf>,

    /// Schedule only priority satellites
    #[arg(short = 'p', long)]
    only_priority: bool,

    /// Minimum priority for a pass to be scheduled
    #[arg(short = 'P', long, default_value_t = 0.0)]
    min_priority: f64,

    /// Minimum transmitter success rate, in [0, 1]
    #[arg(long, default_value_t = 0.0)]
    min_success_rate: f64,

    /// Keep satellites flagged for frequency misuse
    #[arg(long)]
    keep_frequency_violators: bool,

    /// Commit the planned observations to the network
    #[arg(long)]
    commit: bool,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Network(#[from] NetworkError),
    #[error("{0}")]
    Cache(#[from] CacheError),
    #[error("{0}")]
    Catalog(#[from] CatalogError),
    #[error("ground station {0} not found")]
    StationNotFound(u32),
    #[error("ground station {0} is not available for scheduling")]
    StationUnavailable(u32),
    #[error("{0}")]
    InvalidArguments(String),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Update { force } => run_update(&cli.config, force),
        Commands::Plan(args) => run_plan(&cli.config, args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_update(config_path: &str, force: bool) -> Result<(), AppError> {
    let config = Config::from_file(config_path)?;
    let client = client_from_config(&config)?;
    let station = station_info(&client, config.station.id)?;

    let cache = CacheManager::new(
        config.station.id,
        station.antennas.clone(),
        config.cache.dir.clone(),
        config.cache.max_age_hours,
        config.cache.max_norad_cat_id,
    )?;
    cache.update(&client, force)?;
    Ok(())
}

fn run_plan(config_path: &str, args: PlanArgs) -> Result<(), AppError> {
    let config = Config::from_file(config_path)?;
    let client = client_from_config(&config)?;

    let station = station_info(&client, config.station.id)?;
    if !check_station_availability(&station, config.station.allow_testing) {
        return Err(AppError::StationUnavailable(config.station.id));
    }

    let tmin = args
        .start
        .unwrap_or_else(|| Utc::now() + Duration::minutes(SCHEDULING_LEAD_MINUTES));
    let tmax = tmin + args.duration;
    let constraints = constraints_from_args(&args, tmin, tmax)?;

    let cache = CacheManager::new(
        config.station.id,
        station.antennas.clone(),
        config.cache.dir.clone(),
        config.cache.max_age_hours,
        config.cache.max_norad_cat_id,
    )?;
    cache.update(&client, false)?;

    let transmitters = cache.read_transmitters()?;
    let tles = cache.read_tles()?;
    let catalog = cache.read_satellites()?;
    let satellites = select_satellites(
        &transmitters,
        &tles,
        &catalog,
        args.min_success_rate,
        args.keep_frequency_violators,
    );
    info!("Planning for {} satellite/transmitter combinations", satellites.len());

    let reservations = client.get_scheduled_passes(config.station.id, tmin, tmax)?;
    info!(
        "Found {} scheduled passes between {} and {} on ground station {}",
        reservations.len(),
        tmin.format("%Y-%m-%dT%H:%M:%S"),
        tmax.format("%Y-%m-%dT%H:%M:%S"),
        config.station.id
    );

    let ground_station = GroundStation::new(station.lat, station.lng, station.altitude);

    let mut candidates = Vec::new();
    for satellite in &satellites {
        match Sgp4Propagator::from_tle(ground_station, &satellite.tle) {
            Ok(propagator) => {
                candidates.extend(find_constrained_passes(satellite, &propagator, &constraints))
            }
            Err(e) => warn!("skipping {}: {}", satellite.name, e),
        }
    }
    let candidate_count = candidates.len();

    let (priorities, favorite_transmitters) = match &args.priorities {
        Some(path) => read_priorities(path),
        None => (HashMap::new(), HashMap::new()),
    };

    let (mut priority_passes, mut normal_passes) = classify(
        candidates,
        &priorities,
        &favorite_transmitters,
        args.only_priority,
        args.min_priority,
    );

    // High-value passes claim the calendar first; the normal bucket then
    // fills the gaps.
    sort_by_priority(&mut priority_passes);
    sort_by_priority(&mut normal_passes);
    let scheduled = ordered_scheduler(priority_passes, reservations, args.guard_time);
    let scheduled = ordered_scheduler(normal_passes, scheduled, args.guard_time);

    report_efficiency(&scheduled, candidate_count);
    print_schedule_summary(&scheduled, config.station.id);

    let requests = observation_requests(&scheduled, config.station.id);
    if args.commit {
        client.schedule_observations(&requests)?;
    } else {
        info!("{} new observations planned; pass --commit to schedule them", requests.len());
    }

    Ok(())
}

fn client_from_config(config: &Config) -> Result<NetworkClient, AppError> {
    Ok(NetworkClient::new(
        &config.network.db_base_url,
        &config.network.network_base_url,
        config.network.api_token.clone(),
        config.network.db_api_token.clone(),
    )?)
}

fn station_info(client: &NetworkClient, ground_station: u32) -> Result<StationInfo, AppError> {
    client
        .get_station_info(ground_station)?
        .ok_or(AppError::StationNotFound(ground_station))
}

fn constraints_from_args(
    args: &PlanArgs,
    tmin: DateTime<Utc>,
    tmax: DateTime<Utc>,
) -> Result<ConstraintConfig, AppError> {
    if tmax <= tmin {
        return Err(AppError::InvalidArguments("schedule duration must be positive".to_string()));
    }
    for azimuth in [args.azimuth_start, args.azimuth_stop] {
        if !(0.0..=360.0).contains(&azimuth) {
            return Err(AppError::InvalidArguments(format!(
                "azimuth {} outside [0, 360]",
                azimuth
            )));
        }
    }
    if let Some(max) = args.max_pass_duration {
        if max < args.min_pass_duration {
            return Err(AppError::InvalidArguments(
                "maximum pass duration is shorter than the minimum".to_string(),
            ));
        }
    }

    let pointing = match (args.pointing_azimuth, args.pointing_elevation, args.max_separation) {
        (Some(azimuth_deg), Some(elevation_deg), Some(max_separation_deg)) => {
            Some(PointingConstraint { azimuth_deg, elevation_deg, max_separation_deg })
        }
        (None, None, None) => None,
        _ => {
            return Err(AppError::InvalidArguments(
                "--pointing-azimuth, --pointing-elevation and --max-separation must be given together"
                    .to_string(),
            ))
        }
    };

    let mut constraints = ConstraintConfig::new(tmin, tmax);
    constraints.min_culmination_deg = args.min_culmination;
    constraints.min_pass_duration = args.min_pass_duration;
    constraints.max_pass_duration = args.max_pass_duration;
    constraints.azimuth_window = AzimuthWindow::new(args.azimuth_start, args.azimuth_stop);
    constraints.pointing = pointing;
    Ok(constraints)
}

/// One request per accepted, not yet scheduled pass, in rise-time order.
/// The list is one-to-one with the passes so a submission failure can be
/// traced back to its pass.
fn observation_requests(scheduled: &[PassCandidate], ground_station: u32) -> Vec<ObservationRequest> {
    let mut new_passes: Vec<&PassCandidate> =
        scheduled.iter().filter(|pass| !pass.scheduled).collect();
    new_passes.sort_by_key(|pass| pass.rise_time);

    new_passes
        .into_iter()
        .map(|pass| ObservationRequest {
            ground_station,
            norad_cat_id: pass.satellite.norad_id,
            transmitter_uuid: pass.transmitter.uuid.clone(),
            start: pass.rise_time,
            end: pass.set_time,
        })
        .collect()
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    humantime::parse_duration(value.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| Duration::from_std(d).map_err(|e| e.to_string()))
}
