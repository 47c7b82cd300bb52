mod azimuth;
mod duration;
mod separation;

pub use azimuth::{constrain_to_azimuth_window, AzimuthWindow};
pub use duration::constrain_to_max_duration;
pub use separation::{constrain_to_angular_separation, PointingConstraint};

use chrono::{DateTime, Duration, Utc};

/// Sweep granularity used when trimming a pass edge into the azimuth window.
pub const DEFAULT_AZIMUTH_SWEEP_STEP_SECONDS: i64 = 1;
/// Trajectory samples taken by the closest-approach search.
pub const DEFAULT_SEPARATION_SAMPLES: usize = 127;

/// Everything one scheduling run constrains passes with. Immutable for the
/// duration of the run.
#[derive(Debug, Clone)]
pub struct ConstraintConfig {
    pub tmin: DateTime<Utc>,
    pub tmax: DateTime<Utc>,
    pub min_culmination_deg: f64,
    pub min_pass_duration: Duration,
    pub max_pass_duration: Option<Duration>,
    pub azimuth_window: AzimuthWindow,
    pub pointing: Option<PointingConstraint>,
    pub azimuth_sweep_step: Duration,
    pub separation_samples: usize,
}

impl ConstraintConfig {
    /// A configuration over the given horizon with every optional
    /// constraint disabled.
    pub fn new(tmin: DateTime<Utc>, tmax: DateTime<Utc>) -> Self {
        Self {
            tmin,
            tmax,
            min_culmination_deg: 0.0,
            min_pass_duration: Duration::zero(),
            max_pass_duration: None,
            azimuth_window: AzimuthWindow::FULL,
            pointing: None,
            azimuth_sweep_step: Duration::seconds(DEFAULT_AZIMUTH_SWEEP_STEP_SECONDS),
            separation_samples: DEFAULT_SEPARATION_SAMPLES,
        }
    }
}
