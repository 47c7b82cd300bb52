use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;
use crate::predict::ground_station::GroundStation;
use crate::predict::types::SkyPosition;

/// Propagate the orbit to `timestamp` and return the satellite's azimuth and
/// elevation as seen from the station.
pub fn observe(
    station: &GroundStation,
    elements: &Elements,
    constants: &Constants,
    timestamp: DateTime<Utc>,
) -> Result<SkyPosition, PredictError> {
    let minutes = elements
        .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
        .map_err(|e| PredictError::Propagation(e.to_string()))?;

    let prediction = constants
        .propagate(minutes)
        .map_err(|e| PredictError::Propagation(e.to_string()))?;

    let sidereal =
        sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()));

    let sat_ecef = teme_to_ecef(prediction.position, sidereal);
    let sta_ecef = station.position_ecef_km();

    let dr = [
        sat_ecef[0] - sta_ecef[0],
        sat_ecef[1] - sta_ecef[1],
        sat_ecef[2] - sta_ecef[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

    let (east, north, up) = ecef_to_enu(dr, station.lat_rad(), station.lon_rad());
    let azimuth = east.atan2(north).to_degrees().rem_euclid(360.0);
    let elevation = if range_km > 0.0 {
        (up / range_km).asin().to_degrees()
    } else {
        0.0
    };

    Ok(SkyPosition { azimuth_deg: azimuth, elevation_deg: elevation })
}

fn teme_to_ecef(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enu_of_a_point_straight_up_is_all_up() {
        // Station at the equator/prime meridian, target further out along x.
        let (east, north, up) = ecef_to_enu([100.0, 0.0, 0.0], 0.0, 0.0);
        assert!(east.abs() < 1e-9);
        assert!(north.abs() < 1e-9);
        assert!((up - 100.0).abs() < 1e-9);
    }

    #[test]
    fn enu_of_a_point_due_north_is_all_north() {
        let (east, north, up) = ecef_to_enu([0.0, 0.0, 42.0], 0.0, 0.0);
        assert!(east.abs() < 1e-9);
        assert!((north - 42.0).abs() < 1e-9);
        assert!(up.abs() < 1e-9);
    }

    #[test]
    fn teme_to_ecef_rotates_about_the_pole() {
        let rotated = teme_to_ecef([1.0, 0.0, 5.0], std::f64::consts::FRAC_PI_2);
        assert!(rotated[0].abs() < 1e-9);
        assert!((rotated[1] + 1.0).abs() < 1e-9);
        assert!((rotated[2] - 5.0).abs() < 1e-9);
    }
}
