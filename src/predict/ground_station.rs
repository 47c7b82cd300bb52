/// Observer location on the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy)]
pub struct GroundStation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl GroundStation {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self { latitude_deg, longitude_deg, altitude_m }
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    /// Station position in the Earth-fixed frame, in kilometers.
    pub fn position_ecef_km(&self) -> [f64; 3] {
        // WGS-84 semi-major axis and first eccentricity squared
        let a = 6378.137;
        let e2 = 0.00669437999014;

        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();

        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;

        [
            (n + alt_km) * lat.cos() * lon.cos(),
            (n + alt_km) * lat.cos() * lon.sin(),
            (n * (1.0 - e2) + alt_km) * sin_lat,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equator_prime_meridian_sits_on_the_x_axis() {
        let station = GroundStation::new(0.0, 0.0, 0.0);
        let pos = station.position_ecef_km();
        assert!((pos[0] - 6378.137).abs() < 1e-6);
        assert!(pos[1].abs() < 1e-6);
        assert!(pos[2].abs() < 1e-6);
    }

    #[test]
    fn altitude_moves_the_station_radially_outward() {
        let sea_level = GroundStation::new(53.834, 6.379, 0.0).position_ecef_km();
        let elevated = GroundStation::new(53.834, 6.379, 1000.0).position_ecef_km();

        let r0 = sea_level.iter().map(|c| c * c).sum::<f64>().sqrt();
        let r1 = elevated.iter().map(|c| c * c).sum::<f64>().sqrt();
        assert!((r1 - r0 - 1.0).abs() < 1e-3);
    }
}
