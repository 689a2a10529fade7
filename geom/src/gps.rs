use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Distance;

// longitude is x, latitude is y
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> LonLat {
        LonLat {
            longitude: lon,
            latitude: lat,
        }
    }

    pub fn gps_dist_meters(&self, other: LonLat) -> Distance {
        // Haversine distance
        let earth_radius_m = 6_371_000.0;
        let lon1 = self.longitude.to_radians();
        let lon2 = other.longitude.to_radians();
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let delta_lat = lat2 - lat1;
        let delta_lon = lon2 - lon1;

        let a = (delta_lat / 2.0).sin().powi(2)
            + (delta_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        Distance::meters(earth_radius_m * c)
    }

    /// The initial compass bearing walking the great circle from `self` towards `other`, in
    /// degrees in `[0, 360)`. 0 is north, 90 east.
    pub fn forward_azimuth(&self, other: LonLat) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let y = delta_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
        let degrees = y.atan2(x).to_degrees();
        (degrees + 360.0) % 360.0
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LonLat({0}, {1})", self.longitude, self.latitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn azimuth_cardinal_directions() {
        let origin = LonLat::new(0.0, 0.0);
        assert_eq!(origin.forward_azimuth(LonLat::new(0.0, 0.001)), 0.0);
        assert!((origin.forward_azimuth(LonLat::new(0.001, 0.0)) - 90.0).abs() < 1e-6);
        assert!((origin.forward_azimuth(LonLat::new(0.0, -0.001)) - 180.0).abs() < 1e-6);
        assert!((origin.forward_azimuth(LonLat::new(-0.001, 0.0)) - 270.0).abs() < 1e-6);
    }

    #[test]
    fn haversine_sanity() {
        let a = LonLat::new(0.0, 0.0);
        let b = LonLat::new(0.0, 0.0001);
        let d = a.gps_dist_meters(b).inner_meters();
        // One ten-thousandth of a degree of latitude is roughly 11 meters
        assert!(d > 10.0 && d < 12.0, "got {}", d);
    }
}
