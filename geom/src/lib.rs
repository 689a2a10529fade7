//! Geometry primitives for road guidance: circular angle arithmetic in degrees, distances in
//! meters, and GPS coordinates with haversine distance and forward azimuth.

mod angle;
mod distance;
mod gps;

pub use crate::angle::{
    adjust_angle, angular_deviation, combine_angles, deviation_from_straight, STRAIGHT_ANGLE,
};
pub use crate::distance::Distance;
pub use crate::gps::LonLat;

// Reduce floating point precision, for serialization and reproducible results.
pub(crate) fn trim_f64(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
