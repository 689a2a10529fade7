//! Turn angles and compass bearings are plain `f64` degrees in `[0, 360)`. By convention a turn
//! angle of 0 is the back-bearing (reversing onto the road just traveled) and 180 is continuing
//! straight; angles below 180 lie to the right of straight, angles above 180 to the left.
//!
//! All comparisons between angles must go through these helpers. Raw subtraction breaks at the
//! 0/360 boundary.

/// The turn angle of continuing straight through an intersection.
pub const STRAIGHT_ANGLE: f64 = 180.0;

/// The smallest absolute circular distance between two angles, in `[0, 180]`.
pub fn angular_deviation(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    diff.min(360.0 - diff)
}

/// How far an angle deviates from continuing straight, in `[0, 180]`.
pub fn deviation_from_straight(angle: f64) -> f64 {
    angular_deviation(angle, STRAIGHT_ANGLE)
}

/// The circular midpoint of two angles in `[0, 360)`.
///
/// A plain arithmetic mean is wrong when the two angles straddle the 0/360 boundary; the mean of
/// 350 and 10 is 0, not 180.
pub fn combine_angles(first: f64, second: f64) -> f64 {
    let around_zero = (first.max(second) - first.min(second)) >= 180.0;
    if !around_zero {
        return 0.5 * (first + second);
    }
    let new_angle = first.max(second) + 0.5 * angular_deviation(first, second);
    if new_angle >= 360.0 {
        new_angle - 360.0
    } else {
        new_angle
    }
}

/// Adds an offset to an angle and wraps the result back into `[0, 360)`. The offset must be
/// bounded to less than a full turn.
pub fn adjust_angle(angle: f64, offset: f64) -> f64 {
    debug_assert!(offset.abs() < 360.0);
    let result = angle + offset;
    if result >= 360.0 {
        result - 360.0
    } else if result < 0.0 {
        result + 360.0
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deviation_is_wraparound_safe() {
        assert_eq!(angular_deviation(10.0, 350.0), 20.0);
        assert_eq!(angular_deviation(350.0, 10.0), 20.0);
        assert_eq!(angular_deviation(0.0, 180.0), 180.0);
        assert_eq!(angular_deviation(90.0, 90.0), 0.0);
        assert_eq!(angular_deviation(0.0, 359.0), 1.0);
    }

    #[test]
    fn combine_simple_mean() {
        assert_eq!(combine_angles(170.0, 190.0), 180.0);
        assert_eq!(combine_angles(10.0, 20.0), 15.0);
    }

    #[test]
    fn combine_across_north() {
        // Naive averaging would say 180
        assert_eq!(combine_angles(350.0, 10.0), 0.0);
        assert_eq!(combine_angles(10.0, 350.0), 0.0);
        assert_eq!(combine_angles(355.0, 5.0), 0.0);
        assert_eq!(combine_angles(340.0, 20.0), 0.0);
        // Not symmetric around north
        assert_eq!(combine_angles(300.0, 20.0), 340.0);
    }

    #[test]
    fn combine_stays_in_range() {
        for a in [0.0, 89.5, 180.0, 271.25, 359.9] {
            for b in [0.0, 45.0, 179.0, 359.0] {
                let mid = combine_angles(a, b);
                assert!((0.0..360.0).contains(&mid), "combine({}, {}) = {}", a, b, mid);
            }
        }
    }

    #[test]
    fn adjust_wraps_once() {
        assert_eq!(adjust_angle(350.0, 20.0), 10.0);
        assert_eq!(adjust_angle(10.0, -20.0), 350.0);
        assert_eq!(adjust_angle(180.0, 5.0), 185.0);
        assert_eq!(adjust_angle(0.0, 0.0), 0.0);
    }
}
