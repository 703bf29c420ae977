use std::f64::consts::PI;

use crate::models::{GeoPoint, MAX_LATITUDE};
use crate::routing::central_angle_rad;

/// Below this separation the endpoints are treated as the same point.
const COINCIDENT_EPSILON_RAD: f64 = 1e-12;
/// Chord length between `a` and the antipode of `b` under which the minor arc
/// is no longer unique. The haversine angle is too coarse this close to a half
/// turn, so the check runs on the unit vectors instead.
const ANTIPODAL_CHORD_EPSILON: f64 = 1e-6;
/// Largest step count accepted; the path holds one point more than this.
pub const MAX_STEPS: usize = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GreatCircleError {
    #[error("coordinate ({lat}, {lon}) is outside latitude [-90, 90] / longitude [-180, 180]")]
    InvalidCoordinate { lat: f64, lon: f64 },
    #[error("step count must be between 1 and {MAX_STEPS}, got {steps}")]
    InvalidStepCount { steps: usize },
}

type Vec3 = [f64; 3];

/// Interpolate the great-circle arc from `a` to `b` in `steps` equal angular
/// increments.
///
/// # Algorithm: spherical linear interpolation
///
/// Both endpoints are lifted to unit vectors and blended with the slerp
/// weights
/// ```text
/// A = sin((1 - f)·δ) / sin δ      B = sin(f·δ) / sin δ
/// ```
/// where `δ` is the haversine central angle and `f = i / steps`. Each blend is
/// projected back to latitude/longitude with `atan2`.
///
/// # Degenerate inputs
/// - Coincident endpoints yield copies of `a`, with `b` itself as the last
///   point (the same pole written with two longitudes, for instance).
/// - Antipodal endpoints have no unique minor arc. The arc leaving `a`
///   towards geographic north is used (along `a`'s meridian when `a` is a
///   pole), so the result is deterministic but arbitrary.
///
/// # Returns
/// - `Ok(path)`: `steps + 1` points, `path[0] == a` and `path[steps] == b`
/// - `Err(GreatCircleError)`: out-of-range coordinate, `steps == 0` or
///   `steps > MAX_STEPS`
pub fn interpolate(
    a: GeoPoint,
    b: GeoPoint,
    steps: usize,
) -> Result<Vec<GeoPoint>, GreatCircleError> {
    validate(a)?;
    validate(b)?;
    if steps == 0 || steps > MAX_STEPS {
        return Err(GreatCircleError::InvalidStepCount { steps });
    }

    let delta = central_angle_rad(a, b);
    let mut path = if delta < COINCIDENT_EPSILON_RAD {
        vec![a; steps + 1]
    } else {
        let arc = Arc::between(a, b, delta);
        (0..=steps)
            .map(|i| from_unit_vector(arc.point_at(i as f64 / steps as f64)))
            .collect()
    };

    // The blend reproduces the endpoints only up to rounding.
    path[0] = a;
    path[steps] = b;
    Ok(path)
}

fn validate(point: GeoPoint) -> Result<(), GreatCircleError> {
    if point.is_valid() {
        Ok(())
    } else {
        Err(GreatCircleError::InvalidCoordinate {
            lat: point.lat,
            lon: point.lon,
        })
    }
}

enum Arc {
    Minor {
        start: Vec3,
        end: Vec3,
        delta: f64,
        sin_delta: f64,
    },
    HalfTurn {
        start: Vec3,
        tangent: Vec3,
    },
}

impl Arc {
    fn between(a: GeoPoint, b: GeoPoint, delta: f64) -> Self {
        let start = to_unit_vector(a);
        let end = to_unit_vector(b);
        let [sx, sy, sz] = blend(start, 1.0, end, 1.0);
        if (sx * sx + sy * sy + sz * sz).sqrt() < ANTIPODAL_CHORD_EPSILON {
            tracing::debug!("antipodal endpoints {a} and {b}, routing via departure bearing north");
            Arc::HalfTurn {
                start,
                tangent: departure_tangent(a),
            }
        } else {
            Arc::Minor {
                start,
                end,
                delta,
                sin_delta: delta.sin(),
            }
        }
    }

    fn point_at(&self, f: f64) -> Vec3 {
        match *self {
            Arc::Minor {
                start,
                end,
                delta,
                sin_delta,
            } => {
                let weight_start = ((1.0 - f) * delta).sin() / sin_delta;
                let weight_end = (f * delta).sin() / sin_delta;
                blend(start, weight_start, end, weight_end)
            }
            Arc::HalfTurn { start, tangent } => {
                let angle = f * PI;
                blend(start, angle.cos(), tangent, angle.sin())
            }
        }
    }
}

/// Unit tangent at `point` pointing north, or down/up its own meridian at a pole.
fn departure_tangent(point: GeoPoint) -> Vec3 {
    let lat = point.lat.to_radians();
    let lon = point.lon.to_radians();
    if point.lat.abs() >= MAX_LATITUDE {
        [lon.cos(), lon.sin(), 0.0]
    } else {
        [-lat.sin() * lon.cos(), -lat.sin() * lon.sin(), lat.cos()]
    }
}

fn blend(u: Vec3, wu: f64, v: Vec3, wv: f64) -> Vec3 {
    [
        wu * u[0] + wv * v[0],
        wu * u[1] + wv * v[1],
        wu * u[2] + wv * v[2],
    ]
}

fn to_unit_vector(point: GeoPoint) -> Vec3 {
    let lat = point.lat.to_radians();
    let lon = point.lon.to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

fn from_unit_vector([x, y, z]: Vec3) -> GeoPoint {
    GeoPoint {
        lat: z.atan2(x.hypot(y)).to_degrees(),
        lon: y.atan2(x).to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEG_TOLERANCE: f64 = 1e-6;

    fn assert_point_eq(actual: GeoPoint, expected: GeoPoint) {
        assert!(
            (actual.lat - expected.lat).abs() < DEG_TOLERANCE
                && (actual.lon - expected.lon).abs() < DEG_TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_equator_quarter_turn() {
        let path = interpolate(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 90.0), 2).unwrap();
        assert_eq!(path.len(), 3);
        assert_point_eq(path[0], GeoPoint::new(0.0, 0.0));
        assert_point_eq(path[1], GeoPoint::new(0.0, 45.0));
        assert_point_eq(path[2], GeoPoint::new(0.0, 90.0));
    }

    #[test]
    fn test_pole_to_equator_follows_meridian() {
        let path = interpolate(GeoPoint::new(90.0, 0.0), GeoPoint::new(0.0, 0.0), 4).unwrap();
        let expected_lats = [90.0, 67.5, 45.0, 22.5, 0.0];
        assert_eq!(path.len(), expected_lats.len());
        for (point, lat) in path.iter().zip(expected_lats) {
            assert_point_eq(*point, GeoPoint::new(lat, 0.0));
        }
    }

    #[test]
    fn test_coincident_points_repeat_start() {
        let a = GeoPoint::new(48.8566, 2.3522);
        let path = interpolate(a, a, 10).unwrap();
        assert_eq!(path, vec![a; 11]);
    }

    #[test]
    fn test_same_pole_keeps_both_endpoints() {
        let a = GeoPoint::new(90.0, 0.0);
        let b = GeoPoint::new(90.0, 30.0);
        let path = interpolate(a, b, 4).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], a);
        assert_eq!(path[4], b);
        for point in &path[1..4] {
            assert_eq!(*point, a);
        }
    }

    #[test]
    fn test_nearly_coincident_points_end_on_end_point() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1e-14);
        let path = interpolate(a, b, 4).unwrap();
        assert_eq!(path[0], a);
        assert_eq!(path[4], b);
    }

    #[test]
    fn test_single_step_is_just_endpoints() {
        let a = GeoPoint::new(51.5074, -0.1278);
        let b = GeoPoint::new(40.7128, -74.006);
        assert_eq!(interpolate(a, b, 1).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_endpoints_are_exact() {
        let a = GeoPoint::new(-33.8688, 151.2093);
        let b = GeoPoint::new(34.0522, -118.2437);
        let path = interpolate(a, b, 100).unwrap();
        assert_eq!(path.len(), 101);
        assert_eq!(path[0], a);
        assert_eq!(path[100], b);
    }

    #[test]
    fn test_crossing_antimeridian_takes_short_way() {
        let path = interpolate(GeoPoint::new(0.0, 170.0), GeoPoint::new(0.0, -170.0), 2).unwrap();
        assert!(path[1].lat.abs() < DEG_TOLERANCE);
        assert!((path[1].lon.abs() - 180.0).abs() < DEG_TOLERANCE);
    }

    #[test]
    fn test_rejects_out_of_range_latitude() {
        let err = interpolate(GeoPoint::new(120.0, 0.0), GeoPoint::new(0.0, 0.0), 10).unwrap_err();
        assert_eq!(err, GreatCircleError::InvalidCoordinate { lat: 120.0, lon: 0.0 });
    }

    #[test]
    fn test_rejects_out_of_range_end_longitude() {
        let err = interpolate(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 200.0), 10).unwrap_err();
        assert!(matches!(err, GreatCircleError::InvalidCoordinate { .. }));
    }

    #[test]
    fn test_rejects_nan() {
        let err =
            interpolate(GeoPoint::new(f64::NAN, 0.0), GeoPoint::new(0.0, 0.0), 10).unwrap_err();
        assert!(matches!(err, GreatCircleError::InvalidCoordinate { .. }));
    }

    #[test]
    fn test_rejects_zero_steps() {
        let err = interpolate(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 90.0), 0).unwrap_err();
        assert_eq!(err, GreatCircleError::InvalidStepCount { steps: 0 });
    }

    #[test]
    fn test_rejects_step_count_above_bound() {
        let a = GeoPoint::new(0.0, 0.0);
        let err = interpolate(a, a, usize::MAX).unwrap_err();
        assert_eq!(err, GreatCircleError::InvalidStepCount { steps: usize::MAX });

        let err = interpolate(a, GeoPoint::new(0.0, 90.0), MAX_STEPS + 1).unwrap_err();
        assert_eq!(err, GreatCircleError::InvalidStepCount { steps: MAX_STEPS + 1 });
    }

    #[test]
    fn test_coordinate_checked_before_steps() {
        let err = interpolate(GeoPoint::new(-91.0, 0.0), GeoPoint::new(0.0, 0.0), 0).unwrap_err();
        assert!(matches!(err, GreatCircleError::InvalidCoordinate { .. }));
    }

    #[test]
    fn test_antipodal_heads_north() {
        let a = GeoPoint::new(10.0, 20.0);
        let b = GeoPoint::new(-10.0, -160.0);
        let path = interpolate(a, b, 2).unwrap();
        assert_eq!(path[0], a);
        assert_eq!(path[2], b);
        // A quarter turn north of (10, 20) lands past the pole on meridian -160.
        assert_point_eq(path[1], GeoPoint::new(80.0, -160.0));
    }

    #[test]
    fn test_antipodal_poles_follow_start_meridian() {
        let path = interpolate(GeoPoint::new(90.0, 30.0), GeoPoint::new(-90.0, 0.0), 2).unwrap();
        assert_point_eq(path[1], GeoPoint::new(0.0, 30.0));
    }

    #[test]
    fn test_antipodal_is_deterministic_and_on_a_great_circle() {
        let a = GeoPoint::new(-35.0, 45.0);
        let b = GeoPoint::new(35.0, -135.0);
        let first = interpolate(a, b, 16).unwrap();
        let second = interpolate(a, b, 16).unwrap();
        assert_eq!(first, second);
        for point in &first {
            let total = central_angle_rad(a, *point) + central_angle_rad(*point, b);
            assert!((total - PI).abs() < 1e-6);
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        const ANGLE_TOLERANCE: f64 = 1e-9;

        fn valid_point() -> impl Strategy<Value = GeoPoint> {
            (-90.0..=90.0, -180.0..=180.0).prop_map(|(lat, lon)| GeoPoint::new(lat, lon))
        }

        fn not_antipodal(a: GeoPoint, b: GeoPoint) -> bool {
            central_angle_rad(a, b) < PI - 1e-3
        }

        proptest! {
            #[test]
            fn prop_length_is_steps_plus_one(
                a in valid_point(),
                b in valid_point(),
                steps in 1usize..500
            ) {
                let path = interpolate(a, b, steps).unwrap();
                prop_assert_eq!(path.len(), steps + 1);
            }

            #[test]
            fn prop_endpoint_fidelity(
                a in valid_point(),
                b in valid_point(),
                steps in 1usize..200
            ) {
                let path = interpolate(a, b, steps).unwrap();
                prop_assert_eq!(path[0], a);
                prop_assert!(central_angle_rad(path[steps], b) < ANGLE_TOLERANCE);
            }

            #[test]
            fn prop_points_are_valid(a in valid_point(), b in valid_point(), steps in 1usize..100) {
                for point in interpolate(a, b, steps).unwrap() {
                    prop_assert!(point.is_valid(), "{} out of range", point);
                }
            }

            #[test]
            fn prop_monotonic_progress(
                a in valid_point(),
                b in valid_point(),
                steps in 1usize..100
            ) {
                prop_assume!(not_antipodal(a, b));
                let path = interpolate(a, b, steps).unwrap();
                for pair in path.windows(2) {
                    let (from_a_prev, from_a_next) =
                        (central_angle_rad(a, pair[0]), central_angle_rad(a, pair[1]));
                    let (to_b_prev, to_b_next) =
                        (central_angle_rad(pair[0], b), central_angle_rad(pair[1], b));
                    prop_assert!(from_a_next + 1e-9 >= from_a_prev);
                    prop_assert!(to_b_next <= to_b_prev + 1e-9);
                }
            }

            #[test]
            fn prop_points_lie_on_minor_arc(
                a in valid_point(),
                b in valid_point(),
                steps in 1usize..100
            ) {
                prop_assume!(not_antipodal(a, b));
                let total = central_angle_rad(a, b);
                for point in interpolate(a, b, steps).unwrap() {
                    let via = central_angle_rad(a, point) + central_angle_rad(point, b);
                    prop_assert!((via - total).abs() < 1e-6, "detour of {} rad", via - total);
                }
            }

            #[test]
            fn prop_reverse_is_symmetric(
                a in valid_point(),
                b in valid_point(),
                steps in 1usize..100
            ) {
                prop_assume!(not_antipodal(a, b));
                let forward = interpolate(a, b, steps).unwrap();
                let mut backward = interpolate(b, a, steps).unwrap();
                backward.reverse();
                for (p, q) in forward.iter().zip(&backward) {
                    // Coincident inputs repeat the start point, so compare only when distinct.
                    if central_angle_rad(a, b) >= COINCIDENT_EPSILON_RAD {
                        prop_assert!(central_angle_rad(*p, *q) < ANGLE_TOLERANCE);
                    }
                }
            }
        }
    }
}
