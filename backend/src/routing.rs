use crate::error::RouteError;
use crate::gpx_export::encode_route_as_gpx;
use crate::great_circle::interpolate;
use crate::models::{GeoPoint, GreatCircleRequest, GreatCircleResponse, RouteMetadata};
use crate::region::{framing_region, path_bounds};

pub const EARTH_RADIUS_KM: f64 = 6_371.0;
pub const DEFAULT_MAX_STEPS: usize = 10_000;
pub const DEFAULT_FRAMING_MARGIN: f64 = 0.2;

/// Host-side limits applied before the interpolator runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteLimits {
    pub max_steps: usize,
    /// Fraction of the path's extent added around it when framing the map.
    pub framing_margin: f64,
}

impl Default for RouteLimits {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            framing_margin: DEFAULT_FRAMING_MARGIN,
        }
    }
}

/// Interpolate, measure, frame and export a great-circle route.
pub fn great_circle_route(
    req: &GreatCircleRequest,
    limits: &RouteLimits,
) -> Result<GreatCircleResponse, RouteError> {
    if req.steps > limits.max_steps {
        return Err(RouteError::TooManySteps {
            requested: req.steps,
            limit: limits.max_steps,
        });
    }

    let path = interpolate(req.start, req.end, req.steps)?;
    let distance_km = approximate_distance_km(&path);
    let central_angle_deg = central_angle_rad(req.start, req.end).to_degrees();
    let gpx_base64 = encode_route_as_gpx(&path, &format!("{} -> {}", req.start, req.end))?;
    let metadata = build_metadata(&path, limits.framing_margin);

    tracing::debug!(
        "great circle {} -> {}: {} points, {:.1} km",
        req.start,
        req.end,
        path.len(),
        distance_km
    );

    Ok(GreatCircleResponse {
        path,
        distance_km,
        central_angle_deg,
        gpx_base64,
        metadata,
    })
}

fn build_metadata(path: &[GeoPoint], margin: f64) -> Option<RouteMetadata> {
    Some(RouteMetadata {
        point_count: path.len(),
        bounds: path_bounds(path)?,
        region: framing_region(path, margin)?,
        start: *path.first()?,
        end: *path.last()?,
    })
}

pub fn approximate_distance_km(path: &[GeoPoint]) -> f64 {
    path.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}

/// Central angle between two points in radians, by the haversine formula.
pub fn central_angle_rad(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    // Rounding can push `h` a hair above 1 for antipodal points.
    2.0 * h.sqrt().min(1.0).asin()
}

pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    EARTH_RADIUS_KM * central_angle_rad(a, b)
}
