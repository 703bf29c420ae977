use crate::models::{GeoPoint, MAX_LATITUDE, MAX_LONGITUDE, MapRegion, RouteBounds};

/// Smallest span a framing region is given, so a single-point route still
/// produces a usable viewport.
const MIN_SPAN_DEG: f64 = 0.05;

/// Bounding box of every point on the path.
///
/// Longitudes are unwrapped along the path, so a route crossing the
/// antimeridian keeps a contiguous box: `min_lon` is normalised into
/// [-180, 180) and `max_lon` may then exceed 180.
pub fn path_bounds(path: &[GeoPoint]) -> Option<RouteBounds> {
    let first = path.first()?;
    let mut lon = first.lon;
    let mut bounds = RouteBounds {
        min_lat: first.lat,
        max_lat: first.lat,
        min_lon: lon,
        max_lon: lon,
    };

    for point in &path[1..] {
        // Nearest copy of this meridian to the previous unwrapped longitude.
        lon = point.lon + 360.0 * ((lon - point.lon) / 360.0).round();
        bounds.min_lat = bounds.min_lat.min(point.lat);
        bounds.max_lat = bounds.max_lat.max(point.lat);
        bounds.min_lon = bounds.min_lon.min(lon);
        bounds.max_lon = bounds.max_lon.max(lon);
    }

    let shift = 360.0 * ((bounds.min_lon + MAX_LONGITUDE) / 360.0).floor();
    bounds.min_lon -= shift;
    bounds.max_lon -= shift;
    Some(bounds)
}

/// Map viewport centred on the path's bounding box, padded by `margin`.
pub fn framing_region(path: &[GeoPoint], margin: f64) -> Option<MapRegion> {
    let bounds = path_bounds(path)?;
    let scale = 1.0 + margin.max(0.0);

    let lat_span_deg =
        ((bounds.max_lat - bounds.min_lat) * scale).clamp(MIN_SPAN_DEG, 2.0 * MAX_LATITUDE);
    let lon_span_deg =
        ((bounds.max_lon - bounds.min_lon) * scale).clamp(MIN_SPAN_DEG, 2.0 * MAX_LONGITUDE);

    Some(MapRegion {
        center: GeoPoint {
            lat: (bounds.min_lat + bounds.max_lat) / 2.0,
            lon: wrap_longitude((bounds.min_lon + bounds.max_lon) / 2.0),
        },
        lat_span_deg,
        lon_span_deg,
    })
}

/// Bring an angle in degrees into [-180, 180).
fn wrap_longitude(deg: f64) -> f64 {
    (deg + MAX_LONGITUDE).rem_euclid(360.0) - MAX_LONGITUDE
}
