use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};

use crate::error::RouteError;
use crate::models::GeoPoint;

const CREATOR: &str = "great_circle_map";

/// Write `path` as a GPX 1.1 document with a single track named `name`.
pub fn write_route_gpx(
    path: &[GeoPoint],
    name: &str,
    writer: impl Write,
) -> Result<(), RouteError> {
    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some(CREATOR.into()),
        ..Default::default()
    };
    let mut track = Track {
        name: Some(name.into()),
        ..Default::default()
    };

    let mut segment = TrackSegment::new();
    segment.points.extend(path.iter().map(to_waypoint));
    track.segments.push(segment);
    gpx.tracks.push(track);

    gpx::write(&gpx, writer)?;
    Ok(())
}

pub fn encode_route_as_gpx(path: &[GeoPoint], name: &str) -> Result<String, RouteError> {
    let mut buffer = Vec::new();
    write_route_gpx(path, name, &mut buffer)?;
    Ok(BASE64.encode(buffer))
}

fn to_waypoint(point: &GeoPoint) -> Waypoint {
    Waypoint::new(Point::new(point.lon, point.lat))
}
