pub use shared::{
    ApiError, GeoPoint, GreatCircleRequest, GreatCircleResponse, MAX_LATITUDE, MAX_LONGITUDE,
    MapRegion, RouteBounds, RouteMetadata, default_steps,
};
