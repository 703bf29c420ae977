use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use clap::{Parser, ValueEnum};
use great_circle_map::{
    gpx_export::write_route_gpx,
    models::{GeoPoint, GreatCircleRequest, GreatCircleResponse},
    routing::{DEFAULT_MAX_STEPS, RouteLimits, great_circle_route},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Full route response: path, distance, framing metadata
    Json,
    /// GPX 1.1 track
    Gpx,
    /// One `lat,lon` line per point
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Interpolate the great-circle route between two coordinates"
)]
struct Args {
    /// Latitude of the start point in degrees
    #[arg(long, allow_negative_numbers = true)]
    from_lat: f64,
    /// Longitude of the start point in degrees
    #[arg(long, allow_negative_numbers = true)]
    from_lon: f64,
    /// Latitude of the end point in degrees
    #[arg(long, allow_negative_numbers = true)]
    to_lat: f64,
    /// Longitude of the end point in degrees
    #[arg(long, allow_negative_numbers = true)]
    to_lon: f64,

    /// Number of segments; the path has one more point than this
    #[arg(long, default_value_t = great_circle_map::models::default_steps())]
    steps: usize,

    /// Refuse step counts above this
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let req = GreatCircleRequest {
        start: GeoPoint::new(args.from_lat, args.from_lon),
        end: GeoPoint::new(args.to_lat, args.to_lon),
        steps: args.steps,
    };
    tracing::info!("interpolating {} -> {} in {} steps", req.start, req.end, req.steps);

    let limits = RouteLimits {
        max_steps: args.max_steps,
        ..RouteLimits::default()
    };
    let response = great_circle_route(&req, &limits)?;
    tracing::info!(
        "{} points, {:.1} km, central angle {:.3}°",
        response.path.len(),
        response.distance_km,
        response.central_angle_deg
    );

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    write_route(args.format, &req, &response, &mut writer)?;
    writer.flush()?;

    if let Some(path) = &args.output {
        tracing::info!("route written to {}", path.display());
    }
    Ok(())
}

fn write_route(
    format: OutputFormat,
    req: &GreatCircleRequest,
    response: &GreatCircleResponse,
    mut writer: impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, response)?;
            writeln!(writer)?;
        }
        OutputFormat::Gpx => {
            let name = format!("{} -> {}", req.start, req.end);
            write_route_gpx(&response.path, &name, &mut writer)?;
        }
        OutputFormat::Csv => {
            writeln!(writer, "lat,lon")?;
            for point in &response.path {
                writeln!(writer, "{},{}", point.lat, point.lon)?;
            }
        }
    }
    Ok(())
}
