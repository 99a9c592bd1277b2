use std::sync::Arc;

use clap::Parser;
use routing::{DirectionsClient, OrsGeocoder, ProviderConfig};
use shared::Coordinate;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use viewer::{GrantedPermissions, HeadlessRenderer, MapSession, Msg, Services, StaticLocation};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Route from a fixed origin to a home address through the viewer core, without a map"
)]
struct Args {
    /// Origin latitude
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Origin longitude
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,

    /// Home address, either "lat,lon" or free text for the geocoder
    #[arg(long)]
    home: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "route_preview=info,viewer=debug,routing=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = ProviderConfig::from_env()?;
    let origin = Coordinate::new(args.lat, args.lon)?;
    tracing::info!("using provider {:?}", config);

    let services = Services {
        directions: Arc::new(DirectionsClient::new(config.clone())),
        geocoder: Arc::new(OrsGeocoder::new(config)),
        location: Arc::new(StaticLocation::new(origin)),
        permissions: Arc::new(GrantedPermissions),
    };
    let mut session = MapSession::new(services, HeadlessRenderer::default());

    session.dispatch(Msg::LocateRequested);
    session.settle().await;

    session.dispatch(Msg::AddressDialogOpened);
    session.dispatch(Msg::AddressDraftChanged(args.home));
    session.dispatch(Msg::AddressSubmitted);
    session.settle().await;

    session.dispatch(Msg::RouteRequested);
    session.settle().await;

    let state = session.state();
    if let Some(err) = &state.error {
        eprintln!("❌ {err}");
        return Err(err.clone().into());
    }

    match &state.route {
        Some(route) if !route.is_empty() => {
            println!("✅ {} points, {:.2} km", route.len(), route.length_km());
            if let Some(bounds) = route.bounds() {
                println!(
                    "   bounds [{:.4}↔{:.4}] lat / [{:.4}↔{:.4}] lon",
                    bounds.min_lat, bounds.max_lat, bounds.min_lon, bounds.max_lon
                );
            }
        }
        _ => println!("no route found between the points"),
    }
    let calls = session.renderer_mut().take_calls();
    println!(
        "   {} render calls over {} frames",
        calls.len(),
        session.renderer().frames()
    );

    Ok(())
}
