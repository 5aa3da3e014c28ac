use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use dash_hotel_hook::config::AppConfig;
use dash_hotel_hook::state::AppState;
use dash_hotel_hook::store::{BookingStore, CsvBookingStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let store = CsvBookingStore::open(&config.bookings_csv)?;
    tracing::info!(
        path = %store.path().display(),
        bookings = store.all().len(),
        "loaded bookings"
    );

    let store: Box<dyn BookingStore> = Box::new(store);
    let state = Arc::new(AppState {
        store: Mutex::new(store),
    });

    let app = dash_hotel_hook::app(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
