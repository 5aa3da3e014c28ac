use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub bookings_csv: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            bookings_csv: env::var("BOOKINGS_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("dash_hotel_bookings.csv")),
        }
    }
}
