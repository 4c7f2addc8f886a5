//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Default car fuel economy used for CO₂ estimates (km per litre).
pub const DEFAULT_CAR_CONSUMPTION_KM_PER_L: f64 = 12.0;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Directory for rider snapshots; `None` keeps everything in memory
    pub data_dir: Option<PathBuf>,
    /// Fuel economy of the car a bike ride replaces (km/l)
    pub car_consumption_km_per_l: f64,

    // --- Secrets ---
    /// HS256 secret shared with the auth backend that issues session tokens
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:8081".to_string(),
            port: 8080,
            data_dir: None,
            car_consumption_km_per_l: DEFAULT_CAR_CONSUMPTION_KM_PER_L,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let car_consumption_km_per_l = match env::var("CAR_CONSUMPTION_KM_PER_L") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .ok_or(ConfigError::Invalid("CAR_CONSUMPTION_KM_PER_L"))?,
            Err(_) => DEFAULT_CAR_CONSUMPTION_KM_PER_L,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            data_dir: env::var("DATA_DIR")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            car_consumption_km_per_l,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
