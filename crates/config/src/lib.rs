use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::Context;

pub static CONFIG: LazyLock<Config> =
    LazyLock::new(|| Config::from_env().expect("Failed to create config"));

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Riot API key sent in the `X-Riot-Token` header
    pub riot_api_key: String,

    /// Platform routing value (e.g. "KR", "NA1")
    pub platform: String,

    /// Base directory for persisted collection state
    pub save_file_root: PathBuf,

    /// Timezone offset in hours used for date-window resolution
    pub timezone_offset_hours: f64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `RIOT_API_KEY`: API key for the Riot developer portal
    ///
    /// Optional environment variables:
    /// - `RIOT_PLATFORM`: platform routing value (default: `KR`)
    /// - `SAVE_FILE_ROOT`: base directory for collection state (default: `save_files`)
    /// - `TIMEZONE_OFFSET_HOURS`: offset for local-midnight window bounds (default: `9`)
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or malformed.
    fn from_env() -> anyhow::Result<Self> {
        // Load .env file
        dotenvy::dotenv().ok();

        let riot_api_key =
            std::env::var("RIOT_API_KEY").context("RIOT_API_KEY environment variable not set")?;

        let platform = std::env::var("RIOT_PLATFORM").unwrap_or_else(|_| "KR".to_owned());

        let save_file_root = std::env::var("SAVE_FILE_ROOT")
            .map_or_else(|_| PathBuf::from("save_files"), PathBuf::from);

        let timezone_offset_hours = match std::env::var("TIMEZONE_OFFSET_HOURS") {
            Ok(raw) => raw
                .parse::<f64>()
                .context("TIMEZONE_OFFSET_HOURS is not a number")?,
            Err(_) => 9.0,
        };

        Ok(Self {
            riot_api_key,
            platform,
            save_file_root,
            timezone_offset_hours,
        })
    }
}
