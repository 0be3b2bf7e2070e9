use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use lifeos_core::calendar::WeekStart;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the Life OS backend
    pub api_url: String,
    /// Where session cookies are kept between invocations
    pub session_file: PathBuf,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Source recorded on captures made from the command line
    pub default_capture_source: String,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CalendarConfig {
    #[serde(default)]
    pub week_start: WeekStart,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            session_file: PathBuf::from(".lifeos-session.json"),
            log_level: "warn".to_string(),
            default_capture_source: "cli".to_string(),
            calendar: CalendarConfig::default(),
        }
    }
}

impl Config {
    /// Defaults, then `config.toml` in the working directory, then
    /// `LIFEOS_*` variables (`LIFEOS_CALENDAR__WEEK_START` for nested keys).
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("LIFEOS_").split("__"))
    }
}
