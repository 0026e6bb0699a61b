// src/config.rs
// Client configuration: sensible defaults, overridable from the environment
// (a local `.env` is loaded by the binary via dotenvy before this runs).

use std::env;
use std::str::FromStr;

use crate::image_norm::DEFAULT_MAX_DIM;
use crate::ranking::{DEFAULT_PRIORITY_THRESHOLD, DEFAULT_WINDOW_SIZE};

pub const ENV_API_URL: &str = "FIELDLINK_API_URL";
pub const ENV_GEOCODE_URL: &str = "FIELDLINK_GEOCODE_URL";
pub const ENV_PRIORITY_THRESHOLD: &str = "FIELDLINK_PRIORITY_THRESHOLD";
pub const ENV_WINDOW_SIZE: &str = "FIELDLINK_WINDOW_SIZE";
pub const ENV_MAX_IMAGE_DIM: &str = "FIELDLINK_MAX_IMAGE_DIM";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the ingestion service.
    pub api_url: String,
    /// Forward-geocoding search endpoint.
    pub geocode_url: String,
    /// Reports strictly above this score count as critical zones.
    pub priority_threshold: i32,
    /// Zones per ranked window.
    pub window_size: usize,
    /// Bound for the longer image axis before upload.
    pub max_image_dim: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            priority_threshold: DEFAULT_PRIORITY_THRESHOLD,
            window_size: DEFAULT_WINDOW_SIZE,
            max_image_dim: DEFAULT_MAX_DIM,
        }
    }
}

impl ClientConfig {
    /// Build from environment variables, falling back to defaults for unset
    /// or unparseable values, then sanitize out-of-range numbers.
    pub fn from_env() -> Self {
        let cfg = Self {
            api_url: env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            geocode_url: env::var(ENV_GEOCODE_URL)
                .unwrap_or_else(|_| DEFAULT_GEOCODE_URL.to_string()),
            priority_threshold: parse_or(ENV_PRIORITY_THRESHOLD, DEFAULT_PRIORITY_THRESHOLD),
            window_size: parse_or(ENV_WINDOW_SIZE, DEFAULT_WINDOW_SIZE),
            max_image_dim: parse_or(ENV_MAX_IMAGE_DIM, DEFAULT_MAX_DIM),
        };
        cfg.sanitized()
    }

    /// Clamp numeric fields into usable ranges. Scores live in [0, 100];
    /// a window or image bound of zero would make the pipeline degenerate.
    pub fn sanitized(mut self) -> Self {
        self.priority_threshold = self.priority_threshold.clamp(0, 100);
        self.window_size = self.window_size.max(1);
        self.max_image_dim = self.max_image_dim.max(16);
        self
    }
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_contract() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.priority_threshold, 60);
        assert_eq!(cfg.window_size, 3);
        assert_eq!(cfg.max_image_dim, 1024);
        assert_eq!(cfg.api_url, "http://localhost:8000");
    }

    #[test]
    fn sanitize_clamps_degenerate_values() {
        let cfg = ClientConfig {
            priority_threshold: 250,
            window_size: 0,
            max_image_dim: 0,
            ..ClientConfig::default()
        }
        .sanitized();
        assert_eq!(cfg.priority_threshold, 100);
        assert_eq!(cfg.window_size, 1);
        assert_eq!(cfg.max_image_dim, 16);

        let cfg = ClientConfig {
            priority_threshold: -5,
            ..ClientConfig::default()
        }
        .sanitized();
        assert_eq!(cfg.priority_threshold, 0);
    }
}
