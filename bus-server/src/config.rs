//! Process configuration from the environment.

use std::path::PathBuf;

use crate::feed::{DEFAULT_FEED_TIMEOUT_SECS, DEFAULT_FEED_URL, FeedConfig};

/// Default listen port.
const DEFAULT_PORT: u16 = 3000;

/// Default location of the static GTFS tables.
const DEFAULT_GTFS_STATIC_DIR: &str = "GTFS_static";

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to listen on (`PORT`)
    pub port: u16,

    /// Real-time feed URL (`FEED_URL`)
    pub feed_url: String,

    /// Feed request timeout in seconds (`FEED_TIMEOUT_SECS`)
    pub feed_timeout_secs: u64,

    /// Serve this local file instead of fetching the feed (`FEED_FILE`)
    pub feed_file: Option<PathBuf>,

    /// Directory holding `stops.txt`, `routes.txt`, ... (`GTFS_STATIC_DIR`)
    pub gtfs_static_dir: PathBuf,

    /// Stop used when a request does not name one (`DEFAULT_STOP`)
    pub default_stop: Option<String>,

    /// Line prefix used when a request does not give one
    /// (`DEFAULT_LINE_PREFIX`)
    pub default_line_prefix: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            feed_url: DEFAULT_FEED_URL.to_string(),
            feed_timeout_secs: DEFAULT_FEED_TIMEOUT_SECS,
            feed_file: None,
            gtfs_static_dir: PathBuf::from(DEFAULT_GTFS_STATIC_DIR),
            default_stop: None,
            default_line_prefix: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Unset and empty variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            port: parse_var("PORT", get("PORT"), defaults.port)?,
            feed_url: get("FEED_URL").unwrap_or(defaults.feed_url),
            feed_timeout_secs: nonzero(
                "FEED_TIMEOUT_SECS",
                parse_var(
                    "FEED_TIMEOUT_SECS",
                    get("FEED_TIMEOUT_SECS"),
                    defaults.feed_timeout_secs,
                )?,
            )?,
            feed_file: get("FEED_FILE").map(PathBuf::from),
            gtfs_static_dir: get("GTFS_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.gtfs_static_dir),
            default_stop: get("DEFAULT_STOP"),
            default_line_prefix: get("DEFAULT_LINE_PREFIX"),
        })
    }

    /// Feed client settings derived from this config.
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig::new(&self.feed_url).with_timeout(self.feed_timeout_secs)
    }
}

fn parse_var<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

/// Reject a zero value.
fn nonzero(name: &'static str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.port, 3000);
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.feed_timeout_secs, 10);
        assert_eq!(config.gtfs_static_dir, PathBuf::from("GTFS_static"));
        assert_eq!(config.feed_file, None);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("PORT", "8080"),
            ("FEED_URL", "http://localhost/trips.bin"),
            ("FEED_TIMEOUT_SECS", " 3 "),
            ("FEED_FILE", "/tmp/trips.bin"),
            ("GTFS_STATIC_DIR", "/data/gtfs"),
            ("DEFAULT_STOP", "000108"),
            ("DEFAULT_LINE_PREFIX", "L95."),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.feed_url, "http://localhost/trips.bin");
        assert_eq!(config.feed_timeout_secs, 3);
        assert_eq!(config.feed_file, Some(PathBuf::from("/tmp/trips.bin")));
        assert_eq!(config.gtfs_static_dir, PathBuf::from("/data/gtfs"));
        assert_eq!(config.default_stop.as_deref(), Some("000108"));
        assert_eq!(config.default_line_prefix.as_deref(), Some("L95."));
    }

    #[test]
    fn empty_values_use_defaults() {
        let config = config(&[("PORT", ""), ("DEFAULT_STOP", "  ")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_stop, None);
    }

    #[test]
    fn invalid_port() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        let ConfigError::Invalid { name, value, .. } = &err;
        assert_eq!(*name, "PORT");
        assert_eq!(value, "eighty");
        assert!(err.to_string().starts_with("invalid value for PORT: \"eighty\""));
    }

    #[test]
    fn port_out_of_range() {
        assert!(config(&[("PORT", "70000")]).is_err());
    }

    #[test]
    fn env_example_parses() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env.example");
        let vars: HashMap<String, String> = dotenvy::from_path_iter(path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        let config = AppConfig::from_lookup(|name| vars.get(name).cloned()).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.feed_file, None);
        assert_eq!(config.default_stop.as_deref(), Some("000108"));
        assert_eq!(config.default_line_prefix.as_deref(), Some("L95."));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = config(&[("FEED_TIMEOUT_SECS", "0")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "FEED_TIMEOUT_SECS",
                value: "0".into(),
                reason: "must be greater than zero".into(),
            }
        );
    }

    #[test]
    fn default_timeout_matches_feed_client() {
        assert_eq!(
            AppConfig::default().feed_config().timeout_secs,
            FeedConfig::default().timeout_secs
        );
    }

    #[test]
    fn feed_config_uses_url_and_timeout() {
        let config = config(&[("FEED_URL", "http://x/y.bin"), ("FEED_TIMEOUT_SECS", "4")]).unwrap();
        let feed = config.feed_config();
        assert_eq!(feed.url, "http://x/y.bin");
        assert_eq!(feed.timeout_secs, 4);
    }
}
