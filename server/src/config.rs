//! Server configuration
//!
//! Configuration is loaded from environment variables. Only `PORT` matters for
//! a typical deployment; everything else has a sensible default.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Main server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,

    /// Static file configuration
    pub static_files: StaticFilesConfig,

    /// Whether `/health` and `/metrics/prometheus` are mounted
    pub ops_endpoints: bool,
}

/// Static file serving configuration
#[derive(Debug, Clone)]
pub struct StaticFilesConfig {
    /// Directory holding the prebuilt application
    pub dir: PathBuf,
    /// Entry document, relative to `dir`
    pub entry_document: String,
    /// Max-age advertised for content-hashed assets
    pub asset_max_age: Duration,
    /// Upper bound for the in-memory asset cache, in bytes
    pub asset_cache_max_size: u64,
    /// Gzip responses when the client accepts it
    pub compression: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_files: StaticFilesConfig::default(),
            ops_endpoints: false,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("dist"),
            entry_document: "index.html".to_string(),
            asset_max_age: Duration::from_secs(365 * 24 * 60 * 60), // 1 year
            asset_cache_max_size: 64 * 1024 * 1024,                 // 64 MB
            compression: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Server config
        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT")
            && let Ok(p) = port.parse()
        {
            config.port = p;
        }
        if let Ok(val) = env::var("OPS_ENDPOINTS_ENABLED") {
            config.ops_endpoints = parse_flag(&val);
        }

        // Static file config
        if let Ok(dir) = env::var("STATIC_DIR")
            && !dir.is_empty()
        {
            config.static_files.dir = PathBuf::from(dir);
        }
        if let Ok(entry) = env::var("ENTRY_DOCUMENT")
            && !entry.is_empty()
        {
            config.static_files.entry_document = entry;
        }
        if let Ok(val) = env::var("ASSET_MAX_AGE_SECS")
            && let Ok(secs) = val.parse::<u64>()
        {
            config.static_files.asset_max_age = Duration::from_secs(secs);
        }
        if let Ok(val) = env::var("ASSET_CACHE_MAX_MB")
            && let Ok(mb) = val.parse::<u64>()
        {
            config.static_files.asset_cache_max_size = mb * 1024 * 1024;
        }
        if let Ok(val) = env::var("COMPRESSION_ENABLED") {
            config.static_files.compression = parse_flag(&val);
        }

        config
    }
}

fn parse_flag(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.static_files.dir, PathBuf::from("dist"));
        assert_eq!(config.static_files.entry_document, "index.html");
        assert_eq!(config.static_files.asset_max_age.as_secs(), 31_536_000);
        assert!(config.static_files.compression);
        assert!(!config.ops_endpoints);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag("0"));
    }
}
