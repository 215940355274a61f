use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fhir: FhirSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.fhir.base_url.is_empty() {
            return Err("fhir.base_url must point at the clinical data server".into());
        }
        if let Err(e) = url::Url::parse(&self.fhir.base_url) {
            return Err(format!("fhir.base_url is not a valid URL: {e}"));
        }
        if self.fhir.timeout_ms == 0 {
            return Err("fhir.timeout_ms must be > 0".into());
        }
        if self.search.default_page_size == 0 {
            return Err("search.default_page_size must be > 0".into());
        }
        if self.search.max_page_size == 0 {
            return Err("search.max_page_size must be > 0".into());
        }
        if self.search.default_page_size > self.search.max_page_size {
            return Err("search.default_page_size must be <= search.max_page_size".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }

    pub fn fhir_timeout(&self) -> Duration {
        Duration::from_millis(self.fhir.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Where the external clinical-data server lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhirSettings {
    /// Base URL of the FHIR server, e.g. "http://localhost:8080/fhir".
    #[serde(default = "default_fhir_base_url")]
    pub base_url: String,
    #[serde(default = "default_fhir_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_fhir_base_url() -> String {
    "http://localhost:8080/fhir".into()
}
fn default_fhir_timeout_ms() -> u64 {
    15_000
}

impl Default for FhirSettings {
    fn default() -> Self {
        Self {
            base_url: default_fhir_base_url(),
            timeout_ms: default_fhir_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

fn default_page_size() -> usize {
    10
}
fn default_max_page_size() -> usize {
    100
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if pathbuf.exists() {
                    builder = builder.add_source(File::from(pathbuf));
                }
            }
            None => {
                let default_path = PathBuf::from("chartpad.toml");
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g. CHARTPAD__FHIR__BASE_URL=...
        builder = builder.add_source(
            Environment::with_prefix("CHARTPAD")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_fhir_base_url_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.fhir.base_url = String::new();
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("fhir.base_url"));
    }

    #[test]
    fn malformed_fhir_base_url_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.fhir.base_url = "not a url".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("fhir.base_url"));
    }

    #[test]
    fn page_size_ordering_is_enforced() {
        let mut cfg = AppConfig::default();
        cfg.search.default_page_size = 200;
        cfg.search.max_page_size = 100;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.logging.level = "verbose".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn addr_combines_host_and_port() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".into();
        cfg.server.port = 4000;
        assert_eq!(cfg.addr().to_string(), "127.0.0.1:4000");
    }

    #[test]
    fn bad_host_falls_back_to_any() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not-an-ip".into();
        assert_eq!(cfg.addr().ip().to_string(), "0.0.0.0");
    }
}
