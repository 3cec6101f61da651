//! Runtime configuration.
//!
//! Values come from, lowest priority first: built-in defaults, the process
//! environment (a `.env` file is loaded by the CLI before this runs), and
//! command-line flags applied on top by the caller.

use std::path::PathBuf;

use crate::api::logs::log_warning;
use crate::query::DEFAULT_TOP_N;

/// Path of the catalogue CSV.
pub const ENV_DATA: &str = "FILMDASH_DATA";

/// HTTP port.
pub const ENV_PORT: &str = "FILMDASH_PORT";

/// Default ranking length for `/api/top`.
pub const ENV_TOP_N: &str = "FILMDASH_TOP_N";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Upper bound on a requested ranking length.
pub const MAX_TOP_N: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: Option<PathBuf>,
    pub port: u16,
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            port: DEFAULT_PORT,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`. Unparsable numbers keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DATA).filter(|p| !p.trim().is_empty()) {
            config.data_path = Some(PathBuf::from(path.trim()));
        }

        if let Some(raw) = lookup(ENV_PORT) {
            match raw.trim().parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => log_warning(format!("Ignoring {}='{}': not a port number", ENV_PORT, raw)),
            }
        }

        if let Some(raw) = lookup(ENV_TOP_N) {
            match raw.trim().parse::<usize>() {
                Ok(n) if (1..=MAX_TOP_N).contains(&n) => config.top_n = n,
                _ => log_warning(format!(
                    "Ignoring {}='{}': expected 1..={}",
                    ENV_TOP_N, raw, MAX_TOP_N
                )),
            }
        }

        config
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, data_path: Option<PathBuf>, port: Option<u16>) -> Self {
        if data_path.is_some() {
            self.data_path = data_path;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}
