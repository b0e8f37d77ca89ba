//! Layered configuration loading for HelloACA using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`HELLOACA_*` prefix, `__` as separator)
//! 2. `ANTHROPIC_API_KEY` for the provider key
//! 3. `helloaca.toml` in the working directory, or an explicit path
//! 4. Built-in defaults
//!
//! `HELLOACA_PROVIDER__MODEL` maps to `provider.model`,
//! `HELLOACA_SERVER__BIND` to `server.bind`, and so on.

mod analysis;
mod error;
mod provider;
mod server;

pub use analysis::AnalysisConfig;
pub use error::ConfigError;
pub use provider::ProviderConfig;
pub use server::ServerConfig;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "helloaca.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HelloAcaConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl HelloAcaConfig {
    /// Load from defaults, `helloaca.toml` (if present) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load with an explicit config file in place of `helloaca.toml`.
    ///
    /// An explicit path that does not exist is an error; the default file is
    /// optional.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(p) = path {
            if !p.exists() {
                return Err(ConfigError::InvalidValue {
                    field: "config".into(),
                    reason: format!("file not found: {}", p.display()),
                });
            }
        }
        let config: Self = Self::figment(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the working directory first, then [`load_from`](Self::load_from).
    pub fn load_with_dotenv(path: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load_from(path)
    }

    /// Build the figment provider chain.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let file = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }

        figment
            .merge(
                Env::raw()
                    .only(&["ANTHROPIC_API_KEY"])
                    .map(|_| "provider.api_key".into()),
            )
            .merge(Env::prefixed("HELLOACA_").split("__"))
    }

    /// Reject values that would only fail later, at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.provider.max_tokens == 0 {
            return Err(invalid("provider.max_tokens", "must be greater than zero"));
        }
        if self.provider.timeout_secs == 0 {
            return Err(invalid("provider.timeout_secs", "must be greater than zero"));
        }
        if self.analysis.max_contract_chars == 0 {
            return Err(invalid(
                "analysis.max_contract_chars",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Parsed listener address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .bind
            .parse()
            .map_err(|e| invalid("server.bind", &format!("{e}")))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
