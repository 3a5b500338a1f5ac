//! ---
//! courier_section: "01-core-functionality"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Shared configuration and logging for courier processes."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use courier_dispatch::{DispatchMetrics, ObserverSet, TracingObserver};
use courier_envelope::EnvelopeFactory;
use indexmap::IndexMap;
use prometheus::Registry;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::LogFormat;

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_sender() -> String {
    "courier".to_owned()
}

fn default_warn_on_anomaly() -> bool {
    true
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Configuration shared by every courier process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourierConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub envelope: EnvelopeConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Metadata describing where a [`CourierConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: CourierConfig,
    /// `None` when no file was found and defaults apply.
    pub source: Option<PathBuf>,
}

impl CourierConfig {
    pub const ENV_CONFIG_PATH: &'static str = "COURIER_CONFIG";

    /// Load configuration from disk, respecting the `COURIER_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        let loaded = Self::load_with_source(candidates)?;
        if loaded.source.is_none() {
            return Err(anyhow!(
                "no configuration files found. inspected: {}",
                describe(candidates)
            ));
        }
        Ok(loaded.config)
    }

    /// Like [`Self::load`] but falls back to defaults when no candidate exists.
    ///
    /// A file that exists but does not parse or validate is still an error.
    pub fn load_or_default<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !is_blank(&env_path) {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            let path = candidate.as_ref();
            if path.exists() {
                let config = Self::from_path(path)?;
                return Ok(LoadedConfig {
                    config,
                    source: Some(path.to_path_buf()),
                });
            }
        }

        debug!(
            inspected = %describe(candidates),
            "no configuration file found, using defaults"
        );
        Ok(LoadedConfig {
            config: Self::default(),
            source: None,
        })
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse::<Self>()
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.logging.validate()?;
        self.envelope.validate()?;
        Ok(())
    }

    /// Envelope factory stamping the configured sender and default headers.
    pub fn envelope_factory(&self) -> EnvelopeFactory {
        self.envelope.factory()
    }
}

impl std::str::FromStr for CourierConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: CourierConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

fn describe<P: AsRef<Path>>(candidates: &[P]) -> String {
    candidates
        .iter()
        .map(|p| p.as_ref().display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    /// Directory for daily rolling JSON log files; stderr only when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            directory: None,
            file_prefix: None,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.file_prefix, Some(prefix) if is_blank(prefix)) {
            return Err(anyhow!("logging.file_prefix must not be blank"));
        }
        if matches!(&self.directory, Some(dir) if dir.as_os_str().is_empty()) {
            return Err(anyhow!("logging.directory must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    #[serde(default = "default_sender")]
    pub sender: String,
    #[serde(default)]
    pub default_headers: IndexMap<String, String>,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            sender: default_sender(),
            default_headers: IndexMap::new(),
        }
    }
}

impl EnvelopeConfig {
    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.sender) {
            return Err(anyhow!("envelope.sender must not be blank"));
        }
        for (key, value) in &self.default_headers {
            if is_blank(key) || is_blank(value) {
                return Err(anyhow!(
                    "envelope.default_headers entry '{}' must have a non-blank key and value",
                    key
                ));
            }
        }
        Ok(())
    }

    pub fn factory(&self) -> EnvelopeFactory {
        EnvelopeFactory::new(self.sender.clone()).with_default_headers(
            self.default_headers
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_warn_on_anomaly")]
    pub warn_on_anomaly: bool,
    #[serde(default)]
    pub metrics: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            warn_on_anomaly: default_warn_on_anomaly(),
            metrics: false,
        }
    }
}

impl DispatchConfig {
    /// Observer for dispatchers and decoders: tracing always, plus
    /// prometheus counters registered with `registry` when metrics are on.
    pub fn observer(&self, registry: &Registry) -> Result<(ObserverSet, Option<DispatchMetrics>)> {
        let mut observers = ObserverSet::new().with(TracingObserver::new(self.warn_on_anomaly));
        if !self.metrics {
            return Ok((observers, None));
        }
        let metrics = DispatchMetrics::register(registry)
            .context("failed to register dispatch metrics")?;
        observers.push(metrics.clone());
        Ok((observers, Some(metrics)))
    }
}
