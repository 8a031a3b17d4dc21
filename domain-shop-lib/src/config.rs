//! Configuration loading for the registrar and generation clients.
//!
//! Settings come from two sources, lowest precedence first:
//! 1. an optional TOML file
//! 2. environment variables
//!
//! Loading happens once at process start. A missing required value is a
//! startup error, never a per-request one.

use crate::error::DomainShopError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Reseller interface endpoint for test accounts.
pub const TEST_ENDPOINT: &str = "https://resellertest.enom.com/interface.asp";
/// Reseller interface endpoint for live accounts.
pub const PRODUCTION_ENDPOINT: &str = "https://reseller.enom.com/interface.asp";
/// Default generation workflow endpoint.
pub const DEFAULT_WORKFLOW_URL: &str = "https://api.dify.ai/v1/workflows/run";
/// Default listen address for the HTTP API.
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

const DEFAULT_REGISTRAR_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_WORKFLOW_USER: &str = "domain-shop";

/// Which reseller environment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrarEnvironment {
    Test,
    Production,
}

impl RegistrarEnvironment {
    pub fn from_test_mode(test_mode: bool) -> Self {
        if test_mode {
            Self::Test
        } else {
            Self::Production
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Test => TEST_ENDPOINT,
            Self::Production => PRODUCTION_ENDPOINT,
        }
    }
}

/// Reseller identifier and secret, plus the environment they belong to.
///
/// Immutable once built. The `Debug` impl never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrarCredentials {
    reseller_id: String,
    reseller_password: String,
    environment: RegistrarEnvironment,
}

impl RegistrarCredentials {
    pub fn new<I: Into<String>, P: Into<String>>(
        reseller_id: I,
        reseller_password: P,
        environment: RegistrarEnvironment,
    ) -> Self {
        Self {
            reseller_id: reseller_id.into(),
            reseller_password: reseller_password.into(),
            environment,
        }
    }

    pub fn reseller_id(&self) -> &str {
        &self.reseller_id
    }

    pub fn reseller_password(&self) -> &str {
        &self.reseller_password
    }

    pub fn environment(&self) -> RegistrarEnvironment {
        self.environment
    }

    pub fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }
}

impl fmt::Debug for RegistrarCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrarCredentials")
            .field("reseller_id", &self.reseller_id)
            .field("reseller_password", &"<redacted>")
            .field("environment", &self.environment)
            .finish()
    }
}

/// Registrar client settings.
#[derive(Debug, Clone)]
pub struct RegistrarSettings {
    pub credentials: RegistrarCredentials,
    pub timeout: Duration,
}

/// Generation workflow client settings.
#[derive(Clone)]
pub struct GenerationSettings {
    pub api_key: String,
    pub workflow_url: String,
    /// End-user identifier sent with each workflow run
    pub user: String,
    pub timeout: Duration,
}

impl fmt::Debug for GenerationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationSettings")
            .field("api_key", &"<redacted>")
            .field("workflow_url", &self.workflow_url)
            .field("user", &self.user)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

/// Fully resolved process configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub registrar: RegistrarSettings,
    pub generation: GenerationSettings,
    pub server: ServerSettings,
}

/// Configuration loaded from a TOML file. Every field is optional; the
/// environment may fill in or override anything.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<RegistrarFileConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationFileConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerFileConfig>,
}

/// `[registrar]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegistrarFileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reseller_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reseller_password: Option<String>,

    /// Use the reseller test environment (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_mode: Option<bool>,

    /// Request timeout (as string, e.g., "30s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// `[generation]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerationFileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerFileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
}

impl FileConfig {
    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `DomainShopError::Config` if the file is missing, unreadable
    /// or not valid TOML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| {
            DomainShopError::config(format!(
                "Failed to read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            DomainShopError::config(format!(
                "Failed to parse TOML configuration '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

impl Settings {
    /// Load settings from an optional file plus the process environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::from_sources(file, |key| env::var(key).ok())
    }

    /// Resolve settings from a file config and an environment lookup.
    ///
    /// Environment variables:
    /// - `ENOM_RESELLER_ID`, `ENOM_RESELLER_PASSWORD` (required)
    /// - `ENOM_TEST_MODE` (default: true), `ENOM_TIMEOUT`
    /// - `DIFY_API_KEY` (required), `DIFY_WORKFLOW_URL`, `DIFY_USER`,
    ///   `DIFY_TIMEOUT`
    /// - `DOMAIN_SHOP_BIND`
    pub fn from_sources<F>(file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| non_blank(env(key));
        let registrar = file.registrar.unwrap_or_default();
        let generation = file.generation.unwrap_or_default();
        let server = file.server.unwrap_or_default();

        let reseller_id = env("ENOM_RESELLER_ID")
            .or(non_blank(registrar.reseller_id))
            .ok_or_else(|| missing("ENOM_RESELLER_ID"))?;
        let reseller_password = env("ENOM_RESELLER_PASSWORD")
            .or(non_blank(registrar.reseller_password))
            .ok_or_else(|| missing("ENOM_RESELLER_PASSWORD"))?;
        let test_mode = match env("ENOM_TEST_MODE") {
            Some(raw) => parse_bool("ENOM_TEST_MODE", &raw)?,
            None => registrar.test_mode.unwrap_or(true),
        };
        let registrar_timeout = resolve_timeout(
            "ENOM_TIMEOUT",
            env("ENOM_TIMEOUT").or(non_blank(registrar.timeout)),
            DEFAULT_REGISTRAR_TIMEOUT,
        )?;

        let api_key = env("DIFY_API_KEY")
            .or(non_blank(generation.api_key))
            .ok_or_else(|| missing("DIFY_API_KEY"))?;
        let workflow_url = env("DIFY_WORKFLOW_URL")
            .or(non_blank(generation.workflow_url))
            .unwrap_or_else(|| DEFAULT_WORKFLOW_URL.to_string());
        let user = env("DIFY_USER")
            .or(non_blank(generation.user))
            .unwrap_or_else(|| DEFAULT_WORKFLOW_USER.to_string());
        let generation_timeout = resolve_timeout(
            "DIFY_TIMEOUT",
            env("DIFY_TIMEOUT").or(non_blank(generation.timeout)),
            DEFAULT_GENERATION_TIMEOUT,
        )?;

        let bind = env("DOMAIN_SHOP_BIND")
            .or(non_blank(server.bind))
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        Ok(Self {
            registrar: RegistrarSettings {
                credentials: RegistrarCredentials::new(
                    reseller_id,
                    reseller_password,
                    RegistrarEnvironment::from_test_mode(test_mode),
                ),
                timeout: registrar_timeout,
            },
            generation: GenerationSettings {
                api_key,
                workflow_url,
                user,
                timeout: generation_timeout,
            },
            server: ServerSettings { bind },
        })
    }
}

/// Blank values count as unset, whichever source they come from.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing(key: &str) -> DomainShopError {
    DomainShopError::config(format!("{} must be set", key))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(DomainShopError::config(format!(
            "Invalid {}='{}', use true/false",
            key, raw
        ))),
    }
}

fn resolve_timeout(
    key: &str,
    raw: Option<String>,
    default: Duration,
) -> Result<Duration> {
    match raw {
        None => Ok(default),
        Some(raw) => parse_timeout_string(&raw)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                DomainShopError::config(format!(
                    "Invalid {}='{}', use e.g. \"30s\" or \"2m\"",
                    key, raw
                ))
            }),
    }
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| m * 60)
    } else {
        // Assume seconds if no unit
        timeout_str.parse::<u64>().ok()
    }
}
