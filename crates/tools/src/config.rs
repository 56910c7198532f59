//! Network and registry configuration for the contract manager CLI.
//!
//! Values are resolved in priority order:
//!
//! 1. Environment variables (`SOROBAN_*`, `CONTRACT_MANAGER_ID`), including a
//!    `.env` file in the working directory
//! 2. The active profile in `contract-manager.toml`
//! 3. Built-in defaults for the selected network
//!
//! # Examples
//!
//! ```rust,no_run
//! use contract_manager_tools::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! println!("Network: {}", config.network);
//! println!("Registry: {:?}", config.contract_id);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::address::{self, AddressFormatError};

/// Profile file looked up in the working directory.
pub const PROFILE_FILE: &str = "contract-manager.toml";

const DEFAULT_RPC_TIMEOUT_MS: u64 = 30_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid network: {0}. Must be: testnet, mainnet, or sandbox")]
    InvalidNetwork(String),

    #[error("Invalid registry contract id {id}: {source}")]
    InvalidContractId {
        id: String,
        source: AddressFormatError,
    },

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Mainnet,
    Sandbox,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
            Network::Sandbox => "sandbox",
        }
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://soroban-testnet.stellar.org",
            Network::Mainnet => "https://mainnet.sorobanrpc.com",
            Network::Sandbox => "http://localhost:8000",
        }
    }

    /// Passphrase signed into every transaction on this network.
    pub fn passphrase(&self) -> &'static str {
        match self {
            Network::Testnet => "Test SDF Network ; September 2015",
            Network::Mainnet => "Public Global Stellar Network ; September 2015",
            Network::Sandbox => "Standalone Network ; February 2017",
        }
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            "sandbox" => Ok(Network::Sandbox),
            other => Err(ConfigError::InvalidNetwork(other.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `[profile.<network>]` table. Every field is optional and falls back to
/// the network defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub network_passphrase: Option<String>,
    /// Deployed `ContractManager` on this network.
    #[serde(default)]
    pub contract_id: Option<String>,
    #[serde(default)]
    pub source_account: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultSection {
    pub network: Option<String>,
}

/// Contents of `contract-manager.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFile {
    #[serde(default)]
    pub default: Option<DefaultSection>,
    #[serde(default)]
    pub profile: HashMap<String, Profile>,
}

impl ProfileFile {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads `path`; a missing file yields `None`.
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map(Some)
    }
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub network: Network,
    pub rpc_url: String,
    pub network_passphrase: String,
    /// Registry contract id
    pub contract_id: Option<String>,
    /// Account that signs registry calls
    pub source_account: Option<String>,
    pub rpc_timeout_ms: u64,
    pub debug: bool,
}

impl Config {
    /// Load from the process environment and `contract-manager.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();
        let file = ProfileFile::read(Path::new(PROFILE_FILE))?;
        Self::resolve(file.as_ref(), |name| std::env::var(name).ok())
    }

    /// Resolve from an optional profile file and an environment lookup.
    pub fn resolve<F>(file: Option<&ProfileFile>, var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network_name = var("SOROBAN_NETWORK")
            .or_else(|| {
                file.and_then(|f| f.default.as_ref())
                    .and_then(|d| d.network.clone())
            })
            .unwrap_or_else(|| Network::Testnet.as_str().to_string());
        let network: Network = network_name.parse()?;

        let profile = file
            .and_then(|f| f.profile.get(network.as_str()))
            .cloned()
            .unwrap_or_default();

        let rpc_url = var("SOROBAN_RPC_URL")
            .or(profile.rpc_url)
            .unwrap_or_else(|| network.default_rpc_url().to_string());
        let network_passphrase = var("SOROBAN_NETWORK_PASSPHRASE")
            .or(profile.network_passphrase)
            .unwrap_or_else(|| network.passphrase().to_string());
        let contract_id = var("CONTRACT_MANAGER_ID").or(profile.contract_id);
        let source_account = var("SOROBAN_ACCOUNT").or(profile.source_account);

        let rpc_timeout_ms = match var("SOROBAN_RPC_TIMEOUT_MS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "SOROBAN_RPC_TIMEOUT_MS",
                value: raw,
            })?,
            None => DEFAULT_RPC_TIMEOUT_MS,
        };
        let debug = var("SOROBAN_DEBUG")
            .map(|s| s.eq_ignore_ascii_case("true") || s == "1")
            .unwrap_or(false);

        let config = Config {
            network,
            rpc_url,
            network_passphrase,
            contract_id,
            source_account,
            rpc_timeout_ms,
            debug,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_url.is_empty() {
            return Err(ConfigError::MissingField("rpc_url"));
        }
        if self.network_passphrase.is_empty() {
            return Err(ConfigError::MissingField("network_passphrase"));
        }
        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "RPC URL must start with http:// or https://: {}",
                self.rpc_url
            )));
        }
        if let Some(id) = &self.contract_id {
            address::check_contract_strkey(id).map_err(|source| {
                ConfigError::InvalidContractId {
                    id: id.clone(),
                    source,
                }
            })?;
        }
        Ok(())
    }

    /// The registry contract id, or an error naming where to set it.
    pub fn require_contract_id(&self) -> Result<&str, ConfigError> {
        self.contract_id
            .as_deref()
            .ok_or(ConfigError::MissingField("contract_id (CONTRACT_MANAGER_ID)"))
    }

    pub fn print_summary(&self) {
        println!("Contract manager configuration");
        println!("  Network:             {}", self.network);
        println!("  RPC URL:             {}", self.rpc_url);
        println!("  Network Passphrase:  {}", self.network_passphrase);
        println!(
            "  Registry Contract:   {}",
            self.contract_id.as_deref().unwrap_or("(not configured)")
        );
        println!(
            "  Source Account:      {}",
            self.source_account.as_deref().unwrap_or("(not configured)")
        );
        println!("  RPC Timeout:         {}ms", self.rpc_timeout_ms);
        if self.debug {
            println!("  Debug Mode:          ENABLED");
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "CAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSC4";

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("testnet".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!("MAINNET".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("sandbox".parse::<Network>().unwrap(), Network::Sandbox);
        assert!("futurenet".parse::<Network>().is_err());
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = Config::resolve(None, no_env).unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.rpc_url, "https://soroban-testnet.stellar.org");
        assert_eq!(config.network_passphrase, Network::Testnet.passphrase());
        assert_eq!(config.contract_id, None);
        assert_eq!(config.rpc_timeout_ms, DEFAULT_RPC_TIMEOUT_MS);
        assert!(!config.debug);
        assert!(config.require_contract_id().is_err());
    }

    #[test]
    fn test_profile_file_selects_network() {
        let file = ProfileFile::from_toml_str(&format!(
            r#"
            [default]
            network = "sandbox"

            [profile.sandbox]
            rpc_url = "http://localhost:9000"
            contract_id = "{CONTRACT}"
            "#
        ))
        .unwrap();

        let config = Config::resolve(Some(&file), no_env).unwrap();
        assert_eq!(config.network, Network::Sandbox);
        assert_eq!(config.rpc_url, "http://localhost:9000");
        assert_eq!(config.network_passphrase, Network::Sandbox.passphrase());
        assert_eq!(config.require_contract_id().unwrap(), CONTRACT);
    }

    #[test]
    fn test_env_overrides_profile() {
        let file = ProfileFile::from_toml_str(
            r#"
            [profile.mainnet]
            rpc_url = "https://profile.example"
            "#,
        )
        .unwrap();
        let var = env_from(&[
            ("SOROBAN_NETWORK", "mainnet"),
            ("SOROBAN_RPC_URL", "https://env.example"),
            ("SOROBAN_RPC_TIMEOUT_MS", "500"),
            ("SOROBAN_DEBUG", "true"),
        ]);

        let config = Config::resolve(Some(&file), var).unwrap();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.rpc_url, "https://env.example");
        assert_eq!(config.rpc_timeout_ms, 500);
        assert!(config.debug);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_url = env_from(&[("SOROBAN_RPC_URL", "ftp://example.com")]);
        assert!(matches!(
            Config::resolve(None, bad_url),
            Err(ConfigError::Validation(_))
        ));

        let bad_timeout = env_from(&[("SOROBAN_RPC_TIMEOUT_MS", "soon")]);
        assert!(matches!(
            Config::resolve(None, bad_timeout),
            Err(ConfigError::InvalidValue { .. })
        ));

        let account_id = env_from(&[(
            "CONTRACT_MANAGER_ID",
            "GADQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOZPI",
        )]);
        assert!(matches!(
            Config::resolve(None, account_id),
            Err(ConfigError::InvalidContractId {
                source: AddressFormatError::Account,
                ..
            })
        ));

        let bad_network = env_from(&[("SOROBAN_NETWORK", "moon")]);
        assert!(matches!(
            Config::resolve(None, bad_network),
            Err(ConfigError::InvalidNetwork(_))
        ));
    }

    #[test]
    fn test_missing_profile_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let read = ProfileFile::read(&dir.path().join(PROFILE_FILE)).unwrap();
        assert!(read.is_none());
    }

    #[test]
    fn test_json_uses_lowercase_network() {
        let config = Config::resolve(None, no_env).unwrap();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"network\": \"testnet\""));
    }
}
