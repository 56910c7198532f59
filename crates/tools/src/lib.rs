//! Contract manager tools
//!
//! Configuration resolution and offline batch manifest checks for the
//! `ContractManager` registry contract.

pub mod address;
pub mod config;
pub mod manifest;

pub use config::{Config, ConfigError, Network};
pub use manifest::{Finding, Manifest, ManifestError, Problem};
