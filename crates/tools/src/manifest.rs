//! Batch registration manifests.
//!
//! A manifest lists the entries for one `add_contracts` call:
//!
//! ```toml
//! [[entry]]
//! address = "CB..."
//! description = "escrow v2"
//! ```
//!
//! [`Manifest::check`] applies the registry's rules offline so a batch that
//! would be rejected on chain, and therefore rolled back as a whole, is caught
//! before it is submitted.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use contract_manager::{check_description_len, RegistryError, MAX_DESCRIPTION_LEN};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::address::{self, AddressFormatError};

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("manifest has {0} invalid entries")]
    Rejected(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub address: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "entry", default)]
    pub entries: Vec<ManifestEntry>,
}

/// Why an entry would be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    Address(AddressFormatError),
    ZeroAddress,
    /// Same address as an earlier entry in the batch.
    Duplicate { first: usize },
    EmptyDescription,
    DescriptionTooLong { len: usize },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Address(err) => write!(f, "invalid address: {err}"),
            Problem::ZeroAddress => f.write_str("the zero address cannot be registered"),
            Problem::Duplicate { first } => {
                write!(f, "address already listed at entry {first}")
            }
            Problem::EmptyDescription => f.write_str("description is empty"),
            Problem::DescriptionTooLong { len } => write!(
                f,
                "description is {len} bytes, limit is {MAX_DESCRIPTION_LEN}"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub index: usize,
    pub address: String,
    pub problem: Problem,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry {} ({}): {}", self.index, self.address, self.problem)
    }
}

impl Manifest {
    pub fn from_toml_str(s: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(s)?)
    }

    pub async fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&content)
    }

    /// Every problem in the manifest, in entry order. Empty means the batch
    /// passes the offline checks.
    pub fn check(&self) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for (index, entry) in self.entries.iter().enumerate() {
            let mut report = |problem| {
                findings.push(Finding {
                    index,
                    address: entry.address.clone(),
                    problem,
                })
            };

            if let Err(err) = address::check_contract_strkey(&entry.address) {
                report(Problem::Address(err));
            } else if address::is_zero_contract(&entry.address) {
                report(Problem::ZeroAddress);
            }

            match seen.get(entry.address.as_str()) {
                Some(&first) => report(Problem::Duplicate { first }),
                None => {
                    seen.insert(entry.address.as_str(), index);
                }
            }

            let len = entry.description.len();
            match check_description_len(u32::try_from(len).unwrap_or(u32::MAX)) {
                Err(RegistryError::EmptyDescription) => report(Problem::EmptyDescription),
                Err(_) => report(Problem::DescriptionTooLong { len }),
                Ok(()) => {}
            }
        }
        findings
    }

    /// JSON arguments for an `add_contracts` invocation, after a clean
    /// [`Manifest::check`].
    pub fn batch_args(&self, caller: &str) -> Result<serde_json::Value, ManifestError> {
        let findings = self.check();
        if !findings.is_empty() {
            return Err(ManifestError::Rejected(findings.len()));
        }
        let (addresses, descriptions): (Vec<_>, Vec<_>) = self
            .entries
            .iter()
            .map(|e| (e.address.as_str(), e.description.as_str()))
            .unzip();
        Ok(json!({
            "caller": caller,
            "addresses": addresses,
            "descriptions": descriptions,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const A: &str = "CAAQEAYEAUDAOCAJBIFQYDIOB4IBCEQTCQKRMFYYDENBWHA5DYPSABGM";
    const ACCOUNT: &str = "GADQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOZPI";

    fn entry(address: &str, description: &str) -> ManifestEntry {
        ManifestEntry {
            address: address.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn parses_entries_in_order() {
        let manifest = Manifest::from_toml_str(&format!(
            r#"
            [[entry]]
            address = "{A}"
            description = "escrow"

            [[entry]]
            address = "{ACCOUNT}"
            description = "wallet"
            "#
        ))
        .unwrap();

        assert_eq!(manifest.entries.len(), 2);
        assert_eq!(manifest.entries[0], entry(A, "escrow"));
        assert_eq!(manifest.entries[1].address, ACCOUNT);
    }

    #[test]
    fn clean_manifest_has_no_findings() {
        let manifest = Manifest {
            entries: vec![entry(A, "escrow")],
        };
        assert!(manifest.check().is_empty());
    }

    #[test]
    fn reports_every_problem() {
        let manifest = Manifest {
            entries: vec![
                entry(A, "escrow"),
                entry(ACCOUNT, "wallet"),
                entry(address::ZERO_CONTRACT_STRKEY, "zero"),
                entry(A, ""),
                entry(address::ZERO_CONTRACT_STRKEY, &"x".repeat(257)),
            ],
        };

        let problems: Vec<(usize, Problem)> = manifest
            .check()
            .into_iter()
            .map(|f| (f.index, f.problem))
            .collect();

        assert_eq!(
            problems,
            vec![
                (1, Problem::Address(AddressFormatError::Account)),
                (2, Problem::ZeroAddress),
                (3, Problem::Duplicate { first: 0 }),
                (3, Problem::EmptyDescription),
                (4, Problem::ZeroAddress),
                (4, Problem::Duplicate { first: 2 }),
                (4, Problem::DescriptionTooLong { len: 257 }),
            ]
        );
    }

    #[test]
    fn description_bound_is_inclusive() {
        let manifest = Manifest {
            entries: vec![entry(A, &"x".repeat(MAX_DESCRIPTION_LEN as usize))],
        };
        assert!(manifest.check().is_empty());
    }

    #[test]
    fn batch_args_lists_parallel_arrays() {
        let manifest = Manifest {
            entries: vec![entry(A, "escrow")],
        };
        let args = manifest.batch_args(A).unwrap();
        assert_eq!(args["caller"], A);
        assert_eq!(args["addresses"], json!([A]));
        assert_eq!(args["descriptions"], json!(["escrow"]));
    }

    #[test]
    fn batch_args_refuses_invalid_manifest() {
        let manifest = Manifest {
            entries: vec![entry(A, "")],
        };
        assert!(matches!(
            manifest.batch_args(A),
            Err(ManifestError::Rejected(1))
        ));
    }

    #[tokio::test]
    async fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[entry]]\naddress = \"{A}\"\ndescription = \"escrow\"").unwrap();

        let manifest = Manifest::load(file.path()).await.unwrap();
        assert_eq!(manifest.entries, vec![entry(A, "escrow")]);
    }
}
