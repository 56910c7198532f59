//! Offline format checks for Stellar contract addresses.
//!
//! Only the shape of the strkey is checked here (length, version character,
//! base32 alphabet). The checksum and the deployed-code check happen on chain.

use thiserror::Error;

pub use contract_manager::ZERO_CONTRACT_STRKEY;

/// Length of an encoded account or contract strkey.
pub const STRKEY_LEN: usize = 56;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressFormatError {
    #[error("expected 56 characters, found {0}")]
    Length(usize),

    #[error("account addresses cannot be registered (starts with 'G')")]
    Account,

    #[error("expected a contract strkey starting with 'C', found '{0}'")]
    NotContract(char),

    #[error("invalid strkey character '{0}'")]
    Charset(char),
}

pub fn check_contract_strkey(strkey: &str) -> Result<(), AddressFormatError> {
    let len = strkey.chars().count();
    if len != STRKEY_LEN {
        return Err(AddressFormatError::Length(len));
    }
    if let Some(bad) = strkey.chars().find(|c| !is_base32(*c)) {
        return Err(AddressFormatError::Charset(bad));
    }
    match strkey.chars().next() {
        Some('C') => Ok(()),
        Some('G') => Err(AddressFormatError::Account),
        Some(other) => Err(AddressFormatError::NotContract(other)),
        None => Err(AddressFormatError::Length(0)),
    }
}

pub fn is_zero_contract(strkey: &str) -> bool {
    strkey == ZERO_CONTRACT_STRKEY
}

fn is_base32(c: char) -> bool {
    c.is_ascii_uppercase() || ('2'..='7').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT: &str = "GADQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOZPI";

    #[test]
    fn accepts_contract_strkey() {
        assert_eq!(check_contract_strkey(ZERO_CONTRACT_STRKEY), Ok(()));
        assert!(is_zero_contract(ZERO_CONTRACT_STRKEY));
    }

    #[test]
    fn rejects_account_strkey() {
        assert_eq!(
            check_contract_strkey(ACCOUNT),
            Err(AddressFormatError::Account)
        );
    }

    #[test]
    fn rejects_bad_shapes() {
        assert_eq!(
            check_contract_strkey("CABC"),
            Err(AddressFormatError::Length(4))
        );
        let lowercase = ZERO_CONTRACT_STRKEY.to_lowercase();
        assert_eq!(
            check_contract_strkey(&lowercase),
            Err(AddressFormatError::Charset('c'))
        );
        let muxed = ACCOUNT.replacen('G', "M", 1);
        assert_eq!(
            check_contract_strkey(&muxed),
            Err(AddressFormatError::NotContract('M'))
        );
    }
}
