use soroban_sdk::{contractclient, log, xdr::ToXdr, Address, Env, String};

use crate::storage;
use crate::RegistryError;

/// Upper bound on a description, in UTF-8 bytes.
pub const MAX_DESCRIPTION_LEN: u32 = 256;

/// Strkey of the contract address whose id is 32 zero bytes.
pub const ZERO_CONTRACT_STRKEY: &str = "CAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSC4";

// XDR layout of an address value: ScVal tag, ScAddress tag, payload.
const SCV_ADDRESS: u32 = 18;
const SC_ADDRESS_TYPE_CONTRACT: u32 = 1;
const CONTRACT_ADDRESS_XDR_LEN: u32 = 40;

/// External oracle deciding whether an address has deployed code behind it.
#[contractclient(name = "DirectoryClient")]
pub trait Directory {
    fn is_deployed(env: Env, address: Address) -> bool;
}

/// Length rules shared by every description argument.
pub fn check_description_len(len: u32) -> Result<(), RegistryError> {
    if len == 0 {
        return Err(RegistryError::EmptyDescription);
    }
    if len > MAX_DESCRIPTION_LEN {
        return Err(RegistryError::DescriptionTooLong);
    }
    Ok(())
}

pub fn check_description(env: &Env, description: &String) -> Result<(), RegistryError> {
    let len = description.len();
    check_description_len(len).inspect_err(|err| {
        if *err == RegistryError::DescriptionTooLong {
            log!(env, "description too long", len, MAX_DESCRIPTION_LEN);
        }
    })
}

/// Rejects account addresses, the zero contract address, and anything the
/// configured directory does not know as deployed.
pub fn check_address(env: &Env, address: &Address) -> Result<(), RegistryError> {
    let Some(id) = contract_id(env, address) else {
        log!(env, "not a contract address", address.clone());
        return Err(RegistryError::InvalidAddress);
    };
    if id == [0u8; 32] {
        log!(env, "zero address");
        return Err(RegistryError::InvalidAddress);
    }
    if let Some(directory) = storage::get_directory(env) {
        if !DirectoryClient::new(env, &directory).is_deployed(address) {
            log!(env, "not deployed", address.clone());
            return Err(RegistryError::InvalidAddress);
        }
    }
    Ok(())
}

/// The 32 byte contract id behind `address`, or `None` for non-contract
/// addresses.
fn contract_id(env: &Env, address: &Address) -> Option<[u8; 32]> {
    let xdr = address.clone().to_xdr(env);
    if xdr.len() != CONTRACT_ADDRESS_XDR_LEN {
        return None;
    }
    let mut head = [0u8; 8];
    xdr.slice(0..8).copy_into_slice(&mut head);
    let tag = u32::from_be_bytes([head[0], head[1], head[2], head[3]]);
    let kind = u32::from_be_bytes([head[4], head[5], head[6], head[7]]);
    if tag != SCV_ADDRESS || kind != SC_ADDRESS_TYPE_CONTRACT {
        return None;
    }
    let mut id = [0u8; 32];
    xdr.slice(8..CONTRACT_ADDRESS_XDR_LEN).copy_into_slice(&mut id);
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_bounds() {
        assert_eq!(
            check_description_len(0),
            Err(RegistryError::EmptyDescription)
        );
        assert_eq!(check_description_len(1), Ok(()));
        assert_eq!(check_description_len(MAX_DESCRIPTION_LEN), Ok(()));
        assert_eq!(
            check_description_len(MAX_DESCRIPTION_LEN + 1),
            Err(RegistryError::DescriptionTooLong)
        );
    }

    #[test]
    fn contract_id_of_zero_strkey() {
        let env = Env::default();
        let zero = Address::from_string(&String::from_str(&env, ZERO_CONTRACT_STRKEY));
        assert_eq!(contract_id(&env, &zero), Some([0u8; 32]));
    }

    #[test]
    fn contract_id_of_account_is_none() {
        let env = Env::default();
        let account = Address::from_string(&String::from_str(
            &env,
            "GADQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOZPI",
        ));
        assert_eq!(contract_id(&env, &account), None);
    }
}
