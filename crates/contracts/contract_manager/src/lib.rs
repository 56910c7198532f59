#![no_std]

//! Registry of deployed contracts and their human readable descriptions.
//!
//! Mutations require the `Admin` role; role membership is managed by
//! `SuperAdmin` holders. Reads are open to anyone.

use soroban_sdk::{contract, contracterror, contractimpl, log, Address, BytesN, Env, String, Vec};

mod access;
mod events;
mod storage;
mod validation;


pub use access::Role;
pub use validation::{
    check_description_len, Directory, DirectoryClient, MAX_DESCRIPTION_LEN, ZERO_CONTRACT_STRKEY,
};

/// EIP-165 id of `supports_interface` itself.
pub const INTERFACE_ID_DISCOVERY: [u8; 4] = [0x01, 0xff, 0xc9, 0xa7];
/// EIP-165 id of the access control surface.
pub const INTERFACE_ID_ACCESS_CONTROL: [u8; 4] = [0x79, 0x65, 0xdb, 0x0b];
/// EIP-165 id of the registry surface (xor of its five operation selectors).
pub const INTERFACE_ID_CONTRACT_MANAGER: [u8; 4] = [0x88, 0xff, 0x44, 0x11];

#[contracterror]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum RegistryError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAddress = 4,
    ContractAlreadyExists = 5,
    ContractDoesNotExist = 6,
    MismatchedInputLengths = 7,
    EmptyDescription = 8,
    DescriptionTooLong = 9,
}

#[contract]
pub struct ContractManager;

#[contractimpl]
impl ContractManager {
    // ============ Lifecycle ============

    /// Initialize the registry.
    ///
    /// `root` signs the call and receives `SuperAdmin`; `admin` receives the
    /// operational `Admin` role.
    pub fn init(env: Env, root: Address, admin: Address) -> Result<(), RegistryError> {
        if storage::is_initialized(&env) {
            return Err(RegistryError::AlreadyInitialized);
        }
        root.require_auth();

        storage::set_initialized(&env);
        access::init_roles(&env, &root, &admin);
        storage::bump_instance(&env);
        Ok(())
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    // ============ Registry ============

    /// Register one contract. Admin only.
    pub fn add_contract(
        env: Env,
        caller: Address,
        address: Address,
        description: String,
    ) -> Result<(), RegistryError> {
        authorize(&env, &caller, Role::Admin)?;
        check_new_entry(&env, &address, &description)?;

        storage::set_description(&env, &address, &description);
        events::emit_contract_added(&env, &address, &description);
        Ok(())
    }

    /// Register several contracts at once. Admin only.
    ///
    /// Every element is checked before anything is written, so a single bad
    /// element leaves the registry untouched.
    pub fn add_contracts(
        env: Env,
        caller: Address,
        addresses: Vec<Address>,
        descriptions: Vec<String>,
    ) -> Result<(), RegistryError> {
        authorize(&env, &caller, Role::Admin)?;
        if addresses.len() != descriptions.len() {
            return Err(RegistryError::MismatchedInputLengths);
        }

        let mut staged: Vec<Address> = Vec::new(&env);
        for (address, description) in addresses.iter().zip(descriptions.iter()) {
            validation::check_address(&env, &address)?;
            if staged.contains(&address) {
                log!(&env, "duplicate in batch", address.clone());
                return Err(RegistryError::ContractAlreadyExists);
            }
            if storage::has_description(&env, &address) {
                return Err(RegistryError::ContractAlreadyExists);
            }
            validation::check_description(&env, &description)?;
            staged.push_back(address);
        }

        for (address, description) in addresses.iter().zip(descriptions.iter()) {
            storage::set_description(&env, &address, &description);
            events::emit_contract_added(&env, &address, &description);
        }
        log!(&env, "batch added", addresses.len());
        Ok(())
    }

    /// Replace the description of a registered contract. Admin only.
    pub fn update_description(
        env: Env,
        caller: Address,
        address: Address,
        new_description: String,
    ) -> Result<(), RegistryError> {
        authorize(&env, &caller, Role::Admin)?;
        if !storage::has_description(&env, &address) {
            return Err(RegistryError::ContractDoesNotExist);
        }
        validation::check_description(&env, &new_description)?;

        storage::set_description(&env, &address, &new_description);
        events::emit_contract_updated(&env, &address, &new_description);
        Ok(())
    }

    /// Delete a registered contract. Admin only.
    pub fn remove_contract(
        env: Env,
        caller: Address,
        address: Address,
    ) -> Result<(), RegistryError> {
        authorize(&env, &caller, Role::Admin)?;
        if !storage::has_description(&env, &address) {
            return Err(RegistryError::ContractDoesNotExist);
        }

        storage::remove_description(&env, &address);
        events::emit_contract_removed(&env, &address);
        Ok(())
    }

    pub fn get_description(env: Env, address: Address) -> Result<String, RegistryError> {
        storage::get_description(&env, &address).ok_or(RegistryError::ContractDoesNotExist)
    }

    pub fn contract_exists(env: Env, address: Address) -> bool {
        storage::has_description(&env, &address)
    }

    /// EIP-165 style capability discovery.
    pub fn supports_interface(_env: Env, interface_id: BytesN<4>) -> bool {
        let id = interface_id.to_array();
        id == INTERFACE_ID_DISCOVERY
            || id == INTERFACE_ID_ACCESS_CONTROL
            || id == INTERFACE_ID_CONTRACT_MANAGER
    }

    // ============ Directory ============

    /// Install or clear the directory consulted when registering addresses.
    /// SuperAdmin only.
    pub fn set_directory(
        env: Env,
        caller: Address,
        directory: Option<Address>,
    ) -> Result<(), RegistryError> {
        authorize(&env, &caller, Role::SuperAdmin)?;
        storage::set_directory(&env, &directory);
        events::emit_directory_set(&env, &directory);
        Ok(())
    }

    pub fn directory(env: Env) -> Option<Address> {
        storage::get_directory(&env)
    }

    // ============ Access control ============

    pub fn has_role(env: Env, role: Role, principal: Address) -> bool {
        access::has_role(&env, role, &principal)
    }

    pub fn role_admin(_env: Env, role: Role) -> Role {
        access::role_admin(role)
    }

    /// Grant `role` to `principal`. SuperAdmin only; granting a held role is
    /// a no-op.
    pub fn grant_role(
        env: Env,
        caller: Address,
        role: Role,
        principal: Address,
    ) -> Result<(), RegistryError> {
        ensure_initialized(&env)?;
        access::grant_role(&env, &caller, role, &principal)?;
        storage::bump_instance(&env);
        Ok(())
    }

    /// Revoke `role` from `principal`. SuperAdmin only; revoking a role that
    /// is not held is a no-op.
    pub fn revoke_role(
        env: Env,
        caller: Address,
        role: Role,
        principal: Address,
    ) -> Result<(), RegistryError> {
        ensure_initialized(&env)?;
        access::revoke_role(&env, &caller, role, &principal)?;
        storage::bump_instance(&env);
        Ok(())
    }

    pub fn renounce_role(env: Env, caller: Address, role: Role) -> Result<(), RegistryError> {
        ensure_initialized(&env)?;
        access::renounce_role(&env, &caller, role);
        storage::bump_instance(&env);
        Ok(())
    }
}

// ============ Internal ============

fn ensure_initialized(env: &Env) -> Result<(), RegistryError> {
    if !storage::is_initialized(env) {
        return Err(RegistryError::NotInitialized);
    }
    Ok(())
}

/// Authentication first, then role membership.
fn authorize(env: &Env, caller: &Address, role: Role) -> Result<(), RegistryError> {
    ensure_initialized(env)?;
    caller.require_auth();
    access::require_role(env, role, caller)?;
    storage::bump_instance(env);
    Ok(())
}

/// Checks applied to every entry about to be inserted.
fn check_new_entry(
    env: &Env,
    address: &Address,
    description: &String,
) -> Result<(), RegistryError> {
    validation::check_address(env, address)?;
    if storage::has_description(env, address) {
        return Err(RegistryError::ContractAlreadyExists);
    }
    validation::check_description(env, description)
}
