use soroban_sdk::{contracttype, Address, Env, String};

use crate::access::Role;

/// Ledgers per day at a 5 second close time.
const DAY_IN_LEDGERS: u32 = 17_280;

pub const INSTANCE_TTL_THRESHOLD: u32 = 30 * DAY_IN_LEDGERS;
pub const INSTANCE_TTL_EXTEND: u32 = 150 * DAY_IN_LEDGERS;

pub const ENTRY_TTL_THRESHOLD: u32 = 30 * DAY_IN_LEDGERS;
pub const ENTRY_TTL_EXTEND: u32 = 150 * DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Initialized,
    Directory,
    Description(Address),
    RoleMember(Role, Address),
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Initialized)
}

pub fn set_initialized(env: &Env) {
    env.storage().instance().set(&DataKey::Initialized, &true);
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

// ---- Directory ----

pub fn get_directory(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Directory)
}

pub fn set_directory(env: &Env, directory: &Option<Address>) {
    match directory {
        Some(addr) => env.storage().instance().set(&DataKey::Directory, addr),
        None => env.storage().instance().remove(&DataKey::Directory),
    }
}

// ---- Descriptions ----

pub fn has_description(env: &Env, address: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Description(address.clone()))
}

pub fn get_description(env: &Env, address: &Address) -> Option<String> {
    let key = DataKey::Description(address.clone());
    let description: Option<String> = env.storage().persistent().get(&key);
    if description.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, ENTRY_TTL_THRESHOLD, ENTRY_TTL_EXTEND);
    }
    description
}

pub fn set_description(env: &Env, address: &Address, description: &String) {
    let key = DataKey::Description(address.clone());
    env.storage().persistent().set(&key, description);
    env.storage()
        .persistent()
        .extend_ttl(&key, ENTRY_TTL_THRESHOLD, ENTRY_TTL_EXTEND);
}

pub fn remove_description(env: &Env, address: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Description(address.clone()));
}

// ---- Role membership ----

pub fn is_member(env: &Env, role: Role, principal: &Address) -> bool {
    let key = DataKey::RoleMember(role, principal.clone());
    let member = env.storage().persistent().has(&key);
    if member {
        env.storage()
            .persistent()
            .extend_ttl(&key, ENTRY_TTL_THRESHOLD, ENTRY_TTL_EXTEND);
    }
    member
}

pub fn add_member(env: &Env, role: Role, principal: &Address) {
    let key = DataKey::RoleMember(role, principal.clone());
    env.storage().persistent().set(&key, &true);
    env.storage()
        .persistent()
        .extend_ttl(&key, ENTRY_TTL_THRESHOLD, ENTRY_TTL_EXTEND);
}

pub fn remove_member(env: &Env, role: Role, principal: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::RoleMember(role, principal.clone()));
}
