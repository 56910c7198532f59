//! Two-tier role based access control.
//!
//! `SuperAdmin` manages membership of both roles. `Admin` is the operational
//! role that may mutate the registry. Membership is a set per role; a
//! principal may hold either role, both, or neither.

use soroban_sdk::{contracttype, log, Address, Env};

use crate::events;
use crate::storage;
use crate::RegistryError;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    SuperAdmin = 0,
    Admin = 1,
}

/// Role allowed to grant and revoke `role`.
pub fn role_admin(_role: Role) -> Role {
    Role::SuperAdmin
}

pub fn has_role(env: &Env, role: Role, principal: &Address) -> bool {
    storage::is_member(env, role, principal)
}

pub fn require_role(env: &Env, role: Role, principal: &Address) -> Result<(), RegistryError> {
    if has_role(env, role, principal) {
        return Ok(());
    }
    log!(env, "unauthorized", principal.clone(), role);
    Err(RegistryError::Unauthorized)
}

/// Seeds the initial members. Only called from `init`.
pub fn init_roles(env: &Env, root: &Address, admin: &Address) {
    grant_unchecked(env, Role::SuperAdmin, root, root);
    grant_unchecked(env, Role::Admin, admin, root);
}

pub fn grant_role(
    env: &Env,
    caller: &Address,
    role: Role,
    principal: &Address,
) -> Result<(), RegistryError> {
    caller.require_auth();
    require_role(env, role_admin(role), caller)?;
    grant_unchecked(env, role, principal, caller);
    Ok(())
}

pub fn revoke_role(
    env: &Env,
    caller: &Address,
    role: Role,
    principal: &Address,
) -> Result<(), RegistryError> {
    caller.require_auth();
    require_role(env, role_admin(role), caller)?;
    revoke_unchecked(env, role, principal, caller);
    Ok(())
}

/// Drops one of the caller's own roles. Renouncing `SuperAdmin` can leave
/// the contract without any role manager.
pub fn renounce_role(env: &Env, caller: &Address, role: Role) {
    caller.require_auth();
    revoke_unchecked(env, role, caller, caller);
}

fn grant_unchecked(env: &Env, role: Role, principal: &Address, sender: &Address) {
    if storage::is_member(env, role, principal) {
        return;
    }
    storage::add_member(env, role, principal);
    events::emit_role_granted(env, role, principal, sender);
}

fn revoke_unchecked(env: &Env, role: Role, principal: &Address, sender: &Address) {
    if !storage::is_member(env, role, principal) {
        return;
    }
    storage::remove_member(env, role, principal);
    events::emit_role_revoked(env, role, principal, sender);
}
