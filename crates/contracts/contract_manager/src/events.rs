use soroban_sdk::{Address, Env, String, Symbol};

use crate::access::Role;

pub fn emit_contract_added(env: &Env, address: &Address, description: &String) {
    env.events().publish(
        (Symbol::new(env, "contract_added"), address.clone()),
        description.clone(),
    );
}

pub fn emit_contract_updated(env: &Env, address: &Address, new_description: &String) {
    env.events().publish(
        (Symbol::new(env, "contract_updated"), address.clone()),
        new_description.clone(),
    );
}

pub fn emit_contract_removed(env: &Env, address: &Address) {
    env.events().publish(
        (Symbol::new(env, "contract_removed"), address.clone()),
        (),
    );
}

pub fn emit_role_granted(env: &Env, role: Role, principal: &Address, sender: &Address) {
    env.events().publish(
        (Symbol::new(env, "role_granted"), role, principal.clone()),
        sender.clone(),
    );
}

pub fn emit_role_revoked(env: &Env, role: Role, principal: &Address, sender: &Address) {
    env.events().publish(
        (Symbol::new(env, "role_revoked"), role, principal.clone()),
        sender.clone(),
    );
}

pub fn emit_directory_set(env: &Env, directory: &Option<Address>) {
    env.events()
        .publish((Symbol::new(env, "directory_set"),), directory.clone());
}
