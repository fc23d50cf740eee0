use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::rewards::{PoolState, UserPosition};
use crate::{ContractError, PoolConfig};

// ── Storage keys ─────────────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");
const POOL: Symbol = symbol_short!("POOL");
const PENDING_OWNER: Symbol = symbol_short!("PEND_OWN");

// Per-user persistent storage uses tuple keys: (prefix, user_address)
const USER_POSITION: Symbol = symbol_short!("USR_POS");

const DAY_IN_LEDGERS: u32 = 17_280;
const TTL_EXTEND_TO: u32 = 30 * DAY_IN_LEDGERS;
const TTL_THRESHOLD: u32 = TTL_EXTEND_TO - DAY_IN_LEDGERS;

fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Config ───────────────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&CONFIG)
}

pub fn get_config(env: &Env) -> Result<PoolConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&CONFIG, config);
    extend_instance(env);
}

pub fn get_pending_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_OWNER)
}

pub fn set_pending_owner(env: &Env, pending: &Address) {
    env.storage().instance().set(&PENDING_OWNER, pending);
}

pub fn remove_pending_owner(env: &Env) {
    env.storage().instance().remove(&PENDING_OWNER);
}

// ── Pool ─────────────────────────────────────────────────────────────────────

pub fn get_pool(env: &Env) -> Result<PoolState, ContractError> {
    env.storage()
        .instance()
        .get(&POOL)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_pool(env: &Env, pool: &PoolState) {
    env.storage().instance().set(&POOL, pool);
    extend_instance(env);
}

// ── Positions ────────────────────────────────────────────────────────────────

fn position_key(user: &Address) -> (Symbol, Address) {
    (USER_POSITION, user.clone())
}

/// Missing positions read as zero; entries are never removed.
pub fn get_position(env: &Env, user: &Address) -> UserPosition {
    let key = position_key(user);
    let position: Option<UserPosition> = env.storage().persistent().get(&key);
    match position {
        Some(position) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
            position
        }
        None => UserPosition::empty(env),
    }
}

pub fn set_position(env: &Env, user: &Address, position: &UserPosition) {
    let key = position_key(user);
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
