#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, I256};

use crate::rewards::{PoolState, RemainderPolicy};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the pool is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub custodian: Address,
    pub reward_rate_per_second: i128,
    pub remainder_policy: RemainderPolicy,
    pub timestamp: u64,
}

/// Fired by every accrual step, including same-instant calls that leave the
/// pool unchanged.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccrualUpdatedEvent {
    pub last_accrual_time: u64,
    pub staked_balance: i128,
    pub acc_reward_per_share: I256,
}

/// Shared payload for deposit, withdraw, harvest and emergency withdraw.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionEvent {
    pub actor: Address,
    pub amount: i128,
    pub recipient: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardRateSetEvent {
    pub old_rate: i128,
    pub new_rate: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CustodianSetEvent {
    pub old_custodian: Address,
    pub new_custodian: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferProposedEvent {
    pub current_owner: Address,
    pub proposed_owner: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferAcceptedEvent {
    pub old_owner: Address,
    pub new_owner: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferCancelledEvent {
    pub owner: Address,
    pub cancelled_proposed: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    stake_token: Address,
    reward_token: Address,
    custodian: Address,
    reward_rate_per_second: i128,
    remainder_policy: RemainderPolicy,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            stake_token,
            reward_token,
            custodian,
            reward_rate_per_second,
            remainder_policy,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_accrual_updated(env: &Env, pool: &PoolState) {
    env.events().publish(
        (symbol_short!("ACCRUED"),),
        AccrualUpdatedEvent {
            last_accrual_time: pool.last_accrual_time,
            staked_balance: pool.total_staked,
            acc_reward_per_share: pool.acc_reward_per_share.clone(),
        },
    );
}

fn position_event(env: &Env, actor: Address, amount: i128, recipient: Address) -> PositionEvent {
    PositionEvent {
        actor,
        amount,
        recipient,
        timestamp: env.ledger().timestamp(),
    }
}

pub fn publish_deposit(env: &Env, payer: Address, amount: i128, recipient: Address) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), recipient.clone()),
        position_event(env, payer, amount, recipient),
    );
}

pub fn publish_withdraw(env: &Env, user: Address, amount: i128, recipient: Address) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), user.clone()),
        position_event(env, user, amount, recipient),
    );
}

pub fn publish_harvest(env: &Env, user: Address, amount: i128, recipient: Address) {
    env.events().publish(
        (symbol_short!("HARVEST"), user.clone()),
        position_event(env, user, amount, recipient),
    );
}

pub fn publish_emergency_withdraw(env: &Env, user: Address, amount: i128, recipient: Address) {
    env.events().publish(
        (symbol_short!("EMRG_WDR"), user.clone()),
        position_event(env, user, amount, recipient),
    );
}

pub fn publish_reward_rate_set(env: &Env, old_rate: i128, new_rate: i128) {
    env.events().publish(
        (symbol_short!("RATE_SET"),),
        RewardRateSetEvent {
            old_rate,
            new_rate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_custodian_set(env: &Env, old_custodian: Address, new_custodian: Address) {
    env.events().publish(
        (symbol_short!("CUST_SET"),),
        CustodianSetEvent {
            old_custodian,
            new_custodian,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_proposed(env: &Env, current_owner: Address, proposed_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_PROP"), current_owner.clone()),
        OwnerTransferProposedEvent {
            current_owner,
            proposed_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_accepted(env: &Env, old_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_ACPT"), new_owner.clone()),
        OwnerTransferAcceptedEvent {
            old_owner,
            new_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_cancelled(env: &Env, owner: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("OWN_CNCL"), owner.clone()),
        OwnerTransferCancelledEvent {
            owner,
            cancelled_proposed,
            timestamp: env.ledger().timestamp(),
        },
    );
}
