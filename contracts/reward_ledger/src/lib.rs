#![no_std]

pub mod events;
pub mod rewards;
mod storage;
mod transfer;

use soroban_sdk::{contract, contractimpl, contracttype, log, Address, Env, I256};

pub use rewards::{PoolState, RemainderPolicy, UserPosition, PRECISION};

// ── Contract errors ──────────────────────────────────────────────────────────

/// Error codes returned by the ledger.
///
/// # Code ranges
/// | Range   | Purpose                        |
/// |---------|--------------------------------|
/// | 1 – 9   | Lifecycle / initialisation     |
/// | 10 – 19 | Authorisation                  |
/// | 30 – 39 | Validation / input             |
/// | 40 – 49 | Reward funding                 |
/// | 50 – 59 | Token transfers                |
/// | 60 – 69 | Arithmetic                     |
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,

    /// Caller is not the pool owner (or not the proposed owner).
    Unauthorized = 10,
    /// `accept_owner` / `cancel_owner_transfer` with no transfer in flight.
    NoPendingOwner = 11,

    /// Negative amount or reward rate.
    InvalidAmount = 30,
    /// Withdraw amount exceeds the staked balance.
    InsufficientBalance = 31,

    /// The custodian could not cover a reward payout.
    FundingExhausted = 40,

    /// The payer could not fund a deposit.
    InsufficientAllowanceOrBalance = 50,
    /// The token rejected a payout from the ledger.
    TransferFailed = 51,

    MathOverflow = 60,
}

// ── Configuration ────────────────────────────────────────────────────────────

/// Addresses and policy fixed (or owner-managed) for the lifetime of the pool.
///
/// `stake_token` and `reward_token` may be the same asset.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub owner: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub custodian: Address,
    pub remainder_policy: RemainderPolicy,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct RewardLedgerContract;

#[contractimpl]
impl RewardLedgerContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the pool.
    ///
    /// * `stake_token`            – token users deposit.
    /// * `reward_token`           – token harvests pay out; may equal `stake_token`.
    /// * `custodian`              – holder of the reward supply. Must `approve`
    ///                              the ledger on `reward_token` before harvests
    ///                              can pay.
    /// * `reward_rate_per_second` – reward units emitted per second across all
    ///                              stakers.
    /// * `remainder_policy`       – how accumulator rounding residue is handled.
    pub fn initialize(
        env: Env,
        owner: Address,
        stake_token: Address,
        reward_token: Address,
        custodian: Address,
        reward_rate_per_second: i128,
        remainder_policy: RemainderPolicy,
    ) -> Result<(), ContractError> {
        if storage::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        if reward_rate_per_second < 0 {
            return Err(ContractError::InvalidAmount);
        }

        let config = PoolConfig {
            owner: owner.clone(),
            stake_token: stake_token.clone(),
            reward_token: reward_token.clone(),
            custodian: custodian.clone(),
            remainder_policy,
        };
        storage::set_config(&env, &config);
        storage::set_pool(
            &env,
            &PoolState::new(&env, reward_rate_per_second, env.ledger().timestamp()),
        );

        events::publish_initialized(
            &env,
            owner,
            stake_token,
            reward_token,
            custodian,
            reward_rate_per_second,
            remainder_policy,
        );

        Ok(())
    }

    // ── Accrual ─────────────────────────────────────────────────────────────

    /// Bring the accumulator up to the current ledger time. Safe to call at
    /// any time by anyone; a second call in the same instant changes nothing.
    pub fn update_pool(env: Env) -> Result<PoolState, ContractError> {
        let config = storage::get_config(&env)?;
        let pool = Self::accrued_pool(&env, &config)?;
        Self::commit_pool(&env, &pool);
        Ok(pool)
    }

    /// Reward owed to `user` as of now, without mutating state.
    pub fn pending_reward(env: Env, user: Address) -> Result<i128, ContractError> {
        let config = storage::get_config(&env)?;
        let pool = Self::accrued_pool(&env, &config)?;
        let position = storage::get_position(&env, &user);
        rewards::pending(&position, &pool.acc_reward_per_share)
    }

    // ── Positions ───────────────────────────────────────────────────────────

    /// Stake `amount` from `payer` into the position of `to`.
    ///
    /// A zero amount moves no tokens but still accrues the pool and emits the
    /// deposit event, which makes it a cheap way to refresh accounting.
    pub fn deposit(env: Env, payer: Address, amount: i128, to: Address) -> Result<(), ContractError> {
        payer.require_auth();
        if amount < 0 {
            return Err(ContractError::InvalidAmount);
        }
        let config = storage::get_config(&env)?;

        let mut pool = Self::accrued_pool(&env, &config)?;
        let position = rewards::apply_deposit(
            &storage::get_position(&env, &to),
            amount,
            &pool.acc_reward_per_share,
        )?;
        pool.total_staked = pool
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;

        transfer::pull_from(&env, &config.stake_token, &payer, amount)?;

        Self::commit_pool(&env, &pool);
        storage::set_position(&env, &to, &position);
        events::publish_deposit(&env, payer, amount, to);

        Ok(())
    }

    /// Unstake `amount` from `user`'s position and send it to `to`.
    ///
    /// No reward is paid here; what accrued on the withdrawn stake stays
    /// claimable through `harvest`.
    pub fn withdraw(env: Env, user: Address, amount: i128, to: Address) -> Result<(), ContractError> {
        user.require_auth();
        let config = storage::get_config(&env)?;

        let mut pool = Self::accrued_pool(&env, &config)?;
        let position = rewards::apply_withdraw(
            &storage::get_position(&env, &user),
            amount,
            &pool.acc_reward_per_share,
        )?;
        pool.total_staked = pool
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::MathOverflow)?;

        transfer::push_to(&env, &config.stake_token, &to, amount)?;

        Self::commit_pool(&env, &pool);
        storage::set_position(&env, &user, &position);
        events::publish_withdraw(&env, user, amount, to);

        Ok(())
    }

    /// Pay everything `user` has earned to `to`, drawing on the custodian.
    ///
    /// Returns the amount paid. If the custodian cannot cover it the call
    /// fails with `FundingExhausted` and the reward stays pending.
    pub fn harvest(env: Env, user: Address, to: Address) -> Result<i128, ContractError> {
        user.require_auth();
        let config = storage::get_config(&env)?;

        let pool = Self::accrued_pool(&env, &config)?;
        let (position, owed) =
            rewards::settle(&storage::get_position(&env, &user), &pool.acc_reward_per_share)?;

        transfer::pull_from_custodian(&env, &config.reward_token, &config.custodian, &to, owed)?;

        Self::commit_pool(&env, &pool);
        storage::set_position(&env, &user, &position);
        if owed > 0 {
            log!(&env, "harvest paid", owed);
        }
        events::publish_harvest(&env, user, owed, to);

        Ok(owed)
    }

    /// Withdraw `amount` and harvest all pending reward under one accrual.
    ///
    /// Principal and reward both go to `to`. Returns the reward paid.
    pub fn withdraw_and_harvest(
        env: Env,
        user: Address,
        amount: i128,
        to: Address,
    ) -> Result<i128, ContractError> {
        user.require_auth();
        let config = storage::get_config(&env)?;

        let mut pool = Self::accrued_pool(&env, &config)?;
        let (settled, owed) =
            rewards::settle(&storage::get_position(&env, &user), &pool.acc_reward_per_share)?;
        let position = rewards::apply_withdraw(&settled, amount, &pool.acc_reward_per_share)?;
        pool.total_staked = pool
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::MathOverflow)?;

        transfer::pull_from_custodian(&env, &config.reward_token, &config.custodian, &to, owed)?;
        transfer::push_to(&env, &config.stake_token, &to, amount)?;

        Self::commit_pool(&env, &pool);
        storage::set_position(&env, &user, &position);
        events::publish_withdraw(&env, user.clone(), amount, to.clone());
        events::publish_harvest(&env, user, owed, to);

        Ok(owed)
    }

    /// Return the whole stake to `to` and forfeit any unharvested reward.
    ///
    /// Does not accrue. Returns the amount withdrawn.
    pub fn emergency_withdraw(env: Env, user: Address, to: Address) -> Result<i128, ContractError> {
        user.require_auth();
        let config = storage::get_config(&env)?;

        let mut pool = storage::get_pool(&env)?;
        let amount = storage::get_position(&env, &user).amount;
        pool.total_staked = pool
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::MathOverflow)?;

        transfer::push_to(&env, &config.stake_token, &to, amount)?;

        storage::set_pool(&env, &pool);
        storage::set_position(&env, &user, &UserPosition::empty(&env));
        events::publish_emergency_withdraw(&env, user, amount, to);

        Ok(amount)
    }

    // ── View functions ──────────────────────────────────────────────────────

    /// Return the stored position for `user` (zeroed if never touched).
    pub fn user_info(env: Env, user: Address) -> UserPosition {
        storage::get_position(&env, &user)
    }

    /// Return the pool as last persisted, without projecting to now.
    pub fn pool_state(env: Env) -> Result<PoolState, ContractError> {
        storage::get_pool(&env)
    }

    pub fn total_staked(env: Env) -> Result<i128, ContractError> {
        Ok(storage::get_pool(&env)?.total_staked)
    }

    pub fn acc_reward_per_share(env: Env) -> Result<I256, ContractError> {
        Ok(storage::get_pool(&env)?.acc_reward_per_share)
    }

    pub fn last_accrual_time(env: Env) -> Result<u64, ContractError> {
        Ok(storage::get_pool(&env)?.last_accrual_time)
    }

    pub fn reward_rate_per_second(env: Env) -> Result<i128, ContractError> {
        Ok(storage::get_pool(&env)?.reward_rate_per_second)
    }

    pub fn config(env: Env) -> Result<PoolConfig, ContractError> {
        storage::get_config(&env)
    }

    pub fn stake_token(env: Env) -> Result<Address, ContractError> {
        Ok(storage::get_config(&env)?.stake_token)
    }

    pub fn reward_token(env: Env) -> Result<Address, ContractError> {
        Ok(storage::get_config(&env)?.reward_token)
    }

    pub fn custodian(env: Env) -> Result<Address, ContractError> {
        Ok(storage::get_config(&env)?.custodian)
    }

    pub fn owner(env: Env) -> Result<Address, ContractError> {
        Ok(storage::get_config(&env)?.owner)
    }

    pub fn pending_owner(env: Env) -> Option<Address> {
        storage::get_pending_owner(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    // ── Owner functions ─────────────────────────────────────────────────────

    /// Change the emission rate.
    ///
    /// The pool is accrued at the old rate up to now before the new rate is
    /// stored, so the change only applies to time after this call.
    pub fn set_reward_rate_per_second(
        env: Env,
        caller: Address,
        new_rate: i128,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        let config = Self::require_owner(&env, &caller)?;
        if new_rate < 0 {
            return Err(ContractError::InvalidAmount);
        }

        let mut pool = Self::accrued_pool(&env, &config)?;
        let old_rate = pool.reward_rate_per_second;
        pool.reward_rate_per_second = new_rate;
        Self::commit_pool(&env, &pool);

        events::publish_reward_rate_set(&env, old_rate, new_rate);

        Ok(())
    }

    /// Point harvest payouts at a different custodian. Pending rewards are
    /// unaffected; they are simply paid from the new source.
    pub fn set_custodian(
        env: Env,
        caller: Address,
        custodian: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        let mut config = Self::require_owner(&env, &caller)?;

        let old_custodian = config.custodian.clone();
        config.custodian = custodian.clone();
        storage::set_config(&env, &config);

        events::publish_custodian_set(&env, old_custodian, custodian);

        Ok(())
    }

    // ── Ownership transfer (two-step) ───────────────────────────────────────

    /// Propose a new owner. The proposed address must call `accept_owner`.
    pub fn propose_owner(
        env: Env,
        current_owner: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        current_owner.require_auth();
        Self::require_owner(&env, &current_owner)?;

        storage::set_pending_owner(&env, &new_owner);

        events::publish_owner_transfer_proposed(&env, current_owner, new_owner);

        Ok(())
    }

    /// Complete a pending ownership transfer. Only the proposed owner may call.
    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        new_owner.require_auth();
        let mut config = storage::get_config(&env)?;

        let pending = storage::get_pending_owner(&env).ok_or(ContractError::NoPendingOwner)?;
        if new_owner != pending {
            return Err(ContractError::Unauthorized);
        }

        let old_owner = config.owner.clone();
        config.owner = new_owner.clone();
        storage::set_config(&env, &config);
        storage::remove_pending_owner(&env);

        events::publish_owner_transfer_accepted(&env, old_owner, new_owner);

        Ok(())
    }

    pub fn cancel_owner_transfer(env: Env, current_owner: Address) -> Result<(), ContractError> {
        current_owner.require_auth();
        Self::require_owner(&env, &current_owner)?;

        let pending = storage::get_pending_owner(&env).ok_or(ContractError::NoPendingOwner)?;
        storage::remove_pending_owner(&env);

        events::publish_owner_transfer_cancelled(&env, current_owner, pending);

        Ok(())
    }

    // ── Internal helpers ────────────────────────────────────────────────────

    /// Guard: revert unless `caller` is the owner. Returns the config.
    fn require_owner(env: &Env, caller: &Address) -> Result<PoolConfig, ContractError> {
        let config = storage::get_config(env)?;
        if *caller != config.owner {
            return Err(ContractError::Unauthorized);
        }
        Ok(config)
    }

    /// Stored pool projected to the current ledger time. Nothing is written.
    fn accrued_pool(env: &Env, config: &PoolConfig) -> Result<PoolState, ContractError> {
        let stored = storage::get_pool(env)?;
        let pool = rewards::accrue(&stored, env.ledger().timestamp(), config.remainder_policy);
        if pool.acc_reward_per_share != stored.acc_reward_per_share {
            log!(
                env,
                "accrued",
                pool.last_accrual_time,
                pool.acc_reward_per_share
            );
        }
        Ok(pool)
    }

    /// Persist an accrued pool and announce it.
    fn commit_pool(env: &Env, pool: &PoolState) {
        storage::set_pool(env, pool);
        events::publish_accrual_updated(env, pool);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
