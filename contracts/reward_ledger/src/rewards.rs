use soroban_sdk::{contracttype, Env, I256};

use crate::ContractError;

/// Fixed-point scaling factor for `acc_reward_per_share`.
///
/// The accumulator stores reward-per-staked-unit multiplied by this constant
/// so sub-unit rewards survive integer division. A tiny stake can push the
/// accumulator, and `amount × acc` with it, well past `i128`, so the
/// accumulator and reward debt are carried as `I256`.
pub const PRECISION: i128 = 1_000_000_000_000;

// ── State types ─────────────────────────────────────────────────────────────

/// What to do with the fractional reward lost to integer division when the
/// accumulator advances.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RemainderPolicy {
    /// Drop the residue on every accrual.
    Truncate,
    /// Keep the residue in `PoolState::reward_remainder` and fold it into the
    /// next accrual.
    Carry,
}

/// Global accounting state shared by every position.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    pub total_staked: i128,
    pub acc_reward_per_share: I256,
    pub last_accrual_time: u64,
    pub reward_rate_per_second: i128,
    /// Undistributed `reward * PRECISION` residue, always below
    /// `total_staked`. Always zero under `RemainderPolicy::Truncate`.
    pub reward_remainder: I256,
}

impl PoolState {
    pub fn new(env: &Env, reward_rate_per_second: i128, now: u64) -> Self {
        Self {
            total_staked: 0,
            acc_reward_per_share: I256::from_i32(env, 0),
            last_accrual_time: now,
            reward_rate_per_second,
            reward_remainder: I256::from_i32(env, 0),
        }
    }
}

/// A single staker's position.
///
/// `reward_debt` is signed: a withdrawal subtracts the withdrawn share of the
/// accumulator, so a fully withdrawn position with unharvested reward carries
/// a negative debt until it is harvested.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserPosition {
    pub amount: i128,
    pub reward_debt: I256,
}

impl UserPosition {
    /// The position of an address that never staked.
    pub fn empty(env: &Env) -> Self {
        Self {
            amount: 0,
            reward_debt: I256::from_i32(env, 0),
        }
    }
}

// ── Accumulator ─────────────────────────────────────────────────────────────

/// Advance the accumulator to `now` without touching storage.
///
/// ```text
/// Δacc = (elapsed × rate × PRECISION [+ remainder]) / total_staked
/// ```
///
/// Shared by the mutating accrual step and the read-only pending projection.
/// A timestamp at or before `last_accrual_time` returns the state unchanged.
/// Elapsed time with nothing staked only moves `last_accrual_time`; that
/// reward is never issued.
///
/// The product is formed in 256 bits: `u64` seconds times an `i128` rate
/// times `PRECISION` cannot overflow it, so accrual never fails.
pub fn accrue(pool: &PoolState, now: u64, policy: RemainderPolicy) -> PoolState {
    let mut next = pool.clone();
    if now <= pool.last_accrual_time {
        return next;
    }
    next.last_accrual_time = now;

    if pool.total_staked <= 0 {
        return next;
    }

    let env = pool.acc_reward_per_share.env();
    let elapsed = I256::from_i128(env, i128::from(now - pool.last_accrual_time));
    let total = I256::from_i128(env, pool.total_staked);
    let mut numerator = elapsed
        .mul(&I256::from_i128(env, pool.reward_rate_per_second))
        .mul(&I256::from_i128(env, PRECISION));

    if policy == RemainderPolicy::Carry {
        numerator = numerator.add(&pool.reward_remainder);
        next.reward_remainder = numerator.rem_euclid(&total);
    }

    next.acc_reward_per_share = pool.acc_reward_per_share.add(&numerator.div(&total));
    next
}

// ── Position math ───────────────────────────────────────────────────────────

/// `amount × acc / PRECISION`, truncated.
pub fn accumulated(amount: i128, acc_reward_per_share: &I256) -> I256 {
    let env = acc_reward_per_share.env();
    I256::from_i128(env, amount)
        .mul(acc_reward_per_share)
        .div(&I256::from_i128(env, PRECISION))
}

/// `accumulated - reward_debt` as a payable amount: clamped at zero, and
/// `MathOverflow` if it does not fit a token amount.
fn owed(accumulated: &I256, reward_debt: &I256) -> Result<i128, ContractError> {
    let raw = accumulated.sub(reward_debt);
    if raw <= I256::from_i32(accumulated.env(), 0) {
        return Ok(0);
    }
    raw.to_i128().ok_or(ContractError::MathOverflow)
}

/// Reward earned but not yet paid out, clamped at zero.
///
/// Truncation on withdraw can leave the raw difference at -1; that is owed
/// nothing, not a debt the user must repay.
pub fn pending(position: &UserPosition, acc_reward_per_share: &I256) -> Result<i128, ContractError> {
    owed(
        &accumulated(position.amount, acc_reward_per_share),
        &position.reward_debt,
    )
}

pub fn apply_deposit(
    position: &UserPosition,
    amount: i128,
    acc_reward_per_share: &I256,
) -> Result<UserPosition, ContractError> {
    if amount < 0 {
        return Err(ContractError::InvalidAmount);
    }
    Ok(UserPosition {
        amount: position
            .amount
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?,
        reward_debt: position
            .reward_debt
            .add(&accumulated(amount, acc_reward_per_share)),
    })
}

/// Shrink the position without paying reward; the debt keeps the withdrawn
/// stake's accounting weight so the reward stays claimable.
pub fn apply_withdraw(
    position: &UserPosition,
    amount: i128,
    acc_reward_per_share: &I256,
) -> Result<UserPosition, ContractError> {
    if amount < 0 {
        return Err(ContractError::InvalidAmount);
    }
    if amount > position.amount {
        return Err(ContractError::InsufficientBalance);
    }
    Ok(UserPosition {
        amount: position.amount - amount,
        reward_debt: position
            .reward_debt
            .sub(&accumulated(amount, acc_reward_per_share)),
    })
}

/// Settle the position against the accumulator. Returns the settled
/// position and the amount to pay (zero when nothing is owed).
pub fn settle(
    position: &UserPosition,
    acc_reward_per_share: &I256,
) -> Result<(UserPosition, i128), ContractError> {
    let accumulated = accumulated(position.amount, acc_reward_per_share);
    let paid = owed(&accumulated, &position.reward_debt)?;
    let settled = UserPosition {
        amount: position.amount,
        reward_debt: accumulated,
    };
    Ok((settled, paid))
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure-math tests; the environment only backs the 256-bit host integers.
