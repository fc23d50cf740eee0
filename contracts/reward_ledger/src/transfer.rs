//! Token movement for the ledger.
//!
//! Every call goes through the `try_` client variants so a rejected transfer
//! comes back as a typed [`ContractError`] instead of trapping the whole
//! invocation. Zero amounts never reach the token contract.

use soroban_sdk::{token, Address, Env};

use crate::ContractError;

/// Pull `amount` of `token` from `payer` into the ledger. `payer` must have
/// authorized the enclosing invocation.
pub fn pull_from(
    env: &Env,
    token: &Address,
    payer: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    if amount == 0 {
        return Ok(());
    }
    match token::Client::new(env, token).try_transfer(
        payer,
        &env.current_contract_address(),
        &amount,
    ) {
        Ok(Ok(_)) => Ok(()),
        _ => Err(ContractError::InsufficientAllowanceOrBalance),
    }
}

/// Push `amount` of `token` held by the ledger to `recipient`.
pub fn push_to(
    env: &Env,
    token: &Address,
    recipient: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    if amount == 0 {
        return Ok(());
    }
    match token::Client::new(env, token).try_transfer(
        &env.current_contract_address(),
        recipient,
        &amount,
    ) {
        Ok(Ok(_)) => Ok(()),
        _ => Err(ContractError::TransferFailed),
    }
}

/// Pay `amount` of `token` straight from the custodian to `recipient`,
/// spending the allowance the custodian granted the ledger.
pub fn pull_from_custodian(
    env: &Env,
    token: &Address,
    custodian: &Address,
    recipient: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    if amount == 0 {
        return Ok(());
    }
    match token::Client::new(env, token).try_transfer_from(
        &env.current_contract_address(),
        custodian,
        recipient,
        &amount,
    ) {
        Ok(Ok(_)) => Ok(()),
        _ => Err(ContractError::FundingExhausted),
    }
}
