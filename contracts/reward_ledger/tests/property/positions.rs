#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based state machine tests over random operation sequences.
//!
//! Invariants tested after every step:
//! - `total_staked` equals the sum of every position's `amount`
//! - `acc_reward_per_share` and `last_accrual_time` never decrease
//! - Harvest and emergency withdraw leave nothing pending
//! - Everything paid plus everything pending never exceeds what the rate
//!   emitted while something was staked (up to one unit of rounding per step)
//! - The custodian pays out exactly what harvests report

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use reward_ledger::{ContractError, RemainderPolicy};

use crate::harness::{Pool, FUNDING, START};

const USERS: usize = 3;
const RATE: i128 = 1_000;

#[derive(Clone, Debug, Arbitrary)]
enum Action {
    Deposit {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
        #[proptest(strategy = "0i128..=1_000_000")]
        amount: i128,
    },
    Withdraw {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
        #[proptest(strategy = "0i128..=100")]
        percent: i128,
    },
    OverWithdraw {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
    },
    Harvest {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
    },
    WithdrawAndHarvest {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
        #[proptest(strategy = "0i128..=100")]
        percent: i128,
    },
    EmergencyWithdraw {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
    },
    Advance {
        #[proptest(strategy = "0u64..=10_000")]
        seconds: u64,
    },
    UpdatePool,
}

fn run(actions: Vec<Action>, policy: RemainderPolicy) -> Result<(), TestCaseError> {
    let pool = Pool::new(RATE, policy, USERS);
    let custodian_start = pool.balance(&pool.custodian);

    let mut emitted: i128 = 0;
    let mut harvested: i128 = 0;
    let mut last_acc = pool.wide(0);
    let mut last_time = START;
    let steps = actions.len() as i128;

    for action in actions {
        match action {
            Action::Deposit { user, amount } => {
                let u = &pool.users[user];
                pool.client.deposit(u, &amount, u);
            }
            Action::Withdraw { user, percent } => {
                let u = &pool.users[user];
                let amount = pool.client.user_info(u).amount * percent / 100;
                pool.client.withdraw(u, &amount, u);
            }
            Action::OverWithdraw { user } => {
                let u = &pool.users[user];
                let before = pool.client.user_info(u);
                let result = pool.client.try_withdraw(u, &(before.amount + 1), u);
                match result {
                    Err(Ok(e)) => prop_assert_eq!(e, ContractError::InsufficientBalance),
                    _ => prop_assert!(false, "expected InsufficientBalance"),
                }
                prop_assert_eq!(pool.client.user_info(u), before);
            }
            Action::Harvest { user } => {
                let u = &pool.users[user];
                harvested += pool.client.harvest(u, u);
                prop_assert_eq!(pool.client.pending_reward(u), 0);
            }
            Action::WithdrawAndHarvest { user, percent } => {
                let u = &pool.users[user];
                let amount = pool.client.user_info(u).amount * percent / 100;
                harvested += pool.client.withdraw_and_harvest(u, &amount, u);
                prop_assert_eq!(pool.client.pending_reward(u), 0);
            }
            Action::EmergencyWithdraw { user } => {
                let u = &pool.users[user];
                pool.client.emergency_withdraw(u, u);
                prop_assert_eq!(pool.client.pending_reward(u), 0);
                prop_assert_eq!(pool.client.user_info(u).amount, 0);
            }
            Action::Advance { seconds } => {
                if pool.client.total_staked() > 0 {
                    emitted += RATE * seconds as i128;
                }
                pool.set_time(pool.now() + seconds);
            }
            Action::UpdatePool => {
                pool.client.update_pool();
            }
        }

        let staked_sum: i128 = pool
            .users
            .iter()
            .map(|u| pool.client.user_info(u).amount)
            .sum();
        prop_assert_eq!(staked_sum, pool.client.total_staked());

        let state = pool.client.pool_state();
        prop_assert!(state.acc_reward_per_share >= last_acc);
        prop_assert!(state.last_accrual_time >= last_time);
        prop_assert!(state.last_accrual_time <= pool.now());
        last_acc = state.acc_reward_per_share;
        last_time = state.last_accrual_time;

        let pending_sum: i128 = pool
            .users
            .iter()
            .map(|u| pool.client.pending_reward(u))
            .sum();
        prop_assert!(pending_sum >= 0);
        prop_assert!(
            harvested + pending_sum <= emitted + steps + USERS as i128,
            "paid {} + pending {} exceeds emitted {}",
            harvested,
            pending_sum,
            emitted
        );
    }

    prop_assert_eq!(custodian_start - pool.balance(&pool.custodian), harvested);
    prop_assert!(harvested <= FUNDING);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_truncate_sequences_keep_invariants(
        actions in proptest::collection::vec(any::<Action>(), 1..40)
    ) {
        run(actions, RemainderPolicy::Truncate)?;
    }

    #[test]
    fn prop_carry_sequences_keep_invariants(
        actions in proptest::collection::vec(any::<Action>(), 1..40)
    ) {
        run(actions, RemainderPolicy::Carry)?;
    }
}
