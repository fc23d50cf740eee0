#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};
use reward_ledger::{RemainderPolicy, RewardLedgerContract, RewardLedgerContractClient};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { user: u8, amount: u64 },
    Withdraw { user: u8, amount: u64 },
    Harvest { user: u8 },
    WithdrawAndHarvest { user: u8, amount: u64 },
    EmergencyWithdraw { user: u8 },
    Advance { seconds: u32 },
    SetRate { rate: u64 },
    UpdatePool,
}

#[derive(Arbitrary, Debug)]
pub struct FuzzInput {
    pub rate: u64,
    pub carry: bool,
    pub actions: Vec<FuzzAction>,
}

fuzz_target!(|input: FuzzInput| {
    let env = Env::default();
    env.mock_all_auths();

    let token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(RewardLedgerContract, ());
    let client = RewardLedgerContractClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    let custodian = Address::generate(&env);
    let policy = if input.carry {
        RemainderPolicy::Carry
    } else {
        RemainderPolicy::Truncate
    };
    client.initialize(&owner, &token, &token, &custodian, &(input.rate as i128), &policy);

    let asset = StellarAssetClient::new(&env, &token);
    asset.mint(&custodian, &i128::from(u64::MAX));
    let expiration = env.ledger().sequence() + 10_000;
    TokenClient::new(&env, &token).approve(&custodian, &contract_id, &i128::MAX, &expiration);

    let mut users = Vec::new();
    for _ in 0..4 {
        let user = Address::generate(&env);
        asset.mint(&user, &i128::from(u64::MAX));
        users.push(user);
    }

    // Errors are expected (funding runs out, overflow is reported); panics
    // and broken bookkeeping are not.
    for action in input.actions {
        match action {
            FuzzAction::Deposit { user, amount } => {
                let u = &users[user as usize % users.len()];
                let _ = client.try_deposit(u, &(amount as i128), u);
            }
            FuzzAction::Withdraw { user, amount } => {
                let u = &users[user as usize % users.len()];
                let _ = client.try_withdraw(u, &(amount as i128), u);
            }
            FuzzAction::Harvest { user } => {
                let u = &users[user as usize % users.len()];
                let _ = client.try_harvest(u, u);
            }
            FuzzAction::WithdrawAndHarvest { user, amount } => {
                let u = &users[user as usize % users.len()];
                let _ = client.try_withdraw_and_harvest(u, &(amount as i128), u);
            }
            FuzzAction::EmergencyWithdraw { user } => {
                let u = &users[user as usize % users.len()];
                let _ = client.try_emergency_withdraw(u, u);
            }
            FuzzAction::Advance { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now.saturating_add(u64::from(seconds)));
            }
            FuzzAction::SetRate { rate } => {
                let _ = client.try_set_reward_rate_per_second(&owner, &(rate as i128));
            }
            FuzzAction::UpdatePool => {
                let _ = client.try_update_pool();
            }
        }

        let staked: i128 = users.iter().map(|u| client.user_info(u).amount).sum();
        assert_eq!(staked, client.total_staked());
    }
});
