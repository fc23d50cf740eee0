use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env, I256};
use reward_ledger::{RemainderPolicy, RewardLedgerContract, RewardLedgerContractClient};

pub const START: u64 = 1_000;
pub const FUNDING: i128 = 1_000_000_000_000_000;

pub struct Pool {
    pub env: Env,
    pub client: RewardLedgerContractClient<'static>,
    pub owner: Address,
    pub custodian: Address,
    pub token: Address,
    pub users: Vec<Address>,
}

impl Pool {
    /// Deploys a ledger at `START` over a single stake/reward token, funds
    /// `n_users` stakers and a custodian, and grants the ledger the
    /// custodian's allowance.
    pub fn new(rate: i128, policy: RemainderPolicy, n_users: usize) -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().set_timestamp(START);

        let token = env
            .register_stellar_asset_contract_v2(Address::generate(&env))
            .address();
        let contract_id = env.register(RewardLedgerContract, ());
        let client = RewardLedgerContractClient::new(&env, &contract_id);

        let owner = Address::generate(&env);
        let custodian = Address::generate(&env);
        client.initialize(&owner, &token, &token, &custodian, &rate, &policy);

        let asset = StellarAssetClient::new(&env, &token);
        asset.mint(&custodian, &FUNDING);
        let expiration = env.ledger().sequence() + 10_000;
        TokenClient::new(&env, &token).approve(&custodian, &contract_id, &i128::MAX, &expiration);

        let users = (0..n_users)
            .map(|_| {
                let user = Address::generate(&env);
                asset.mint(&user, &FUNDING);
                user
            })
            .collect();

        Pool {
            env,
            client,
            owner,
            custodian,
            token,
            users,
        }
    }

    pub fn set_time(&self, t: u64) {
        self.env.ledger().set_timestamp(t);
    }

    pub fn now(&self) -> u64 {
        self.env.ledger().timestamp()
    }

    pub fn wide(&self, v: i128) -> I256 {
        I256::from_i128(&self.env, v)
    }

    pub fn balance(&self, who: &Address) -> i128 {
        TokenClient::new(&self.env, &self.token).balance(who)
    }
}
