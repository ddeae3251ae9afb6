use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

/// Session configuration, loaded from the environment with logged
/// defaults. The contract address is handed to whatever binding
/// implements [`crate::provider::VotingContract`] for the deployment.
pub struct Config {
    pub rpc_url: String,
    pub contract_address: String,
    pub confirm_timeout: Duration,
    pub cache_max_age: Duration,
}

impl Config {
    pub fn load() -> Self {
        Self {
            rpc_url: try_load("BALLOT_RPC_URL", "http://localhost:8545"),
            contract_address: try_load(
                "BALLOT_CONTRACT_ADDRESS",
                "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            ),
            confirm_timeout: Duration::from_secs(try_load("BALLOT_CONFIRM_TIMEOUT_SECS", "60")),
            cache_max_age: Duration::from_secs(try_load("BALLOT_CACHE_MAX_AGE_SECS", "30")),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("{key} not set, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
