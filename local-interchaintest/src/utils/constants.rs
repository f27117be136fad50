use std::time::Duration;

pub const API_URL: &str = "http://127.0.0.1:42069";
pub const CHAIN_CONFIG_PATH: &str = "local-interchaintest/chains/ica.json";
pub const ARTIFACTS_PATH: &str = "./artifacts";
pub const DIAGNOSTICS_PATH: &str = "./diagnostics";
pub const WASM_EXTENSION: &str = "wasm";

pub const CONTROLLER_CHAIN_ID: &str = "localwasm-1";
pub const HOST_CHAIN_ID: &str = "localwasm-2";
/// rly path between the controller and the host chain
pub const IBC_PATH: &str = "localwasm-1_localwasm-2";

pub const TRANSFER_PORT: &str = "transfer";
pub const LOCALHOST_CONNECTION_ID: &str = "connection-localhost";

/// genesis key used to store contracts and fund test accounts
pub const ACC_0_KEY: &str = "acc0";
/// genesis key acting as an unprivileged test user
pub const ACC_1_KEY: &str = "acc1";

pub const ICA_CONTROLLER_CONTRACT: &str = "cw_ica_controller";
pub const CALLBACK_COUNTER_CONTRACT: &str = "callback_counter";
pub const ICA_OWNER_CONTRACT: &str = "cw_ica_owner";

pub const EXECUTE_FLAGS: &str = "--gas=auto --gas-adjustment=3.0";

pub const FUND_AMOUNT: u128 = 10_000_000_000;
pub const ICA_FUND_AMOUNT: u128 = 1_000_000_000;
/// blocks to wait after setup before the first test runs
pub const SETUP_WAIT_BLOCKS: u64 = 5;
pub const START_POLL_ATTEMPTS: u32 = 300;

/// Label interchaintest attaches to every container it starts.
pub const CONTAINER_LABEL: &str = "ibc-test";

/// In-container files copied next to the logs of a failed test. Missing files are skipped.
pub const DIAGNOSTIC_FILES: &[&str] = &[
    "/var/cosmos-chain/wasmd/config/genesis.json",
    "/var/cosmos-chain/wasmd/config/config.toml",
    "/var/cosmos-chain/wasmd/config/app.toml",
    "/home/relayer/.relayer/config/config.yaml",
];

pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(180);
/// time for a submitted tx to show up in query results
pub const TX_TIMEOUT: Duration = Duration::from_secs(30);
pub const PACKET_TIMEOUT: Duration = Duration::from_secs(180);
/// ICA packet timeout used to force a timeout while the relayer is down
pub const SHORT_PACKET_TIMEOUT_SECS: u64 = 10;
/// amount of `stake` sent by the owner contract's predefined action
pub const PREDEFINED_ACTION_AMOUNT: u128 = 100;
pub const ICS20_VERSION: &str = "ics20-1";
