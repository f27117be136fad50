use std::collections::HashMap;

use serde::Deserialize;

/// local-ic chain configuration file.
#[derive(Deserialize, Debug)]
pub struct ChainsVec {
    pub chains: Vec<ConfigChain>,
}

impl ChainsVec {
    pub fn get(&self, chain_id: &str) -> Option<&ConfigChain> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }
}

#[derive(Deserialize, Debug)]
pub struct ConfigChain {
    pub name: String,
    pub chain_id: String,
    pub chain_type: Option<String>,
    pub coin_type: i32,
    pub binary: String,
    pub bech32_prefix: String,
    pub denom: String,
    pub trusting_period: String,
    #[serde(default)]
    pub debugging: bool,
    pub block_time: String,
    pub docker_image: DockerImage,
    pub gas_prices: String,
    pub gas_adjustment: f64,
    pub number_vals: i32,
    pub number_node: i32,
    pub host_port_override: Option<HashMap<String, String>>,
    pub ibc_paths: Option<Vec<String>>,
    pub genesis: Genesis,
}

impl ConfigChain {
    pub fn genesis_account(&self, name: &str) -> Option<&GenesisAccount> {
        self.genesis.accounts.iter().find(|acc| acc.name == name)
    }
}

#[derive(Deserialize, Debug)]
pub struct DockerImage {
    pub repository: Option<String>,
    pub version: String,
}

#[derive(Deserialize, Debug)]
pub struct Genesis {
    #[serde(default)]
    pub modify: Vec<KVStore>,
    pub accounts: Vec<GenesisAccount>,
}

#[derive(Deserialize, Debug)]
pub struct KVStore {
    pub key: String,
    pub value: serde_json::Value,
}

#[derive(Deserialize, Debug)]
pub struct GenesisAccount {
    pub name: String,
    pub amount: String,
    pub address: String,
    pub mnemonic: String,
}

/// Connection as returned by `q ibc connection connections`.
#[derive(Deserialize, Debug, Clone)]
pub struct IdentifiedConnection {
    pub id: String,
    pub client_id: String,
    pub state: String,
    pub counterparty: ConnectionCounterparty,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ConnectionCounterparty {
    pub client_id: String,
    #[serde(default)]
    pub connection_id: String,
}
