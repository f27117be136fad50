use std::collections::HashMap;

use localic_std::{errors::LocalError, relayer::Channel, transactions::ChainRequestBuilder};
use log::info;

use super::{
    config::SuiteConfig,
    constants::{ACC_0_KEY, LOCALHOST_CONNECTION_ID, TRANSFER_PORT},
    custom_error,
    ibc::{get_channels, get_ibc_denom},
    queries::query_connections,
    types::{ChainsVec, IdentifiedConnection},
};

const STATE_OPEN: &str = "STATE_OPEN";

pub struct TestContext {
    chains: HashMap<String, LocalChain>,
    // maps (src_chain_id, dest_chain_id) to transfer channel id
    transfer_channel_ids: HashMap<(String, String), String>,
    // maps (src_chain_id, dest_chain_id) to connection id
    connection_ids: HashMap<(String, String), String>,
    // maps (src_chain_id, dest_chain_id) to src chain native
    // denom -> ibc denom on dest chain
    ibc_denoms: HashMap<(String, String), String>,
}

pub struct LocalChain {
    /// ChainRequestBuilder
    pub rb: ChainRequestBuilder,
    /// contract codes stored on this chain (file stem -> code_id)
    pub contract_codes: HashMap<String, u64>,
    /// genesis accounts (key name -> address)
    pub accounts: HashMap<String, String>,
    pub admin_addr: String,
    pub native_denom: String,
    pub bech32_prefix: String,
}

impl LocalChain {
    pub fn new(
        rb: ChainRequestBuilder,
        accounts: HashMap<String, String>,
        native_denom: String,
        bech32_prefix: String,
    ) -> Result<Self, LocalError> {
        let admin_addr = accounts
            .get(ACC_0_KEY)
            .cloned()
            .ok_or_else(|| custom_error(format!("{} has no {ACC_0_KEY} account", rb.chain_id)))?;

        Ok(Self {
            rb,
            contract_codes: Default::default(),
            accounts,
            admin_addr,
            native_denom,
            bech32_prefix,
        })
    }

    pub fn code_id(&self, contract: &str) -> Result<u64, LocalError> {
        self.contract_codes.get(contract).copied().ok_or_else(|| {
            custom_error(format!(
                "contract {contract} not stored on {}",
                self.rb.chain_id
            ))
        })
    }

    pub fn account(&self, key: &str) -> Result<&str, LocalError> {
        self.accounts
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| custom_error(format!("no account {key} on {}", self.rb.chain_id)))
    }
}

impl TestContext {
    pub fn new(chains: ChainsVec, config: &SuiteConfig) -> Result<Self, LocalError> {
        let mut chains_map = HashMap::new();
        for chain in chains.chains {
            let rb = ChainRequestBuilder::new(
                config.api_url.clone(),
                chain.chain_id.clone(),
                chain.debugging,
            )?;

            let accounts = chain
                .genesis
                .accounts
                .iter()
                .map(|acc| (acc.name.clone(), acc.address.clone()))
                .collect();

            let local_chain = LocalChain::new(rb, accounts, chain.denom, chain.bech32_prefix)?;
            chains_map.insert(chain.chain_id, local_chain);
        }

        Ok(Self {
            chains: chains_map,
            transfer_channel_ids: HashMap::new(),
            connection_ids: HashMap::new(),
            ibc_denoms: HashMap::new(),
        })
    }

    /// Records the open connection and, if present, the transfer channel pair
    /// between `a` and `b`.
    pub fn discover_topology(&mut self, a: &str, b: &str) -> Result<(), LocalError> {
        let a_chain = self.get_chain(a)?;
        let b_chain = self.get_chain(b)?;
        let a_denom = a_chain.native_denom.clone();
        let b_denom = b_chain.native_denom.clone();

        let (a_conn, b_conn) = find_pairwise_connection_ids(
            &query_connections(&a_chain.rb)?,
            &query_connections(&b_chain.rb)?,
        )
        .ok_or_else(|| custom_error(format!("no open connection between {a} and {b}")))?;
        let transfer_channels = find_pairwise_transfer_channel_ids(
            &get_channels(&a_chain.rb)?,
            &get_channels(&b_chain.rb)?,
        );

        info!("connection {a}:{a_conn} <-> {b}:{b_conn}");
        self.insert_connection(a, b, &a_conn);
        self.insert_connection(b, a, &b_conn);

        match transfer_channels {
            Ok((a_chan, b_chan)) => {
                info!("transfer channel {a}:{a_chan} <-> {b}:{b_chan}");

                // a denom arriving on b is prefixed with b's end of the channel
                self.ibc_denoms.insert(
                    (a.to_string(), b.to_string()),
                    get_ibc_denom(&a_denom, &b_chan),
                );
                self.ibc_denoms.insert(
                    (b.to_string(), a.to_string()),
                    get_ibc_denom(&b_denom, &a_chan),
                );
                self.transfer_channel_ids
                    .insert((a.to_string(), b.to_string()), a_chan);
                self.transfer_channel_ids
                    .insert((b.to_string(), a.to_string()), b_chan);
            }
            Err(e) => info!("no transfer channel between {a} and {b}: {e:?}"),
        }

        Ok(())
    }

    /// Both ends of the ICA channel live on `chain`, over the 09-localhost client.
    pub fn use_localhost(&mut self, chain: &str) {
        self.insert_connection(chain, chain, LOCALHOST_CONNECTION_ID);
    }

    fn insert_connection(&mut self, src: &str, dest: &str, connection_id: &str) {
        self.connection_ids.insert(
            (src.to_string(), dest.to_string()),
            connection_id.to_string(),
        );
    }

    pub fn get_transfer_channels(&self) -> TestContextQuery {
        TestContextQuery::new(self, QueryType::TransferChannel)
    }

    pub fn get_connections(&self) -> TestContextQuery {
        TestContextQuery::new(self, QueryType::Connection)
    }

    pub fn get_ibc_denoms(&self) -> TestContextQuery {
        TestContextQuery::new(self, QueryType::IBCDenom)
    }

    pub fn get_request_builder(&self, chain_id: &str) -> Result<&ChainRequestBuilder, LocalError> {
        Ok(&self.get_chain(chain_id)?.rb)
    }

    pub fn get_chain(&self, chain_id: &str) -> Result<&LocalChain, LocalError> {
        self.chains
            .get(chain_id)
            .ok_or_else(|| custom_error(format!("unknown chain {chain_id}")))
    }

    pub fn get_mut_chain(&mut self, chain_id: &str) -> Result<&mut LocalChain, LocalError> {
        self.chains
            .get_mut(chain_id)
            .ok_or_else(|| custom_error(format!("unknown chain {chain_id}")))
    }
}

#[derive(Debug)]
pub enum QueryType {
    TransferChannel,
    Connection,
    IBCDenom,
}

pub struct TestContextQuery<'a> {
    context: &'a TestContext,
    query_type: QueryType,
    src_chain: Option<String>,
    dest_chain: Option<String>,
}

impl<'a> TestContextQuery<'a> {
    pub fn new(context: &'a TestContext, query_type: QueryType) -> Self {
        Self {
            context,
            query_type,
            src_chain: None,
            dest_chain: None,
        }
    }

    pub fn src(mut self, src_chain: &str) -> Self {
        self.src_chain = Some(src_chain.to_string());
        self
    }

    pub fn dest(mut self, dest_chain: &str) -> Self {
        self.dest_chain = Some(dest_chain.to_string());
        self
    }

    pub fn get(self) -> Result<String, LocalError> {
        let query_response = match self.query_type {
            QueryType::TransferChannel => self.get_pairwise(&self.context.transfer_channel_ids),
            QueryType::Connection => self.get_pairwise(&self.context.connection_ids),
            QueryType::IBCDenom => self.get_pairwise(&self.context.ibc_denoms),
        };
        query_response.ok_or_else(|| {
            custom_error(format!(
                "no {:?} for {:?} -> {:?}",
                self.query_type, self.src_chain, self.dest_chain
            ))
        })
    }

    fn get_pairwise(&self, map: &HashMap<(String, String), String>) -> Option<String> {
        if let (Some(src), Some(dest)) = (&self.src_chain, &self.dest_chain) {
            map.get(&(src.clone(), dest.clone())).cloned()
        } else {
            None
        }
    }
}

/// Finds an open connection on `a` whose counterparty is an open connection on `b`.
pub fn find_pairwise_connection_ids(
    a: &[IdentifiedConnection],
    b: &[IdentifiedConnection],
) -> Option<(String, String)> {
    a.iter()
        .filter(|conn| conn.state == STATE_OPEN)
        .find_map(|a_conn| {
            b.iter()
                .find(|b_conn| {
                    b_conn.state == STATE_OPEN
                        && b_conn.id == a_conn.counterparty.connection_id
                        && b_conn.counterparty.connection_id == a_conn.id
                })
                .map(|b_conn| (a_conn.id.clone(), b_conn.id.clone()))
        })
}

/// Finds an open unordered transfer channel on `a` whose counterparty is on `b`
/// and returns the channel ids of both ends.
pub fn find_pairwise_transfer_channel_ids(
    a: &[Channel],
    b: &[Channel],
) -> Result<(String, String), LocalError> {
    for a_chan in a {
        for b_chan in b {
            if a_chan.channel_id == b_chan.counterparty.channel_id
                && b_chan.channel_id == a_chan.counterparty.channel_id
                && a_chan.port_id == TRANSFER_PORT
                && b_chan.port_id == TRANSFER_PORT
                && a_chan.ordering == "ORDER_UNORDERED"
                && b_chan.ordering == "ORDER_UNORDERED"
                && a_chan.state == STATE_OPEN
                && b_chan.state == STATE_OPEN
            {
                return Ok((a_chan.channel_id.clone(), b_chan.channel_id.clone()));
            }
        }
    }
    Err(custom_error("failed to match pairwise transfer channels"))
}
