use std::time::Duration;

use cosmwasm_std::{CosmosMsg, Empty, QueryRequest};
use ica_types::{
    controller::{
        ChannelState, ChannelStatus, ContractState, ExecuteMsg, IcaInfo, InstantiateMsg, QueryMsg,
    },
    ownership::Ownership,
};
use localic_std::errors::LocalError;
use log::info;

use super::contract::Contract;
use crate::utils::polling::{poll_until, DEFAULT_POLL_INTERVAL};

pub type IcaContract<'a> = Contract<'a, InstantiateMsg, ExecuteMsg, QueryMsg>;

impl IcaContract<'_> {
    pub fn query_contract_state(&self) -> Result<ContractState, LocalError> {
        self.query(&QueryMsg::GetContractState {})
    }

    pub fn query_channel_state(&self) -> Result<ChannelState, LocalError> {
        self.query(&QueryMsg::GetChannel {})
    }

    pub fn query_ownership(&self) -> Result<Ownership, LocalError> {
        self.query(&QueryMsg::Ownership {})
    }

    pub fn wait_for_channel_status(
        &self,
        status: ChannelStatus,
        timeout: Duration,
    ) -> Result<ChannelState, LocalError> {
        let state = poll_until(
            timeout,
            DEFAULT_POLL_INTERVAL,
            &format!("{} channel {status}", self.address),
            || {
                // the channel query fails until the handshake has started
                Ok(self
                    .query_channel_state()
                    .ok()
                    .filter(|state| state.channel_status == status))
            },
        )?;
        info!("{} channel is {status}", self.address);
        Ok(state)
    }

    /// Waits for the open ack callback to record the interchain account.
    pub fn wait_for_ica_info(&self, timeout: Duration) -> Result<IcaInfo, LocalError> {
        poll_until(
            timeout,
            DEFAULT_POLL_INTERVAL,
            &format!("{} ica address", self.address),
            || Ok(self.query_contract_state()?.ica_info),
        )
    }

    pub fn send_cosmos_msgs(
        &self,
        key: &str,
        messages: Vec<CosmosMsg>,
        queries: Vec<QueryRequest<Empty>>,
        timeout_seconds: Option<u64>,
    ) -> Result<(), LocalError> {
        self.execute(
            key,
            &ExecuteMsg::SendCosmosMsgs {
                messages,
                queries,
                packet_memo: None,
                timeout_seconds,
            },
        )
    }
}
