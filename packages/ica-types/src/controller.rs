use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, CosmosMsg, Empty, IbcChannel, IbcOrder, QueryRequest};

use crate::ownership::{Ownership, OwnershipAction};

/// Port id the controller binds its ICA channels to.
pub const ICA_CONTROLLER_PORT_PREFIX: &str = "wasm.";
/// Port id of the ICA host module on the counterparty chain.
pub const ICA_HOST_PORT: &str = "icahost";

#[cw_serde]
pub struct InstantiateMsg {
    /// owner of the contract. defaults to the instantiator
    pub owner: Option<String>,
    /// options used to initiate the channel handshake upon instantiation
    pub channel_open_init_options: ChannelOpenInitOptions,
    /// contract that receives the packet lifecycle callbacks
    pub send_callbacks_to: Option<String>,
}

/// Options for the ChanOpenInit step of the ICA channel handshake.
#[cw_serde]
pub struct ChannelOpenInitOptions {
    /// connection id on this chain
    pub connection_id: String,
    /// connection id on the counterparty chain
    pub counterparty_connection_id: String,
    /// defaults to `icahost`
    pub counterparty_port_id: Option<String>,
    /// defaults to an ordered channel
    pub channel_ordering: Option<IbcOrder>,
}

impl ChannelOpenInitOptions {
    pub fn new(
        connection_id: impl Into<String>,
        counterparty_connection_id: impl Into<String>,
    ) -> Self {
        Self {
            connection_id: connection_id.into(),
            counterparty_connection_id: counterparty_connection_id.into(),
            counterparty_port_id: None,
            channel_ordering: None,
        }
    }

    pub fn with_ordering(mut self, ordering: IbcOrder) -> Self {
        self.channel_ordering = Some(ordering);
        self
    }
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Starts a new channel handshake. If options are omitted, the ones
    /// provided at instantiation are reused.
    CreateChannel {
        channel_open_init_options: Option<ChannelOpenInitOptions>,
    },
    /// Closes the ICA channel.
    CloseChannel {},
    /// Sends cosmos messages (and queries) to be executed by the interchain account.
    SendCosmosMsgs {
        messages: Vec<CosmosMsg>,
        #[serde(default)]
        queries: Vec<QueryRequest<Empty>>,
        packet_memo: Option<String>,
        /// defaults to the contract's default timeout
        timeout_seconds: Option<u64>,
    },
    UpdateCallbackAddress {
        callback_address: Option<String>,
    },
    UpdateOwnership(OwnershipAction),
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ChannelState)]
    GetChannel {},
    #[returns(ContractState)]
    GetContractState {},
    #[returns(Ownership)]
    Ownership {},
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct ContractState {
    /// set once the channel open ack arrives
    pub ica_info: Option<IcaInfo>,
    pub callback_address: Option<Addr>,
}

#[cw_serde]
pub struct IcaInfo {
    pub ica_address: String,
    pub channel_id: String,
    pub encoding: TxEncoding,
}

#[cw_serde]
pub enum TxEncoding {
    #[serde(rename = "proto3")]
    Protobuf,
    #[serde(rename = "proto3json")]
    Proto3Json,
}

#[cw_serde]
pub struct ChannelState {
    pub channel: IbcChannel,
    pub channel_status: ChannelStatus,
}

impl ChannelState {
    pub fn is_open(&self) -> bool {
        self.channel_status == ChannelStatus::Open
    }
}

/// Channel state names as reported by ibc-go.
#[cw_serde]
pub enum ChannelStatus {
    #[serde(rename = "STATE_UNINITIALIZED_UNSPECIFIED")]
    Uninitialized,
    #[serde(rename = "STATE_INIT")]
    Init,
    #[serde(rename = "STATE_TRYOPEN")]
    TryOpen,
    #[serde(rename = "STATE_OPEN")]
    Open,
    #[serde(rename = "STATE_CLOSED")]
    Closed,
    #[serde(rename = "STATE_FLUSHING")]
    Flushing,
    #[serde(rename = "STATE_FLUSHCOMPLETE")]
    FlushComplete,
}

impl std::fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChannelStatus::Uninitialized => "STATE_UNINITIALIZED_UNSPECIFIED",
            ChannelStatus::Init => "STATE_INIT",
            ChannelStatus::TryOpen => "STATE_TRYOPEN",
            ChannelStatus::Open => "STATE_OPEN",
            ChannelStatus::Closed => "STATE_CLOSED",
            ChannelStatus::Flushing => "STATE_FLUSHING",
            ChannelStatus::FlushComplete => "STATE_FLUSHCOMPLETE",
        };
        f.write_str(s)
    }
}
