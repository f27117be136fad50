use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    Addr, AllBalanceResponse, BalanceResponse, Binary, ContractInfoResponse, IbcChannel,
    IbcPacket, SupplyResponse,
};

use crate::controller::TxEncoding;

/// Callback message the controller sends to its callback address
/// for every step of the packet and channel lifecycle.
#[cw_serde]
pub enum IcaControllerCallbackMsg {
    OnAcknowledgementPacketCallback {
        ica_acknowledgement: Data,
        original_packet: IbcPacket,
        relayer: Addr,
        query_result: Option<IcaQueryResult>,
    },
    OnTimeoutPacketCallback {
        original_packet: IbcPacket,
        relayer: Addr,
    },
    OnChannelOpenAckCallback {
        channel: IbcChannel,
        ica_address: String,
        tx_encoding: TxEncoding,
    },
}

impl IcaControllerCallbackMsg {
    /// Sequence of the packet this callback refers to, if any.
    pub fn packet_sequence(&self) -> Option<u64> {
        match self {
            IcaControllerCallbackMsg::OnAcknowledgementPacketCallback {
                original_packet, ..
            }
            | IcaControllerCallbackMsg::OnTimeoutPacketCallback {
                original_packet, ..
            } => Some(original_packet.sequence),
            IcaControllerCallbackMsg::OnChannelOpenAckCallback { .. } => None,
        }
    }
}

/// Acknowledgement data of an ICA packet.
#[cw_serde]
pub enum Data {
    /// Execution result on the host chain, the encoded `MsgExecResponse`.
    Result(Binary),
    /// Error string returned by the host.
    Error(String),
}

impl Data {
    pub fn is_success(&self) -> bool {
        matches!(self, Data::Result(_))
    }
}

#[cw_serde]
pub enum IcaQueryResult {
    Success {
        responses: Vec<IcaQueryResponse>,
        height: u64,
    },
    Error(String),
}

#[cw_serde]
pub enum IcaQueryResponse {
    Bank(BankQueryResponse),
    Stargate { data: Binary, path: String },
    Wasm(WasmQueryResponse),
}

#[cw_serde]
pub enum BankQueryResponse {
    Supply(SupplyResponse),
    Balance(BalanceResponse),
    AllBalances(AllBalanceResponse),
}

#[cw_serde]
pub enum WasmQueryResponse {
    ContractInfo(ContractInfoResponse),
    Smart(Binary),
    Raw(Binary),
}
