use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Addr;

use crate::{
    callbacks::IcaControllerCallbackMsg,
    controller::{ChannelOpenInitOptions, ChannelState, TxEncoding},
};

#[cw_serde]
pub struct InstantiateMsg {
    pub admin: Option<String>,
    pub ica_controller_code_id: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Instantiates a new controller owned by this contract.
    CreateIcaContract {
        salt: Option<String>,
        channel_open_init_options: ChannelOpenInitOptions,
    },
    /// Makes the ICA `ica_id` send a fixed amount of `stake` to `to_address`.
    SendPredefinedAction { ica_id: u64, to_address: String },
    ReceiveIcaCallback(IcaControllerCallbackMsg),
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(OwnerContractState)]
    GetContractState {},
    #[returns(IcaContractState)]
    GetIcaContractState { ica_id: u64 },
    #[returns(u64)]
    GetIcaCount {},
}

#[cw_serde]
pub struct OwnerContractState {
    pub admin: Addr,
    pub ica_controller_code_id: u64,
}

#[cw_serde]
pub struct IcaContractState {
    pub contract_addr: Addr,
    /// set once the controller reports a completed handshake
    pub ica_state: Option<IcaState>,
}

#[cw_serde]
pub struct IcaState {
    pub ica_id: u64,
    pub ica_addr: String,
    pub tx_encoding: TxEncoding,
    pub channel_state: ChannelState,
}
