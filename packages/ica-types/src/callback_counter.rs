use cosmwasm_schema::{cw_serde, QueryResponses};

use crate::callbacks::IcaControllerCallbackMsg;

#[cw_serde]
pub struct InstantiateMsg {}

#[cw_serde]
pub enum ExecuteMsg {
    ReceiveIcaCallback(IcaControllerCallbackMsg),
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(CallbackCounter)]
    GetCallbackCounter {},
}

/// Callbacks recorded by the counter contract, bucketed by outcome.
#[cw_serde]
#[derive(Default)]
pub struct CallbackCounter {
    pub success: Vec<IcaControllerCallbackMsg>,
    pub error: Vec<IcaControllerCallbackMsg>,
    pub timeout: Vec<IcaControllerCallbackMsg>,
}

impl CallbackCounter {
    pub fn total(&self) -> usize {
        self.success.len() + self.error.len() + self.timeout.len()
    }
}
