use std::time::Duration;

use ica_types::owner::{
    ExecuteMsg, IcaContractState, IcaState, InstantiateMsg, OwnerContractState, QueryMsg,
};
use localic_std::errors::LocalError;

use super::contract::Contract;
use crate::utils::polling::{poll_until, DEFAULT_POLL_INTERVAL};

pub type OwnerContract<'a> = Contract<'a, InstantiateMsg, ExecuteMsg, QueryMsg>;

impl OwnerContract<'_> {
    pub fn query_owner_state(&self) -> Result<OwnerContractState, LocalError> {
        self.query(&QueryMsg::GetContractState {})
    }

    pub fn query_ica_contract_state(&self, ica_id: u64) -> Result<IcaContractState, LocalError> {
        self.query(&QueryMsg::GetIcaContractState { ica_id })
    }

    pub fn query_ica_count(&self) -> Result<u64, LocalError> {
        self.query(&QueryMsg::GetIcaCount {})
    }

    /// Waits for the controller `ica_id` to report its handshake back to the owner.
    pub fn wait_for_ica_state(
        &self,
        ica_id: u64,
        timeout: Duration,
    ) -> Result<IcaState, LocalError> {
        poll_until(
            timeout,
            DEFAULT_POLL_INTERVAL,
            &format!("ica {ica_id} of {}", self.address),
            || Ok(self.query_ica_contract_state(ica_id)?.ica_state),
        )
    }
}
