use std::time::Duration;

use ica_types::callback_counter::{CallbackCounter, ExecuteMsg, InstantiateMsg, QueryMsg};
use localic_std::errors::LocalError;

use super::contract::Contract;
use crate::utils::polling::{poll_until, DEFAULT_POLL_INTERVAL};

pub type CallbackCounterContract<'a> = Contract<'a, InstantiateMsg, ExecuteMsg, QueryMsg>;

impl CallbackCounterContract<'_> {
    pub fn query_callback_counter(&self) -> Result<CallbackCounter, LocalError> {
        self.query(&QueryMsg::GetCallbackCounter {})
    }

    /// Waits until at least `total` callbacks of any kind were recorded.
    pub fn wait_for_callbacks(
        &self,
        total: usize,
        timeout: Duration,
    ) -> Result<CallbackCounter, LocalError> {
        poll_until(
            timeout,
            DEFAULT_POLL_INTERVAL,
            &format!("{total} callbacks on {}", self.address),
            || {
                let counter = self.query_callback_counter()?;
                Ok((counter.total() >= total).then_some(counter))
            },
        )
    }
}
