use std::{marker::PhantomData, path::Path};

use localic_std::{
    errors::LocalError,
    modules::cosmwasm::{contract_execute, contract_query, CosmWasm},
    transactions::ChainRequestBuilder,
};
use log::info;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::utils::{
    constants::{EXECUTE_FLAGS, TX_TIMEOUT},
    custom_error,
    polling::{poll_until, DEFAULT_POLL_INTERVAL},
    queries::{check_tx_response, decode_field, query_contract_code_id},
};

/// A contract deployed on a chain, typed by its instantiate, execute and query messages.
///
/// The request builder doubles as the query client: every call goes through the
/// chain node the builder points at.
pub struct Contract<'a, I, E, Q> {
    pub address: String,
    pub code_id: u64,
    rb: &'a ChainRequestBuilder,
    _msgs: PhantomData<fn() -> (I, E, Q)>,
}

impl<'a, I, E, Q> Contract<'a, I, E, Q>
where
    I: Serialize,
    E: Serialize,
    Q: Serialize,
{
    pub fn new_from_existing(rb: &'a ChainRequestBuilder, address: &str, code_id: u64) -> Self {
        Self {
            address: address.to_string(),
            code_id,
            rb,
            _msgs: PhantomData,
        }
    }

    pub fn instantiate(
        rb: &'a ChainRequestBuilder,
        key: &str,
        code_id: u64,
        msg: &I,
        label: &str,
        admin: Option<&str>,
    ) -> Result<Self, LocalError> {
        let mut cw = CosmWasm::new_from_existing(rb, None, Some(code_id), None);
        cw.instantiate(key, &to_json(msg)?, label, admin, EXECUTE_FLAGS)?;

        let address = cw
            .contract_addr
            .ok_or_else(|| custom_error(format!("instantiate of {label} returned no address")))?;
        info!("instantiated {label} (code {code_id}) at {address}");

        Ok(Self::new_from_existing(rb, &address, code_id))
    }

    pub fn store_and_instantiate(
        rb: &'a ChainRequestBuilder,
        key: &str,
        wasm: &Path,
        msg: &I,
        label: &str,
        admin: Option<&str>,
    ) -> Result<Self, LocalError> {
        let abs_path = wasm.canonicalize().map_err(custom_error)?;
        let code_id = CosmWasm::new(rb).store(key, abs_path.as_path())?;

        Self::instantiate(rb, key, code_id, msg, label, admin)
    }

    pub fn execute(&self, key: &str, msg: &E) -> Result<(), LocalError> {
        self.execute_with_flags(key, msg, EXECUTE_FLAGS)
    }

    pub fn execute_with_flags(&self, key: &str, msg: &E, flags: &str) -> Result<(), LocalError> {
        contract_execute(self.rb, &self.address, key, &to_json(msg)?, flags)?;
        Ok(())
    }

    /// Runs a smart query and decodes its `data` field.
    pub fn query<R: DeserializeOwned>(&self, msg: &Q) -> Result<R, LocalError> {
        let response = contract_query(self.rb, &self.address, &to_json(msg)?);
        decode_query_response(&response)
    }

    /// Migrates to `new_code_id`. The tracked code id only changes once the chain
    /// reports the new one, so a rejected migration leaves it untouched.
    pub fn migrate<M: Serialize>(
        &mut self,
        key: &str,
        new_code_id: u64,
        msg: &M,
    ) -> Result<Value, LocalError> {
        let cmd = format!(
            "tx wasm migrate {} {new_code_id} {} --from={key} --output=json {EXECUTE_FLAGS}",
            self.address,
            to_json(msg)?
        );
        let response = self.rb.tx(&cmd, true)?;
        check_tx_response(&response)?;

        poll_until(
            TX_TIMEOUT,
            DEFAULT_POLL_INTERVAL,
            &format!("{} on code {new_code_id}", self.address),
            || Ok((self.query_code_id()? == new_code_id).then_some(())),
        )?;
        info!("migrated {} from code {} to {new_code_id}", self.address, self.code_id);
        self.code_id = new_code_id;

        Ok(response)
    }

    /// Code id as reported by the chain, as opposed to the one tracked locally.
    pub fn query_code_id(&self) -> Result<u64, LocalError> {
        query_contract_code_id(self.rb, &self.address)
    }
}

pub fn to_json<T: Serialize>(msg: &T) -> Result<String, LocalError> {
    serde_json::to_string(msg).map_err(custom_error)
}

pub fn decode_query_response<R: DeserializeOwned>(response: &Value) -> Result<R, LocalError> {
    decode_field(response, "data")
}

#[cfg(test)]
mod tests {
    use ica_types::{
        callback_counter::CallbackCounter,
        controller::{ContractState, QueryMsg},
    };
    use serde_json::json;

    use super::*;

    #[test]
    fn test_to_json_matches_contract_schema() {
        assert_eq!(to_json(&QueryMsg::GetChannel {}).unwrap(), r#"{"get_channel":{}}"#);
    }

    #[test]
    fn test_decode_query_response() {
        let response = json!({
            "data": { "success": [], "error": [], "timeout": [] }
        });
        let counter: CallbackCounter = decode_query_response(&response).unwrap();
        assert_eq!(counter.total(), 0);

        let state: ContractState = decode_query_response(&json!({
            "data": { "ica_info": null, "callback_address": "wasm1counter" }
        }))
        .unwrap();
        assert!(state.ica_info.is_none());
    }

    #[test]
    fn test_decode_query_response_keeps_raw_error() {
        let err = decode_query_response::<CallbackCounter>(&json!({
            "error": "query wasm contract failed: not found"
        }))
        .unwrap_err();

        assert!(matches!(err, LocalError::Custom { ref msg } if msg.contains("not found")));
    }
}
