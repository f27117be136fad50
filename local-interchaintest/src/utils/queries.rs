use std::time::Duration;

use cosmwasm_std::Coin;
use localic_std::{errors::LocalError, transactions::ChainRequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{
    custom_error,
    polling::{poll_until, DEFAULT_POLL_INTERVAL},
    types::IdentifiedConnection,
};

/// Decodes `value[key]`, keeping the raw response in the error.
pub fn decode_field<T: DeserializeOwned>(value: &Value, key: &str) -> Result<T, LocalError> {
    let field = value
        .get(key)
        .ok_or_else(|| custom_error(format!("missing `{key}` in response: {value}")))?;
    serde_json::from_value(field.clone())
        .map_err(|e| custom_error(format!("failed to decode `{key}`: {e}, response: {value}")))
}

/// Protobuf JSON renders 64 bit integers as strings.
pub fn parse_u128(value: &Value) -> Result<u128, LocalError> {
    match value {
        Value::String(s) => s.parse().map_err(custom_error),
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| custom_error(format!("not an unsigned integer: {n}"))),
        other => Err(custom_error(format!("not an integer: {other}"))),
    }
}

/// Balance of `denom` held by `address`. A failed query is an error, not a zero balance.
pub fn query_balance(
    rb: &ChainRequestBuilder,
    address: &str,
    denom: &str,
) -> Result<u128, LocalError> {
    let response = rb.q(&format!("bank balances {address} --output=json"), false);
    balance_of(&response, denom)
}

fn balance_of(response: &Value, denom: &str) -> Result<u128, LocalError> {
    let balances: Vec<Coin> = decode_field(response, "balances")?;
    Ok(balances
        .into_iter()
        .find(|coin| coin.denom == denom)
        .map(|coin| coin.amount.u128())
        .unwrap_or_default())
}

/// Fails with the raw log when a broadcast transaction was rejected.
/// Protobuf JSON omits a zero `code`.
pub fn check_tx_response(response: &Value) -> Result<(), LocalError> {
    let code = match response.get("code") {
        None | Some(Value::Null) => 0,
        Some(code) => parse_u128(code)?,
    };
    if code != 0 {
        return Err(custom_error(format!(
            "tx failed with code {code}: {}",
            response["raw_log"].as_str().unwrap_or_default()
        )));
    }
    Ok(())
}

/// Waits until `address` holds exactly `expected` of `denom`.
pub fn wait_for_balance(
    rb: &ChainRequestBuilder,
    address: &str,
    denom: &str,
    expected: u128,
    timeout: Duration,
) -> Result<u128, LocalError> {
    poll_until(
        timeout,
        DEFAULT_POLL_INTERVAL,
        &format!("{expected}{denom} on {address}"),
        || {
            let balance = query_balance(rb, address, denom)?;
            Ok((balance == expected).then_some(balance))
        },
    )
}

pub fn query_connections(
    rb: &ChainRequestBuilder,
) -> Result<Vec<IdentifiedConnection>, LocalError> {
    let response = rb.q("ibc connection connections --output=json", false);
    decode_field(&response, "connections")
}

/// Operator address of the first bonded validator.
pub fn query_bonded_validator(rb: &ChainRequestBuilder) -> Result<String, LocalError> {
    let response = rb.q("staking validators --output=json", false);
    bonded_validator(&response)
}

fn bonded_validator(response: &Value) -> Result<String, LocalError> {
    response["validators"]
        .as_array()
        .into_iter()
        .flatten()
        .find(|v| v["status"] == "BOND_STATUS_BONDED")
        .and_then(|v| v["operator_address"].as_str())
        .map(str::to_string)
        .ok_or_else(|| custom_error(format!("no bonded validator in response: {response}")))
}

pub fn query_delegation(
    rb: &ChainRequestBuilder,
    delegator: &str,
    validator: &str,
) -> Result<u128, LocalError> {
    let response = rb.q(
        &format!("staking delegation {delegator} {validator} --output=json"),
        false,
    );
    delegation_amount(&response)
}

fn delegation_amount(response: &Value) -> Result<u128, LocalError> {
    // older sdk versions return the delegation response unwrapped
    let delegation = response.get("delegation_response").unwrap_or(response);
    parse_u128(&delegation["balance"]["amount"])
}

pub fn query_contract_code_id(rb: &ChainRequestBuilder, address: &str) -> Result<u64, LocalError> {
    let response = rb.q(&format!("wasm contract {address} --output=json"), false);
    let code_id = parse_u128(&response["contract_info"]["code_id"])?;
    u64::try_from(code_id).map_err(custom_error)
}
