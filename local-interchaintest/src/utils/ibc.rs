use localic_std::{
    errors::LocalError,
    relayer::{Channel, Relayer},
    transactions::ChainRequestBuilder,
};
use log::{info, warn};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::{constants::TRANSFER_PORT, custom_error};

#[derive(Debug, PartialEq)]
pub struct DenomTrace {
    pub path: String,
    pub base_denom: String,
}

impl DenomTrace {
    pub fn ibc_denom(&self) -> String {
        if !self.path.is_empty() {
            return format!("ibc/{}", self.hash());
        }
        self.base_denom.clone()
    }

    fn hash(&self) -> String {
        let trace = format!("{}/{}", self.path, self.base_denom);
        let mut hasher = Sha256::new();
        hasher.update(trace.as_bytes());
        hex::encode_upper(hasher.finalize())
    }
}

/// Denom of `native_denom` after one hop over the transfer `channel_id` of the receiving chain.
pub fn get_ibc_denom(native_denom: &str, channel_id: &str) -> String {
    let prefixed_denom = get_prefixed_denom(TRANSFER_PORT, channel_id, native_denom);

    parse_denom_trace(&prefixed_denom).ibc_denom()
}

pub fn get_multihop_ibc_denom(native_denom: &str, channel_trace: &[&str]) -> String {
    let mut port_channel_trace = vec![];

    for channel in channel_trace {
        port_channel_trace.push(TRANSFER_PORT);
        port_channel_trace.push(channel);
    }

    let prefixed_denom = format!("{}/{}", port_channel_trace.join("/"), native_denom);

    parse_denom_trace(&prefixed_denom).ibc_denom()
}

pub fn get_prefixed_denom(port_id: &str, channel_id: &str, native_denom: &str) -> String {
    format!("{}/{}/{}", port_id, channel_id, native_denom)
}

pub fn parse_denom_trace(raw_denom: &str) -> DenomTrace {
    let denom_split = raw_denom.split('/').collect::<Vec<&str>>();

    if denom_split[0] == raw_denom {
        return DenomTrace {
            path: "".to_string(),
            base_denom: raw_denom.to_string(),
        };
    }

    let (path, base_denom) = extract_path_and_base_from_full_denom(&denom_split);

    DenomTrace { path, base_denom }
}

pub fn extract_path_and_base_from_full_denom(full_denom_items: &[&str]) -> (String, String) {
    let mut path: Vec<&str> = Vec::new();
    let mut base_denom: Vec<&str> = Vec::new();

    let length = full_denom_items.len();
    let mut i = 0;
    while i < length {
        if i < length - 1 && length > 2 {
            path.push(full_denom_items[i]);
            path.push(full_denom_items[i + 1]);
        } else {
            base_denom = full_denom_items[i..].to_vec();
            break;
        }
        i += 2;
    }

    (path.join("/"), base_denom.join("/"))
}

/// Relayer lifecycle actions understood by the local-ic API.
pub enum RelayerAction {
    Start,
    Stop,
}

impl RelayerAction {
    pub fn to_request_body(&self, chain_id: &str) -> Value {
        let action = match self {
            RelayerAction::Start => "start-relayer",
            RelayerAction::Stop => "stop-relayer",
        };
        serde_json::json!({ "chain_id": chain_id, "action": action })
    }
}

fn relayer_request(rb: &ChainRequestBuilder, action: RelayerAction) -> Result<(), LocalError> {
    let response = reqwest::blocking::Client::default()
        .post(&rb.api)
        .json(&action.to_request_body(&rb.chain_id))
        .send()
        .map_err(custom_error)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(custom_error(format!(
            "relayer request failed with {status}: {body}"
        )));
    }
    Ok(())
}

pub fn start_relayer(rb: &ChainRequestBuilder) -> Result<(), LocalError> {
    info!("starting relayer");
    relayer_request(rb, RelayerAction::Start)
}

pub fn stop_relayer(rb: &ChainRequestBuilder) -> Result<(), LocalError> {
    info!("stopping relayer");
    relayer_request(rb, RelayerAction::Stop)
}

/// Stops the relayer until the returned guard is resumed or dropped.
pub fn pause_relayer(rb: &ChainRequestBuilder) -> Result<RelayerPause<'_>, LocalError> {
    stop_relayer(rb)?;
    Ok(RelayerPause {
        rb,
        resumed: false,
    })
}

/// Keeps the relayer stopped. A test that fails while holding it still leaves
/// the relayer running for the next one.
pub struct RelayerPause<'a> {
    rb: &'a ChainRequestBuilder,
    resumed: bool,
}

impl RelayerPause<'_> {
    pub fn resume(mut self) -> Result<(), LocalError> {
        self.resumed = true;
        start_relayer(self.rb)
    }
}

impl Drop for RelayerPause<'_> {
    fn drop(&mut self) {
        if !self.resumed {
            if let Err(e) = start_relayer(self.rb) {
                warn!("failed to restart relayer: {e:?}");
            }
        }
    }
}

/// Creates light clients and a connection between the ends of `path`.
pub fn create_connection(rb: &ChainRequestBuilder, path: &str) -> Result<Value, LocalError> {
    info!("creating connection on {path}");
    Relayer::new(rb).create_connection(path)
}

/// Opens a channel on top of the existing connection of `path`.
pub fn create_channel(
    rb: &ChainRequestBuilder,
    path: &str,
    src_port: &str,
    dst_port: &str,
    order: &str,
    version: &str,
) -> Result<Value, LocalError> {
    info!("creating {order} channel {src_port} <-> {dst_port} on {path}");
    Relayer::new(rb).create_channel(path, src_port, dst_port, order, version)
}

/// Relays all pending packets and acknowledgements on `channel_id`.
pub fn flush(rb: &ChainRequestBuilder, path: &str, channel_id: &str) -> Result<Value, LocalError> {
    info!("flushing {channel_id} on {path}");
    Relayer::new(rb).flush(path, channel_id)
}

/// Channels of the chain `rb` points at, as seen by the relayer.
pub fn get_channels(rb: &ChainRequestBuilder) -> Result<Vec<Channel>, LocalError> {
    Relayer::new(rb).get_channels(&rb.chain_id)
}
