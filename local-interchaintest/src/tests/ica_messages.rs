use std::time::{SystemTime, UNIX_EPOCH};

use cosmos_sdk_proto::cosmos::{
    bank::v1beta1::MsgSend, base::v1beta1::Coin as ProtoCoin, staking::v1beta1::MsgDelegate,
};
use cosmwasm_std::{
    coins, BankMsg, BankQuery, Binary, Coin, CosmosMsg, IbcMsg, IbcOrder, IbcTimeout,
    QueryRequest, Timestamp,
};
use ica_types::{
    callback_counter::CallbackCounter,
    callbacks::{BankQueryResponse, IcaQueryResponse},
    controller::{ChannelStatus, ExecuteMsg},
    Data, IcaControllerCallbackMsg, IcaQueryResult,
};
use localic_std::errors::LocalError;
use prost::Message;

use crate::{
    suite::{IcaFixture, TestSuite},
    utils::{
        accounts::fresh_address,
        constants::{ACC_0_KEY, CONTROLLER_CHAIN_ID, ICA_FUND_AMOUNT, PACKET_TIMEOUT},
        custom_error,
        polling::{poll_until, DEFAULT_POLL_INTERVAL},
        queries::{query_balance, query_bonded_validator, query_delegation, wait_for_balance},
    },
};

const SEND_AMOUNT: u128 = 1_000;
const DELEGATE_AMOUNT: u128 = 10_000;
const TRANSFER_AMOUNT: u128 = 5_000;

/// Sends `messages` through the ICA and waits for the resulting callback.
fn send_and_wait(
    fixture: &IcaFixture,
    key: &str,
    messages: Vec<CosmosMsg>,
    queries: Vec<QueryRequest<cosmwasm_std::Empty>>,
) -> Result<(CallbackCounter, CallbackCounter), LocalError> {
    let before = fixture.counter.query_callback_counter()?;
    fixture.ica.send_cosmos_msgs(key, messages, queries, None)?;
    let after = fixture
        .counter
        .wait_for_callbacks(before.total() + 1, PACKET_TIMEOUT)?;
    Ok((before, after))
}

fn last_ack(counter: &CallbackCounter) -> Result<&IcaControllerCallbackMsg, LocalError> {
    counter
        .success
        .iter()
        .chain(counter.error.iter())
        .filter(|cb| cb.packet_sequence().is_some())
        .max_by_key(|cb| cb.packet_sequence())
        .ok_or_else(|| custom_error("no acknowledgement callback recorded"))
}

pub fn test_ica_bank_send(suite: &TestSuite) -> Result<(), LocalError> {
    let fixture = suite.setup_ica(IbcOrder::Ordered)?;
    let host = suite.host()?;
    let recipient = fresh_address(&host.bech32_prefix, "ica-bank-send")?;

    let send = CosmosMsg::Bank(BankMsg::Send {
        to_address: recipient.clone(),
        amount: coins(SEND_AMOUNT, &host.native_denom),
    });
    let (before, after) = send_and_wait(&fixture, ACC_0_KEY, vec![send], vec![])?;

    assert_eq!(after.success.len(), before.success.len() + 1);
    assert_eq!(after.error.len(), before.error.len());
    match last_ack(&after)? {
        IcaControllerCallbackMsg::OnAcknowledgementPacketCallback {
            ica_acknowledgement,
            query_result,
            ..
        } => {
            assert!(ica_acknowledgement.is_success());
            assert!(query_result.is_none());
        }
        other => panic!("unexpected callback {other:?}"),
    }

    assert_eq!(
        query_balance(&host.rb, &recipient, &host.native_denom)?,
        SEND_AMOUNT
    );
    assert_eq!(
        query_balance(&host.rb, &fixture.ica_info.ica_address, &host.native_denom)?,
        ICA_FUND_AMOUNT - SEND_AMOUNT
    );

    Ok(())
}

/// Protobuf encoded messages the contract has no `CosmosMsg` variant for.
pub fn test_ica_stargate_and_staking(suite: &TestSuite) -> Result<(), LocalError> {
    let fixture = suite.setup_ica(IbcOrder::Ordered)?;
    let host = suite.host()?;
    let ica_address = fixture.ica_info.ica_address.clone();
    let recipient = fresh_address(&host.bech32_prefix, "ica-stargate")?;
    let validator = query_bonded_validator(&host.rb)?;

    let msg_send = MsgSend {
        from_address: ica_address.clone(),
        to_address: recipient.clone(),
        amount: vec![ProtoCoin {
            denom: host.native_denom.clone(),
            amount: SEND_AMOUNT.to_string(),
        }],
    };
    let msg_delegate = MsgDelegate {
        delegator_address: ica_address.clone(),
        validator_address: validator.clone(),
        amount: Some(ProtoCoin {
            denom: host.native_denom.clone(),
            amount: DELEGATE_AMOUNT.to_string(),
        }),
    };
    let messages = vec![
        CosmosMsg::Stargate {
            type_url: "/cosmos.bank.v1beta1.MsgSend".to_string(),
            value: Binary::from(msg_send.encode_to_vec()),
        },
        CosmosMsg::Stargate {
            type_url: "/cosmos.staking.v1beta1.MsgDelegate".to_string(),
            value: Binary::from(msg_delegate.encode_to_vec()),
        },
    ];

    let (before, after) = send_and_wait(&fixture, ACC_0_KEY, messages, vec![])?;
    assert_eq!(after.success.len(), before.success.len() + 1);

    assert_eq!(
        query_balance(&host.rb, &recipient, &host.native_denom)?,
        SEND_AMOUNT
    );
    assert_eq!(
        query_delegation(&host.rb, &ica_address, &validator)?,
        DELEGATE_AMOUNT
    );

    Ok(())
}

/// Queries travel in the same packet and come back in the acknowledgement.
pub fn test_ica_queries(suite: &TestSuite) -> Result<(), LocalError> {
    let fixture = suite.setup_ica(IbcOrder::Unordered)?;
    let host = suite.host()?;

    let query = QueryRequest::Bank(BankQuery::Balance {
        address: fixture.ica_info.ica_address.clone(),
        denom: host.native_denom.clone(),
    });
    let (_, after) = send_and_wait(&fixture, ACC_0_KEY, vec![], vec![query])?;

    let IcaControllerCallbackMsg::OnAcknowledgementPacketCallback {
        ica_acknowledgement,
        query_result,
        ..
    } = last_ack(&after)?
    else {
        return Err(custom_error("expected an acknowledgement callback"));
    };
    assert!(ica_acknowledgement.is_success());

    match query_result {
        Some(IcaQueryResult::Success { responses, .. }) => {
            assert_eq!(responses.len(), 1);
            let IcaQueryResponse::Bank(BankQueryResponse::Balance(balance)) = &responses[0] else {
                panic!("unexpected query response {:?}", responses[0]);
            };
            assert_eq!(balance.amount.denom, host.native_denom);
            assert_eq!(balance.amount.amount.u128(), ICA_FUND_AMOUNT);
        }
        other => panic!("expected a successful query result, got {other:?}"),
    }

    Ok(())
}

/// The ICA sends its tokens back to the controller chain over ICS-20.
pub fn test_ica_ibc_transfer(suite: &TestSuite) -> Result<(), LocalError> {
    let fixture = suite.setup_ica(IbcOrder::Ordered)?;
    let host = suite.host()?;
    let controller = suite.controller()?;
    let host_chain_id = suite.host_chain_id();

    let channel_id = suite
        .test_ctx
        .get_transfer_channels()
        .src(host_chain_id)
        .dest(CONTROLLER_CHAIN_ID)
        .get()?;
    let ibc_denom = suite
        .test_ctx
        .get_ibc_denoms()
        .src(host_chain_id)
        .dest(CONTROLLER_CHAIN_ID)
        .get()?;
    let recipient = fresh_address(&controller.bech32_prefix, "ica-ibc-transfer")?;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(custom_error)?
        .as_secs();
    let transfer = CosmosMsg::Ibc(IbcMsg::Transfer {
        channel_id,
        to_address: recipient.clone(),
        amount: Coin::new(TRANSFER_AMOUNT, &host.native_denom),
        timeout: IbcTimeout::with_timestamp(Timestamp::from_seconds(now + 600)),
    });

    let (_, after) = send_and_wait(&fixture, ACC_0_KEY, vec![transfer], vec![])?;
    match last_ack(&after)? {
        IcaControllerCallbackMsg::OnAcknowledgementPacketCallback {
            ica_acknowledgement: Data::Result(_),
            ..
        } => {}
        other => panic!("transfer was not executed by the host: {other:?}"),
    }

    wait_for_balance(
        &controller.rb,
        &recipient,
        &ibc_denom,
        TRANSFER_AMOUNT,
        PACKET_TIMEOUT,
    )?;

    Ok(())
}

/// A message the host rejects yields an error ack without closing the channel.
pub fn test_ica_error_ack(suite: &TestSuite) -> Result<(), LocalError> {
    let fixture = suite.setup_ica(IbcOrder::Ordered)?;
    let host = suite.host()?;
    let recipient = fresh_address(&host.bech32_prefix, "ica-error-ack")?;

    let overspend = CosmosMsg::Bank(BankMsg::Send {
        to_address: recipient.clone(),
        amount: coins(ICA_FUND_AMOUNT * 10, &host.native_denom),
    });
    let (before, after) = send_and_wait(&fixture, ACC_0_KEY, vec![overspend], vec![])?;

    assert_eq!(after.error.len(), before.error.len() + 1);
    assert_eq!(after.success.len(), before.success.len());
    match last_ack(&after)? {
        IcaControllerCallbackMsg::OnAcknowledgementPacketCallback {
            ica_acknowledgement: Data::Error(_),
            ..
        } => {}
        other => panic!("expected an error acknowledgement, got {other:?}"),
    }

    assert_eq!(query_balance(&host.rb, &recipient, &host.native_denom)?, 0);
    assert_eq!(
        fixture.ica.query_channel_state()?.channel_status,
        ChannelStatus::Open
    );

    Ok(())
}

/// Callbacks follow the callback address once the owner changes it.
pub fn test_update_callback_address(suite: &TestSuite) -> Result<(), LocalError> {
    let fixture = suite.setup_ica(IbcOrder::Ordered)?;
    let host = suite.host()?;
    let new_counter = suite.instantiate_counter()?;

    fixture.ica.execute(
        ACC_0_KEY,
        &ExecuteMsg::UpdateCallbackAddress {
            callback_address: Some(new_counter.address.clone()),
        },
    )?;
    poll_until(
        PACKET_TIMEOUT,
        DEFAULT_POLL_INTERVAL,
        "updated callback address",
        || {
            let state = fixture.ica.query_contract_state()?;
            let callback_address = state.callback_address.map(|addr| addr.to_string());
            Ok((callback_address.as_deref() == Some(new_counter.address.as_str())).then_some(()))
        },
    )?;

    let old_before = fixture.counter.query_callback_counter()?;
    let new_before = new_counter.query_callback_counter()?;
    let recipient = fresh_address(&host.bech32_prefix, "ica-callback-address")?;
    fixture.ica.send_cosmos_msgs(
        ACC_0_KEY,
        vec![CosmosMsg::Bank(BankMsg::Send {
            to_address: recipient.clone(),
            amount: coins(SEND_AMOUNT, &host.native_denom),
        })],
        vec![],
        None,
    )?;

    let new_after = new_counter.wait_for_callbacks(new_before.total() + 1, PACKET_TIMEOUT)?;
    assert_eq!(new_after.success.len(), new_before.success.len() + 1);
    wait_for_balance(
        &host.rb,
        &recipient,
        &host.native_denom,
        SEND_AMOUNT,
        PACKET_TIMEOUT,
    )?;
    assert_eq!(
        fixture.counter.query_callback_counter()?.total(),
        old_before.total()
    );

    Ok(())
}
