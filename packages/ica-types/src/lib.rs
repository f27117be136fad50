//! JSON message types of the contracts exercised by the e2e suite.
//!
//! These mirror the schemas of `cw-ica-controller`, `cw-ica-owner` and the
//! `callback-counter` test contract. They are kept free of any chain client
//! so they can be reused by other harnesses.

pub mod callback_counter;
pub mod callbacks;
pub mod controller;
pub mod owner;
pub mod ownership;

pub use callbacks::{Data, IcaControllerCallbackMsg, IcaQueryResult};
pub use controller::{ChannelOpenInitOptions, ChannelState, ChannelStatus, TxEncoding};
