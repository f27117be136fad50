use std::{
    thread,
    time::{Duration, Instant},
};

use localic_std::{errors::LocalError, node::Chain, transactions::ChainRequestBuilder};
use log::debug;

use super::custom_error;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Calls `f` every `interval` until it yields a value, an error, or `timeout` elapses.
pub fn poll_until<T>(
    timeout: Duration,
    interval: Duration,
    description: &str,
    mut f: impl FnMut() -> Result<Option<T>, LocalError>,
) -> Result<T, LocalError> {
    let start = Instant::now();
    loop {
        if let Some(value) = f()? {
            return Ok(value);
        }
        if start.elapsed() >= timeout {
            return Err(custom_error(format!(
                "timed out after {timeout:?} waiting for {description}"
            )));
        }
        thread::sleep(interval);
    }
}

/// Waits until the height reported by `height` advanced by `blocks`.
pub fn wait_for_height_increase(
    mut height: impl FnMut() -> u64,
    blocks: u64,
    timeout: Duration,
    interval: Duration,
) -> Result<u64, LocalError> {
    let target = height() + blocks;
    poll_until(timeout, interval, &format!("block height {target}"), || {
        let current = height();
        debug!("current height {current}, waiting for {target}");
        Ok((current >= target).then_some(current))
    })
}

/// Sleeps until `duration` has passed since `start`.
pub fn wait_until_elapsed(start: Instant, duration: Duration) {
    if let Some(remaining) = duration.checked_sub(start.elapsed()) {
        debug!("sleeping {remaining:?}");
        thread::sleep(remaining);
    }
}

pub fn wait_for_blocks(rb: &ChainRequestBuilder, blocks: u64) -> Result<u64, LocalError> {
    let chain = Chain::new(rb);
    wait_for_height_increase(
        || chain.get_height(),
        blocks,
        Duration::from_secs(5 * blocks + 10),
        DEFAULT_POLL_INTERVAL,
    )
}
