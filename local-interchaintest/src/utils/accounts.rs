use std::time::{SystemTime, UNIX_EPOCH};

use bech32::{ToBase32, Variant};
use localic_std::errors::LocalError;
use sha2::{Digest, Sha256};

use super::custom_error;

/// Encodes the first 20 bytes of `bytes` as a bech32 account address.
pub fn derive_address(prefix: &str, bytes: &[u8]) -> Result<String, LocalError> {
    let account_bytes = bytes
        .get(..20)
        .ok_or_else(|| custom_error("account address needs 20 bytes"))?;
    bech32::encode(prefix, account_bytes.to_base32(), Variant::Bech32).map_err(custom_error)
}

/// An address nobody has ever used, so balance assertions against it are exact.
pub fn fresh_address(prefix: &str, seed: &str) -> Result<String, LocalError> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(custom_error)?
        .as_nanos();
    let digest = Sha256::digest(format!("{seed}-{nanos}").as_bytes());
    derive_address(prefix, &digest)
}
