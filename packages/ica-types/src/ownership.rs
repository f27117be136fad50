use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;
use cw_utils::Expiration;

/// Mirror of the `cw-ownable` action enum accepted by `UpdateOwnership`.
#[cw_serde]
pub enum OwnershipAction {
    TransferOwnership {
        new_owner: String,
        expiry: Option<Expiration>,
    },
    AcceptOwnership,
    RenounceOwnership,
}

#[cw_serde]
pub struct Ownership {
    pub owner: Option<Addr>,
    pub pending_owner: Option<Addr>,
    pub pending_expiry: Option<Expiration>,
}

impl Ownership {
    pub fn is_owner(&self, addr: &str) -> bool {
        self.owner.as_ref().map(Addr::as_str) == Some(addr)
    }
}
