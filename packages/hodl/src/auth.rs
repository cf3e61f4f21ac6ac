use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;

/// Capability consulted by every governance-gated handler.
/// Handlers only ever see `&dyn Authorize`.
pub trait Authorize {
    fn is_authorized(&self, sender: &Addr) -> bool;
}

/// Governance authority stored in the contract Config
#[cw_serde]
pub enum Authority {
    /// A single address, compared for equality
    Address(Addr),
}

impl Authorize for Authority {
    fn is_authorized(&self, sender: &Addr) -> bool {
        match self {
            Authority::Address(addr) => addr == sender,
        }
    }
}

impl Authorize for Addr {
    fn is_authorized(&self, sender: &Addr) -> bool {
        self == sender
    }
}
