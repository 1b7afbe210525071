//! Caller capability resolution
//!
//! Every gated method resolves the predecessor's capabilities once and then
//! checks them against the roles it accepts, instead of comparing account ids
//! inline.

use crate::*;

/// A capability a caller may hold
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    Owner,
    /// The contract itself or a registered component
    Internal,
    AdvisoryBoard,
    Member,
}

/// Member-role encoding used by `check_role`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    AdvisoryBoard = 1,
    Member = 2,
    Owner = 3,
}

impl Role {
    pub fn from_id(role_id: u8) -> Option<Self> {
        match role_id {
            1 => Some(Self::AdvisoryBoard),
            2 => Some(Self::Member),
            3 => Some(Self::Owner),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    owner: bool,
    internal: bool,
    advisory_board: bool,
    member: bool,
}

impl Capabilities {
    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Owner => self.owner,
            Capability::Internal => self.internal,
            Capability::AdvisoryBoard => self.advisory_board,
            Capability::Member => self.member,
        }
    }

    pub fn require_any(&self, allowed: &[Capability]) -> ContractResult<()> {
        if allowed.iter().any(|capability| self.has(*capability)) {
            Ok(())
        } else {
            Err(ContractError::Unauthorized)
        }
    }
}

/// Roles allowed to trigger or lift an emergency pause
pub(crate) const PAUSE_AUTHORITIES: &[Capability] = &[
    Capability::Owner,
    Capability::Internal,
    Capability::AdvisoryBoard,
];

/// Roles allowed to change protocol parameters
pub(crate) const GOVERNANCE: &[Capability] = &[Capability::Owner, Capability::Internal];

impl Contract {
    pub(crate) fn capabilities_of(&self, account: &AccountId) -> Capabilities {
        Capabilities {
            owner: self.registry.is_owner(account),
            internal: self.registry.is_internal(account),
            advisory_board: self.members.is_advisory_board(account),
            member: self.members.is_member(account),
        }
    }

    /// Predecessor of the current call together with its capabilities
    pub(crate) fn caller(&self) -> (AccountId, Capabilities) {
        let caller = env::predecessor_account_id();
        let capabilities = self.capabilities_of(&caller);
        (caller, capabilities)
    }
}
