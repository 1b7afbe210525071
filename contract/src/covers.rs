//! Cover status store
//!
//! Covers are issued by the quotation side of the protocol; this store only
//! tracks who holds each cover and its status code. The numeric encoding is
//! shared with every component that reads or writes cover status.

use crate::access::GOVERNANCE;
use crate::*;
use near_sdk::collections::LookupMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[near(serializers = [borsh, json])]
pub enum CoverStatus {
    Active,
    ClaimApproved,
    ClaimDenied,
    CoverExpired,
    /// A claim was accepted into assessment
    ClaimAccepted,
    /// A claim was submitted during an emergency pause and awaits replay
    ClaimQueued,
}

impl CoverStatus {
    pub fn code(self) -> u8 {
        match self {
            Self::Active => 0,
            Self::ClaimApproved => 1,
            Self::ClaimDenied => 2,
            Self::CoverExpired => 3,
            Self::ClaimAccepted => 4,
            Self::ClaimQueued => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Active),
            1 => Some(Self::ClaimApproved),
            2 => Some(Self::ClaimDenied),
            3 => Some(Self::CoverExpired),
            4 => Some(Self::ClaimAccepted),
            5 => Some(Self::ClaimQueued),
            _ => None,
        }
    }

    /// Whether a new claim may be filed against a cover in this status
    pub fn permits_claim(self) -> bool {
        matches!(self, Self::Active | Self::ClaimDenied)
    }

    pub fn claim_in_flight(self) -> bool {
        matches!(self, Self::ClaimAccepted | Self::ClaimQueued)
    }
}

#[derive(Clone, Debug)]
#[near(serializers = [borsh, json])]
pub struct Cover {
    pub id: u64,
    pub holder: AccountId,
    pub status: CoverStatus,
    pub created_at: u64,
}

#[derive(BorshDeserialize, BorshSerialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct CoverStore {
    next_cover_id: u64,
    covers: LookupMap<u64, Cover>,
    covers_by_holder: LookupMap<AccountId, Vec<u64>>,
}

impl CoverStore {
    pub(crate) fn new() -> Self {
        Self {
            next_cover_id: 1,
            covers: LookupMap::new(StorageKey::Covers),
            covers_by_holder: LookupMap::new(StorageKey::CoversByHolder),
        }
    }

    pub fn get(&self, cover_id: u64) -> Option<Cover> {
        self.covers.get(&cover_id)
    }

    pub fn status(&self, cover_id: u64) -> Option<CoverStatus> {
        self.covers.get(&cover_id).map(|cover| cover.status)
    }

    pub fn count(&self) -> u64 {
        self.next_cover_id - 1
    }

    pub fn covers_of(&self, holder: &AccountId) -> Vec<u64> {
        self.covers_by_holder.get(holder).unwrap_or_default()
    }

    pub fn has_claim_in_flight(&self, holder: &AccountId) -> bool {
        self.covers_of(holder)
            .into_iter()
            .filter_map(|id| self.status(id))
            .any(CoverStatus::claim_in_flight)
    }

    pub(crate) fn register(&mut self, holder: AccountId, now: u64) -> u64 {
        let cover_id = self.next_cover_id;
        self.next_cover_id += 1;

        self.covers.insert(
            &cover_id,
            &Cover {
                id: cover_id,
                holder: holder.clone(),
                status: CoverStatus::Active,
                created_at: now,
            },
        );

        let mut held = self.covers_of(&holder);
        held.push(cover_id);
        self.covers_by_holder.insert(&holder, &held);

        cover_id
    }

    /// Overwrite the status of an existing cover, returning the previous one
    pub(crate) fn set_status(
        &mut self,
        cover_id: u64,
        status: CoverStatus,
    ) -> ContractResult<CoverStatus> {
        let mut cover = self
            .covers
            .get(&cover_id)
            .ok_or_else(|| ContractError::not_found(format!("Cover {}", cover_id)))?;
        let previous = cover.status;
        cover.status = status;
        self.covers.insert(&cover_id, &cover);
        Ok(previous)
    }

    /// Status write requested by an internal component. Codes 4 and 5 belong
    /// to claims intake and the queue drainer, and a queued cover is frozen
    /// until its claim is replayed.
    pub(crate) fn override_status(
        &mut self,
        cover_id: u64,
        status: CoverStatus,
    ) -> ContractResult<CoverStatus> {
        if status.claim_in_flight() {
            return Err(ContractError::invalid_state(format!(
                "Cover status {} is reserved for claim submission",
                status.code()
            )));
        }
        let current = self
            .status(cover_id)
            .ok_or_else(|| ContractError::not_found(format!("Cover {}", cover_id)))?;
        if current == CoverStatus::ClaimQueued {
            return Err(ContractError::invalid_state(format!(
                "Cover {} has a claim queued for replay",
                cover_id
            )));
        }
        self.set_status(cover_id, status)
    }
}

#[near_bindgen]
impl Contract {
    /// Record a new cover for a member (owner or internal only)
    #[handle_result(aliased)]
    pub fn register_cover(&mut self, holder: AccountId) -> ContractResult<u64> {
        self.pause.state().ensure_unpaused()?;
        let (_, caps) = self.caller();
        caps.require_any(GOVERNANCE)?;

        if !self.members.is_member(&holder) {
            return Err(ContractError::invalid_state(format!(
                "{} is not a member",
                holder
            )));
        }

        let cover_id = self.covers.register(holder.clone(), env::block_timestamp());
        log!("Cover {} registered for {}", cover_id, holder);
        Ok(cover_id)
    }

    /// Set a raw status code on a cover (internal components only).
    /// Claim codes 4 and 5 and covers with a queued claim are refused.
    #[handle_result(aliased)]
    pub fn set_cover_status(&mut self, cover_id: u64, status_code: u8) -> ContractResult<()> {
        let (_, caps) = self.caller();
        caps.require_any(&[Capability::Internal])?;

        let status = CoverStatus::from_code(status_code).ok_or_else(|| {
            ContractError::invalid_state(format!("Unknown cover status code {}", status_code))
        })?;
        let previous = self.covers.override_status(cover_id, status)?;

        log!(
            "Cover {} status changed from {} to {}",
            cover_id,
            previous.code(),
            status_code
        );
        Ok(())
    }

    pub fn get_cover_status(&self, cover_id: u64) -> Option<u8> {
        self.covers.status(cover_id).map(CoverStatus::code)
    }

    pub fn get_cover(&self, cover_id: u64) -> Option<Cover> {
        self.covers.get(cover_id)
    }

    pub fn get_covers_of(&self, holder: AccountId) -> Vec<u64> {
        self.covers.covers_of(&holder)
    }
}
