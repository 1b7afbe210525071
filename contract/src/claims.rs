//! Claims intake and assessment
//!
//! A submission made while the system is running is accepted straight into
//! the claim ledger. A submission made during an emergency pause is captured
//! in the queue instead and only reaches the ledger when the pause is lifted
//! (see `drain.rs`). Assessment mutators (votes, status changes) are refused
//! outright while paused.

use crate::access::GOVERNANCE;
use crate::*;
use near_sdk::collections::{LookupMap, Vector};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[near(serializers = [borsh, json])]
pub enum ClaimStatus {
    Accepted,
    UnderReview,
    Approved,
    Denied,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[near(serializers = [borsh, json])]
pub struct Claim {
    pub id: u64,
    pub cover_id: u64,
    pub submitter: AccountId,
    pub status: ClaimStatus,
    pub submitted_at: u64,
    pub votes_for: u32,
    pub votes_against: u32,
}

/// A submission captured during an emergency pause
#[derive(Clone, Debug, PartialEq, Eq)]
#[near(serializers = [borsh, json])]
pub struct QueueEntry {
    pub cover_id: u64,
    pub submitter: AccountId,
    pub submission_order: u64,
    pub queued_at: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[near(serializers = [json])]
pub enum SubmitOutcome {
    Accepted { claim_id: u64 },
    /// Position in the queue, starting at 0
    Queued { position: u64 },
}

#[derive(BorshDeserialize, BorshSerialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct ClaimsBook {
    next_claim_id: u64,
    claims: LookupMap<u64, Claim>,
    votes: LookupMap<(u64, AccountId), i8>,
    pub(crate) queue: Vector<QueueEntry>,
    next_submission_order: u64,
}

impl ClaimsBook {
    pub(crate) fn new() -> Self {
        Self {
            next_claim_id: 1,
            claims: LookupMap::new(StorageKey::Claims),
            votes: LookupMap::new(StorageKey::ClaimVotes),
            queue: Vector::new(StorageKey::ClaimQueue),
            next_submission_order: 0,
        }
    }

    pub fn get(&self, claim_id: u64) -> Option<Claim> {
        self.claims.get(&claim_id)
    }

    pub fn count(&self) -> u64 {
        self.next_claim_id - 1
    }

    pub fn queued(&self) -> Vec<QueueEntry> {
        self.queue.to_vec()
    }

    pub fn queue_len(&self) -> u64 {
        self.queue.len()
    }

    pub(crate) fn submit(
        &mut self,
        pause: &PauseState,
        covers: &mut CoverStore,
        caps: &Capabilities,
        submitter: &AccountId,
        cover_id: u64,
        now: u64,
    ) -> ContractResult<SubmitOutcome> {
        caps.require_any(&[Capability::Member])?;

        let cover = covers
            .get(cover_id)
            .ok_or_else(|| ContractError::not_found(format!("Cover {}", cover_id)))?;
        if cover.holder != *submitter {
            return Err(ContractError::Unauthorized);
        }
        if !cover.status.permits_claim() {
            return Err(ContractError::invalid_state(format!(
                "Cover {} does not permit a claim in status {}",
                cover_id,
                cover.status.code()
            )));
        }

        if pause.is_paused {
            let position = self.enqueue(covers, cover_id, submitter.clone(), now)?;
            events::emit::claim_queued(cover_id, submitter, position);
            Ok(SubmitOutcome::Queued { position })
        } else {
            let claim_id = self.accept(covers, cover_id, submitter.clone(), now)?;
            events::emit::claim_accepted(claim_id, cover_id, submitter, false);
            Ok(SubmitOutcome::Accepted { claim_id })
        }
    }

    fn enqueue(
        &mut self,
        covers: &mut CoverStore,
        cover_id: u64,
        submitter: AccountId,
        now: u64,
    ) -> ContractResult<u64> {
        covers.set_status(cover_id, CoverStatus::ClaimQueued)?;

        let position = self.queue.len();
        self.queue.push(&QueueEntry {
            cover_id,
            submitter,
            submission_order: self.next_submission_order,
            queued_at: now,
        });
        self.next_submission_order += 1;
        Ok(position)
    }

    /// Create an accepted claim and mark its cover. Callers validate first.
    pub(crate) fn accept(
        &mut self,
        covers: &mut CoverStore,
        cover_id: u64,
        submitter: AccountId,
        now: u64,
    ) -> ContractResult<u64> {
        covers.set_status(cover_id, CoverStatus::ClaimAccepted)?;

        let claim_id = self.next_claim_id;
        self.next_claim_id += 1;
        self.claims.insert(
            &claim_id,
            &Claim {
                id: claim_id,
                cover_id,
                submitter,
                status: ClaimStatus::Accepted,
                submitted_at: now,
                votes_for: 0,
                votes_against: 0,
            },
        );
        Ok(claim_id)
    }

    pub(crate) fn vote(
        &mut self,
        pause: &PauseState,
        caps: &Capabilities,
        voter: &AccountId,
        claim_id: u64,
        verdict: i8,
    ) -> ContractResult<Claim> {
        pause.ensure_unpaused()?;
        caps.require_any(&[Capability::Member])?;

        if verdict != 1 && verdict != -1 {
            return Err(ContractError::invalid_state(format!(
                "Verdict must be 1 or -1, got {}",
                verdict
            )));
        }
        let mut claim = self
            .claims
            .get(&claim_id)
            .ok_or_else(|| ContractError::not_found(format!("Claim {}", claim_id)))?;
        if !matches!(claim.status, ClaimStatus::Accepted | ClaimStatus::UnderReview) {
            return Err(ContractError::invalid_state(format!(
                "Claim {} is closed for voting",
                claim_id
            )));
        }
        if claim.submitter == *voter {
            return Err(ContractError::invalid_state(
                "Submitter cannot vote on own claim",
            ));
        }
        let vote_key = (claim_id, voter.clone());
        if self.votes.contains_key(&vote_key) {
            return Err(ContractError::invalid_state(format!(
                "{} already voted on claim {}",
                voter, claim_id
            )));
        }

        self.votes.insert(&vote_key, &verdict);
        if verdict > 0 {
            claim.votes_for += 1;
        } else {
            claim.votes_against += 1;
        }
        claim.status = ClaimStatus::UnderReview;
        self.claims.insert(&claim_id, &claim);
        Ok(claim)
    }

    pub(crate) fn resolve(
        &mut self,
        pause: &PauseState,
        covers: &mut CoverStore,
        caps: &Capabilities,
        claim_id: u64,
    ) -> ContractResult<ClaimStatus> {
        pause.ensure_unpaused()?;
        caps.require_any(GOVERNANCE)?;

        let mut claim = self
            .claims
            .get(&claim_id)
            .ok_or_else(|| ContractError::not_found(format!("Claim {}", claim_id)))?;
        if claim.status != ClaimStatus::UnderReview {
            return Err(ContractError::invalid_state(format!(
                "Claim {} has no votes to resolve",
                claim_id
            )));
        }

        let (status, cover_status) = if claim.votes_for > claim.votes_against {
            (ClaimStatus::Approved, CoverStatus::ClaimApproved)
        } else {
            (ClaimStatus::Denied, CoverStatus::ClaimDenied)
        };
        covers.set_status(claim.cover_id, cover_status)?;
        claim.status = status;
        self.claims.insert(&claim_id, &claim);
        Ok(status)
    }
}

#[near_bindgen]
impl Contract {
    /// File a claim against one of the caller's covers. Queued while paused.
    #[handle_result(aliased)]
    pub fn submit_claim(&mut self, cover_id: u64) -> ContractResult<SubmitOutcome> {
        let (caller, caps) = self.caller();
        self.claims.submit(
            self.pause.state(),
            &mut self.covers,
            &caps,
            &caller,
            cover_id,
            env::block_timestamp(),
        )
    }

    /// Claim-assessment vote: 1 to approve, -1 to deny
    #[handle_result(aliased)]
    pub fn submit_ca_vote(&mut self, claim_id: u64, verdict: i8) -> ContractResult<Claim> {
        let (caller, caps) = self.caller();
        let claim = self
            .claims
            .vote(self.pause.state(), &caps, &caller, claim_id, verdict)?;

        log!(
            "{} voted {} on claim {} ({} for, {} against)",
            caller,
            verdict,
            claim_id,
            claim.votes_for,
            claim.votes_against
        );
        Ok(claim)
    }

    /// Close assessment on a claim and settle its cover status
    #[handle_result(aliased)]
    pub fn change_claim_status(&mut self, claim_id: u64) -> ContractResult<ClaimStatus> {
        let (_, caps) = self.caller();
        let status =
            self.claims
                .resolve(self.pause.state(), &mut self.covers, &caps, claim_id)?;

        log!("Claim {} resolved as {:?}", claim_id, status);
        Ok(status)
    }

    pub fn claim_count(&self) -> u64 {
        self.claims.count()
    }

    pub fn get_claim(&self, claim_id: u64) -> Option<Claim> {
        self.claims.get(claim_id)
    }

    /// Claims waiting for the pause to be lifted, in submission order
    pub fn get_queue(&self) -> Vec<QueueEntry> {
        self.claims.queued()
    }
}
