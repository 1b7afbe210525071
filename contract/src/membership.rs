//! Member roles
//!
//! Membership is a two-step flow: the joining fee is paid into the contract,
//! then an owner or internal component records the KYC verdict. A positive
//! verdict grants the Member role, a negative one refunds the fee.
//!
//! A withdrawn account may only join again once the configured cooldown has
//! elapsed since its withdrawal.

use crate::access::GOVERNANCE;
use crate::*;
use near_sdk::collections::{LookupMap, UnorderedSet};
use near_sdk::{NearToken, Promise};

#[derive(Clone, Debug)]
#[near(serializers = [borsh])]
pub struct PendingJoin {
    pub fee_paid: Balance,
    pub paid_at: u64,
}

#[derive(BorshDeserialize, BorshSerialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct MemberRoles {
    joining_fee: Balance,
    members: UnorderedSet<AccountId>,
    advisory_board: UnorderedSet<AccountId>,
    pending_joins: LookupMap<AccountId, PendingJoin>,
    withdrawn_at: LookupMap<AccountId, u64>,
}

impl MemberRoles {
    pub(crate) fn new(joining_fee: Balance) -> Self {
        Self {
            joining_fee,
            members: UnorderedSet::new(StorageKey::Members),
            advisory_board: UnorderedSet::new(StorageKey::AdvisoryBoard),
            pending_joins: LookupMap::new(StorageKey::PendingJoins),
            withdrawn_at: LookupMap::new(StorageKey::WithdrawnAt),
        }
    }

    pub fn joining_fee(&self) -> Balance {
        self.joining_fee
    }

    pub fn is_member(&self, account: &AccountId) -> bool {
        self.members.contains(account)
    }

    pub fn is_advisory_board(&self, account: &AccountId) -> bool {
        self.advisory_board.contains(account)
    }

    pub fn member_count(&self) -> u64 {
        self.members.len()
    }

    pub fn advisory_board_len(&self) -> u64 {
        self.advisory_board.len()
    }

    pub fn advisory_board(&self) -> Vec<AccountId> {
        self.advisory_board.to_vec()
    }

    pub(crate) fn add_advisory_board_member(&mut self, account: AccountId) -> bool {
        self.advisory_board.insert(&account)
    }

    pub(crate) fn remove_advisory_board_member(&mut self, account: &AccountId) -> bool {
        self.advisory_board.remove(account)
    }

    pub(crate) fn record_fee_payment(
        &mut self,
        pause: &PauseState,
        account: &AccountId,
        attached: Balance,
        now: u64,
    ) -> ContractResult<()> {
        if attached != self.joining_fee {
            return Err(ContractError::InvalidDeposit {
                required: self.joining_fee,
                attached,
            });
        }
        if self.is_member(account) {
            return Err(ContractError::invalid_state(format!(
                "{} is already a member",
                account
            )));
        }
        if self.pending_joins.contains_key(account) {
            return Err(ContractError::invalid_state(format!(
                "Joining fee already paid for {}",
                account
            )));
        }
        if let Some(withdrawn_at) = self.withdrawn_at.get(account) {
            let rejoin_at =
                withdrawn_at.saturating_add(pause.cooldown_sec.saturating_mul(NANOS_PER_SECOND));
            if now < rejoin_at {
                return Err(ContractError::invalid_state(format!(
                    "{} withdrew recently and can rejoin at {}",
                    account, rejoin_at
                )));
            }
        }

        self.pending_joins.insert(
            account,
            &PendingJoin {
                fee_paid: attached,
                paid_at: now,
            },
        );
        Ok(())
    }

    /// Settle a pending join. Returns the fee to refund on a negative verdict.
    pub(crate) fn settle_kyc(
        &mut self,
        account: &AccountId,
        verdict: bool,
    ) -> ContractResult<Option<Balance>> {
        let pending = self
            .pending_joins
            .remove(account)
            .ok_or_else(|| ContractError::not_found(format!("No pending join for {}", account)))?;

        if verdict {
            self.members.insert(account);
            self.withdrawn_at.remove(account);
            Ok(None)
        } else {
            Ok(Some(pending.fee_paid))
        }
    }

    pub(crate) fn withdraw(&mut self, account: &AccountId, now: u64) -> ContractResult<()> {
        if !self.members.remove(account) {
            return Err(ContractError::invalid_state(format!(
                "{} is not a member",
                account
            )));
        }
        self.withdrawn_at.insert(account, &now);
        Ok(())
    }
}

#[near_bindgen]
impl Contract {
    /// Pay the joining fee for `account` (attached deposit must equal the fee)
    #[payable]
    #[handle_result(aliased)]
    pub fn pay_joining_fee(&mut self, account: AccountId) -> ContractResult<()> {
        self.pause.state().ensure_unpaused()?;

        let attached = env::attached_deposit().as_yoctonear();
        self.members.record_fee_payment(
            self.pause.state(),
            &account,
            attached,
            env::block_timestamp(),
        )?;

        log!("Joining fee of {} yoctoNEAR paid for {}", attached, account);
        Ok(())
    }

    /// Record the KYC verdict for a pending join (owner or internal only)
    #[handle_result(aliased)]
    pub fn kyc_verdict(&mut self, account: AccountId, verdict: bool) -> ContractResult<()> {
        self.pause.state().ensure_unpaused()?;
        let (_, caps) = self.caller();
        caps.require_any(GOVERNANCE)?;

        match self.members.settle_kyc(&account, verdict)? {
            None => events::emit::member_joined(&account),
            Some(refund) => {
                Promise::new(account.clone()).transfer(NearToken::from_yoctonear(refund));
                log!(
                    "KYC rejected for {}, refunded {} yoctoNEAR",
                    account,
                    refund
                );
            }
        }
        Ok(())
    }

    /// Give up membership. Refused while a claim on one of the caller's covers
    /// is accepted or queued.
    #[handle_result(aliased)]
    pub fn withdraw_membership(&mut self) -> ContractResult<()> {
        self.pause.state().ensure_unpaused()?;
        let caller = env::predecessor_account_id();

        if self.covers.has_claim_in_flight(&caller) {
            return Err(ContractError::invalid_state(
                "Cannot withdraw while a claim is in flight",
            ));
        }
        self.members.withdraw(&caller, env::block_timestamp())?;

        events::emit::member_withdrawn(&caller);
        Ok(())
    }

    /// Whether `account_id` holds role `role_id` (1 advisory board, 2 member, 3 owner)
    pub fn check_role(&self, account_id: AccountId, role_id: u8) -> bool {
        match Role::from_id(role_id) {
            Some(Role::AdvisoryBoard) => self.members.is_advisory_board(&account_id),
            Some(Role::Member) => self.members.is_member(&account_id),
            Some(Role::Owner) => self.registry.is_owner(&account_id),
            None => false,
        }
    }
}
