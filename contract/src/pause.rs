//! Emergency pause controller
//!
//! Owns the system-wide pause flag, the configured cooldown and an append-only
//! log of pause transitions. Starting a pause appends an `active = true`
//! record; ending it appends an `active = false` record. Records are never
//! rewritten.
//!
//! Ending a pause drains the claims queue within the same call, so no other
//! transaction can observe the system unpaused with claims still queued.

use crate::access::{GOVERNANCE, PAUSE_AUTHORITIES};
use crate::*;
use near_sdk::collections::Vector;

/// Who a pause transition is attributed to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[near(serializers = [borsh, json])]
pub enum PauseInitiator {
    AdvisoryBoard,
    Owner,
    Internal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[near(serializers = [borsh, json])]
pub struct PauseRecord {
    pub active: bool,
    /// Block timestamp (ns) of the transition
    pub start_time: u64,
    pub initiator: PauseInitiator,
}

impl PauseRecord {
    /// Returned by `get_last_pause_record` before any pause happened
    fn none() -> Self {
        Self {
            active: false,
            start_time: 0,
            initiator: PauseInitiator::AdvisoryBoard,
        }
    }
}

/// The pause flag and cooldown, handed explicitly to every gated mutator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[near(serializers = [borsh, json])]
pub struct PauseState {
    pub is_paused: bool,
    pub cooldown_sec: u64,
}

impl PauseState {
    pub fn ensure_unpaused(&self) -> ContractResult<()> {
        if self.is_paused {
            Err(ContractError::SystemPaused)
        } else {
            Ok(())
        }
    }
}

#[derive(BorshDeserialize, BorshSerialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct PauseController {
    state: PauseState,
    log: Vector<PauseRecord>,
}

impl PauseController {
    pub(crate) fn new(cooldown_sec: u64) -> Self {
        Self {
            state: PauseState {
                is_paused: false,
                cooldown_sec,
            },
            log: Vector::new(StorageKey::PauseLog),
        }
    }

    pub fn state(&self) -> &PauseState {
        &self.state
    }

    pub fn log_len(&self) -> u64 {
        self.log.len()
    }

    pub fn record(&self, index: u64) -> Option<PauseRecord> {
        self.log.get(index)
    }

    pub fn last_record(&self) -> PauseRecord {
        self.log
            .len()
            .checked_sub(1)
            .and_then(|index| self.log.get(index))
            .unwrap_or_else(PauseRecord::none)
    }

    pub(crate) fn activate(
        &mut self,
        initiator: PauseInitiator,
        now: u64,
    ) -> ContractResult<PauseRecord> {
        if self.state.is_paused {
            return Err(ContractError::invalid_state("Emergency pause already active"));
        }
        Ok(self.transition(true, initiator, now))
    }

    pub(crate) fn deactivate(
        &mut self,
        initiator: PauseInitiator,
        now: u64,
    ) -> ContractResult<PauseRecord> {
        if !self.state.is_paused {
            return Err(ContractError::invalid_state("Emergency pause is not active"));
        }
        Ok(self.transition(false, initiator, now))
    }

    fn transition(&mut self, active: bool, initiator: PauseInitiator, now: u64) -> PauseRecord {
        let record = PauseRecord {
            active,
            start_time: now,
            initiator,
        };
        self.state.is_paused = active;
        self.log.push(&record);
        record
    }

    pub(crate) fn set_cooldown(
        &mut self,
        cooldown_sec: u64,
        upgrade_in_progress: bool,
    ) -> ContractResult<u64> {
        if upgrade_in_progress {
            return Err(ContractError::invalid_state(
                "Cooldown cannot change during an upgrade",
            ));
        }
        if cooldown_sec == 0 {
            return Err(ContractError::invalid_state("Cooldown must be positive"));
        }
        Ok(std::mem::replace(&mut self.state.cooldown_sec, cooldown_sec))
    }
}

#[near_bindgen]
impl Contract {
    /// Activate the emergency pause (owner, advisory board or internal)
    #[handle_result(aliased)]
    pub fn start_pause(&mut self, initiator: PauseInitiator) -> ContractResult<PauseRecord> {
        let (caller, caps) = self.caller();
        caps.require_any(PAUSE_AUTHORITIES)?;

        let record = self.pause.activate(initiator, env::block_timestamp())?;
        events::emit::pause_started(&caller, &record, self.pause.log_len() - 1);
        Ok(record)
    }

    /// Lift the emergency pause and replay every queued claim in order
    #[handle_result(aliased)]
    pub fn end_pause(&mut self, initiator: PauseInitiator) -> ContractResult<DrainReport> {
        let (caller, caps) = self.caller();
        caps.require_any(PAUSE_AUTHORITIES)?;

        let now = env::block_timestamp();
        let record = self.pause.deactivate(initiator, now)?;
        events::emit::pause_ended(&caller, &record, self.pause.log_len() - 1);

        let report = self
            .claims
            .drain_queue(self.pause.state(), &mut self.covers, now);
        events::emit::queue_drained(&report);
        Ok(report)
    }

    pub fn is_paused(&self) -> bool {
        self.pause.state().is_paused
    }

    pub fn get_pause_state(&self) -> PauseState {
        *self.pause.state()
    }

    pub fn pause_log_length(&self) -> u64 {
        self.pause.log_len()
    }

    pub fn get_pause_record(&self, index: u64) -> Option<PauseRecord> {
        self.pause.record(index)
    }

    pub fn get_last_pause_record(&self) -> PauseRecord {
        self.pause.last_record()
    }

    /// Cooldown in seconds
    pub fn get_cooldown(&self) -> u64 {
        self.pause.state().cooldown_sec
    }

    /// Change the cooldown (owner or internal, not during an upgrade)
    #[handle_result(aliased)]
    pub fn set_cooldown(&mut self, cooldown_sec: u64) -> ContractResult<()> {
        let (_, caps) = self.caller();
        caps.require_any(GOVERNANCE)?;

        let previous = self
            .pause
            .set_cooldown(cooldown_sec, self.registry.upgrade_in_progress())?;
        events::emit::cooldown_updated(previous, cooldown_sec);
        Ok(())
    }
}
