use crate::*;
use near_sdk::serde_json::json;

pub const EVENT_STANDARD: &str = "mutual-cover";
pub const EVENT_STANDARD_VERSION: &str = "1.0.0";

pub mod emit {
    use super::*;
    use near_sdk::{env, log};

    #[derive(Serialize)]
    #[serde(crate = "near_sdk::serde")]
    struct PauseEventData<'a> {
        pub caller: &'a AccountId,
        pub initiator: PauseInitiator,
        pub log_index: u64,
        pub timestamp: u64,
    }

    #[derive(Serialize)]
    #[serde(crate = "near_sdk::serde")]
    struct ClaimAcceptedEventData<'a> {
        pub claim_id: u64,
        pub cover_id: u64,
        pub submitter: &'a AccountId,
        pub replayed: bool, // true when accepted by the queue drainer
    }

    #[derive(Serialize)]
    #[serde(crate = "near_sdk::serde")]
    struct ClaimQueuedEventData<'a> {
        pub cover_id: u64,
        pub submitter: &'a AccountId,
        pub position: u64,
        pub timestamp: u64,
    }

    #[derive(Serialize)]
    #[serde(crate = "near_sdk::serde")]
    struct ClaimReplayFailedEventData<'a> {
        pub cover_id: u64,
        pub submitter: &'a AccountId,
        pub reason: String,
    }

    #[derive(Serialize)]
    #[serde(crate = "near_sdk::serde")]
    struct QueueDrainedEventData {
        pub replayed: usize,
        pub failed: usize,
        pub timestamp: u64,
    }

    #[derive(Serialize)]
    #[serde(crate = "near_sdk::serde")]
    struct CooldownUpdatedEventData {
        pub previous_sec: u64,
        pub cooldown_sec: u64,
    }

    #[derive(Serialize)]
    #[serde(crate = "near_sdk::serde")]
    struct MemberEventData<'a> {
        pub account_id: &'a AccountId,
        pub timestamp: u64,
    }

    fn log_event<T: Serialize>(event: &str, data: T) {
        let event = json!({
            "standard": EVENT_STANDARD,
            "version": EVENT_STANDARD_VERSION,
            "event": event,
            "data": [data]
        });

        log!("EVENT_JSON:{}", event.to_string());
    }

    /// Emergency pause activated (`log_index` is the record's position in the pause log)
    pub fn pause_started(caller: &AccountId, record: &PauseRecord, log_index: u64) {
        pause_event("pause_started", caller, record, log_index);
    }

    pub fn pause_ended(caller: &AccountId, record: &PauseRecord, log_index: u64) {
        pause_event("pause_ended", caller, record, log_index);
    }

    fn pause_event(event: &str, caller: &AccountId, record: &PauseRecord, log_index: u64) {
        log_event(
            event,
            PauseEventData {
                caller,
                initiator: record.initiator,
                log_index,
                timestamp: record.start_time,
            },
        );
    }

    pub fn claim_accepted(claim_id: u64, cover_id: u64, submitter: &AccountId, replayed: bool) {
        log_event(
            "claim_accepted",
            ClaimAcceptedEventData {
                claim_id,
                cover_id,
                submitter,
                replayed,
            },
        );
    }

    pub fn claim_queued(cover_id: u64, submitter: &AccountId, position: u64) {
        log_event(
            "claim_queued",
            ClaimQueuedEventData {
                cover_id,
                submitter,
                position,
                timestamp: env::block_timestamp(),
            },
        );
    }

    pub fn claim_replay_failed(cover_id: u64, submitter: &AccountId, error: &ContractError) {
        log_event(
            "claim_replay_failed",
            ClaimReplayFailedEventData {
                cover_id,
                submitter,
                reason: error.to_string(),
            },
        );
    }

    pub fn queue_drained(report: &DrainReport) {
        log_event(
            "queue_drained",
            QueueDrainedEventData {
                replayed: report.replayed.len(),
                failed: report.failed.len(),
                timestamp: env::block_timestamp(),
            },
        );
    }

    pub fn cooldown_updated(previous_sec: u64, cooldown_sec: u64) {
        log_event(
            "cooldown_updated",
            CooldownUpdatedEventData {
                previous_sec,
                cooldown_sec,
            },
        );
    }

    pub fn member_joined(account_id: &AccountId) {
        log_event(
            "member_joined",
            MemberEventData {
                account_id,
                timestamp: env::block_timestamp(),
            },
        );
    }

    pub fn member_withdrawn(account_id: &AccountId) {
        log_event(
            "member_withdrawn",
            MemberEventData {
                account_id,
                timestamp: env::block_timestamp(),
            },
        );
    }
}
