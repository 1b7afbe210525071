//! NEP-297 Event Format Validation
//!
//! Reference: https://github.com/near/NEPs/blob/master/neps/nep-0297.md
//!
//! Events are log entries that:
//! 1. Start with the `EVENT_JSON:` prefix
//! 2. Followed by a single valid JSON string
//! 3. JSON must have {standard, version, event} fields (data is optional)

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// NEP-297 Event Log Data
///
/// * `standard`: name of standard, "mutual-cover" for this contract
/// * `version`: e.g. "1.0.0"
/// * `event`: type of the event, e.g. "pause_started"
/// * `data`: associated event data, a one-element array for this contract
#[derive(Debug, Deserialize, Serialize)]
pub struct Nep297Event {
    pub standard: String,
    pub version: String,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Nep297Event {
    /// First entry of the `data` array
    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()?.as_array()?.first()
    }
}

/// Parse NEP-297 event from log string
///
/// Valid format: `EVENT_JSON:{"standard":"...","version":"...","event":"..."}`
pub fn parse_nep297_event(log: &str) -> Result<Nep297Event> {
    let Some(json_str) = log.strip_prefix("EVENT_JSON:") else {
        anyhow::bail!("Event log missing 'EVENT_JSON:' prefix");
    };

    let event: Nep297Event = serde_json::from_str(json_str.trim())
        .map_err(|e| anyhow::anyhow!("Invalid JSON in event log: {e}"))?;

    if event.standard.is_empty() {
        anyhow::bail!("Event 'standard' field is empty");
    }
    if event.version.is_empty() {
        anyhow::bail!("Event 'version' field is empty");
    }
    if event.event.is_empty() {
        anyhow::bail!("Event 'event' field is empty");
    }

    Ok(event)
}

/// All NEP-297 events among `logs`, skipping plain text lines
pub fn contract_events(logs: &[String]) -> Result<Vec<Nep297Event>> {
    logs.iter()
        .filter(|log| log.starts_with("EVENT_JSON:"))
        .map(|log| parse_nep297_event(log))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::{account, Harness};
    use mutual_cover_contract::events::{EVENT_STANDARD, EVENT_STANDARD_VERSION};
    use mutual_cover_contract::{ContractError, PauseInitiator, SubmitOutcome};

    #[tokio::test]
    async fn test_event_envelope_structure() -> Result<()> {
        let log = r#"EVENT_JSON:{"standard":"mutual-cover","version":"1.0.0","event":"claim_queued","data":[{"cover_id":1,"submitter":"alice.near","position":0}]}"#;

        let event = parse_nep297_event(log)?;

        assert_eq!(event.standard, "mutual-cover");
        assert_eq!(event.version, "1.0.0");
        assert_eq!(event.event, "claim_queued");
        assert_eq!(event.payload().unwrap()["cover_id"], 1);

        println!("✓ NEP-297 event envelope structure validated");

        Ok(())
    }

    #[tokio::test]
    async fn test_event_without_data_field() -> Result<()> {
        let log = r#"EVENT_JSON:  {"standard":"mutual-cover","version":"1.0.0","event":"queue_drained"}  "#;

        let event = parse_nep297_event(log)?;

        assert_eq!(event.event, "queue_drained");
        assert!(event.data.is_none());
        assert!(event.payload().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_logs_rejected() {
        let cases = [
            r#"{"standard":"mutual-cover","version":"1.0.0","event":"test"}"#,
            r#"EVENT_JSON:invalid json"#,
            r#"EVENT_JSON:{"standard":"mutual-cover","event":"test"}"#,
            r#"EVENT_JSON:{"standard":"","version":"1.0.0","event":"test"}"#,
            "EVENT_JSON:{\"standard\":\"mutual-cover\",\"version\":\"1.0.0\",\"event\":\"a\"}\nEVENT_JSON:{\"standard\":\"mutual-cover\",\"version\":\"1.0.0\",\"event\":\"b\"}",
        ];

        for log in cases {
            assert!(parse_nep297_event(log).is_err(), "accepted malformed log: {log}");
        }

        println!("✓ Malformed event logs correctly rejected");
    }

    #[tokio::test]
    async fn test_contract_logs_follow_standard() -> Result<()> {
        let mut h = Harness::deploy();
        let alice = account("alice.near");
        let owner = h.owner.clone();
        let board = h.advisory_board.clone();

        h.join(&alice)?;
        let cover_id = h.issue_cover(&alice)?;
        h.call(&board, |c| c.start_pause(PauseInitiator::AdvisoryBoard))?;
        h.call(&alice, |c| c.submit_claim(cover_id))?;
        h.call(&owner, |c| c.set_cooldown(2_419_260))?;
        h.call(&board, |c| c.end_pause(PauseInitiator::AdvisoryBoard))?;

        let events = contract_events(h.logs())?;
        for event in &events {
            assert_eq!(event.standard, EVENT_STANDARD);
            assert_eq!(event.version, EVENT_STANDARD_VERSION);
            assert!(event.payload().is_some(), "{} has no payload", event.event);
        }

        let names: Vec<&str> = events.iter().map(|e| e.event.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "member_joined",
                "pause_started",
                "claim_queued",
                "cooldown_updated",
                "pause_ended",
                "claim_accepted",
                "queue_drained",
            ]
        );

        println!("✓ {} contract events follow NEP-297", events.len());

        Ok(())
    }

    #[tokio::test]
    async fn test_pause_event_payloads() -> Result<()> {
        let mut h = Harness::deploy();
        let board = h.advisory_board.clone();

        h.call(&board, |c| c.start_pause(PauseInitiator::AdvisoryBoard))?;
        let started_at = h.block_timestamp();
        h.call(&board, |c| c.end_pause(PauseInitiator::AdvisoryBoard))?;

        let events = contract_events(h.logs())?;
        let started = events.iter().find(|e| e.event == "pause_started").unwrap();
        let data = started.payload().unwrap();
        assert_eq!(data["caller"], "board.near");
        assert_eq!(data["initiator"], "AdvisoryBoard");
        assert_eq!(data["log_index"], 0);
        assert_eq!(data["timestamp"], started_at);

        let ended = events.iter().find(|e| e.event == "pause_ended").unwrap();
        assert_eq!(ended.payload().unwrap()["log_index"], 1);

        let drained = events.iter().find(|e| e.event == "queue_drained").unwrap();
        assert_eq!(drained.payload().unwrap()["replayed"], 0);
        assert_eq!(drained.payload().unwrap()["failed"], 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_replay_events_report_outcome() -> Result<()> {
        let mut h = Harness::deploy();
        let alice = account("alice.near");
        let bob = account("bob.near");
        let board = h.advisory_board.clone();
        let contract_id = h.contract_id.clone();

        h.join(&alice)?;
        h.join(&bob)?;
        let alice_cover = h.issue_cover(&alice)?;
        let bob_cover = h.issue_cover(&bob)?;

        h.call(&board, |c| c.start_pause(PauseInitiator::AdvisoryBoard))?;
        let first = h.call(&alice, |c| c.submit_claim(alice_cover))?;
        let second = h.call(&bob, |c| c.submit_claim(bob_cover))?;
        assert_eq!(first, SubmitOutcome::Queued { position: 0 });
        assert_eq!(second, SubmitOutcome::Queued { position: 1 });

        // Queued covers cannot be re-statused from outside the drainer
        assert!(matches!(
            h.call(&contract_id, |c| c.set_cover_status(bob_cover, 4)),
            Err(ContractError::InvalidState(_))
        ));
        h.call(&board, |c| c.end_pause(PauseInitiator::AdvisoryBoard))?;

        let events = contract_events(h.logs())?;
        let accepted: Vec<_> = events
            .iter()
            .filter(|e| e.event == "claim_accepted")
            .map(|e| e.payload().unwrap())
            .collect();
        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[0]["cover_id"], alice_cover);
        assert_eq!(accepted[0]["claim_id"], 1);
        assert_eq!(accepted[1]["cover_id"], bob_cover);
        assert_eq!(accepted[1]["submitter"], "bob.near");
        assert!(accepted.iter().all(|data| data["replayed"] == true));
        assert!(!events.iter().any(|e| e.event == "claim_replay_failed"));

        let drained = events.iter().find(|e| e.event == "queue_drained").unwrap();
        assert_eq!(drained.payload().unwrap()["replayed"], 2);
        assert_eq!(drained.payload().unwrap()["failed"], 0);

        Ok(())
    }
}
