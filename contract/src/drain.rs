//! Queue drainer
//!
//! Replays claims captured during an emergency pause once the pause has been
//! lifted. Entries are replayed in submission order and each one exactly once:
//! the queue is emptied before the first replay, and an entry that fails to
//! replay is reported and dropped without stopping the rest of the pass.

use crate::*;

#[derive(Clone, Debug, PartialEq, Eq)]
#[near(serializers = [json])]
pub struct ReplayedClaim {
    pub cover_id: u64,
    pub claim_id: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[near(serializers = [json])]
pub struct FailedReplay {
    pub cover_id: u64,
    pub submitter: AccountId,
    pub reason: String,
}

/// Outcome of one drain pass
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[near(serializers = [json])]
pub struct DrainReport {
    pub replayed: Vec<ReplayedClaim>,
    pub failed: Vec<FailedReplay>,
}

impl ClaimsBook {
    pub(crate) fn drain_queue(
        &mut self,
        pause: &PauseState,
        covers: &mut CoverStore,
        now: u64,
    ) -> DrainReport {
        let mut report = DrainReport::default();
        if pause.is_paused {
            return report;
        }

        let mut entries = self.queue.to_vec();
        self.queue.clear();
        entries.sort_by_key(|entry| entry.submission_order);

        for entry in entries {
            match self.replay(covers, &entry, now) {
                Ok(claim_id) => {
                    events::emit::claim_accepted(claim_id, entry.cover_id, &entry.submitter, true);
                    report.replayed.push(ReplayedClaim {
                        cover_id: entry.cover_id,
                        claim_id,
                    });
                }
                Err(err) => {
                    events::emit::claim_replay_failed(entry.cover_id, &entry.submitter, &err);
                    report.failed.push(FailedReplay {
                        cover_id: entry.cover_id,
                        submitter: entry.submitter,
                        reason: err.to_string(),
                    });
                }
            }
        }

        report
    }

    /// Validate a queued entry against the cover's current state, then run
    /// the normal accept path.
    fn replay(
        &mut self,
        covers: &mut CoverStore,
        entry: &QueueEntry,
        now: u64,
    ) -> ContractResult<u64> {
        let failure = |reason: String| ContractError::ReplayFailure {
            cover_id: entry.cover_id,
            reason,
        };

        let cover = covers
            .get(entry.cover_id)
            .ok_or_else(|| failure("cover no longer exists".to_string()))?;
        if cover.status != CoverStatus::ClaimQueued {
            return Err(failure(format!(
                "cover status changed to {} while queued",
                cover.status.code()
            )));
        }

        self.accept(covers, entry.cover_id, entry.submitter.clone(), now)
            .map_err(|err| failure(err.to_string()))
    }
}
