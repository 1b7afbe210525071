use crate::*;

#[derive(Clone, Debug, PartialEq, Eq)]
#[near(serializers = [json])]
pub struct ConfigView {
    pub owner_id: AccountId,
    pub advisory_board: Vec<AccountId>,
    pub joining_fee: U128,
    pub pause_cooldown_sec: u64,
    pub upgrade_in_progress: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[near(serializers = [json])]
pub struct StatsView {
    pub members: u64,
    pub covers: u64,
    pub claims: u64,
    pub queued_claims: u64,
    pub pause_log_length: u64,
}

#[near_bindgen]
impl Contract {
    /// Get effective configuration
    pub fn get_config(&self) -> ConfigView {
        ConfigView {
            owner_id: self.registry.owner_id().clone(),
            advisory_board: self.members.advisory_board(),
            joining_fee: U128(self.members.joining_fee()),
            pause_cooldown_sec: self.pause.state().cooldown_sec,
            upgrade_in_progress: self.registry.upgrade_in_progress(),
        }
    }

    /// Get contract statistics
    pub fn get_stats(&self) -> StatsView {
        StatsView {
            members: self.members.member_count(),
            covers: self.covers.count(),
            claims: self.claims.count(),
            queued_claims: self.claims.queue_len(),
            pause_log_length: self.pause.log_len(),
        }
    }
}
