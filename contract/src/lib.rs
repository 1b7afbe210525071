use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::serde::Serialize;
use near_sdk::{env, log, near, near_bindgen, AccountId, BorshStorageKey, PanicOnDefault};

mod access;
mod admin;
mod claims;
mod covers;
mod drain;
mod errors;
pub mod events;
mod membership;
mod pause;
mod registry;
mod views;

pub use access::{Capabilities, Capability, Role};
pub use claims::{Claim, ClaimStatus, ClaimsBook, QueueEntry, SubmitOutcome};
pub use covers::{Cover, CoverStatus, CoverStore};
pub use drain::{DrainReport, FailedReplay, ReplayedClaim};
pub use errors::{ContractError, ContractResult};
pub use membership::MemberRoles;
pub use pause::{PauseController, PauseInitiator, PauseRecord, PauseState};
pub use registry::Registry;
pub use views::{ConfigView, StatsView};

pub type Balance = u128;

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

// Cooling-off applied to time-gated member transitions (28 days)
pub const DEFAULT_PAUSE_COOLDOWN_SEC: u64 = 2_419_200;

pub const DEFAULT_JOINING_FEE: Balance = 2_000_000_000_000_000_000_000; // 0.002 NEAR

#[derive(BorshSerialize, BorshStorageKey)]
#[borsh(crate = "near_sdk::borsh")]
enum StorageKey {
    Components,
    Members,
    AdvisoryBoard,
    PendingJoins,
    WithdrawnAt,
    Covers,
    CoversByHolder,
    Claims,
    ClaimVotes,
    ClaimQueue,
    PauseLog,
}

/// Deployment configuration accepted by `new`
#[derive(Clone, Debug, Default)]
#[near(serializers = [json])]
pub struct ContractConfig {
    pub pause_cooldown_sec: Option<u64>,
    pub joining_fee: Option<U128>,
}

#[derive(BorshDeserialize, BorshSerialize, PanicOnDefault)]
#[borsh(crate = "near_sdk::borsh")]
#[near_bindgen]
pub struct Contract {
    registry: Registry,
    members: MemberRoles,
    covers: CoverStore,
    pause: PauseController,
    claims: ClaimsBook,
}

#[near_bindgen]
impl Contract {
    #[init]
    pub fn new(
        owner_id: AccountId,
        advisory_board: Vec<AccountId>,
        config: Option<ContractConfig>,
    ) -> Self {
        let config = config.unwrap_or_default();
        let cooldown_sec = config
            .pause_cooldown_sec
            .unwrap_or(DEFAULT_PAUSE_COOLDOWN_SEC);
        assert!(cooldown_sec > 0, "Pause cooldown must be positive");

        let joining_fee = config
            .joining_fee
            .map(|fee| fee.0)
            .unwrap_or(DEFAULT_JOINING_FEE);

        let mut members = MemberRoles::new(joining_fee);
        for account in advisory_board {
            members.add_advisory_board_member(account);
        }

        log!(
            "Initialized: owner={}, advisory_board={}, cooldown={}s",
            owner_id,
            members.advisory_board_len(),
            cooldown_sec
        );

        Self {
            registry: Registry::new(owner_id),
            members,
            covers: CoverStore::new(),
            pause: PauseController::new(cooldown_sec),
            claims: ClaimsBook::new(),
        }
    }
}

#[cfg(test)]
mod tests;
