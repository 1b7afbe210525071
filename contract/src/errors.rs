use near_sdk::{env, FunctionError};

use crate::Balance;

/// Errors surfaced by contract methods.
///
/// Public mutators return `Result<_, ContractError>` under `#[handle_result(aliased)]`,
/// so an `Err` panics with the `Display` text and the receipt is reverted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    #[error("Unauthorized: caller lacks the required role")]
    Unauthorized,
    #[error("System is paused")]
    SystemPaused,
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid deposit: required {required} yoctoNEAR, attached {attached} yoctoNEAR")]
    InvalidDeposit { required: Balance, attached: Balance },
    #[error("Replay of queued claim for cover {cover_id} failed: {reason}")]
    ReplayFailure { cover_id: u64, reason: String },
}

impl ContractError {
    pub(crate) fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl FunctionError for ContractError {
    fn panic(&self) -> ! {
        env::panic_str(&self.to_string())
    }
}

pub type ContractResult<T> = Result<T, ContractError>;
