//! Component registry
//!
//! Resolves logical component tags (e.g. "CL", "QD") to the accounts that
//! currently implement them. Registered components, together with the contract
//! account itself, form the set of internal callers.

use crate::*;
use near_sdk::collections::UnorderedMap;

#[derive(BorshDeserialize, BorshSerialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct Registry {
    owner_id: AccountId,
    components: UnorderedMap<String, AccountId>,
    upgrade_in_progress: bool,
}

impl Registry {
    pub(crate) fn new(owner_id: AccountId) -> Self {
        Self {
            owner_id,
            components: UnorderedMap::new(StorageKey::Components),
            upgrade_in_progress: false,
        }
    }

    pub fn owner_id(&self) -> &AccountId {
        &self.owner_id
    }

    pub fn is_owner(&self, account: &AccountId) -> bool {
        *account == self.owner_id
    }

    pub fn is_internal(&self, account: &AccountId) -> bool {
        *account == env::current_account_id() || self.components.values().any(|a| a == *account)
    }

    pub fn resolve(&self, tag: &str) -> Option<AccountId> {
        self.components.get(&tag.to_string())
    }

    pub fn upgrade_in_progress(&self) -> bool {
        self.upgrade_in_progress
    }

    /// Replace the account behind `tag`, returning the previous one
    pub(crate) fn set_component(
        &mut self,
        tag: String,
        account: AccountId,
    ) -> ContractResult<Option<AccountId>> {
        if tag.is_empty() || tag.len() > 8 {
            return Err(ContractError::invalid_state(
                "Component tag must be 1-8 characters",
            ));
        }
        Ok(self.components.insert(&tag, &account))
    }

    pub(crate) fn set_owner(&mut self, new_owner_id: AccountId) -> AccountId {
        std::mem::replace(&mut self.owner_id, new_owner_id)
    }

    pub(crate) fn set_upgrade_in_progress(&mut self, in_progress: bool) -> ContractResult<()> {
        if self.upgrade_in_progress == in_progress {
            return Err(ContractError::invalid_state(if in_progress {
                "Upgrade already in progress"
            } else {
                "No upgrade in progress"
            }));
        }
        self.upgrade_in_progress = in_progress;
        Ok(())
    }

    pub(crate) fn components(&self) -> Vec<(String, AccountId)> {
        self.components.to_vec()
    }
}

#[near_bindgen]
impl Contract {
    /// Resolve a component tag to its current account
    pub fn resolve_address(&self, tag: String) -> Option<AccountId> {
        self.registry.resolve(&tag)
    }

    /// All registered components as (tag, account) pairs
    pub fn get_components(&self) -> Vec<(String, AccountId)> {
        self.registry.components()
    }

    pub fn is_owner(&self, account_id: AccountId) -> bool {
        self.registry.is_owner(&account_id)
    }

    pub fn is_internal(&self, account_id: AccountId) -> bool {
        self.registry.is_internal(&account_id)
    }

    pub fn is_member(&self, account_id: AccountId) -> bool {
        self.members.is_member(&account_id)
    }
}
