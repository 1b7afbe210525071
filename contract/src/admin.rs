use crate::*;

#[near_bindgen]
impl Contract {
    /// Set new owner (only current owner can call)
    #[handle_result(aliased)]
    pub fn change_owner(&mut self, new_owner_id: AccountId) -> ContractResult<()> {
        let (_, caps) = self.caller();
        caps.require_any(&[Capability::Owner])?;

        let old_owner = self.registry.set_owner(new_owner_id.clone());
        log!("Owner changed from {} to {}", old_owner, new_owner_id);
        Ok(())
    }

    /// Point a component tag at a new account (only owner can call).
    /// The previous account stops being an internal caller.
    #[handle_result(aliased)]
    pub fn set_component_address(&mut self, tag: String, account_id: AccountId) -> ContractResult<()> {
        let (_, caps) = self.caller();
        caps.require_any(&[Capability::Owner])?;

        match self.registry.set_component(tag.clone(), account_id.clone())? {
            Some(old) => log!("Component {} changed from {} to {}", tag, old, account_id),
            None => log!("Component {} registered at {}", tag, account_id),
        }
        Ok(())
    }

    /// Mark the start of a component upgrade (only owner can call)
    #[handle_result(aliased)]
    pub fn begin_upgrade(&mut self) -> ContractResult<()> {
        let (_, caps) = self.caller();
        caps.require_any(&[Capability::Owner])?;

        self.registry.set_upgrade_in_progress(true)?;
        log!("Upgrade started");
        Ok(())
    }

    #[handle_result(aliased)]
    pub fn finish_upgrade(&mut self) -> ContractResult<()> {
        let (_, caps) = self.caller();
        caps.require_any(&[Capability::Owner])?;

        self.registry.set_upgrade_in_progress(false)?;
        log!("Upgrade finished");
        Ok(())
    }

    /// Grant the advisory board role (only owner can call)
    #[handle_result(aliased)]
    pub fn add_advisory_board_member(&mut self, account_id: AccountId) -> ContractResult<()> {
        let (_, caps) = self.caller();
        caps.require_any(&[Capability::Owner])?;

        if !self.members.add_advisory_board_member(account_id.clone()) {
            return Err(ContractError::invalid_state(format!(
                "{} is already on the advisory board",
                account_id
            )));
        }
        log!("Added advisory board member: {}", account_id);
        Ok(())
    }

    #[handle_result(aliased)]
    pub fn remove_advisory_board_member(&mut self, account_id: AccountId) -> ContractResult<()> {
        let (_, caps) = self.caller();
        caps.require_any(&[Capability::Owner])?;

        if !self.members.remove_advisory_board_member(&account_id) {
            return Err(ContractError::not_found(format!(
                "{} is not on the advisory board",
                account_id
            )));
        }
        log!("Removed advisory board member: {}", account_id);
        Ok(())
    }
}
