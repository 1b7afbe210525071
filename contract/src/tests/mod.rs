



#[cfg(test)]
use crate::*;
#[cfg(test)]
use near_sdk::test_utils::{accounts, VMContextBuilder};
#[cfg(test)]
use near_sdk::{testing_env, NearToken};

#[cfg(test)]
pub fn contract_account() -> AccountId {
    "mutual.near".parse().unwrap()
}

#[cfg(test)]
pub fn get_context(predecessor: AccountId, deposit: NearToken) -> VMContextBuilder {
    let mut builder = VMContextBuilder::new();
    builder
        .current_account_id(contract_account())
        .predecessor_account_id(predecessor)
        .attached_deposit(deposit);
    builder
}

/// Switch the predecessor of the next calls
#[cfg(test)]
pub fn set_caller(predecessor: AccountId) {
    testing_env!(get_context(predecessor, NearToken::from_near(0)).build());
}

#[cfg(test)]
pub fn set_caller_at(predecessor: AccountId, block_timestamp: u64) {
    let mut context = get_context(predecessor, NearToken::from_near(0));
    context.block_timestamp(block_timestamp);
    testing_env!(context.build());
}

/// Owner is accounts(0), advisory board is accounts(1)
#[cfg(test)]
pub fn setup_contract() -> Contract {
    set_caller(accounts(0));
    Contract::new(accounts(0), vec![accounts(1)], None)
}

/// Pay the joining fee as `account` and approve KYC as owner
#[cfg(test)]
pub fn join(contract: &mut Contract, account: AccountId) {
    let context = get_context(
        account.clone(),
        NearToken::from_yoctonear(DEFAULT_JOINING_FEE),
    );
    testing_env!(context.build());
    contract.pay_joining_fee(account.clone()).unwrap();

    set_caller(accounts(0));
    contract.kyc_verdict(account, true).unwrap();
}

/// Make `holder` a member and register a cover for it, returning the cover id
#[cfg(test)]
pub fn member_with_cover(contract: &mut Contract, holder: AccountId) -> u64 {
    if !contract.is_member(holder.clone()) {
        join(contract, holder.clone());
    }
    set_caller(accounts(0));
    contract.register_cover(holder).unwrap()
}

#[cfg(test)]
mod basic_tests {
    use super::*;

    #[test]
    fn test_initialization() {
        let contract = setup_contract();

        assert!(contract.registry.is_owner(&accounts(0)));
        assert!(contract.members.is_advisory_board(&accounts(1)));
        assert!(!contract.is_paused());
        assert_eq!(contract.get_cooldown(), DEFAULT_PAUSE_COOLDOWN_SEC);
        assert_eq!(contract.claim_count(), 0);
        assert_eq!(contract.pause_log_length(), 0);
    }

    #[test]
    fn test_get_config() {
        let contract = setup_contract();
        let config = contract.get_config();

        assert_eq!(config.owner_id, accounts(0));
        assert_eq!(config.advisory_board, vec![accounts(1)]);
        assert_eq!(config.joining_fee, U128(DEFAULT_JOINING_FEE));
        assert_eq!(config.pause_cooldown_sec, 2_419_200);
        assert!(!config.upgrade_in_progress);
    }

    #[test]
    fn test_custom_config() {
        set_caller(accounts(0));
        let contract = Contract::new(
            accounts(0),
            vec![],
            Some(ContractConfig {
                pause_cooldown_sec: Some(60),
                joining_fee: Some(U128(5)),
            }),
        );

        let config = contract.get_config();
        assert_eq!(config.pause_cooldown_sec, 60);
        assert_eq!(config.joining_fee, U128(5));
        assert!(config.advisory_board.is_empty());
    }

    #[test]
    #[should_panic(expected = "Pause cooldown must be positive")]
    fn test_zero_cooldown_rejected_at_init() {
        set_caller(accounts(0));
        Contract::new(
            accounts(0),
            vec![],
            Some(ContractConfig {
                pause_cooldown_sec: Some(0),
                joining_fee: None,
            }),
        );
    }

    #[test]
    fn test_get_stats() {
        let mut contract = setup_contract();
        member_with_cover(&mut contract, accounts(2));

        let stats = contract.get_stats();
        assert_eq!(stats.members, 1);
        assert_eq!(stats.covers, 1);
        assert_eq!(stats.claims, 0);
        assert_eq!(stats.queued_claims, 0);
        assert_eq!(stats.pause_log_length, 0);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ContractError::SystemPaused.to_string(),
            "System is paused"
        );
        assert_eq!(
            ContractError::InvalidDeposit {
                required: 10,
                attached: 9
            }
            .to_string(),
            "Invalid deposit: required 10 yoctoNEAR, attached 9 yoctoNEAR"
        );
    }
}
