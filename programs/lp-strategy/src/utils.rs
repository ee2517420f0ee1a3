use std::ops::Range;

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::AccountMeta;
use anchor_lang::solana_program::program_option::COption;
use common::errors::ErrorCode as CommonErrorCode;
use common::utils::{invoke_signed_instruction, load_token_account};
use strategy_package::state::RewardPolicy;

use crate::env::RewardRoute;
use crate::error::ErrorCode;
use crate::state::{CLAIM_ACCOUNTS_PER_REWARD, SWAP_ROUTE_FIXED_ACCOUNTS_COUNT};

/// Builds the claim routes of every reward policy.
///
/// Remaining accounts, per policy in configuration order:
///
///   0. `[writable]` reward pool token account, delegated to the strategy authority
///   1. `[writable]` strategy reward token account, owned by the strategy authority
pub fn claim_routes<'info>(
    policies: &[RewardPolicy],
    strategy_authority: &Pubkey,
    remaining_accounts: &[AccountInfo<'info>],
) -> Result<Vec<RewardRoute<'info>>> {
    require!(
        remaining_accounts.len() == policies.len() * CLAIM_ACCOUNTS_PER_REWARD,
        ErrorCode::InvalidRemainingAccounts
    );

    policies
        .iter()
        .zip(remaining_accounts.chunks(CLAIM_ACCOUNTS_PER_REWARD))
        .map(|(policy, accounts)| {
            check_reward_source(&accounts[0], policy, strategy_authority)?;
            check_reward_holding(&accounts[1], policy, strategy_authority)?;
            Ok(RewardRoute {
                mint: policy.mint,
                holding: accounts[1].clone(),
                source: Some(accounts[0].clone()),
                swapper_program: None,
                passthrough: vec![],
            })
        })
        .collect()
}

/// Builds the conversion routes of `policies`.
///
/// Remaining accounts, per policy in order:
///
///   0. `[]`         swapper program of the policy
///   1. `[writable]` strategy reward token account, owned by the strategy authority
///   2.. `passthrough_counts[i]` swapper specific accounts
pub fn swap_routes<'info>(
    policies: &[RewardPolicy],
    strategy_authority: &Pubkey,
    passthrough_counts: &[u8],
    remaining_accounts: &[AccountInfo<'info>],
) -> Result<Vec<RewardRoute<'info>>> {
    require!(
        passthrough_counts.len() == policies.len(),
        ErrorCode::InvalidRemainingAccounts
    );
    let ranges = split_routes(passthrough_counts, remaining_accounts.len())?;

    policies
        .iter()
        .zip(ranges)
        .map(|(policy, range)| {
            let accounts = &remaining_accounts[range];
            check_reward_holding(&accounts[1], policy, strategy_authority)?;
            Ok(RewardRoute {
                mint: policy.mint,
                holding: accounts[1].clone(),
                source: None,
                swapper_program: Some(accounts[0].clone()),
                passthrough: accounts[SWAP_ROUTE_FIXED_ACCOUNTS_COUNT..].to_vec(),
            })
        })
        .collect()
}

/// Splits `total` remaining accounts into consecutive routes, each made of the
/// fixed route accounts followed by its passthrough accounts.
pub fn split_routes(passthrough_counts: &[u8], total: usize) -> Result<Vec<Range<usize>>> {
    let mut ranges = Vec::with_capacity(passthrough_counts.len());
    let mut start = 0usize;
    for count in passthrough_counts {
        let end = start
            .checked_add(SWAP_ROUTE_FIXED_ACCOUNTS_COUNT + *count as usize)
            .ok_or(CommonErrorCode::WrongIntegerAddition)?;
        require!(end <= total, ErrorCode::InvalidRemainingAccounts);
        ranges.push(start..end);
        start = end;
    }
    require!(start == total, ErrorCode::InvalidRemainingAccounts);
    Ok(ranges)
}

fn check_reward_holding(
    account: &AccountInfo,
    policy: &RewardPolicy,
    strategy_authority: &Pubkey,
) -> Result<()> {
    let token_account = load_token_account(account)?;
    require_keys_eq!(token_account.mint, policy.mint, ErrorCode::InvalidRewardAccount);
    require_keys_eq!(
        token_account.owner,
        *strategy_authority,
        CommonErrorCode::InvalidTokenAccountOwner
    );
    Ok(())
}

fn check_reward_source(
    account: &AccountInfo,
    policy: &RewardPolicy,
    strategy_authority: &Pubkey,
) -> Result<()> {
    let token_account = load_token_account(account)?;
    require_keys_eq!(token_account.mint, policy.mint, ErrorCode::InvalidRewardAccount);
    require!(
        token_account.delegate == COption::Some(*strategy_authority),
        ErrorCode::InvalidRewardAccount
    );
    Ok(())
}

/// Common function for invoke instruction from program.
/// After exited, the owner can perform ANY call. This is to rescue any funds that didn't
/// get released during exit or got earned afterwards due to vesting or airdrops, etc.
///
/// Arguments:
///
/// * `accounts`       - Accounts that should be passed to the program.
/// * `target_program` - The program that executes this instruction.
/// * `name`           - Instruction name in the `global` namespace.
/// * `args`           - Arguments for instruction.
/// * `signer`         - Strategy authority pda signature.
pub fn base_after_exit<'info>(
    accounts: &[AccountInfo<'info>],
    target_program: &AccountInfo<'info>,
    strategy_authority: &Pubkey,
    name: &str,
    args: Vec<Vec<u8>>,
    signer: &[&[&[u8]]],
) -> Result<()> {
    require!(
        !accounts.is_empty(),
        ErrorCode::EmptyAccountsListForAfterExit
    );

    let accounts_meta: Vec<AccountMeta> = accounts
        .iter()
        .map(|account| AccountMeta {
            pubkey: account.key(),
            // the pda never signs the outer transaction
            is_signer: account.is_signer || account.key == strategy_authority,
            is_writable: account.is_writable,
        })
        .collect();

    let mut accounts_info = accounts.to_vec();
    accounts_info.push(target_program.clone());

    invoke_signed_instruction(
        "global",
        name,
        args,
        target_program.key(),
        accounts_meta,
        &accounts_info,
        signer,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_routes() {
        let ranges = split_routes(&[3, 0], 7).unwrap();
        assert_eq!(ranges, vec![0..5, 5..7]);

        assert!(split_routes(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn test_split_routes_requires_exact_accounts() {
        assert_eq!(
            split_routes(&[3, 0], 8).unwrap_err(),
            error!(ErrorCode::InvalidRemainingAccounts)
        );
        assert_eq!(
            split_routes(&[3, 1], 7).unwrap_err(),
            error!(ErrorCode::InvalidRemainingAccounts)
        );
        assert_eq!(
            split_routes(&[], 2).unwrap_err(),
            error!(ErrorCode::InvalidRemainingAccounts)
        );
    }
}
