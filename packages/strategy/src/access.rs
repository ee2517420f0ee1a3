use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::events::{LogOwnershipTransferred, LogSetStrategyExecutor};
use crate::state::{StrategyState, MAX_EXECUTORS};
use crate::strategy_core::run_guarded;

pub fn only_owner(state: &StrategyState, caller: &Pubkey) -> Result<()> {
    require_keys_eq!(*caller, state.owner, ErrorCode::UnauthorizedOwner);
    Ok(())
}

pub fn only_executor(state: &StrategyState, caller: &Pubkey) -> Result<()> {
    require!(state.is_executor(caller), ErrorCode::UnauthorizedExecutor);
    Ok(())
}

pub fn only_vault(state: &StrategyState, caller: &Pubkey) -> Result<()> {
    require_keys_eq!(*caller, state.vault, ErrorCode::UnauthorizedVault);
    Ok(())
}

/// Enables or disables `executor`. Setting the current value again is a no-op.
pub fn set_strategy_executor(
    state: &mut StrategyState,
    caller: &Pubkey,
    executor: Pubkey,
    value: bool,
) -> Result<()> {
    run_guarded(state, |state| {
        only_owner(state, caller)?;

        let position = state.executors.iter().position(|known| known == &executor);
        match (value, position) {
            (true, None) => {
                require!(
                    state.executors.len() < MAX_EXECUTORS,
                    ErrorCode::TooManyExecutors
                );
                state.executors.push(executor);
            }
            (false, Some(index)) => {
                state.executors.remove(index);
            }
            _ => {}
        }

        emit!(LogSetStrategyExecutor { executor, value });
        Ok(())
    })
}

/// Hands ownership to `new_owner` immediately.
pub fn transfer_ownership(
    state: &mut StrategyState,
    caller: &Pubkey,
    new_owner: Pubkey,
) -> Result<()> {
    run_guarded(state, |state| {
        only_owner(state, caller)?;
        require!(
            new_owner != Pubkey::default(),
            ErrorCode::EmptyOwnerAddress
        );

        emit!(LogOwnershipTransferred {
            owner: state.owner,
            new_owner,
        });
        state.owner = new_owner;
        Ok(())
    })
}
