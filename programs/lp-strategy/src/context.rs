use anchor_lang::prelude::*;
use anchor_spl::token::{Approve, Mint, SetAuthority, Token, TokenAccount};
use common::constants::{STRATEGY_SEED_PART, STRATEGY_VAULT_SEED_PART, VAULT_LINK_SEED_PART};
use common::errors::ErrorCode as CommonErrorCode;
use strategy_package::state::StrategyStatus;

use crate::error::ErrorCode;
use crate::state::*;

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Strategy token account holding the idle principal.
    #[account(init,
        seeds = [STRATEGY_VAULT_SEED_PART.as_ref(),
                 strategy_account.key().as_ref(),
                 mint.key().as_ref()],
        bump,
        payer = authority,
        token::mint = mint,
        token::authority = authority,
        )]
    pub strategy_vault: Box<Account<'info, TokenAccount>>,
    /// Strategy account.
    #[account(init,
        payer = authority,
        space = LpStrategy::SIZE)]
    pub strategy_account: Box<Account<'info, LpStrategy>>,
    /// Allocation and report exchange with the vault.
    #[account(init,
        seeds = [VAULT_LINK_SEED_PART.as_ref(),
                 strategy_account.key().as_ref()],
        bump,
        payer = authority,
        space = VaultLink::SIZE)]
    pub vault_link: Box<Account<'info, VaultLink>>,
    /// Principal token mint account.
    pub mint: Box<Account<'info, Mint>>,
    /// Pool token account the principal is invested into.
    #[account(mut, constraint = pool_vault.mint == mint.key() @ CommonErrorCode::IncompatibleTokenAccounts)]
    pub pool_vault: Box<Account<'info, TokenAccount>>,
    /// Pool authority account.
    pub pool_authority: Signer<'info>,
    /// Vault token account for the principal.
    #[account(mut,
              constraint = vault_token_account.mint == mint.key() @ CommonErrorCode::IncompatibleTokenAccounts,
              constraint = vault_token_account.owner == vault_authority.key() @ CommonErrorCode::VaultTokenAccountInvalidAuthority)]
    pub vault_token_account: Box<Account<'info, TokenAccount>>,
    /// Vault token authority, the only caller of skim, withdraw and exit.
    pub vault_authority: Signer<'info>,
    /// Payer account, first owner and first executor of the strategy.
    #[account(mut)]
    pub authority: Signer<'info>,
    /// Strategy token authority pda account.
    /// CHECK: seeds
    #[account(seeds = [STRATEGY_SEED_PART.as_ref(),
                       strategy_account.key().as_ref()],
              bump)]
    pub strategy_authority: UncheckedAccount<'info>,
    /// System program account.
    pub system_program: Program<'info, System>,
    /// Rent account.
    pub rent: Sysvar<'info, Rent>,
    /// Token program account.
    pub token_program: Program<'info, Token>,
}

impl<'info> Initialize<'info> {
    pub fn create_change_authority_context(
        &self,
    ) -> CpiContext<'_, '_, '_, 'info, SetAuthority<'info>> {
        let cpi_accounts = SetAuthority {
            account_or_mint: self.strategy_vault.to_account_info(),
            current_authority: self.authority.to_account_info(),
        };
        CpiContext::new(self.token_program.to_account_info(), cpi_accounts)
    }

    pub fn create_approve_pool_context(&self) -> CpiContext<'_, '_, '_, 'info, Approve<'info>> {
        let cpi_accounts = Approve {
            to: self.pool_vault.to_account_info(),
            authority: self.pool_authority.to_account_info(),
            delegate: self.strategy_authority.to_account_info(),
        };
        CpiContext::new(self.token_program.to_account_info(), cpi_accounts)
    }

    pub fn create_approve_vault_context(&self) -> CpiContext<'_, '_, '_, 'info, Approve<'info>> {
        let cpi_accounts = Approve {
            to: self.vault_token_account.to_account_info(),
            authority: self.vault_authority.to_account_info(),
            delegate: self.strategy_authority.to_account_info(),
        };
        CpiContext::new(self.token_program.to_account_info(), cpi_accounts)
    }
}

/// Governance calls: fee parameters, executors and ownership.
#[derive(Accounts)]
pub struct UpdateStrategy<'info> {
    #[account(mut)]
    pub strategy_account: Box<Account<'info, LpStrategy>>,
    pub authority: Signer<'info>,
}

#[derive(Accounts)]
pub struct SetTargetBalance<'info> {
    pub strategy_account: Box<Account<'info, LpStrategy>>,
    #[account(mut, address = strategy_account.vault_link)]
    pub vault_link: Box<Account<'info, VaultLink>>,
    /// Vault token authority.
    pub authority: Signer<'info>,
}

#[derive(Accounts)]
pub struct Skim<'info> {
    #[account(mut)]
    pub strategy_account: Box<Account<'info, LpStrategy>>,
    /// Strategy token account.
    #[account(mut,
              address = strategy_account.strategy_vault,
              constraint = strategy_vault.owner == strategy_authority.key() @ CommonErrorCode::StrategyVaultInvalidAuthority)]
    pub strategy_vault: Box<Account<'info, TokenAccount>>,
    /// Pool token account.
    #[account(mut, address = strategy_account.state.sink)]
    pub pool_vault: Box<Account<'info, TokenAccount>>,
    /// Strategy token authority pda account.
    /// CHECK: seeds
    #[account(seeds = [STRATEGY_SEED_PART.as_ref(),
                       strategy_account.key().as_ref()],
              bump = strategy_account.strategy_authority_bump)]
    pub strategy_authority: UncheckedAccount<'info>,
    /// Token program account.
    pub token_program: Program<'info, Token>,
    /// Vault token authority.
    pub authority: Signer<'info>,
}

// remaining: reward claim accounts when harvesting rewards
#[derive(Accounts)]
pub struct Harvest<'info> {
    #[account(mut)]
    pub strategy_account: Box<Account<'info, LpStrategy>>,
    #[account(mut, address = strategy_account.vault_link)]
    pub vault_link: Box<Account<'info, VaultLink>>,
    /// Strategy token account.
    #[account(mut,
              address = strategy_account.strategy_vault,
              constraint = strategy_vault.owner == strategy_authority.key() @ CommonErrorCode::StrategyVaultInvalidAuthority)]
    pub strategy_vault: Box<Account<'info, TokenAccount>>,
    /// Pool token account.
    #[account(mut, address = strategy_account.state.sink)]
    pub pool_vault: Box<Account<'info, TokenAccount>>,
    /// Vault token account.
    #[account(mut, address = strategy_account.vault_token_account)]
    pub vault_token_account: Box<Account<'info, TokenAccount>>,
    /// Strategy token authority pda account.
    /// CHECK: seeds
    #[account(seeds = [STRATEGY_SEED_PART.as_ref(),
                       strategy_account.key().as_ref()],
              bump = strategy_account.strategy_authority_bump)]
    pub strategy_authority: UncheckedAccount<'info>,
    /// Token program account.
    pub token_program: Program<'info, Token>,
    pub executor: Signer<'info>,
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub strategy_account: Box<Account<'info, LpStrategy>>,
    /// Strategy token account.
    #[account(mut,
              address = strategy_account.strategy_vault,
              constraint = strategy_vault.owner == strategy_authority.key() @ CommonErrorCode::StrategyVaultInvalidAuthority)]
    pub strategy_vault: Box<Account<'info, TokenAccount>>,
    /// Pool token account.
    #[account(mut, address = strategy_account.state.sink)]
    pub pool_vault: Box<Account<'info, TokenAccount>>,
    /// Vault token account.
    #[account(mut, address = strategy_account.vault_token_account)]
    pub vault_token_account: Box<Account<'info, TokenAccount>>,
    /// Strategy token authority pda account.
    /// CHECK: seeds
    #[account(seeds = [STRATEGY_SEED_PART.as_ref(),
                       strategy_account.key().as_ref()],
              bump = strategy_account.strategy_authority_bump)]
    pub strategy_authority: UncheckedAccount<'info>,
    /// Token program account.
    pub token_program: Program<'info, Token>,
    /// Vault token authority.
    pub authority: Signer<'info>,
}

#[derive(Accounts)]
pub struct QueueExit<'info> {
    #[account(mut)]
    pub strategy_account: Box<Account<'info, LpStrategy>>,
    /// Vault token authority.
    pub authority: Signer<'info>,
}

#[derive(Accounts)]
pub struct Exit<'info> {
    #[account(mut)]
    pub strategy_account: Box<Account<'info, LpStrategy>>,
    #[account(mut, address = strategy_account.vault_link)]
    pub vault_link: Box<Account<'info, VaultLink>>,
    /// Strategy token account.
    #[account(mut,
              address = strategy_account.strategy_vault,
              constraint = strategy_vault.owner == strategy_authority.key() @ CommonErrorCode::StrategyVaultInvalidAuthority)]
    pub strategy_vault: Box<Account<'info, TokenAccount>>,
    /// Pool token account.
    #[account(mut, address = strategy_account.state.sink)]
    pub pool_vault: Box<Account<'info, TokenAccount>>,
    /// Vault token account.
    #[account(mut, address = strategy_account.vault_token_account)]
    pub vault_token_account: Box<Account<'info, TokenAccount>>,
    /// Strategy token authority pda account.
    /// CHECK: seeds
    #[account(seeds = [STRATEGY_SEED_PART.as_ref(),
                       strategy_account.key().as_ref()],
              bump = strategy_account.strategy_authority_bump)]
    pub strategy_authority: UncheckedAccount<'info>,
    /// Token program account.
    pub token_program: Program<'info, Token>,
    /// Vault token authority.
    pub authority: Signer<'info>,
}

// remaining: conversion routes, see `utils::swap_routes`
#[derive(Accounts)]
pub struct SwapToLp<'info> {
    #[account(mut)]
    pub strategy_account: Box<Account<'info, LpStrategy>>,
    /// Strategy token account.
    #[account(mut,
              address = strategy_account.strategy_vault,
              constraint = strategy_vault.owner == strategy_authority.key() @ CommonErrorCode::StrategyVaultInvalidAuthority)]
    pub strategy_vault: Box<Account<'info, TokenAccount>>,
    /// Principal token account of the fee collector.
    #[account(mut,
              constraint = fee_collector_vault.owner == strategy_account.state.fee_collector @ ErrorCode::InvalidFeeCollectorAccount,
              constraint = fee_collector_vault.mint == strategy_vault.mint @ CommonErrorCode::IncompatibleTokenAccounts)]
    pub fee_collector_vault: Box<Account<'info, TokenAccount>>,
    /// Strategy token authority pda account.
    /// CHECK: seeds
    #[account(seeds = [STRATEGY_SEED_PART.as_ref(),
                       strategy_account.key().as_ref()],
              bump = strategy_account.strategy_authority_bump)]
    pub strategy_authority: UncheckedAccount<'info>,
    /// Token program account.
    pub token_program: Program<'info, Token>,
    pub executor: Signer<'info>,
}

#[derive(Accounts)]
pub struct AfterExit<'info> {
    #[account(constraint = strategy_account.state.status == StrategyStatus::Exiting @ ErrorCode::StrategyNotExited)]
    pub strategy_account: Box<Account<'info, LpStrategy>>,
    /// Strategy token authority pda account.
    /// CHECK: seeds
    #[account(seeds = [STRATEGY_SEED_PART.as_ref(),
                       strategy_account.key().as_ref()],
              bump = strategy_account.strategy_authority_bump)]
    pub strategy_authority: UncheckedAccount<'info>,
    /// CHECK: any program, the call is owner-only.
    pub target_program: UncheckedAccount<'info>,
    pub authority: Signer<'info>,
}
