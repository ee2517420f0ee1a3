use anchor_lang::prelude::*;
use anchor_lang::solana_program::pubkey::Pubkey;
use anchor_spl::token;
use common::constants::STRATEGY_SEED_PART;
use spl_token::instruction::AuthorityType;

pub mod context;
pub mod env;
pub mod error;
pub mod state;
pub mod utils;

use crate::context::*;
use crate::env::TokenPoolEnv;
use crate::state::*;
use crate::utils::{base_after_exit, claim_routes, swap_routes};

use strategy_package::access::{self, only_owner, only_vault};
use strategy_package::converter::selected_policies;
use strategy_package::fee;
use strategy_package::state::{
    HarvestParams, HarvestReport, LpMintOutcome, StrategyConfig, StrategyState,
};
use strategy_package::strategy_core;

declare_id!("6ZL4MhdYcFnaiFd3FHznD7BkXVQqnzkbsN5tSPtQAuyX");

#[program]
pub mod lp_strategy {
    use super::*;

    /// Deploys the strategy for the principal `mint`. The payer becomes owner and first executor.
    pub fn initialize(ctx: Context<Initialize>, args: InitializeArgs) -> Result<()> {
        let deployer = ctx.accounts.authority.key();
        let state = StrategyState::new(StrategyConfig {
            vault: ctx.accounts.vault_authority.key(),
            principal_mint: ctx.accounts.mint.key(),
            sink: ctx.accounts.pool_vault.key(),
            reward_policies: args.reward_policies,
            owner: deployer,
            executor: deployer,
            fee_collector: args.fee_collector,
            fee_rate_bps: args.fee_rate_bps,
            exit_delay: args.exit_delay,
        })?;

        let strategy_key = ctx.accounts.strategy_account.key();
        let (_, bump) = Pubkey::find_program_address(
            &[STRATEGY_SEED_PART, strategy_key.as_ref()],
            ctx.program_id,
        );

        let strategy_account = &mut ctx.accounts.strategy_account;
        strategy_account.state = state;
        strategy_account.strategy_vault = ctx.accounts.strategy_vault.key();
        strategy_account.vault_token_account = ctx.accounts.vault_token_account.key();
        strategy_account.vault_link = ctx.accounts.vault_link.key();
        strategy_account.strategy_authority_bump = bump;

        ctx.accounts.vault_link.strategy = strategy_key;

        token::set_authority(
            ctx.accounts.create_change_authority_context(),
            AuthorityType::AccountOwner,
            Some(ctx.accounts.strategy_authority.key()),
        )?;

        //approve tokens
        token::approve(ctx.accounts.create_approve_pool_context(), u64::MAX)?;
        token::approve(ctx.accounts.create_approve_vault_context(), u64::MAX)?;

        Ok(())
    }

    pub fn set_fee_parameters(
        ctx: Context<UpdateStrategy>,
        fee_collector: Pubkey,
        fee_rate_bps: u16,
    ) -> Result<()> {
        let caller = ctx.accounts.authority.key();
        fee::set_fee_parameters(
            &mut ctx.accounts.strategy_account.state,
            &caller,
            fee_collector,
            fee_rate_bps,
        )
    }

    pub fn set_strategy_executor(
        ctx: Context<UpdateStrategy>,
        executor: Pubkey,
        value: bool,
    ) -> Result<()> {
        let caller = ctx.accounts.authority.key();
        access::set_strategy_executor(
            &mut ctx.accounts.strategy_account.state,
            &caller,
            executor,
            value,
        )
    }

    pub fn transfer_ownership(ctx: Context<UpdateStrategy>, new_owner: Pubkey) -> Result<()> {
        let caller = ctx.accounts.authority.key();
        access::transfer_ownership(&mut ctx.accounts.strategy_account.state, &caller, new_owner)
    }

    /// Sets the amount the vault wants invested in this strategy.
    pub fn set_target_balance(ctx: Context<SetTargetBalance>, target_balance: u64) -> Result<()> {
        only_vault(&ctx.accounts.strategy_account.state, &ctx.accounts.authority.key())?;
        ctx.accounts.vault_link.target_balance = target_balance;
        msg!("Target balance set to {}", target_balance);
        Ok(())
    }

    pub fn skim(ctx: Context<Skim>, amount: u64) -> Result<()> {
        let caller = ctx.accounts.authority.key();
        let accounts = ctx.accounts;

        let mut env = TokenPoolEnv::new(
            accounts.strategy_account.key(),
            accounts.strategy_account.strategy_authority_bump,
            accounts.strategy_authority.to_account_info(),
            accounts.strategy_vault.to_account_info(),
            accounts.token_program.to_account_info(),
        )
        .with_pool_vault(accounts.pool_vault.to_account_info());

        strategy_core::skim(&mut accounts.strategy_account.state, &mut env, &caller, amount)
    }

    // remaining - [reward pool account, strategy reward account] per reward policy, when harvesting rewards
    pub fn harvest<'info>(
        ctx: Context<'_, '_, '_, 'info, Harvest<'info>>,
        max_balance: u64,
        rebalance: bool,
        min_out: u64,
        harvest_rewards: bool,
    ) -> Result<HarvestReport> {
        let caller = ctx.accounts.executor.key();
        let routes = if harvest_rewards {
            claim_routes(
                &ctx.accounts.strategy_account.state.reward_policies,
                &ctx.accounts.strategy_authority.key(),
                ctx.remaining_accounts,
            )?
        } else {
            vec![]
        };
        let accounts = ctx.accounts;

        let mut env = TokenPoolEnv::new(
            accounts.strategy_account.key(),
            accounts.strategy_account.strategy_authority_bump,
            accounts.strategy_authority.to_account_info(),
            accounts.strategy_vault.to_account_info(),
            accounts.token_program.to_account_info(),
        )
        .with_pool_vault(accounts.pool_vault.to_account_info())
        .with_vault_token_account(accounts.vault_token_account.to_account_info())
        .with_vault_link(&mut accounts.vault_link)
        .with_routes(routes);

        strategy_core::harvest(
            &mut accounts.strategy_account.state,
            &mut env,
            &caller,
            HarvestParams {
                max_balance,
                rebalance,
                min_out,
                harvest_rewards,
            },
        )
    }

    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<u64> {
        let caller = ctx.accounts.authority.key();
        let accounts = ctx.accounts;

        let mut env = TokenPoolEnv::new(
            accounts.strategy_account.key(),
            accounts.strategy_account.strategy_authority_bump,
            accounts.strategy_authority.to_account_info(),
            accounts.strategy_vault.to_account_info(),
            accounts.token_program.to_account_info(),
        )
        .with_pool_vault(accounts.pool_vault.to_account_info())
        .with_vault_token_account(accounts.vault_token_account.to_account_info());

        strategy_core::withdraw(&mut accounts.strategy_account.state, &mut env, &caller, amount)
    }

    pub fn queue_exit(ctx: Context<QueueExit>) -> Result<()> {
        let caller = ctx.accounts.authority.key();
        let now = Clock::get()?.unix_timestamp;
        strategy_core::queue_exit(&mut ctx.accounts.strategy_account.state, &caller, now)
    }

    pub fn exit(ctx: Context<Exit>, max_balance: u64) -> Result<u64> {
        let caller = ctx.accounts.authority.key();
        let now = Clock::get()?.unix_timestamp;
        let accounts = ctx.accounts;

        let mut env = TokenPoolEnv::new(
            accounts.strategy_account.key(),
            accounts.strategy_account.strategy_authority_bump,
            accounts.strategy_authority.to_account_info(),
            accounts.strategy_vault.to_account_info(),
            accounts.token_program.to_account_info(),
        )
        .with_pool_vault(accounts.pool_vault.to_account_info())
        .with_vault_token_account(accounts.vault_token_account.to_account_info())
        .with_vault_link(&mut accounts.vault_link);

        strategy_core::exit(
            &mut accounts.strategy_account.state,
            &mut env,
            &caller,
            max_balance,
            now,
        )
    }

    // remaining - [swapper program, strategy reward account, ..passthrough] per converted reward
    pub fn swap_to_lp<'info>(
        ctx: Context<'_, '_, '_, 'info, SwapToLp<'info>>,
        min_out: u64,
        reward_mint: Option<Pubkey>,
        passthrough_counts: Vec<u8>,
    ) -> Result<LpMintOutcome> {
        let caller = ctx.accounts.executor.key();
        let policies = selected_policies(&ctx.accounts.strategy_account.state, reward_mint)?;
        let routes = swap_routes(
            &policies,
            &ctx.accounts.strategy_authority.key(),
            &passthrough_counts,
            ctx.remaining_accounts,
        )?;
        let accounts = ctx.accounts;

        let mut env = TokenPoolEnv::new(
            accounts.strategy_account.key(),
            accounts.strategy_account.strategy_authority_bump,
            accounts.strategy_authority.to_account_info(),
            accounts.strategy_vault.to_account_info(),
            accounts.token_program.to_account_info(),
        )
        .with_fee_collector(
            accounts.strategy_account.state.fee_collector,
            accounts.fee_collector_vault.to_account_info(),
        )
        .with_routes(routes);

        strategy_core::swap_to_lp(
            &mut accounts.strategy_account.state,
            &mut env,
            &caller,
            min_out,
            reward_mint,
        )
    }

    // remaining - accounts of the forwarded instruction
    pub fn after_exit<'info>(
        ctx: Context<'_, '_, '_, 'info, AfterExit<'info>>,
        name: String,
        args: Vec<Vec<u8>>,
    ) -> Result<()> {
        only_owner(&ctx.accounts.strategy_account.state, &ctx.accounts.authority.key())?;

        let strategy_key = ctx.accounts.strategy_account.key();
        let seeds = &[
            STRATEGY_SEED_PART,
            strategy_key.as_ref(),
            &[ctx.accounts.strategy_account.strategy_authority_bump],
        ];
        let signer = &[&seeds[..]];

        base_after_exit(
            ctx.remaining_accounts,
            &ctx.accounts.target_program.to_account_info(),
            &ctx.accounts.strategy_authority.key(),
            &name,
            args,
            signer,
        )
    }
}
