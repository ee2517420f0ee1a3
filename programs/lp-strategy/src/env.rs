use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::{self, Transfer};
use common::constants::STRATEGY_SEED_PART;
use common::utils::{invoke_signed_instruction, load_token_account, token_amount};
use strategy_package::state::{HarvestReport, RewardPolicy};
use strategy_package::strategy_interface::{
    ExternalSink, RewardConverter, StrategyHoldings, VaultBridge,
};
use swapper_package::errors::ErrorCode as SwapperErrorCode;
use swapper_package::swapper_interface::{
    swap_to_lp_account_metas, SwapToLpArgs, SWAP_TO_LP_IX_NAME,
};

use crate::error::ErrorCode;
use crate::state::VaultLink;

/// Token accounts of one reward policy.
pub struct RewardRoute<'info> {
    pub mint: Pubkey,
    /// Strategy owned token account the reward is claimed into and swapped from.
    pub holding: AccountInfo<'info>,
    /// Pool account the reward accrues in, delegated to the strategy authority.
    pub source: Option<AccountInfo<'info>>,
    pub swapper_program: Option<AccountInfo<'info>>,
    /// Swapper specific accounts forwarded unchanged.
    pub passthrough: Vec<AccountInfo<'info>>,
}

/// Strategy collaborators backed by SPL token accounts.
///
/// Every transfer out of a strategy held or delegated account is signed by the
/// strategy authority pda. Balances are read from the accounts on each call, so
/// amounts moved by earlier CPIs of the same instruction are visible.
pub struct TokenPoolEnv<'a, 'info> {
    strategy_key: Pubkey,
    strategy_authority_bump: u8,
    strategy_authority: AccountInfo<'info>,
    strategy_vault: AccountInfo<'info>,
    token_program: AccountInfo<'info>,
    pool_vault: Option<AccountInfo<'info>>,
    vault_token_account: Option<AccountInfo<'info>>,
    fee_collector: Option<(Pubkey, AccountInfo<'info>)>,
    vault_link: Option<&'a mut VaultLink>,
    routes: Vec<RewardRoute<'info>>,
}

impl<'a, 'info> TokenPoolEnv<'a, 'info> {
    pub fn new(
        strategy_key: Pubkey,
        strategy_authority_bump: u8,
        strategy_authority: AccountInfo<'info>,
        strategy_vault: AccountInfo<'info>,
        token_program: AccountInfo<'info>,
    ) -> Self {
        TokenPoolEnv {
            strategy_key,
            strategy_authority_bump,
            strategy_authority,
            strategy_vault,
            token_program,
            pool_vault: None,
            vault_token_account: None,
            fee_collector: None,
            vault_link: None,
            routes: vec![],
        }
    }

    pub fn with_pool_vault(mut self, pool_vault: AccountInfo<'info>) -> Self {
        self.pool_vault = Some(pool_vault);
        self
    }

    pub fn with_vault_token_account(mut self, vault_token_account: AccountInfo<'info>) -> Self {
        self.vault_token_account = Some(vault_token_account);
        self
    }

    pub fn with_vault_link(mut self, vault_link: &'a mut VaultLink) -> Self {
        self.vault_link = Some(vault_link);
        self
    }

    pub fn with_fee_collector(mut self, owner: Pubkey, token_account: AccountInfo<'info>) -> Self {
        self.fee_collector = Some((owner, token_account));
        self
    }

    pub fn with_routes(mut self, routes: Vec<RewardRoute<'info>>) -> Self {
        self.routes = routes;
        self
    }

    fn pool_vault(&self) -> Result<&AccountInfo<'info>> {
        self.pool_vault
            .as_ref()
            .ok_or_else(|| error!(ErrorCode::MissingStrategyAccount))
    }

    fn vault_token_account(&self) -> Result<&AccountInfo<'info>> {
        self.vault_token_account
            .as_ref()
            .ok_or_else(|| error!(ErrorCode::MissingStrategyAccount))
    }

    fn route(&self, mint: &Pubkey) -> Result<&RewardRoute<'info>> {
        self.routes
            .iter()
            .find(|route| &route.mint == mint)
            .ok_or_else(|| error!(ErrorCode::RewardAccountsMissing))
    }

    fn sign<T>(&self, op: impl FnOnce(&[&[&[u8]]]) -> Result<T>) -> Result<T> {
        let bump = [self.strategy_authority_bump];
        let authority_seeds: &[&[u8]] = &[STRATEGY_SEED_PART, self.strategy_key.as_ref(), &bump];
        op(&[authority_seeds])
    }

    fn signed_transfer(
        &self,
        from: &AccountInfo<'info>,
        to: &AccountInfo<'info>,
        amount: u64,
    ) -> Result<()> {
        self.sign(|signer| {
            token::transfer(
                CpiContext::new(
                    self.token_program.clone(),
                    Transfer {
                        from: from.clone(),
                        to: to.clone(),
                        authority: self.strategy_authority.clone(),
                    },
                )
                .with_signer(signer),
                amount,
            )
        })
    }

    /// What the strategy authority may move out of `account` as its delegate.
    fn delegated_balance(&self, account: &AccountInfo<'info>) -> Result<u64> {
        let token_account = load_token_account(account)?;
        if token_account.delegate != COption::Some(self.strategy_authority.key()) {
            return Ok(0);
        }
        Ok(token_account.amount.min(token_account.delegated_amount))
    }
}

impl<'a, 'info> ExternalSink for TokenPoolEnv<'a, 'info> {
    fn balance(&self) -> Result<u64> {
        token_amount(self.pool_vault()?)
    }

    fn deposit(&mut self, amount: u64) -> Result<()> {
        self.signed_transfer(&self.strategy_vault, self.pool_vault()?, amount)
    }

    fn withdraw(&mut self, amount: u64) -> Result<u64> {
        let actual = amount.min(self.delegated_balance(self.pool_vault()?)?);
        if actual > 0 {
            self.signed_transfer(self.pool_vault()?, &self.strategy_vault, actual)?;
        }
        Ok(actual)
    }

    fn claimable(&self, reward_mint: &Pubkey) -> Result<u64> {
        let source = self
            .route(reward_mint)?
            .source
            .as_ref()
            .ok_or_else(|| error!(ErrorCode::RewardAccountsMissing))?;
        self.delegated_balance(source)
    }

    fn claim(&mut self, reward_mint: &Pubkey) -> Result<u64> {
        let amount = self.claimable(reward_mint)?;
        if amount > 0 {
            let route = self.route(reward_mint)?;
            let source = route
                .source
                .as_ref()
                .ok_or_else(|| error!(ErrorCode::RewardAccountsMissing))?;
            self.signed_transfer(source, &route.holding, amount)?;
        }
        Ok(amount)
    }
}

impl<'a, 'info> RewardConverter for TokenPoolEnv<'a, 'info> {
    fn convert(&mut self, policy: &RewardPolicy, amount: u64, min_out: u64) -> Result<u64> {
        let route = self.route(&policy.mint)?;
        let swapper_program = route
            .swapper_program
            .as_ref()
            .ok_or_else(|| error!(ErrorCode::RewardAccountsMissing))?;
        require_keys_eq!(
            swapper_program.key(),
            policy.swapper,
            SwapperErrorCode::InvalidSwapperProgram
        );

        let args = SwapToLpArgs {
            amount_in: amount,
            minimum_amount_out: min_out,
            use_token0: policy.use_token0,
        }
        .to_instruction_args()?;
        let accounts_meta = swap_to_lp_account_metas(
            route.holding.key(),
            self.strategy_vault.key(),
            self.strategy_authority.key(),
            self.token_program.key(),
            &route.passthrough,
        );
        let mut accounts_info = vec![
            route.holding.clone(),
            self.strategy_vault.clone(),
            self.strategy_authority.clone(),
            self.token_program.clone(),
        ];
        accounts_info.extend(route.passthrough.iter().cloned());
        accounts_info.push(swapper_program.clone());

        let before = token_amount(&self.strategy_vault)?;
        self.sign(|signer| {
            invoke_signed_instruction(
                "global",
                SWAP_TO_LP_IX_NAME,
                args,
                policy.swapper,
                accounts_meta,
                &accounts_info,
                signer,
            )
        })?;
        Ok(token_amount(&self.strategy_vault)?.saturating_sub(before))
    }
}

impl<'a, 'info> VaultBridge for TokenPoolEnv<'a, 'info> {
    fn target_balance(&self) -> Result<u64> {
        let vault_link = self
            .vault_link
            .as_deref()
            .ok_or_else(|| error!(ErrorCode::MissingStrategyAccount))?;
        Ok(vault_link.target_balance)
    }

    fn report(&mut self, report: &HarvestReport) -> Result<()> {
        let vault_link = self
            .vault_link
            .as_deref_mut()
            .ok_or_else(|| error!(ErrorCode::MissingStrategyAccount))?;
        vault_link.record(report)
    }

    fn return_to_vault(&mut self, amount: u64) -> Result<()> {
        self.signed_transfer(&self.strategy_vault, self.vault_token_account()?, amount)
    }

    fn draw_from_vault(&mut self, amount: u64) -> Result<u64> {
        let drawn = amount.min(self.delegated_balance(self.vault_token_account()?)?);
        if drawn > 0 {
            self.signed_transfer(self.vault_token_account()?, &self.strategy_vault, drawn)?;
        }
        Ok(drawn)
    }
}

impl<'a, 'info> StrategyHoldings for TokenPoolEnv<'a, 'info> {
    fn idle_principal(&self) -> Result<u64> {
        token_amount(&self.strategy_vault)
    }

    fn reward_balance(&self, reward_mint: &Pubkey) -> Result<u64> {
        token_amount(&self.route(reward_mint)?.holding)
    }

    fn transfer_principal(&mut self, recipient: &Pubkey, amount: u64) -> Result<()> {
        let (owner, token_account) = self
            .fee_collector
            .as_ref()
            .ok_or_else(|| error!(ErrorCode::MissingStrategyAccount))?;
        require_keys_eq!(*owner, *recipient, ErrorCode::InvalidFeeCollectorAccount);
        self.signed_transfer(&self.strategy_vault, token_account, amount)
    }
}
