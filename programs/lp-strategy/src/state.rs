use anchor_lang::prelude::*;
use anchor_lang::solana_program::pubkey::Pubkey;
use common::errors::ErrorCode as CommonErrorCode;
use strategy_package::state::{HarvestReport, RewardPolicy, StrategyState};

/// Reward source and strategy reward token account, per reward policy.
#[constant]
pub const CLAIM_ACCOUNTS_PER_REWARD: usize = 2;
/// Swapper program and strategy reward token account, ahead of the swapper specific accounts.
#[constant]
pub const SWAP_ROUTE_FIXED_ACCOUNTS_COUNT: usize = 2;

#[account]
#[derive(Default)]
pub struct LpStrategy {
    pub state: StrategyState,
    /// Token account holding the idle principal.
    pub strategy_vault: Pubkey,
    /// Vault token account principal is returned to and drawn from.
    pub vault_token_account: Pubkey,
    pub vault_link: Pubkey,
    pub strategy_authority_bump: u8,
}

impl LpStrategy {
    pub const SIZE: usize = 8 + StrategyState::SIZE + 32 + 32 + 32 + 1;
}

/// Where the vault and the strategy exchange allocation and profit/loss figures.
#[account]
#[derive(Default)]
pub struct VaultLink {
    pub strategy: Pubkey,
    /// Amount the vault wants invested, written by the vault.
    pub target_balance: u64,
    /// Written by the strategy on every non-empty report.
    pub last_report: HarvestReport,
    pub total_profit: u64,
    pub total_loss: u64,
}

impl VaultLink {
    pub const SIZE: usize = 8 + 32 + 8 + HarvestReport::SIZE + 8 + 8;

    pub fn record(&mut self, report: &HarvestReport) -> Result<()> {
        self.total_profit = self
            .total_profit
            .checked_add(report.profit)
            .ok_or(CommonErrorCode::WrongIntegerAddition)?;
        self.total_loss = self
            .total_loss
            .checked_add(report.loss)
            .ok_or(CommonErrorCode::WrongIntegerAddition)?;
        self.last_report = *report;
        Ok(())
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct InitializeArgs {
    pub reward_policies: Vec<RewardPolicy>,
    pub fee_collector: Pubkey,
    pub fee_rate_bps: u16,
    pub exit_delay: i64,
}
