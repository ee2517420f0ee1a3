use anchor_lang::{prelude::*, solana_program::pubkey::Pubkey, Result};

use crate::state::{HarvestReport, RewardPolicy};

//** Collaborators of the strategy: implement the following traits per integration. */

/// Bridge to the external yield source (staking pool, gauge, LP staking).
pub trait ExternalSink {
    /// Principal asset the sink currently holds for the strategy.
    fn balance(&self) -> Result<u64>;

    /// Moves `amount` of idle principal from the strategy into the sink.
    fn deposit(&mut self, amount: u64) -> Result<()>;

    /// Pulls up to `amount` of principal back to the strategy's idle holdings.
    ///
    /// Return: the amount actually withdrawn, lower than requested when the
    /// sink lacks liquidity.
    fn withdraw(&mut self, amount: u64) -> Result<u64>;

    /// Pending, not yet claimed, rewards of `reward_mint`.
    fn claimable(&self, reward_mint: &Pubkey) -> Result<u64>;

    /// Claims every pending reward of `reward_mint` into the strategy.
    ///
    /// Return: the claimed amount.
    fn claim(&mut self, reward_mint: &Pubkey) -> Result<u64>;
}

/// External swap / single-sided liquidity primitive.
pub trait RewardConverter {
    /// Converts `amount` of `policy.mint` into principal asset units credited
    /// to the strategy's idle holdings.
    ///
    /// Must fail when fewer than `min_out` units would be produced.
    ///
    /// Return: the principal asset produced.
    fn convert(&mut self, policy: &RewardPolicy, amount: u64, min_out: u64) -> Result<u64>;
}

/// What the strategy needs from the vault that drives it.
pub trait VaultBridge {
    /// Amount the vault wants invested in this strategy.
    fn target_balance(&self) -> Result<u64>;

    /// Hands a non-empty profit or loss to the vault accounting.
    fn report(&mut self, report: &HarvestReport) -> Result<()>;

    /// Transfers `amount` of idle principal from the strategy to the vault.
    fn return_to_vault(&mut self, amount: u64) -> Result<()>;

    /// Transfers up to `amount` of idle vault funds to the strategy.
    ///
    /// Return: the amount actually received.
    fn draw_from_vault(&mut self, amount: u64) -> Result<u64>;
}

/// Token balances held directly by the strategy.
pub trait StrategyHoldings {
    /// Principal asset sitting in the strategy, not yet in the sink.
    fn idle_principal(&self) -> Result<u64>;

    fn reward_balance(&self, reward_mint: &Pubkey) -> Result<u64>;

    /// Pays `amount` of idle principal to `recipient`.
    fn transfer_principal(&mut self, recipient: &Pubkey, amount: u64) -> Result<()>;
}
//** End strategy collaborators */
