//! In-memory collaborators for engine tests.

use std::collections::BTreeMap;

use anchor_lang::prelude::*;
use common::constants::BPS_DENOMINATOR;

use crate::errors::ErrorCode;
use crate::state::{HarvestReport, RewardPolicy, StrategyConfig, StrategyState};
use crate::strategy_interface::{ExternalSink, RewardConverter, StrategyHoldings, VaultBridge};

/// Code of the error every switched-off collaborator fails with.
pub const COLLABORATOR_FAILURE: u32 = 42;

pub fn collaborator_failure() -> Error {
    ProgramError::Custom(COLLABORATOR_FAILURE).into()
}

pub struct Actors {
    pub owner: Pubkey,
    pub executor: Pubkey,
    pub vault: Pubkey,
    pub stranger: Pubkey,
    pub fee_collector: Pubkey,
    pub principal_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub second_reward_mint: Pubkey,
}

impl Actors {
    pub fn new() -> Self {
        Actors {
            owner: Pubkey::new_unique(),
            executor: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            stranger: Pubkey::new_unique(),
            fee_collector: Pubkey::new_unique(),
            principal_mint: Pubkey::new_unique(),
            reward_mint: Pubkey::new_unique(),
            second_reward_mint: Pubkey::new_unique(),
        }
    }
}

/// Strategy with two reward tokens, no fee and no exit delay.
pub fn new_state(actors: &Actors) -> StrategyState {
    let policy = |mint| RewardPolicy {
        mint,
        swapper: Pubkey::new_unique(),
        use_token0: false,
    };
    StrategyState::new(StrategyConfig {
        vault: actors.vault,
        principal_mint: actors.principal_mint,
        sink: Pubkey::new_unique(),
        reward_policies: vec![policy(actors.reward_mint), policy(actors.second_reward_mint)],
        owner: actors.owner,
        executor: actors.executor,
        fee_collector: actors.fee_collector,
        fee_rate_bps: 0,
        exit_delay: 0,
    })
    .unwrap()
}

/// Balances of the strategy, its sink and its vault.
#[derive(Debug, Default)]
pub struct MockEnv {
    /// Principal held by the strategy outside the sink.
    pub idle: u64,
    /// Principal deposited in the sink.
    pub sink: u64,
    /// Caps every sink withdrawal when set.
    pub sink_liquidity: Option<u64>,
    /// Pending rewards in the sink.
    pub claimable: BTreeMap<Pubkey, u64>,
    /// Claimed rewards held by the strategy.
    pub rewards: BTreeMap<Pubkey, u64>,
    /// Idle funds of the vault.
    pub vault: u64,
    pub target: u64,
    pub reports: Vec<HarvestReport>,
    pub payouts: BTreeMap<Pubkey, u64>,
    /// Principal produced per reward unit.
    pub conversion_rate_bps: u64,
    /// Minimum handed to every conversion, in call order.
    pub min_outs: Vec<u64>,
    pub fail_deposit: bool,
    pub fail_withdraw: bool,
    pub fail_report: bool,
    pub fail_convert: bool,
    /// Converter consumes a unit of idle principal instead of producing any.
    pub leaky_converter: bool,
}

impl MockEnv {
    pub fn new(state: &StrategyState) -> Self {
        MockEnv {
            rewards: state
                .reward_policies
                .iter()
                .map(|policy| (policy.mint, 0))
                .collect(),
            conversion_rate_bps: BPS_DENOMINATOR,
            ..MockEnv::default()
        }
    }

    pub fn paid_to(&self, recipient: &Pubkey) -> u64 {
        self.payouts.get(recipient).copied().unwrap_or(0)
    }

    fn take_idle(&mut self, amount: u64) -> Result<()> {
        self.idle = self
            .idle
            .checked_sub(amount)
            .ok_or(ProgramError::InsufficientFunds)?;
        Ok(())
    }
}

impl ExternalSink for MockEnv {
    fn balance(&self) -> Result<u64> {
        Ok(self.sink)
    }

    fn deposit(&mut self, amount: u64) -> Result<()> {
        if self.fail_deposit {
            return Err(collaborator_failure());
        }
        self.take_idle(amount)?;
        self.sink += amount;
        Ok(())
    }

    fn withdraw(&mut self, amount: u64) -> Result<u64> {
        if self.fail_withdraw {
            return Err(collaborator_failure());
        }
        let actual = amount
            .min(self.sink)
            .min(self.sink_liquidity.unwrap_or(u64::MAX));
        self.sink -= actual;
        self.idle += actual;
        Ok(actual)
    }

    fn claimable(&self, reward_mint: &Pubkey) -> Result<u64> {
        Ok(self.claimable.get(reward_mint).copied().unwrap_or(0))
    }

    fn claim(&mut self, reward_mint: &Pubkey) -> Result<u64> {
        let amount = self.claimable.remove(reward_mint).unwrap_or(0);
        *self.rewards.entry(*reward_mint).or_default() += amount;
        Ok(amount)
    }
}

impl RewardConverter for MockEnv {
    fn convert(&mut self, policy: &RewardPolicy, amount: u64, min_out: u64) -> Result<u64> {
        if self.fail_convert {
            return Err(collaborator_failure());
        }
        let held = self.rewards.get(&policy.mint).copied().unwrap_or(0);
        if held < amount {
            return Err(ProgramError::InsufficientFunds.into());
        }
        let output = (amount as u128 * self.conversion_rate_bps as u128
            / BPS_DENOMINATOR as u128) as u64;
        if output < min_out {
            return Err(error!(ErrorCode::InsufficientAmountOut));
        }

        self.min_outs.push(min_out);
        self.rewards.insert(policy.mint, held - amount);
        if self.leaky_converter {
            self.take_idle(1)?;
        } else {
            self.idle += output;
        }
        Ok(output)
    }
}

impl VaultBridge for MockEnv {
    fn target_balance(&self) -> Result<u64> {
        Ok(self.target)
    }

    fn report(&mut self, report: &HarvestReport) -> Result<()> {
        if self.fail_report {
            return Err(collaborator_failure());
        }
        self.reports.push(*report);
        Ok(())
    }

    fn return_to_vault(&mut self, amount: u64) -> Result<()> {
        self.take_idle(amount)?;
        self.vault += amount;
        Ok(())
    }

    fn draw_from_vault(&mut self, amount: u64) -> Result<u64> {
        let drawn = amount.min(self.vault);
        self.vault -= drawn;
        self.idle += drawn;
        Ok(drawn)
    }
}

impl StrategyHoldings for MockEnv {
    fn idle_principal(&self) -> Result<u64> {
        Ok(self.idle)
    }

    fn reward_balance(&self, reward_mint: &Pubkey) -> Result<u64> {
        Ok(self.rewards.get(reward_mint).copied().unwrap_or(0))
    }

    fn transfer_principal(&mut self, recipient: &Pubkey, amount: u64) -> Result<()> {
        self.take_idle(amount)?;
        *self.payouts.entry(*recipient).or_default() += amount;
        Ok(())
    }
}
