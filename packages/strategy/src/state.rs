use anchor_lang::prelude::*;
use common::constants::BPS_DENOMINATOR;

use crate::errors::ErrorCode;

/// Highest fee rate governance may set: 100% of the converted output.
pub const MAX_FEE_RATE_BPS: u16 = BPS_DENOMINATOR as u16;
pub const MAX_EXECUTORS: usize = 8;
pub const MAX_REWARD_TOKENS: usize = 4;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyStatus {
    /// Nothing invested yet.
    Idle,
    /// Funds sit in the external sink.
    Invested,
    /// The vault detached the strategy. Terminal.
    Exiting,
}

impl Default for StrategyStatus {
    fn default() -> Self {
        StrategyStatus::Idle
    }
}

/// How a reward token is turned back into the principal asset.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardPolicy {
    /// Reward token mint.
    pub mint: Pubkey,
    /// Program routing the reward into the principal asset.
    pub swapper: Pubkey,
    /// Provide single-sided liquidity through `token0` of the pair instead of `token1`.
    pub use_token0: bool,
}

impl RewardPolicy {
    pub const SIZE: usize = 32 + 32 + 1;
}

/// Immutable per-deployment configuration handed to the strategy at construction.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct StrategyConfig {
    pub vault: Pubkey,
    pub principal_mint: Pubkey,
    pub sink: Pubkey,
    pub reward_policies: Vec<RewardPolicy>,
    pub owner: Pubkey,
    pub executor: Pubkey,
    pub fee_collector: Pubkey,
    pub fee_rate_bps: u16,
    /// Seconds between `queue_exit` and `exit`. Zero allows exiting without queuing.
    pub exit_delay: i64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct StrategyState {
    /// Vault owning this strategy; the only caller of skim, withdraw and exit.
    pub vault: Pubkey,
    /// Token the vault measures the strategy balance in.
    pub principal_mint: Pubkey,
    /// External yield source the principal is deposited into.
    pub sink: Pubkey,
    pub reward_policies: Vec<RewardPolicy>,
    pub owner: Pubkey,
    pub executors: Vec<Pubkey>,
    pub fee_collector: Pubkey,
    pub fee_rate_bps: u16,
    /// Principal the strategy held after the last skim, harvest, withdraw or exit.
    pub recorded_principal: u64,
    pub status: StrategyStatus,
    pub exit_delay: i64,
    /// Timestamp of the pending exit, if one was queued.
    pub exit_queued_at: Option<i64>,
    pub operation_in_progress: bool,
}

impl StrategyState {
    pub const SIZE: usize = 32
        + 32
        + 32
        + 4
        + MAX_REWARD_TOKENS * RewardPolicy::SIZE
        + 32
        + 4
        + MAX_EXECUTORS * 32
        + 32
        + 2
        + 8
        + 1
        + 8
        + 1
        + 8
        + 1;

    pub fn new(config: StrategyConfig) -> Result<Self> {
        require!(
            config.owner != Pubkey::default(),
            ErrorCode::EmptyOwnerAddress
        );
        require!(
            config.fee_collector != Pubkey::default(),
            ErrorCode::InvalidFeeCollector
        );
        require!(
            config.fee_rate_bps <= MAX_FEE_RATE_BPS,
            ErrorCode::InvalidFeeRate
        );
        require!(config.exit_delay >= 0, ErrorCode::InvalidExitDelay);
        require!(
            config.reward_policies.len() <= MAX_REWARD_TOKENS,
            ErrorCode::TooManyRewardTokens
        );

        for (index, policy) in config.reward_policies.iter().enumerate() {
            require!(
                policy.mint != config.principal_mint,
                ErrorCode::RewardTokenIsPrincipal
            );
            require!(
                config.reward_policies[..index]
                    .iter()
                    .all(|earlier| earlier.mint != policy.mint),
                ErrorCode::DuplicateRewardToken
            );
        }

        let executors = if config.executor == Pubkey::default() {
            vec![]
        } else {
            vec![config.executor]
        };

        Ok(StrategyState {
            vault: config.vault,
            principal_mint: config.principal_mint,
            sink: config.sink,
            reward_policies: config.reward_policies,
            owner: config.owner,
            executors,
            fee_collector: config.fee_collector,
            fee_rate_bps: config.fee_rate_bps,
            recorded_principal: 0,
            status: StrategyStatus::Idle,
            exit_delay: config.exit_delay,
            exit_queued_at: None,
            operation_in_progress: false,
        })
    }

    pub fn is_exited(&self) -> bool {
        self.status == StrategyStatus::Exiting
    }

    pub fn is_executor(&self, who: &Pubkey) -> bool {
        self.executors.contains(who)
    }

    pub fn reward_policy(&self, mint: &Pubkey) -> Option<&RewardPolicy> {
        self.reward_policies.iter().find(|policy| &policy.mint == mint)
    }
}

/// Arguments of a harvest call.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HarvestParams {
    /// Upper bound on what each rebalance leg may move between sink and vault.
    /// Zero leaves both legs unbounded.
    pub max_balance: u64,
    /// Move the invested amount towards the vault target.
    pub rebalance: bool,
    /// Minimum the sink must hand back when the rebalance divests. Unused when
    /// the rebalance invests, moves nothing or is not requested.
    pub min_out: u64,
    /// Claim pending reward tokens from the sink first.
    pub harvest_rewards: bool,
}

/// Profit or loss observed against the recorded principal. At most one side is non-zero.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HarvestReport {
    pub profit: u64,
    pub loss: u64,
}

impl HarvestReport {
    pub const SIZE: usize = 8 + 8;

    pub fn from_balances(recorded: u64, current: u64) -> Self {
        if current >= recorded {
            HarvestReport {
                profit: current - recorded,
                loss: 0,
            }
        } else {
            HarvestReport {
                profit: 0,
                loss: recorded - current,
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.profit == 0 && self.loss == 0
    }
}

/// Result of converting rewards into the principal asset.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LpMintOutcome {
    /// Principal produced by the conversion.
    pub gross: u64,
    /// Part of `gross` paid to the fee collector.
    pub fee: u64,
    /// Part of `gross` kept idle by the strategy.
    pub net: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StrategyConfig {
        StrategyConfig {
            vault: Pubkey::new_unique(),
            principal_mint: Pubkey::new_unique(),
            sink: Pubkey::new_unique(),
            reward_policies: vec![RewardPolicy {
                mint: Pubkey::new_unique(),
                swapper: Pubkey::new_unique(),
                use_token0: false,
            }],
            owner: Pubkey::new_unique(),
            executor: Pubkey::new_unique(),
            fee_collector: Pubkey::new_unique(),
            fee_rate_bps: 1_000,
            exit_delay: 0,
        }
    }

    #[test]
    fn test_new_state_starts_idle_with_executor() {
        let config = config();
        let state = StrategyState::new(config.clone()).unwrap();

        assert_eq!(state.status, StrategyStatus::Idle);
        assert_eq!(state.recorded_principal, 0);
        assert!(state.is_executor(&config.executor));
        assert!(!state.is_executor(&config.owner));
        assert!(!state.operation_in_progress);
    }

    #[test]
    fn test_new_state_rejects_fee_above_maximum() {
        let mut config = config();
        config.fee_rate_bps = MAX_FEE_RATE_BPS + 1;
        assert_eq!(
            StrategyState::new(config).unwrap_err(),
            error!(ErrorCode::InvalidFeeRate)
        );
    }

    #[test]
    fn test_new_state_rejects_bad_reward_list() {
        let mut duplicated = config();
        duplicated
            .reward_policies
            .push(duplicated.reward_policies[0]);
        assert_eq!(
            StrategyState::new(duplicated).unwrap_err(),
            error!(ErrorCode::DuplicateRewardToken)
        );

        let mut principal = config();
        principal.reward_policies[0].mint = principal.principal_mint;
        assert_eq!(
            StrategyState::new(principal).unwrap_err(),
            error!(ErrorCode::RewardTokenIsPrincipal)
        );

        let mut too_many = config();
        too_many.reward_policies = (0..=MAX_REWARD_TOKENS)
            .map(|_| RewardPolicy {
                mint: Pubkey::new_unique(),
                ..RewardPolicy::default()
            })
            .collect();
        assert_eq!(
            StrategyState::new(too_many).unwrap_err(),
            error!(ErrorCode::TooManyRewardTokens)
        );
    }

    #[test]
    fn test_serialized_size_fits_bound() {
        let mut config = config();
        config.reward_policies = (0..MAX_REWARD_TOKENS)
            .map(|_| RewardPolicy {
                mint: Pubkey::new_unique(),
                ..RewardPolicy::default()
            })
            .collect();
        let mut state = StrategyState::new(config).unwrap();
        state.executors = (0..MAX_EXECUTORS).map(|_| Pubkey::new_unique()).collect();
        state.exit_queued_at = Some(1);

        assert_eq!(state.try_to_vec().unwrap().len(), StrategyState::SIZE);
    }

    #[test]
    fn test_report_from_balances() {
        assert_eq!(
            HarvestReport::from_balances(100, 130),
            HarvestReport { profit: 30, loss: 0 }
        );
        assert_eq!(
            HarvestReport::from_balances(100, 60),
            HarvestReport { profit: 0, loss: 40 }
        );
        assert!(HarvestReport::from_balances(100, 100).is_empty());
    }
}
