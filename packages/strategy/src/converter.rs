use anchor_lang::prelude::*;
use common::errors::ErrorCode as CommonErrorCode;

use crate::errors::ErrorCode;
use crate::state::{RewardPolicy, StrategyState};
use crate::strategy_interface::{RewardConverter, StrategyHoldings};

/// Policies a conversion works through: the one of `reward_mint`, or all of them in order.
pub fn selected_policies(
    state: &StrategyState,
    reward_mint: Option<Pubkey>,
) -> Result<Vec<RewardPolicy>> {
    match reward_mint {
        Some(mint) => Ok(vec![*state
            .reward_policy(&mint)
            .ok_or(ErrorCode::UnknownRewardToken)?]),
        None => Ok(state.reward_policies.clone()),
    }
}

/// Converts every non-zero reward balance of `policies`, in order, into the principal asset.
///
/// Output is measured as the growth of idle principal around each conversion, not
/// taken from the converter's own answer. Earlier conversions run without a minimum,
/// the last one has to produce whatever is still missing to reach `min_out`.
///
/// Arguments:
///
/// * `policies` - Reward tokens to convert and how to route them.
/// * `min_out`  - Minimum principal the whole batch must produce.
///
/// Return: the principal produced.
pub fn convert_rewards<E: RewardConverter + StrategyHoldings>(
    env: &mut E,
    policies: &[RewardPolicy],
    min_out: u64,
) -> Result<u64> {
    let mut pending = Vec::with_capacity(policies.len());
    for policy in policies {
        let amount = env.reward_balance(&policy.mint)?;
        if amount > 0 {
            pending.push((policy, amount));
        }
    }

    let last = pending.len().saturating_sub(1);
    let mut produced: u64 = 0;
    for (index, (policy, amount)) in pending.into_iter().enumerate() {
        let leg_min = if index == last {
            min_out.saturating_sub(produced)
        } else {
            0
        };

        let before = env.idle_principal()?;
        env.convert(policy, amount, leg_min)?;
        let realized = env
            .idle_principal()?
            .checked_sub(before)
            .ok_or(ErrorCode::ConverterOutputMismatch)?;
        require!(realized >= leg_min, ErrorCode::InsufficientAmountOut);

        msg!(
            "Converted {} of reward {} into {} principal",
            amount,
            policy.mint,
            realized
        );
        produced = produced
            .checked_add(realized)
            .ok_or(CommonErrorCode::WrongIntegerAddition)?;
    }

    Ok(produced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{new_state, Actors, MockEnv};

    #[test]
    fn test_selected_policies() {
        let actors = Actors::new();
        let state = new_state(&actors);

        assert_eq!(selected_policies(&state, None).unwrap(), state.reward_policies);
        let single = selected_policies(&state, Some(actors.second_reward_mint)).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].mint, actors.second_reward_mint);
        assert_eq!(
            selected_policies(&state, Some(Pubkey::new_unique())).unwrap_err(),
            error!(ErrorCode::UnknownRewardToken)
        );
    }

    #[test]
    fn test_skips_empty_balances() {
        let actors = Actors::new();
        let state = new_state(&actors);
        let mut env = MockEnv::new(&state);
        env.rewards.insert(actors.second_reward_mint, 40);

        let produced = convert_rewards(&mut env, &state.reward_policies, 0).unwrap();

        assert_eq!(produced, 40);
        assert_eq!(env.min_outs, vec![0]);
        assert_eq!(env.idle, 40);
    }

    #[test]
    fn test_last_conversion_carries_the_minimum() {
        let actors = Actors::new();
        let state = new_state(&actors);
        let mut env = MockEnv::new(&state);
        env.rewards.insert(actors.reward_mint, 100);
        env.rewards.insert(actors.second_reward_mint, 100);

        let produced = convert_rewards(&mut env, &state.reward_policies, 150).unwrap();

        assert_eq!(produced, 200);
        assert_eq!(env.min_outs, vec![0, 50]);
        assert_eq!(env.reward_balance(&actors.reward_mint).unwrap(), 0);
        assert_eq!(env.reward_balance(&actors.second_reward_mint).unwrap(), 0);
    }

    #[test]
    fn test_nothing_to_convert() {
        let actors = Actors::new();
        let state = new_state(&actors);
        let mut env = MockEnv::new(&state);

        assert_eq!(convert_rewards(&mut env, &state.reward_policies, 10).unwrap(), 0);
        assert!(env.min_outs.is_empty());
    }

    #[test]
    fn test_rejects_converter_taking_principal() {
        let actors = Actors::new();
        let state = new_state(&actors);
        let mut env = MockEnv::new(&state);
        env.idle = 10;
        env.rewards.insert(actors.reward_mint, 100);
        env.leaky_converter = true;

        assert_eq!(
            convert_rewards(&mut env, &state.reward_policies, 0).unwrap_err(),
            error!(ErrorCode::ConverterOutputMismatch)
        );
    }
}
