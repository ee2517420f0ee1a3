use anchor_lang::prelude::*;
use common::constants::BPS_DENOMINATOR;
use common::errors::ErrorCode as CommonErrorCode;
use common::utils::mul_div_floor;

use crate::access::only_owner;
use crate::errors::ErrorCode;
use crate::events::LogFeeParametersSet;
use crate::state::{StrategyState, MAX_FEE_RATE_BPS};
use crate::strategy_core::run_guarded;
use crate::strategy_interface::StrategyHoldings;

/// Replaces fee collector and fee rate together.
pub fn set_fee_parameters(
    state: &mut StrategyState,
    caller: &Pubkey,
    fee_collector: Pubkey,
    fee_rate_bps: u16,
) -> Result<()> {
    run_guarded(state, |state| {
        only_owner(state, caller)?;
        require!(fee_rate_bps <= MAX_FEE_RATE_BPS, ErrorCode::InvalidFeeRate);
        require!(
            fee_collector != Pubkey::default(),
            ErrorCode::InvalidFeeCollector
        );

        state.fee_collector = fee_collector;
        state.fee_rate_bps = fee_rate_bps;

        emit!(LogFeeParametersSet {
            fee_collector,
            fee_rate_bps,
        });
        Ok(())
    })
}

/// `floor(gross * fee_rate_bps / 10000)`.
pub fn fee_amount(gross: u64, fee_rate_bps: u16) -> Result<u64> {
    mul_div_floor(gross, fee_rate_bps.into(), BPS_DENOMINATOR)
}

/// Smallest gross amount whose remainder after the fee is at least `min_net`.
///
/// Fails with `InsufficientAmountOut` when no gross amount can satisfy it,
/// i.e. a 100% fee with a non-zero minimum, or a gross above `u64::MAX`.
pub fn gross_for_net(min_net: u64, fee_rate_bps: u16) -> Result<u64> {
    if min_net == 0 {
        return Ok(0);
    }
    let kept_bps = BPS_DENOMINATOR
        .checked_sub(fee_rate_bps.into())
        .ok_or(CommonErrorCode::WrongIntegerSubtraction)?;
    require!(kept_bps > 0, ErrorCode::InsufficientAmountOut);

    // net(g) = ceil(g * kept / 10000), so the least g with net(g) >= m is
    // floor((m - 1) * 10000 / kept) + 1
    let gross = (min_net as u128 - 1) * BPS_DENOMINATOR as u128 / kept_bps as u128 + 1;
    u64::try_from(gross).map_err(|_| error!(ErrorCode::InsufficientAmountOut))
}

/// Pays the performance fee on a positive `gross` amount to the fee collector.
///
/// Return: `gross` minus the fee.
pub fn take_fee<H: StrategyHoldings>(
    state: &StrategyState,
    holdings: &mut H,
    gross: u64,
) -> Result<u64> {
    require!(gross > 0, ErrorCode::ZeroFeeBase);

    let fee = fee_amount(gross, state.fee_rate_bps)?;
    if fee > 0 {
        holdings.transfer_principal(&state.fee_collector, fee)?;
    }
    Ok(gross
        .checked_sub(fee)
        .ok_or(CommonErrorCode::WrongIntegerSubtraction)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{new_state, Actors, MockEnv};

    #[test]
    fn test_fee_amount_floors() {
        assert_eq!(fee_amount(999, 1_000).unwrap(), 99);
        assert_eq!(fee_amount(1_000, 0).unwrap(), 0);
        assert_eq!(fee_amount(1_000, MAX_FEE_RATE_BPS).unwrap(), 1_000);
        assert_eq!(fee_amount(9, 1_000).unwrap(), 0);
    }

    #[test]
    fn test_gross_for_net_is_minimal() {
        for (min_net, rate) in [(1u64, 1_000u16), (90, 1_000), (100, 333), (7, 9_999), (5, 0)] {
            let gross = gross_for_net(min_net, rate).unwrap();
            assert!(gross - fee_amount(gross, rate).unwrap() >= min_net);
            let below = gross - 1;
            assert!(below - fee_amount(below, rate).unwrap() < min_net);
        }
        assert_eq!(gross_for_net(0, MAX_FEE_RATE_BPS).unwrap(), 0);
    }

    #[test]
    fn test_gross_for_net_rejects_full_fee() {
        assert_eq!(
            gross_for_net(1, MAX_FEE_RATE_BPS).unwrap_err(),
            error!(ErrorCode::InsufficientAmountOut)
        );
    }

    #[test]
    fn test_gross_for_net_rejects_gross_beyond_u64() {
        assert_eq!(
            gross_for_net(u64::MAX, 1_000).unwrap_err(),
            error!(ErrorCode::InsufficientAmountOut)
        );
        assert_eq!(gross_for_net(u64::MAX, 0).unwrap(), u64::MAX);
    }

    #[test]
    fn test_take_fee_routes_to_collector() {
        let actors = Actors::new();
        let mut state = new_state(&actors);
        state.fee_rate_bps = 1_000;
        let mut env = MockEnv::new(&state);
        env.idle = 1_005;

        let net = take_fee(&state, &mut env, 1_005).unwrap();

        assert_eq!(net, 905);
        assert_eq!(env.paid_to(&actors.fee_collector), 100);
        assert_eq!(env.idle, 905);
    }

    #[test]
    fn test_take_fee_rejects_zero_gross() {
        let actors = Actors::new();
        let state = new_state(&actors);
        let mut env = MockEnv::new(&state);

        assert_eq!(
            take_fee(&state, &mut env, 0).unwrap_err(),
            error!(ErrorCode::ZeroFeeBase)
        );
        assert_eq!(env.paid_to(&actors.fee_collector), 0);
    }

    #[test]
    fn test_set_fee_parameters() {
        let actors = Actors::new();
        let mut state = new_state(&actors);
        let collector = Pubkey::new_unique();

        set_fee_parameters(&mut state, &actors.owner, collector, 10).unwrap();
        assert_eq!(state.fee_collector, collector);
        assert_eq!(state.fee_rate_bps, 10);

        let before = state.clone();
        assert_eq!(
            set_fee_parameters(&mut state, &actors.stranger, actors.stranger, 10).unwrap_err(),
            error!(ErrorCode::UnauthorizedOwner)
        );
        assert_eq!(
            set_fee_parameters(&mut state, &actors.executor, actors.stranger, 10).unwrap_err(),
            error!(ErrorCode::UnauthorizedOwner)
        );
        assert_eq!(
            set_fee_parameters(&mut state, &actors.owner, collector, MAX_FEE_RATE_BPS + 1)
                .unwrap_err(),
            error!(ErrorCode::InvalidFeeRate)
        );
        assert_eq!(
            set_fee_parameters(&mut state, &actors.owner, Pubkey::default(), 10).unwrap_err(),
            error!(ErrorCode::InvalidFeeCollector)
        );
        assert_eq!(state, before);
    }
}
