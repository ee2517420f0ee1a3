use anchor_lang::prelude::*;
use common::errors::ErrorCode as CommonErrorCode;

use crate::access::{only_executor, only_vault};
use crate::converter::{convert_rewards, selected_policies};
use crate::errors::ErrorCode;
use crate::events::*;
use crate::fee::{gross_for_net, take_fee};
use crate::state::{HarvestParams, HarvestReport, LpMintOutcome, StrategyState, StrategyStatus};
use crate::strategy_interface::{ExternalSink, RewardConverter, StrategyHoldings, VaultBridge};

/// Runs `op` as a single state-changing entry point.
///
/// Rejects the call while another one is in flight. On error the state is
/// restored to what it was before the call.
pub fn run_guarded<T>(
    state: &mut StrategyState,
    op: impl FnOnce(&mut StrategyState) -> Result<T>,
) -> Result<T> {
    require!(
        !state.operation_in_progress,
        ErrorCode::OperationInProgress
    );

    let snapshot = state.clone();
    state.operation_in_progress = true;
    match op(state) {
        Ok(value) => {
            state.operation_in_progress = false;
            Ok(value)
        }
        Err(err) => {
            *state = snapshot;
            Err(err)
        }
    }
}

/// Helper function checks if the strategy is active. (For skim, harvest and withdraw.)
pub fn is_strategy_active(state: &StrategyState) -> Result<()> {
    require!(!state.is_exited(), ErrorCode::StrategyExited);
    Ok(())
}

/// Invests `amount` of principal the vault already moved into the strategy.
///
/// Arguments:
///
/// * `caller` - Must be the vault.
/// * `amount` - The amount of idle principal to deposit into the sink.
pub fn skim<E: ExternalSink + StrategyHoldings>(
    state: &mut StrategyState,
    env: &mut E,
    caller: &Pubkey,
    amount: u64,
) -> Result<()> {
    run_guarded(state, |state| {
        only_vault(state, caller)?;
        is_strategy_active(state)?;
        if amount == 0 {
            return Ok(());
        }
        require!(
            env.idle_principal()? >= amount,
            ErrorCode::InsufficientIdleBalance
        );

        env.deposit(amount)?;
        state.recorded_principal = state
            .recorded_principal
            .checked_add(amount)
            .ok_or(CommonErrorCode::WrongIntegerAddition)?;
        state.status = StrategyStatus::Invested;

        emit!(LogStrategyInvest {
            token: state.principal_mint,
            amount,
        });
        Ok(())
    })
}

/// Realizes the position against the recorded principal, reports the delta to
/// the vault and optionally moves the invested amount towards the vault target.
///
/// Arguments:
///
/// * `caller` - Must be an executor.
/// * `params` - See [`HarvestParams`]. A non-zero `max_balance` bounds every leg of the rebalance.
///
/// Return: the reported profit or loss.
pub fn harvest<E: ExternalSink + VaultBridge + StrategyHoldings>(
    state: &mut StrategyState,
    env: &mut E,
    caller: &Pubkey,
    params: HarvestParams,
) -> Result<HarvestReport> {
    run_guarded(state, |state| {
        only_executor(state, caller)?;
        is_strategy_active(state)?;

        if params.harvest_rewards {
            claim_rewards(state, env)?;
        }

        let current = env
            .balance()?
            .checked_add(env.idle_principal()?)
            .ok_or(CommonErrorCode::WrongIntegerAddition)?;
        let report = HarvestReport::from_balances(state.recorded_principal, current);
        report_to_vault(state, env, &report)?;
        state.recorded_principal = current;

        // buffered conversion output is now accounted for, put it to work
        let idle = env.idle_principal()?;
        if idle > 0 {
            env.deposit(idle)?;
        }

        if params.rebalance {
            rebalance(state, env, &params)?;
        }

        if state.recorded_principal > 0 {
            state.status = StrategyStatus::Invested;
        }
        Ok(report)
    })
}

/// Pulls principal out of the sink back to the vault.
///
/// Arguments:
///
/// * `caller` - Must be the vault.
/// * `amount` - The requested amount, at most the recorded principal.
///
/// Return: the real amount that is withdrawn. Lower than requested when the
/// sink is short on liquidity. The difference is not a loss, that's what harvest is for.
pub fn withdraw<E: ExternalSink + VaultBridge>(
    state: &mut StrategyState,
    env: &mut E,
    caller: &Pubkey,
    amount: u64,
) -> Result<u64> {
    run_guarded(state, |state| {
        only_vault(state, caller)?;
        is_strategy_active(state)?;
        require!(
            amount <= state.recorded_principal,
            ErrorCode::WithdrawAmountTooHigh
        );
        if amount == 0 {
            return Ok(0);
        }

        let actual = env.withdraw(amount)?;
        if actual > 0 {
            env.return_to_vault(actual)?;
        }
        state.recorded_principal = state
            .recorded_principal
            .checked_sub(actual)
            .ok_or(CommonErrorCode::WrongIntegerSubtraction)?;

        emit!(LogStrategyWithdraw {
            token: state.principal_mint,
            requested: amount,
            amount: actual,
        });
        Ok(actual)
    })
}

/// First phase of the exit: arms the pending exit at `now`.
pub fn queue_exit(state: &mut StrategyState, caller: &Pubkey, now: i64) -> Result<()> {
    run_guarded(state, |state| {
        only_vault(state, caller)?;
        is_strategy_active(state)?;
        require!(
            state.exit_queued_at.is_none(),
            ErrorCode::ExitAlreadyQueued
        );

        let ready_at = now
            .checked_add(state.exit_delay)
            .ok_or(CommonErrorCode::WrongIntegerAddition)?;
        state.exit_queued_at = Some(now);

        emit!(LogStrategyQueued {
            token: state.principal_mint,
            ready_at,
        });
        Ok(())
    })
}

/// Withdraws the position and detaches the strategy from the vault for good.
/// May be called again once exited to hand residual funds back.
///
/// Arguments:
///
/// * `caller`      - Must be the vault.
/// * `max_balance` - Upper bound on what is pulled from the sink in this call.
/// * `now`         - Current unix timestamp, checked against the queued exit.
///
/// Return: the amount returned to the vault.
pub fn exit<E: ExternalSink + VaultBridge + StrategyHoldings>(
    state: &mut StrategyState,
    env: &mut E,
    caller: &Pubkey,
    max_balance: u64,
    now: i64,
) -> Result<u64> {
    run_guarded(state, |state| {
        only_vault(state, caller)?;
        if !state.is_exited() {
            check_exit_ready(state, now)?;
        }

        let pull = env.balance()?.min(max_balance);
        if pull > 0 {
            env.withdraw(pull)?;
        }

        let amount = env.idle_principal()?;
        if amount > 0 {
            env.return_to_vault(amount)?;
        }

        let report = HarvestReport::from_balances(state.recorded_principal, amount);
        report_to_vault(state, env, &report)?;

        state.recorded_principal = 0;
        state.status = StrategyStatus::Exiting;
        state.exit_queued_at = None;

        emit!(LogStrategyExited {
            token: state.principal_mint,
            amount,
        });
        Ok(amount)
    })
}

/// Converts claimed rewards into principal, pays the fee and keeps the rest idle
/// until the next harvest accounts for it.
///
/// Arguments:
///
/// * `caller`      - Must be an executor.
/// * `min_out`     - Minimum principal the strategy keeps after the fee.
/// * `reward_mint` - Only convert this reward token, instead of all of them.
pub fn swap_to_lp<E: RewardConverter + StrategyHoldings>(
    state: &mut StrategyState,
    env: &mut E,
    caller: &Pubkey,
    min_out: u64,
    reward_mint: Option<Pubkey>,
) -> Result<LpMintOutcome> {
    run_guarded(state, |state| {
        only_executor(state, caller)?;

        let policies = selected_policies(state, reward_mint)?;

        // converter enforces the minimum before any fee is paid
        let min_gross = gross_for_net(min_out, state.fee_rate_bps)?;
        let gross = convert_rewards(env, &policies, min_gross)?;
        if gross == 0 {
            require!(min_out == 0, ErrorCode::InsufficientAmountOut);
            return Ok(LpMintOutcome::default());
        }

        let net = take_fee(state, env, gross)?;
        require!(net >= min_out, ErrorCode::InsufficientAmountOut);
        let fee = gross
            .checked_sub(net)
            .ok_or(CommonErrorCode::WrongIntegerSubtraction)?;

        emit!(LogLpMinted {
            token: state.principal_mint,
            gross,
            fee,
            net,
        });
        Ok(LpMintOutcome { gross, fee, net })
    })
}

fn claim_rewards<E: ExternalSink>(state: &StrategyState, env: &mut E) -> Result<()> {
    for policy in state.reward_policies.iter() {
        if env.claimable(&policy.mint)? == 0 {
            continue;
        }
        let amount = env.claim(&policy.mint)?;
        emit!(LogRewardsClaimed {
            token: state.principal_mint,
            reward_token: policy.mint,
            amount,
        });
    }
    Ok(())
}

fn report_to_vault<E: VaultBridge>(
    state: &StrategyState,
    env: &mut E,
    report: &HarvestReport,
) -> Result<()> {
    if report.is_empty() {
        return Ok(());
    }
    env.report(report)?;

    if report.profit > 0 {
        emit!(LogStrategyProfit {
            token: state.principal_mint,
            amount: report.profit,
        });
    } else {
        emit!(LogStrategyLoss {
            token: state.principal_mint,
            amount: report.loss,
        });
    }
    Ok(())
}

fn rebalance<E: ExternalSink + VaultBridge>(
    state: &mut StrategyState,
    env: &mut E,
    params: &HarvestParams,
) -> Result<()> {
    let target = env.target_balance()?;
    let invested = state.recorded_principal;

    if invested > target {
        let amount = bounded(invested - target, params.max_balance);
        if amount == 0 {
            return Ok(());
        }
        msg!("Divesting {} towards target {}", amount, target);

        let actual = env.withdraw(amount)?;
        require!(actual >= params.min_out, ErrorCode::InsufficientAmountOut);
        if actual > 0 {
            env.return_to_vault(actual)?;
        }
        state.recorded_principal = invested
            .checked_sub(actual)
            .ok_or(CommonErrorCode::WrongIntegerSubtraction)?;

        emit!(LogStrategyDivest {
            token: state.principal_mint,
            amount: actual,
        });
    } else if invested < target {
        let amount = bounded(target - invested, params.max_balance);
        if amount == 0 {
            return Ok(());
        }
        msg!("Investing {} towards target {}", amount, target);

        let drawn = env.draw_from_vault(amount)?;
        if drawn == 0 {
            return Ok(());
        }
        env.deposit(drawn)?;
        state.recorded_principal = invested
            .checked_add(drawn)
            .ok_or(CommonErrorCode::WrongIntegerAddition)?;

        emit!(LogStrategyInvest {
            token: state.principal_mint,
            amount: drawn,
        });
    }
    Ok(())
}

/// Caps a rebalance leg at `max_balance`; zero leaves it unbounded.
fn bounded(amount: u64, max_balance: u64) -> u64 {
    if max_balance != 0 && amount > max_balance {
        max_balance
    } else {
        amount
    }
}

fn check_exit_ready(state: &StrategyState, now: i64) -> Result<()> {
    if state.exit_delay == 0 {
        return Ok(());
    }
    let queued_at = state.exit_queued_at.ok_or(ErrorCode::ExitNotQueued)?;
    let ready_at = queued_at
        .checked_add(state.exit_delay)
        .ok_or(CommonErrorCode::WrongIntegerAddition)?;
    require!(now >= ready_at, ErrorCode::ExitTooEarly);
    Ok(())
}
