use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    // authorization
    // 0
    #[msg("Strategy: caller is not the owner.")]
    UnauthorizedOwner,
    #[msg("Strategy: caller is not an executor.")]
    UnauthorizedExecutor,
    #[msg("Strategy: caller is not the vault.")]
    UnauthorizedVault,

    // lifecycle
    // 3
    #[msg("Strategy: exited.")]
    StrategyExited,
    #[msg("Strategy: another operation is in progress.")]
    OperationInProgress,
    #[msg("Strategy: exit was not queued.")]
    ExitNotQueued,
    #[msg("Strategy: exit already queued.")]
    ExitAlreadyQueued,
    #[msg("Strategy: too early to exit.")]
    ExitTooEarly,

    // amounts
    // 8
    #[msg("Strategy: insufficient amount out.")]
    InsufficientAmountOut,
    #[msg("Strategy: not enough idle principal to invest.")]
    InsufficientIdleBalance,
    #[msg("Strategy: withdraw amount exceeds recorded principal.")]
    WithdrawAmountTooHigh,
    #[msg("Strategy: converter reported more output than was received.")]
    ConverterOutputMismatch,
    #[msg("Strategy: fee can only be taken from a positive amount.")]
    ZeroFeeBase,

    // governance and configuration
    // 13
    #[msg("Strategy: fee rate exceeds the maximum.")]
    InvalidFeeRate,
    #[msg("Strategy: fee collector cannot be empty.")]
    InvalidFeeCollector,
    #[msg("Strategy: owner cannot be empty.")]
    EmptyOwnerAddress,
    #[msg("Strategy: executor set is full.")]
    TooManyExecutors,
    #[msg("Strategy: too many reward tokens.")]
    TooManyRewardTokens,
    #[msg("Strategy: reward token configured twice.")]
    DuplicateRewardToken,
    #[msg("Strategy: reward token cannot be the principal asset.")]
    RewardTokenIsPrincipal,
    #[msg("Strategy: reward token is not configured.")]
    UnknownRewardToken,
    #[msg("Strategy: exit delay cannot be negative.")]
    InvalidExitDelay,
}
