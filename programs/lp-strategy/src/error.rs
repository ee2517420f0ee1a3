use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("LP Strategy: not exited.")]
    StrategyNotExited,

    #[msg("Invalid remaining accounts.")]
    InvalidRemainingAccounts,

    #[msg("Account required by this instruction was not provided.")]
    MissingStrategyAccount,

    #[msg("No accounts were provided for this reward token.")]
    RewardAccountsMissing,

    #[msg("Reward token account does not match the reward policy.")]
    InvalidRewardAccount,

    #[msg("Fee collector token account is not owned by the fee collector.")]
    InvalidFeeCollectorAccount,

    #[msg("After exit: accounts list for after exit is empty.")]
    EmptyAccountsListForAfterExit,
}
