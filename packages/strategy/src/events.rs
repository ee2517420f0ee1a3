use anchor_lang::prelude::*;

#[event]
pub struct LogStrategyInvest {
    pub token: Pubkey,
    pub amount: u64,
}

#[event]
pub struct LogStrategyProfit {
    pub token: Pubkey,
    pub amount: u64,
}

#[event]
pub struct LogStrategyLoss {
    pub token: Pubkey,
    pub amount: u64,
}

#[event]
pub struct LogStrategyDivest {
    pub token: Pubkey,
    pub amount: u64,
}

#[event]
pub struct LogStrategyWithdraw {
    pub token: Pubkey,
    pub requested: u64,
    pub amount: u64,
}

#[event]
pub struct LogStrategyQueued {
    pub token: Pubkey,
    pub ready_at: i64,
}

#[event]
pub struct LogStrategyExited {
    pub token: Pubkey,
    pub amount: u64,
}

#[event]
pub struct LogRewardsClaimed {
    pub token: Pubkey,
    pub reward_token: Pubkey,
    pub amount: u64,
}

#[event]
pub struct LogLpMinted {
    pub token: Pubkey,
    pub gross: u64,
    pub fee: u64,
    pub net: u64,
}

#[event]
pub struct LogFeeParametersSet {
    pub fee_collector: Pubkey,
    pub fee_rate_bps: u16,
}

#[event]
pub struct LogSetStrategyExecutor {
    pub executor: Pubkey,
    pub value: bool,
}

#[event]
pub struct LogOwnershipTransferred {
    pub owner: Pubkey,
    pub new_owner: Pubkey,
}
