use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Swapper program does not match the reward conversion policy.")]
    InvalidSwapperProgram,
}
