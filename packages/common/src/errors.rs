use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    // 0
    // accounts errors
    #[msg("Incompatible token accounts.")]
    IncompatibleTokenAccounts,
    #[msg("Invalid authority of strategy token account.")]
    StrategyVaultInvalidAuthority,
    #[msg("Invalid authority of vault token account.")]
    VaultTokenAccountInvalidAuthority,

    // math
    // 3
    #[msg("Overflow occurred when making integer addition.")]
    WrongIntegerAddition,
    #[msg("Overflow occurred when making integer subtraction.")]
    WrongIntegerSubtraction,
    #[msg("Overflow occurred when making integer multiplication.")]
    WrongIntegerMultiplication,
    #[msg("Overflow occurred when making integer division.")]
    WrongIntegerDivision,

    #[msg("Conversion to u64 failed with an overflow or underflow")]
    TryIntoConversionError,

    // 8
    #[msg("Wrong convertion from AccountInfo To TokenAccount.")]
    WrongConvertionFromAccountInfoToTokenAccount,

    #[msg("Invalid token account owner.")]
    InvalidTokenAccountOwner,
}
