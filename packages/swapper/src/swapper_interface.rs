use anchor_lang::{prelude::*, Result};
use solana_program::instruction::AccountMeta;

/// Instruction every LP swapper program exposes under the `global` namespace.
///
/// Swaps `amount_in` of the source (reward) token into the destination
/// (pool) token, adding single-sided liquidity through `token0` of the pair
/// when `use_token0` is set and through `token1` otherwise. The swapper must
/// fail when fewer than `minimum_amount_out` destination tokens are produced.
///
/// Accounts, in order:
///
///   0. `[writable]` source token account, owned by `authority`
///   1. `[writable]` destination token account, owned by `authority`
///   2. `[signer]`   authority of both token accounts
///   3. `[]`         token program
///   4.. swapper specific accounts (pool, router, mints, fee accounts)
#[constant]
pub const SWAP_TO_LP_IX_NAME: &str = "swap_to_lp";

#[constant]
pub const SWAP_TO_LP_FIXED_ACCOUNTS_COUNT: usize = 4;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapToLpArgs {
    pub amount_in: u64,
    pub minimum_amount_out: u64,
    pub use_token0: bool,
}

impl SwapToLpArgs {
    /// Instruction arguments in the form `invoke_signed_instruction` appends
    /// after the discriminator.
    pub fn to_instruction_args(&self) -> Result<Vec<Vec<u8>>> {
        Ok(vec![
            self.amount_in.try_to_vec()?,
            self.minimum_amount_out.try_to_vec()?,
            self.use_token0.try_to_vec()?,
        ])
    }
}

/// Account metas for a `swap_to_lp` call; `passthrough` are the swapper
/// specific accounts forwarded unchanged.
pub fn swap_to_lp_account_metas(
    source_token_account: Pubkey,
    destination_token_account: Pubkey,
    authority: Pubkey,
    token_program: Pubkey,
    passthrough: &[AccountInfo],
) -> Vec<AccountMeta> {
    let mut metas = vec![
        AccountMeta::new(source_token_account, false),
        AccountMeta::new(destination_token_account, false),
        AccountMeta::new_readonly(authority, true),
        AccountMeta::new_readonly(token_program, false),
    ];
    metas.extend(passthrough.iter().map(|account| AccountMeta {
        pubkey: *account.key,
        is_signer: account.is_signer,
        is_writable: account.is_writable,
    }));
    metas
}
