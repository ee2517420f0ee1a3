use anchor_lang::prelude::*;

#[constant]
pub const STRATEGY_SEED_PART: &[u8] = b"strategy";
#[constant]
pub const STRATEGY_VAULT_SEED_PART: &[u8] = b"strategyvaultkey";
#[constant]
pub const VAULT_LINK_SEED_PART: &[u8] = b"strategyvaultlink";
/// Denominator of every basis-point rate.
#[constant]
pub const BPS_DENOMINATOR: u64 = 10_000;
