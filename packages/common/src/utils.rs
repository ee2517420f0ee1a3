use anchor_lang::{prelude::*, solana_program::pubkey::Pubkey, Result};
use anchor_spl::token::TokenAccount;

use anchor_lang::solana_program::hash::hash;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};

use std::convert::TryInto;

use crate::errors::ErrorCode;

pub fn sighash(namespace: &str, name: &str) -> [u8; 8] {
    let preimage = format!("{}:{}", namespace, name);

    let mut sighash = [0u8; 8];
    sighash.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
    sighash
}

pub fn invoke_signed_instruction(
    namespace: &str,
    name: &str,
    args: Vec<Vec<u8>>,
    program_id: Pubkey,
    accounts_meta: Vec<AccountMeta>,
    accounts_info: &[AccountInfo],
    signer: &[&[&[u8]]],
) -> Result<()> {
    let mut data: Vec<u8> = sighash(namespace, name).to_vec();
    let mut args = args;
    args.iter_mut().for_each(|arg| data.append(arg));

    let ix = Instruction {
        program_id,
        accounts: accounts_meta,
        data,
    };

    anchor_lang::solana_program::program::invoke_signed(&ix, accounts_info, signer)?;
    Ok(())
}

/// Deserializes an SPL token account, failing for accounts the token program does not own.
pub fn load_token_account(account: &AccountInfo) -> Result<TokenAccount> {
    let token_account = Account::<TokenAccount>::try_from(account)
        .ok()
        .ok_or(ErrorCode::WrongConvertionFromAccountInfoToTokenAccount)?;
    Ok((*token_account).clone())
}

/// Reads the current amount of an SPL token account.
pub fn token_amount(account: &AccountInfo) -> Result<u64> {
    Ok(load_token_account(account)?.amount)
}

/// Computes `value * numerator / denominator` rounded down, through u128.
pub fn mul_div_floor(value: u64, numerator: u64, denominator: u64) -> Result<u64> {
    let product = (value as u128)
        .checked_mul(numerator.into())
        .ok_or(ErrorCode::WrongIntegerMultiplication)?;
    let quotient = product
        .checked_div(denominator.into())
        .ok_or(ErrorCode::WrongIntegerDivision)?;
    Ok(quotient
        .try_into()
        .map_err(|_| ErrorCode::TryIntoConversionError)?)
}
