use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::token_interface::{self, TransferChecked};

/// Moves `amount` from a user-controlled token account into a pool vault.
pub fn transfer_from_user_to_vault<'a>(
    authority: AccountInfo<'a>,
    from: AccountInfo<'a>,
    to_vault: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    amount: u64,
    mint_decimals: u8,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token_interface::transfer_checked(
        CpiContext::new(
            token_program,
            TransferChecked {
                from,
                to: to_vault,
                authority,
                mint,
            },
        ),
        amount,
        mint_decimals,
    )
}

/// Moves `amount` out of a pool vault; `authority` is the vault owner PDA and
/// signs through `signer_seeds`.
pub fn transfer_from_vault_to_user<'a>(
    authority: AccountInfo<'a>,
    from_vault: AccountInfo<'a>,
    to: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    amount: u64,
    mint_decimals: u8,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token_interface::transfer_checked(
        CpiContext::new(
            token_program,
            TransferChecked {
                from: from_vault,
                to,
                authority,
                mint,
            },
        )
        .with_signer(signer_seeds),
        amount,
        mint_decimals,
    )
}

/// Sends lamports held by the authority PDA to `to`.
pub fn transfer_lamports_from_authority<'a>(
    authority: AccountInfo<'a>,
    to: AccountInfo<'a>,
    system_program: AccountInfo<'a>,
    amount: u64,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    system_program::transfer(
        CpiContext::new(
            system_program,
            system_program::Transfer { from: authority, to },
        )
        .with_signer(signer_seeds),
        amount,
    )
}
