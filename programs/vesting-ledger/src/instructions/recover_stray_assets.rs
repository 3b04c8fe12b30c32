use crate::error::VestingError;
use crate::states::*;
use crate::utils::{transfer_from_vault, transfer_lamports_from_authority};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Sweep assets sent to the ledger authority by mistake.
///
/// The ledger mint backs outstanding grants and is never recoverable.
#[derive(Accounts)]
pub struct RecoverStrayAssets<'info> {
    #[account(
        mut,
        constraint = ledger_state.policy.is_admin(&admin.key()) @ VestingError::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(
        seeds = [LEDGER_STATE_SEED.as_bytes()],
        bump = ledger_state.bump,
    )]
    pub ledger_state: Box<Account<'info, LedgerState>>,

    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        mut,
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump = ledger_state.authority_bump,
    )]
    pub authority: UncheckedAccount<'info>,

    /// Token account held by the authority (param `0`).
    #[account(
        mut,
        constraint = stray_token.owner == authority.key() @ VestingError::InvalidVault,
    )]
    pub stray_token: Option<Box<InterfaceAccount<'info, TokenAccount>>>,

    #[account(mut)]
    pub recipient_token: Option<Box<InterfaceAccount<'info, TokenAccount>>>,

    pub stray_mint: Option<Box<InterfaceAccount<'info, Mint>>>,

    pub token_program: Option<Interface<'info, TokenInterface>>,

    pub system_program: Program<'info, System>,
}

/// # Param Mapping
/// - `0`: whole balance of `stray_token` → `recipient_token`.
/// - `1`: every lamport held by the authority PDA → `admin`.
pub fn recover_stray_assets(ctx: Context<RecoverStrayAssets>, param: u8) -> Result<()> {
    let signer_seeds: &[&[&[u8]]] = &[&[
        crate::AUTH_SEED.as_bytes(),
        &[ctx.accounts.ledger_state.authority_bump],
    ]];

    let (mint, amount, recipient) = match param {
        0 => {
            let (Some(stray_token), Some(recipient_token), Some(stray_mint), Some(token_program)) = (
                ctx.accounts.stray_token.as_ref(),
                ctx.accounts.recipient_token.as_ref(),
                ctx.accounts.stray_mint.as_ref(),
                ctx.accounts.token_program.as_ref(),
            ) else {
                return err!(VestingError::MissingRemainingAccount);
            };
            require_keys_neq!(
                stray_token.mint,
                ctx.accounts.ledger_state.mint,
                VestingError::ManagedTokenRecovery
            );
            require_keys_eq!(stray_token.mint, stray_mint.key(), VestingError::InvalidParam);

            let amount = stray_token.amount;
            transfer_from_vault(
                ctx.accounts.authority.to_account_info(),
                stray_token.to_account_info(),
                recipient_token.to_account_info(),
                stray_mint.to_account_info(),
                token_program.to_account_info(),
                amount,
                stray_mint.decimals,
                signer_seeds,
            )?;
            (stray_mint.key(), amount, recipient_token.key())
        }
        1 => {
            let amount = ctx.accounts.authority.lamports();
            transfer_lamports_from_authority(
                ctx.accounts.authority.to_account_info(),
                ctx.accounts.admin.to_account_info(),
                ctx.accounts.system_program.to_account_info(),
                amount,
                signer_seeds,
            )?;
            (Pubkey::default(), amount, ctx.accounts.admin.key())
        }
        _ => return err!(VestingError::InvalidParam),
    };

    #[cfg(feature = "enable-log")]
    msg!("recovered {} of {} to {}", amount, mint, recipient);

    emit!(StrayAssetsRecovered {
        mint,
        amount,
        recipient,
    });
    Ok(())
}
