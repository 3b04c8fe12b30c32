use crate::error::StakingError;
use crate::states::*;
use crate::utils::{transfer_from_vault_to_user, transfer_lamports_from_authority};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Sweep assets that were sent to the pool authority by mistake.
///
/// The staked mint is never recoverable: both vaults hold it and are
/// accounted for by the pool.
#[derive(Accounts)]
pub struct RecoverStrayAssets<'info> {
    #[account(
        mut,
        constraint = owner.key() == pool_config.admin @ StakingError::Unauthorized
    )]
    pub owner: Signer<'info>,

    #[account(
        seeds = [POOL_CONFIG_SEED.as_bytes()],
        bump = pool_config.bump,
    )]
    pub pool_config: Box<Account<'info, PoolConfig>>,

    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        mut,
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump = pool_config.authority_bump,
    )]
    pub authority: UncheckedAccount<'info>,

    /// Token account held by the authority (param `0`).
    #[account(
        mut,
        constraint = stray_token.owner == authority.key() @ StakingError::InvalidVault,
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
/// - `1`: every lamport held by the authority PDA → `owner`.
pub fn recover_stray_assets(ctx: Context<RecoverStrayAssets>, param: u8) -> Result<()> {
    let signer_seeds: &[&[&[u8]]] = &[&[
        crate::AUTH_SEED.as_bytes(),
        &[ctx.accounts.pool_config.authority_bump],
    ]];

    let (mint, amount, recipient) = match param {
        0 => {
            let (Some(stray_token), Some(recipient_token), Some(stray_mint), Some(token_program)) = (
                ctx.accounts.stray_token.as_ref(),
                ctx.accounts.recipient_token.as_ref(),
                ctx.accounts.stray_mint.as_ref(),
                ctx.accounts.token_program.as_ref(),
            ) else {
                return err!(StakingError::MissingRemainingAccount);
            };
            require_keys_neq!(
                stray_token.mint,
                ctx.accounts.pool_config.mint,
                StakingError::ManagedTokenRecovery
            );
            require_keys_eq!(stray_token.mint, stray_mint.key(), StakingError::InvalidParam);

            let amount = stray_token.amount;
            transfer_from_vault_to_user(
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
                ctx.accounts.owner.to_account_info(),
                ctx.accounts.system_program.to_account_info(),
                amount,
                signer_seeds,
            )?;
            (Pubkey::default(), amount, ctx.accounts.owner.key())
        }
        _ => return err!(StakingError::InvalidParam),
    };

    emit!(StrayAssetsRecovered {
        mint,
        amount,
        recipient,
    });
    Ok(())
}
