use crate::states::*;
use crate::utils::transfer_from_vault_to_user;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Withdraw the whole principal once the cooldown has elapsed.
///
/// Accrued rewards are settled into the stake account and stay claimable
/// through `claim_reward`.
#[derive(Accounts)]
pub struct Unstake<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_CONFIG_SEED.as_bytes()],
        bump = pool_config.bump,
    )]
    pub pool_config: Box<Account<'info, PoolConfig>>,

    #[account(
        mut,
        seeds = [
            STAKE_ACCOUNT_SEED.as_bytes(),
            owner.key().as_ref()
        ],
        bump = stake_account.bump,
    )]
    pub stake_account: Box<Account<'info, StakeAccount>>,

    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump = pool_config.authority_bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(mut, address = pool_config.stake_vault)]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Receives the principal.
    #[account(
        mut,
        token::mint = mint,
        token::authority = owner,
    )]
    pub owner_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = pool_config.mint)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn unstake(ctx: Context<Unstake>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let amount = ctx
        .accounts
        .pool_config
        .unstake(&mut ctx.accounts.stake_account, now)?;

    transfer_from_vault_to_user(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.stake_vault.to_account_info(),
        ctx.accounts.owner_token.to_account_info(),
        ctx.accounts.mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.mint.decimals,
        &[&[
            crate::AUTH_SEED.as_bytes(),
            &[ctx.accounts.pool_config.authority_bump],
        ]],
    )?;

    emit!(Unstaked {
        holder: ctx.accounts.owner.key(),
        amount,
    });
    Ok(())
}
