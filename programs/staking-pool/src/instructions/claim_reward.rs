use crate::states::*;
use crate::utils::transfer_from_vault_to_user;
use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

/// Pay out every reward the signer has accrued.
///
/// Reward math overview:
/// - Global index: `schedule.reward_per_token_stored` accumulates reward per
///   staked token, scaled by `PRECISION`.
/// - Per-account checkpoint: `stake_account.reward_per_token_paid`.
/// - Pending = `rewards + principal * (global_idx - checkpoint) / PRECISION`.
///
/// Funds movement: reward vault → owner ATA (created on demand).
#[derive(Accounts)]
pub struct ClaimReward<'info> {
    #[account(mut)]
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

    #[account(mut, address = pool_config.reward_vault)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = pool_config.mint)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    /// Owner's ATA; created on demand to receive rewards.
    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = mint,
        associated_token::authority = owner,
        associated_token::token_program = token_program,
    )]
    pub owner_token: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub associated_token_program: Program<'info, AssociatedToken>,

    pub system_program: Program<'info, System>,
}

/// Settles the signer's rewards and pays them if nonzero.
pub fn claim_reward(ctx: Context<ClaimReward>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let reward = ctx
        .accounts
        .pool_config
        .claim_reward(&mut ctx.accounts.stake_account, now)?;
    if reward == 0 {
        return Ok(());
    }

    transfer_from_vault_to_user(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.owner_token.to_account_info(),
        ctx.accounts.mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        reward,
        ctx.accounts.mint.decimals,
        &[&[
            crate::AUTH_SEED.as_bytes(),
            &[ctx.accounts.pool_config.authority_bump],
        ]],
    )?;

    emit!(RewardPaid {
        holder: ctx.accounts.owner.key(),
        amount: reward,
    });
    Ok(())
}
