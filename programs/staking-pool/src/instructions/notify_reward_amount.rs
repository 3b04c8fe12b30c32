use crate::error::StakingError;
use crate::states::*;
use crate::utils::transfer_from_user_to_vault;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Fund a new emission period.
///
/// Funds movement: admin token account → reward vault.
#[derive(Accounts)]
pub struct NotifyRewardAmount<'info> {
    #[account(
        constraint = owner.key() == pool_config.admin @ StakingError::Unauthorized
    )]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_CONFIG_SEED.as_bytes()],
        bump = pool_config.bump,
    )]
    pub pool_config: Box<Account<'info, PoolConfig>>,

    #[account(
        mut,
        token::mint = mint,
        token::authority = owner,
    )]
    pub owner_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = pool_config.reward_vault)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = pool_config.mint)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Starts a period of `duration` seconds emitting `amount` plus whatever the
/// running period has left.
///
/// The reward vault must hold the whole new emission once `amount` has
/// arrived, otherwise the schedule would promise tokens it cannot pay.
pub fn notify_reward_amount(
    ctx: Context<NotifyRewardAmount>,
    amount: u64,
    duration: i64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    #[cfg(feature = "enable-log")]
    let was_active = ctx.accounts.pool_config.schedule.is_active(now);

    ctx.accounts
        .pool_config
        .notify_reward_amount(amount, duration, now)?;

    transfer_from_user_to_vault(
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.owner_token.to_account_info(),
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.mint.decimals,
    )?;
    ctx.accounts.reward_vault.reload()?;

    let pool_config = &ctx.accounts.pool_config;
    require!(
        pool_config.remaining_emission(now)? <= ctx.accounts.reward_vault.amount,
        StakingError::RewardTooHigh
    );

    #[cfg(feature = "enable-log")]
    msg!(
        "notify {} over {}s (renewal: {}), rate {}, finish {}",
        amount,
        duration,
        was_active,
        pool_config.schedule.reward_rate,
        pool_config.schedule.period_finish
    );

    emit!(RewardAdded {
        amount,
        reward_rate: pool_config.schedule.reward_rate,
        period_finish: pool_config.schedule.period_finish,
    });
    Ok(())
}
