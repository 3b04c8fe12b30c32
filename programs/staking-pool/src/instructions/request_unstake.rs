use crate::error::StakingError;
use crate::states::*;
use anchor_lang::prelude::*;

/// Start the unstake cooldown for the signer's whole principal.
///
/// No tokens move; the principal keeps earning until `unstake`.
#[derive(Accounts)]
pub struct RequestUnstake<'info> {
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
}

pub fn request_unstake(ctx: Context<RequestUnstake>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let pool_config = &mut ctx.accounts.pool_config;
    let stake_account = &mut ctx.accounts.stake_account;

    pool_config.request_unstake(stake_account, now)?;
    let unlock_at = pool_config
        .unlock_time(stake_account)?
        .ok_or(StakingError::NoUnstakeRequest)?;

    emit!(UnstakeRequested {
        holder: stake_account.owner,
        principal: stake_account.principal,
        unlock_at,
    });
    Ok(())
}
