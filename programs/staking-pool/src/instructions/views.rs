use crate::states::*;
use anchor_lang::prelude::*;

/// Read-only access to one participant's stake account.
///
/// Results travel back as return data; nothing is written.
#[derive(Accounts)]
pub struct StakeView<'info> {
    #[account(
        seeds = [POOL_CONFIG_SEED.as_bytes()],
        bump = pool_config.bump,
    )]
    pub pool_config: Box<Account<'info, PoolConfig>>,

    /// CHECK: only its key is used to derive the stake account.
    pub owner: UncheckedAccount<'info>,

    #[account(
        seeds = [
            STAKE_ACCOUNT_SEED.as_bytes(),
            owner.key().as_ref()
        ],
        bump = stake_account.bump,
    )]
    pub stake_account: Box<Account<'info, StakeAccount>>,
}

#[derive(Accounts)]
pub struct ScheduleView<'info> {
    #[account(
        seeds = [POOL_CONFIG_SEED.as_bytes()],
        bump = pool_config.bump,
    )]
    pub pool_config: Box<Account<'info, PoolConfig>>,
}

/// Rewards claimable right now, including accrual not yet settled.
pub fn get_earned(ctx: Context<StakeView>) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    ctx.accounts
        .pool_config
        .pending_rewards(&ctx.accounts.stake_account, now)
}

/// Stake account with its rewards brought up to date.
pub fn get_stake_account(ctx: Context<StakeView>) -> Result<StakeAccount> {
    let now = Clock::get()?.unix_timestamp;
    let pool_config = &ctx.accounts.pool_config;
    let mut account = StakeAccount::clone(&ctx.accounts.stake_account);
    let reward_per_token = pool_config
        .schedule
        .reward_per_token(now, pool_config.total_principal)?;
    account.settle(reward_per_token)?;
    Ok(account)
}

pub fn get_reward_schedule(ctx: Context<ScheduleView>) -> Result<RewardSchedule> {
    Ok(ctx.accounts.pool_config.schedule)
}
