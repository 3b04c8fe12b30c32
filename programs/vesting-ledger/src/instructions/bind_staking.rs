use crate::error::VestingError;
use crate::states::*;
use anchor_lang::prelude::*;
use staking_pool::states::PoolConfig;

/// Links the ledger to a staking pool so `claim_and_stake` can deposit.
///
/// One-time: a bound ledger cannot be rebound. The pool account must be a
/// `PoolConfig` owned by the staking program and stake the ledger mint.
#[derive(Accounts)]
pub struct BindStaking<'info> {
    #[account(
        constraint = ledger_state.policy.is_admin(&admin.key()) @ VestingError::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [LEDGER_STATE_SEED.as_bytes()],
        bump = ledger_state.bump,
    )]
    pub ledger_state: Box<Account<'info, LedgerState>>,

    #[account(
        constraint = pool_config.mint == ledger_state.mint @ VestingError::StakingMintMismatch
    )]
    pub pool_config: Box<Account<'info, PoolConfig>>,
}

pub fn bind_staking(ctx: Context<BindStaking>) -> Result<()> {
    let ledger_state = &mut ctx.accounts.ledger_state;
    require!(
        !ledger_state.is_staking_bound(),
        VestingError::StakingAlreadyBound
    );
    ledger_state.staking_pool = ctx.accounts.pool_config.key();
    msg!("Staking pool bound: {}", ledger_state.staking_pool);

    emit!(StakingBound {
        staking_pool: ledger_state.staking_pool,
    });
    Ok(())
}
