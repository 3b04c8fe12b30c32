use crate::error::VestingError;
use crate::states::*;
use anchor_lang::prelude::*;

/// Accounts context shared by the admin-only setters.
#[derive(Accounts)]
pub struct AdminOnly<'info> {
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
}

/// Freezes or unfreezes grants and claims. Views keep working while locked.
pub fn set_lock(ctx: Context<AdminOnly>, locked: bool) -> Result<()> {
    ctx.accounts.ledger_state.policy.locked = locked;
    msg!("Ledger locked: {}", locked);

    emit!(LockUpdated { locked });
    Ok(())
}

pub fn update_admin(ctx: Context<AdminOnly>, new_admin: Pubkey) -> Result<()> {
    require_keys_neq!(new_admin, Pubkey::default(), VestingError::NullIdentity);
    let policy = &mut ctx.accounts.ledger_state.policy;
    let old_admin = policy.admin;
    policy.admin = new_admin;

    emit!(AdminUpdated {
        old_admin,
        new_admin,
    });
    Ok(())
}
