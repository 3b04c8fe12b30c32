use crate::error::StakingError;
use crate::states::{ConfigUpdated, PoolConfig, POOL_CONFIG_SEED};
use anchor_lang::prelude::*;

/// Accounts context for the `update_config` instruction.
///
/// Only the current pool admin may change parameters.
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
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
}

/// Updates selected fields of the pool configuration.
///
/// # Param Mapping
/// - `0`: **Admin change** → new admin Pubkey passed via `remaining_accounts[0]`.
/// - `1`: **unstake_cooldown** → seconds between request and withdrawal.
///
/// A cooldown change applies to pending requests as well, since the unlock
/// time is derived from `unstake_requested_at + unstake_cooldown` on demand.
pub fn update_config(ctx: Context<UpdateConfig>, param: u8, value: u64) -> Result<()> {
    let pool_config = &mut ctx.accounts.pool_config;
    match param {
        0 => {
            let new_admin = *ctx
                .remaining_accounts
                .iter()
                .next()
                .ok_or(error!(StakingError::MissingRemainingAccount))?
                .key;
            require_keys_neq!(new_admin, Pubkey::default(), StakingError::NullIdentity);
            pool_config.admin = new_admin;
        }
        1 => {
            pool_config.unstake_cooldown =
                i64::try_from(value).map_err(|_| StakingError::InvalidCooldown)?;
        }
        _ => return Err(error!(StakingError::InvalidParam)),
    }

    emit!(ConfigUpdated {
        admin: pool_config.admin,
        unstake_cooldown: pool_config.unstake_cooldown,
    });
    Ok(())
}
