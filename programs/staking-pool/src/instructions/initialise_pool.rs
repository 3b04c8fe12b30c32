use crate::error::StakingError;
use crate::{states::*, REWARD_VAULT_SEED, STAKE_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `initialise_pool`.
///
/// Creates the pool configuration and the two program-owned vaults (principal
/// and rewards), both controlled by the `AUTH_SEED` PDA.
#[derive(Accounts)]
pub struct InitialisePool<'info> {
    /// Pays for the new accounts.
    #[account(mut)]
    pub owner: Signer<'info>,

    /// Program authority PDA, token authority of both vaults.
    ///
    /// CHECK: PDA derivation enforced via seeds. Not read as an account; used as Pubkey.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(
        init,
        seeds = [POOL_CONFIG_SEED.as_bytes()],
        bump,
        payer = owner,
        space = PoolConfig::LEN
    )]
    pub pool_config: Box<Account<'info, PoolConfig>>,

    /// Mint of the staked (and reward) token.
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    /// Vault holding staked principal.
    #[account(
        init,
        seeds = [STAKE_VAULT_SEED.as_bytes()],
        bump,
        payer = owner,
        token::mint = mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Vault holding rewards funded by `notify_reward_amount`.
    #[account(
        init,
        seeds = [REWARD_VAULT_SEED.as_bytes()],
        bump,
        payer = owner,
        token::mint = mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Writes the pool configuration. The reward schedule starts empty; the
/// first `notify_reward_amount` opens an emission period.
pub fn initialise_pool(
    ctx: Context<InitialisePool>,
    admin: Pubkey,
    unstake_cooldown: i64,
) -> Result<()> {
    require_keys_neq!(admin, Pubkey::default(), StakingError::NullIdentity);
    require!(unstake_cooldown >= 0, StakingError::InvalidCooldown);

    let pool_config = &mut ctx.accounts.pool_config;
    pool_config.bump = ctx.bumps.pool_config;
    pool_config.authority_bump = ctx.bumps.authority;
    pool_config.admin = admin;
    pool_config.mint = ctx.accounts.mint.key();
    pool_config.stake_vault = ctx.accounts.stake_vault.key();
    pool_config.reward_vault = ctx.accounts.reward_vault.key();
    pool_config.unstake_cooldown = unstake_cooldown;
    pool_config.schedule = RewardSchedule::default();
    msg!("Pool config initialized");

    emit!(PoolInitialized {
        admin,
        mint: pool_config.mint,
        stake_vault: pool_config.stake_vault,
        reward_vault: pool_config.reward_vault,
        unstake_cooldown,
    });
    Ok(())
}
