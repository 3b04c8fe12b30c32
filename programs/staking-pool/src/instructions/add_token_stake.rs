use crate::error::StakingError;
use crate::states::*;
use crate::utils::transfer_from_user_to_vault;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Stake tokens from the signer's own token account.
///
/// The stake account is created on the first deposit. Deposits are refused
/// while an unstake request is pending.
#[derive(Accounts)]
pub struct AddTokenStake<'info> {
    /// Staker; pays for the stake account on first use.
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_CONFIG_SEED.as_bytes()],
        bump = pool_config.bump,
    )]
    pub pool_config: Box<Account<'info, PoolConfig>>,

    #[account(
        init_if_needed,
        seeds = [
            STAKE_ACCOUNT_SEED.as_bytes(),
            owner.key().as_ref()
        ],
        bump,
        payer = owner,
        space = StakeAccount::LEN
    )]
    pub stake_account: Box<Account<'info, StakeAccount>>,

    /// Source of the staked tokens.
    #[account(
        mut,
        token::mint = mint,
        token::authority = owner,
    )]
    pub owner_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = pool_config.stake_vault)]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = pool_config.mint)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

pub fn add_token_stake(ctx: Context<AddTokenStake>, amount: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let owner = ctx.accounts.owner.key();

    let stake_account = &mut ctx.accounts.stake_account;
    stake_account.ensure_initialized(owner, ctx.bumps.stake_account)?;
    ctx.accounts.pool_config.add_stake(stake_account, amount, now)?;

    transfer_from_user_to_vault(
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.owner_token.to_account_info(),
        ctx.accounts.stake_vault.to_account_info(),
        ctx.accounts.mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.mint.decimals,
    )?;

    #[cfg(feature = "enable-log")]
    msg!(
        "stake {} -> principal {}, total {}",
        amount,
        ctx.accounts.stake_account.principal,
        ctx.accounts.pool_config.total_principal
    );

    emit!(StakeAdded {
        holder: owner,
        amount,
    });
    Ok(())
}

/// Stake tokens on behalf of `beneficiary`.
///
/// `depositor` signs for the source tokens; the principal is credited to the
/// beneficiary's stake account. The vesting ledger uses this entry point to
/// route claimed tokens straight into the pool.
#[derive(Accounts)]
#[instruction(beneficiary: Pubkey)]
pub struct DepositStakeFor<'info> {
    /// Pays for the beneficiary's stake account on first use.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// Authority over `source`.
    pub depositor: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_CONFIG_SEED.as_bytes()],
        bump = pool_config.bump,
    )]
    pub pool_config: Box<Account<'info, PoolConfig>>,

    #[account(
        init_if_needed,
        seeds = [
            STAKE_ACCOUNT_SEED.as_bytes(),
            beneficiary.as_ref()
        ],
        bump,
        payer = payer,
        space = StakeAccount::LEN
    )]
    pub stake_account: Box<Account<'info, StakeAccount>>,

    #[account(
        mut,
        token::mint = mint,
        token::authority = depositor,
    )]
    pub source: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = pool_config.stake_vault)]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = pool_config.mint)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

pub fn deposit_stake_for(
    ctx: Context<DepositStakeFor>,
    beneficiary: Pubkey,
    amount: u64,
) -> Result<()> {
    require_keys_neq!(beneficiary, Pubkey::default(), StakingError::NullIdentity);
    let now = Clock::get()?.unix_timestamp;

    let stake_account = &mut ctx.accounts.stake_account;
    stake_account.ensure_initialized(beneficiary, ctx.bumps.stake_account)?;
    ctx.accounts.pool_config.add_stake(stake_account, amount, now)?;

    transfer_from_user_to_vault(
        ctx.accounts.depositor.to_account_info(),
        ctx.accounts.source.to_account_info(),
        ctx.accounts.stake_vault.to_account_info(),
        ctx.accounts.mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.mint.decimals,
    )?;

    #[cfg(feature = "enable-log")]
    msg!(
        "stake {} for {} by {}",
        amount,
        beneficiary,
        ctx.accounts.depositor.key()
    );

    emit!(StakeAdded {
        holder: beneficiary,
        amount,
    });
    Ok(())
}
