use anchor_lang::prelude::*;

declare_id!("GaFUD2Y67jppg6VpLXRmX3QAc55txF6jB9gDhkitvirA");

pub const AUTH_SEED: &str = "pool_authority";
pub const STAKE_VAULT_SEED: &str = "stake_vault";
pub const REWARD_VAULT_SEED: &str = "reward_vault";

/// Fixed-point scale for `reward_rate` and `reward_per_token_stored`.
pub const PRECISION: u128 = 1_000_000_000_000;

pub mod curve;
pub mod error;
pub mod instructions;
pub mod states;
pub mod utils;

use instructions::*;
use states::{RewardSchedule, StakeAccount};

#[program]
pub mod staking_pool {

    use super::*;

    pub fn initialise_pool(
        ctx: Context<InitialisePool>,
        admin: Pubkey,
        unstake_cooldown: i64,
    ) -> Result<()> {
        instructions::initialise_pool(ctx, admin, unstake_cooldown)
    }

    pub fn update_config(ctx: Context<UpdateConfig>, param: u8, value: u64) -> Result<()> {
        instructions::update_config(ctx, param, value)
    }

    pub fn add_token_stake(ctx: Context<AddTokenStake>, amount: u64) -> Result<()> {
        instructions::add_token_stake(ctx, amount)
    }

    pub fn deposit_stake_for(
        ctx: Context<DepositStakeFor>,
        beneficiary: Pubkey,
        amount: u64,
    ) -> Result<()> {
        instructions::deposit_stake_for(ctx, beneficiary, amount)
    }

    pub fn request_unstake(ctx: Context<RequestUnstake>) -> Result<()> {
        instructions::request_unstake(ctx)
    }

    pub fn unstake(ctx: Context<Unstake>) -> Result<()> {
        instructions::unstake(ctx)
    }

    pub fn claim_reward(ctx: Context<ClaimReward>) -> Result<()> {
        instructions::claim_reward(ctx)
    }

    pub fn notify_reward_amount(
        ctx: Context<NotifyRewardAmount>,
        amount: u64,
        duration: i64,
    ) -> Result<()> {
        instructions::notify_reward_amount(ctx, amount, duration)
    }

    pub fn recover_stray_assets(ctx: Context<RecoverStrayAssets>, param: u8) -> Result<()> {
        instructions::recover_stray_assets(ctx, param)
    }

    pub fn get_earned(ctx: Context<StakeView>) -> Result<u64> {
        instructions::get_earned(ctx)
    }

    pub fn get_stake_account(ctx: Context<StakeView>) -> Result<StakeAccount> {
        instructions::get_stake_account(ctx)
    }

    pub fn get_reward_schedule(ctx: Context<ScheduleView>) -> Result<RewardSchedule> {
        instructions::get_reward_schedule(ctx)
    }
}
