use anchor_lang::prelude::*;

declare_id!("357xywCq2as3VeMoHPcNpha1wuxwsk4UHYGaVQyYcqEi");

pub const AUTH_SEED: &str = "ledger_authority";
pub const VAULT_SEED: &str = "ledger_vault";

/// Upper bound on entries returned by one view; keeps the result inside
/// the 1024-byte return-data limit.
pub const MAX_VIEW_ENTRIES: usize = 12;

pub mod curve;
pub mod error;
pub mod instructions;
pub mod states;
pub mod utils;

use instructions::*;
use states::VestingEntry;

#[program]
pub mod vesting_ledger {

    use super::*;

    pub fn initialise_ledger(ctx: Context<InitialiseLedger>, admin: Pubkey) -> Result<()> {
        instructions::initialise_ledger(ctx, admin)
    }

    pub fn grant_batch<'info>(
        ctx: Context<'_, '_, 'info, 'info, GrantBatch<'info>>,
        holders: Vec<Pubkey>,
        start_tokens: Vec<u64>,
        total_amounts: Vec<u64>,
        start_date: i64,
        end_date: i64,
    ) -> Result<()> {
        instructions::grant_batch(
            ctx,
            holders,
            start_tokens,
            total_amounts,
            start_date,
            end_date,
        )
    }

    pub fn claim(ctx: Context<Claim>, from_position: u64, count: u64) -> Result<()> {
        instructions::claim(ctx, from_position, count)
    }

    pub fn claim_to(
        ctx: Context<ClaimTo>,
        recipient: Pubkey,
        from_position: u64,
        count: u64,
    ) -> Result<()> {
        instructions::claim_to(ctx, recipient, from_position, count)
    }

    pub fn claim_and_stake(
        ctx: Context<ClaimAndStake>,
        from_position: u64,
        count: u64,
    ) -> Result<()> {
        instructions::claim_and_stake(ctx, from_position, count)
    }

    pub fn set_lock(ctx: Context<AdminOnly>, locked: bool) -> Result<()> {
        instructions::set_lock(ctx, locked)
    }

    pub fn update_admin(ctx: Context<AdminOnly>, new_admin: Pubkey) -> Result<()> {
        instructions::update_admin(ctx, new_admin)
    }

    pub fn bind_staking(ctx: Context<BindStaking>) -> Result<()> {
        instructions::bind_staking(ctx)
    }

    pub fn recover_stray_assets(ctx: Context<RecoverStrayAssets>, param: u8) -> Result<()> {
        instructions::recover_stray_assets(ctx, param)
    }

    pub fn get_claimable(ctx: Context<HolderView>, holder: Pubkey, index: u64) -> Result<u64> {
        instructions::get_claimable(ctx, holder, index)
    }

    pub fn get_all_claimable(ctx: Context<HolderView>, holder: Pubkey) -> Result<u64> {
        instructions::get_all_claimable(ctx, holder)
    }

    pub fn get_vestings(ctx: Context<HolderView>, holder: Pubkey) -> Result<Vec<VestingEntry>> {
        instructions::get_vestings(ctx, holder)
    }

    pub fn get_vestings_count(ctx: Context<LedgerView>) -> Result<u64> {
        instructions::get_vestings_count(ctx)
    }

    pub fn get_vesting_by_index(ctx: Context<LedgerView>, index: u64) -> Result<VestingEntry> {
        instructions::get_vesting_by_index(ctx, index)
    }

    pub fn get_vestings_by_range(
        ctx: Context<LedgerView>,
        from: u64,
        to: u64,
    ) -> Result<Vec<VestingEntry>> {
        instructions::get_vestings_by_range(ctx, from, to)
    }
}
