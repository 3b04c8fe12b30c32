use crate::error::VestingError;
use crate::states::*;
use crate::utils::{load_entries, load_entry, load_holder_index, next_remaining};
use anchor_lang::prelude::*;

// Views return through return data. Entries are read from the remaining
// accounts, in the order the view walks them.

#[derive(Accounts)]
pub struct LedgerView<'info> {
    #[account(
        seeds = [LEDGER_STATE_SEED.as_bytes()],
        bump = ledger_state.bump,
    )]
    pub ledger_state: Box<Account<'info, LedgerState>>,
}

#[derive(Accounts)]
#[instruction(holder: Pubkey)]
pub struct HolderView<'info> {
    #[account(
        seeds = [LEDGER_STATE_SEED.as_bytes()],
        bump = ledger_state.bump,
    )]
    pub ledger_state: Box<Account<'info, LedgerState>>,

    /// CHECK: PDA derivation enforced by seeds; may not exist.
    #[account(
        seeds = [HOLDER_INDEX_SEED.as_bytes(), holder.as_ref()],
        bump,
    )]
    pub holder_index: UncheckedAccount<'info>,
}

fn holder_entries(ctx: &Context<HolderView>, holder: &Pubkey) -> Result<Vec<u64>> {
    Ok(load_holder_index(&ctx.accounts.holder_index, holder)?
        .map(|holder_index| holder_index.entries)
        .unwrap_or_default())
}

/// Claimable amount of the holder's `index`-th entry (remaining: that entry).
pub fn get_claimable(ctx: Context<HolderView>, holder: Pubkey, index: u64) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    let global = load_holder_index(&ctx.accounts.holder_index, &holder)?
        .unwrap_or_default()
        .nth(index)?;

    let mut accounts = ctx.remaining_accounts.iter();
    load_entry(next_remaining(&mut accounts)?, global)?.claimable(now)
}

/// Sum claimable over all of the holder's entries (remaining: those entries).
pub fn get_all_claimable(ctx: Context<HolderView>, holder: Pubkey) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    let entries = holder_entries(&ctx, &holder)?;
    load_entries(&entries, ctx.remaining_accounts)?
        .iter()
        .try_fold(0u64, |total, entry| {
            total
                .checked_add(entry.claimable(now)?)
                .ok_or(error!(VestingError::MathOverflow))
        })
}

pub fn get_vestings(ctx: Context<HolderView>, holder: Pubkey) -> Result<Vec<VestingEntry>> {
    let entries = holder_entries(&ctx, &holder)?;
    check_view_len(entries.len())?;
    load_entries(&entries, ctx.remaining_accounts)
}

pub fn get_vestings_count(ctx: Context<LedgerView>) -> Result<u64> {
    Ok(ctx.accounts.ledger_state.vestings_count)
}

pub fn get_vesting_by_index(ctx: Context<LedgerView>, index: u64) -> Result<VestingEntry> {
    ctx.accounts.ledger_state.check_index(index)?;
    let mut accounts = ctx.remaining_accounts.iter();
    load_entry(next_remaining(&mut accounts)?, index)
}

/// Entries `from..=to` (remaining: those entries in order).
pub fn get_vestings_by_range(
    ctx: Context<LedgerView>,
    from: u64,
    to: u64,
) -> Result<Vec<VestingEntry>> {
    let len = ctx.accounts.ledger_state.check_range(from, to)?;
    check_view_len(usize::try_from(len).map_err(|_| VestingError::ViewTooLarge)?)?;
    let indices: Vec<u64> = (from..=to).collect();
    load_entries(&indices, ctx.remaining_accounts)
}
