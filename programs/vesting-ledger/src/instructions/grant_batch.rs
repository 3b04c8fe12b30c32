use crate::error::VestingError;
use crate::states::*;
use crate::utils::{
    create_pda_account, grow_pda_account, load_holder_index, next_remaining,
    store_program_account,
};
use anchor_lang::prelude::*;

/// Accounts context for `grant_batch`.
///
/// Remaining accounts, writable, two per grant in batch order:
/// `[vesting_entry(index), holder_index(holder)]`, where `index` runs from the
/// current `vestings_count` upward.
#[derive(Accounts)]
pub struct GrantBatch<'info> {
    /// Ledger admin; pays rent for new entries and index growth.
    #[account(
        mut,
        constraint = ledger_state.policy.is_admin(&admin.key()) @ VestingError::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [LEDGER_STATE_SEED.as_bytes()],
        bump = ledger_state.bump,
    )]
    pub ledger_state: Box<Account<'info, LedgerState>>,

    pub system_program: Program<'info, System>,
}

/// Appends one entry per holder, all sharing `start_date` and `end_date`.
///
/// The batch is validated as a whole first; no tokens move.
pub fn grant_batch<'info>(
    ctx: Context<'_, '_, 'info, 'info, GrantBatch<'info>>,
    holders: Vec<Pubkey>,
    start_tokens: Vec<u64>,
    total_amounts: Vec<u64>,
    start_date: i64,
    end_date: i64,
) -> Result<()> {
    let args = GrantBatchArgs {
        holders: &holders,
        start_tokens: &start_tokens,
        total_amounts: &total_amounts,
        start_date,
        end_date,
    };
    ctx.accounts.ledger_state.policy.ensure_unlocked()?;
    args.validate()?;

    let payer = ctx.accounts.admin.to_account_info();
    let system_program = ctx.accounts.system_program.to_account_info();
    let ledger_state = &mut ctx.accounts.ledger_state;
    let mut accounts = ctx.remaining_accounts.iter();

    for i in 0..args.len() {
        let entry_info = next_remaining(&mut accounts)?;
        let index_info = next_remaining(&mut accounts)?;

        let index = ledger_state.record_grant(args.total_amounts[i])?;
        let (entry_key, entry_bump) = VestingEntry::address(index);
        require_keys_eq!(entry_info.key(), entry_key, VestingError::InvalidEntryAccount);

        let index_bytes = index.to_le_bytes();
        create_pda_account(
            &payer,
            entry_info,
            &system_program,
            VestingEntry::LEN,
            &[VESTING_ENTRY_SEED.as_bytes(), &index_bytes, &[entry_bump]],
        )?;
        let entry = args.entry(i, index, entry_bump);
        store_program_account(entry_info, &entry)?;

        append_to_holder_index(&payer, index_info, &system_program, &entry.holder, index)?;

        #[cfg(feature = "enable-log")]
        msg!(
            "grant #{} to {}: {} ({} at start)",
            index,
            entry.holder,
            entry.amount,
            entry.start_tokens
        );

        emit!(Vested {
            holder: entry.holder,
            index,
            amount: entry.amount,
            end_date: entry.end_date,
        });
    }

    msg!(
        "Granted {} entries, {} in total",
        args.len(),
        ledger_state.vestings_count
    );
    Ok(())
}

/// Records `index` in the holder's index, creating or growing the account.
fn append_to_holder_index<'info>(
    payer: &AccountInfo<'info>,
    info: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    holder: &Pubkey,
    index: u64,
) -> Result<()> {
    let (expected, bump) = HolderIndex::address(holder);
    require_keys_eq!(info.key(), expected, VestingError::InvalidHolderIndex);

    let mut holder_index = match load_holder_index(info, holder)? {
        Some(existing) => existing,
        None => {
            create_pda_account(
                payer,
                info,
                system_program,
                HolderIndex::space_for(1),
                &[HOLDER_INDEX_SEED.as_bytes(), holder.as_ref(), &[bump]],
            )?;
            HolderIndex {
                bump,
                holder: *holder,
                entries: Vec::new(),
            }
        }
    };

    holder_index.entries.push(index);
    grow_pda_account(
        payer,
        info,
        system_program,
        HolderIndex::space_for(holder_index.len()),
    )?;
    store_program_account(info, &holder_index)
}
