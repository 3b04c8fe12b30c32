use crate::error::VestingError;
use crate::states::*;
use crate::utils::{load_entries, load_holder_index, store_program_account, transfer_from_vault};
use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

/// Claim what the signer's entries release, into the signer's ATA.
///
/// Covers the entries at holder-index positions `from_position..from_position
/// + count`, so a holder with many grants claims over several transactions.
/// Remaining accounts, writable: those entries in holder-index order.
#[derive(Accounts)]
pub struct Claim<'info> {
    #[account(mut)]
    pub holder: Signer<'info>,

    #[account(
        mut,
        seeds = [LEDGER_STATE_SEED.as_bytes()],
        bump = ledger_state.bump,
    )]
    pub ledger_state: Box<Account<'info, LedgerState>>,

    /// CHECK: PDA derivation enforced by seeds; may not exist for a holder
    /// without grants, so it is loaded in the handler.
    #[account(
        seeds = [HOLDER_INDEX_SEED.as_bytes(), holder.key().as_ref()],
        bump,
    )]
    pub holder_index: UncheckedAccount<'info>,

    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump = ledger_state.authority_bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(mut, address = ledger_state.vault)]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = ledger_state.mint)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    /// Holder's ATA; created on demand.
    #[account(
        init_if_needed,
        payer = holder,
        associated_token::mint = mint,
        associated_token::authority = holder,
        associated_token::token_program = token_program,
    )]
    pub holder_token: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub associated_token_program: Program<'info, AssociatedToken>,

    pub system_program: Program<'info, System>,
}

/// Same as [`Claim`] but pays into a token account owned by `recipient`.
#[derive(Accounts)]
#[instruction(recipient: Pubkey)]
pub struct ClaimTo<'info> {
    pub holder: Signer<'info>,

    #[account(
        mut,
        seeds = [LEDGER_STATE_SEED.as_bytes()],
        bump = ledger_state.bump,
    )]
    pub ledger_state: Box<Account<'info, LedgerState>>,

    /// CHECK: PDA derivation enforced by seeds; loaded in the handler.
    #[account(
        seeds = [HOLDER_INDEX_SEED.as_bytes(), holder.key().as_ref()],
        bump,
    )]
    pub holder_index: UncheckedAccount<'info>,

    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump = ledger_state.authority_bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(mut, address = ledger_state.vault)]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = ledger_state.mint)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = mint,
        token::authority = recipient,
    )]
    pub recipient_token: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn claim(ctx: Context<Claim>, from_position: u64, count: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let holder = ctx.accounts.holder.key();
    let amount = settle_holder_claims(
        &mut ctx.accounts.ledger_state,
        &ctx.accounts.holder_index,
        &holder,
        (from_position, count),
        ctx.remaining_accounts,
        now,
    )?;

    transfer_from_vault(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        ctx.accounts.holder_token.to_account_info(),
        ctx.accounts.mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.mint.decimals,
        &[&[
            crate::AUTH_SEED.as_bytes(),
            &[ctx.accounts.ledger_state.authority_bump],
        ]],
    )?;

    emit!(Claimed {
        holder,
        amount,
        destination: ctx.accounts.holder_token.key(),
        staked: false,
    });
    Ok(())
}

pub fn claim_to(
    ctx: Context<ClaimTo>,
    recipient: Pubkey,
    from_position: u64,
    count: u64,
) -> Result<()> {
    require_keys_neq!(recipient, Pubkey::default(), VestingError::NullIdentity);
    let now = Clock::get()?.unix_timestamp;
    let holder = ctx.accounts.holder.key();
    let amount = settle_holder_claims(
        &mut ctx.accounts.ledger_state,
        &ctx.accounts.holder_index,
        &holder,
        (from_position, count),
        ctx.remaining_accounts,
        now,
    )?;

    transfer_from_vault(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        ctx.accounts.recipient_token.to_account_info(),
        ctx.accounts.mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.mint.decimals,
        &[&[
            crate::AUTH_SEED.as_bytes(),
            &[ctx.accounts.ledger_state.authority_bump],
        ]],
    )?;

    emit!(Claimed {
        holder,
        amount,
        destination: ctx.accounts.recipient_token.key(),
        staked: false,
    });
    Ok(())
}

/// Books a claim over the `(from_position, count)` window of `holder`'s
/// entries at `now` and returns the total to pay out. Entries and totals are
/// written before any token moves.
pub(crate) fn settle_holder_claims(
    ledger_state: &mut LedgerState,
    holder_index: &AccountInfo,
    holder: &Pubkey,
    (from_position, count): (u64, u64),
    entry_infos: &[AccountInfo],
    now: i64,
) -> Result<u64> {
    ledger_state.policy.ensure_unlocked()?;
    let holder_index = load_holder_index(holder_index, holder)?
        .filter(|holder_index| !holder_index.is_empty())
        .ok_or(error!(VestingError::NoVestings))?;

    let mut entries = load_entries(holder_index.window(from_position, count)?, entry_infos)?;
    let total = settle_claims(entries.iter_mut(), now)?;
    ledger_state.record_claim(total)?;

    for (entry, info) in entries.iter().zip(entry_infos) {
        require!(info.is_writable, VestingError::InvalidEntryAccount);
        store_program_account(info, entry)?;
    }

    #[cfg(feature = "enable-log")]
    msg!(
        "claim {} over {} entries by {}, ledger claimed {}",
        total,
        entries.len(),
        holder,
        ledger_state.total_claimed
    );
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::account::TestAccount;

    const T: i64 = 1_700_000_000;

    /// Grants `amounts` to `holder`, releasing linearly over `T..T + 100`.
    fn granted(
        ledger: &mut LedgerState,
        holder: Pubkey,
        amounts: &[u64],
    ) -> (TestAccount, Vec<TestAccount>) {
        let mut indices = Vec::new();
        let mut entries = Vec::new();
        for amount in amounts {
            let index = ledger.record_grant(*amount).unwrap();
            indices.push(index);
            entries.push(TestAccount::holding(
                &VestingEntry {
                    bump: 255,
                    index,
                    holder,
                    amount: *amount,
                    start_tokens: 0,
                    start_date: T,
                    end_date: T + 100,
                    claimed: 0,
                },
                VestingEntry::LEN,
            ));
        }
        let holder_index = TestAccount::holding(
            &HolderIndex {
                bump: 255,
                holder,
                entries: indices,
            },
            HolderIndex::space_for(amounts.len()),
        );
        (holder_index, entries)
    }

    /// Runs a claim against a staged copy of the ledger and keeps it only on
    /// success, like a transaction would.
    fn claim_window(
        ledger: &mut LedgerState,
        holder: &Pubkey,
        holder_index: &mut TestAccount,
        entries: &mut [TestAccount],
        window: (u64, u64),
        now: i64,
    ) -> Result<u64> {
        let index_info = holder_index.info(false);
        let infos: Vec<AccountInfo> = entries.iter_mut().map(|entry| entry.info(true)).collect();
        let mut staged = ledger.clone();
        let total = settle_holder_claims(&mut staged, &index_info, holder, window, &infos, now)?;
        *ledger = staged;
        Ok(total)
    }

    #[test]
    fn claims_a_large_holding_in_pages() {
        let mut ledger = LedgerState::default();
        let holder = Pubkey::new_unique();
        let amounts: Vec<u64> = (0..32).map(|i| 100 + 2 * i).collect();
        let (mut holder_index, mut entries) = granted(&mut ledger, holder, &amounts);

        let mut paid = 0;
        for from in (0..32).step_by(10) {
            let end = (from + 10).min(32);
            paid += claim_window(
                &mut ledger,
                &holder,
                &mut holder_index,
                &mut entries[from..end],
                (from as u64, 10),
                T + 50,
            )
            .unwrap();
        }
        let vested: u64 = amounts.iter().sum();
        assert_eq!(paid, vested / 2);

        // Rest of the schedule, in one odd-sized page and one remainder.
        paid += claim_window(&mut ledger, &holder, &mut holder_index, &mut entries[..17], (0, 17), T + 100)
            .unwrap();
        paid += claim_window(&mut ledger, &holder, &mut holder_index, &mut entries[17..], (17, 15), T + 100)
            .unwrap();
        assert_eq!(paid, vested);

        let claimed: u64 = entries
            .iter()
            .map(|entry| entry.read::<VestingEntry>().claimed)
            .sum();
        assert_eq!(ledger.total_claimed, claimed);
        assert_eq!(ledger.total_claimed, ledger.total_vested);

        let err = claim_window(&mut ledger, &holder, &mut holder_index, &mut entries[..5], (0, 5), T + 200)
            .unwrap_err();
        assert_eq!(err, VestingError::NothingToClaim.into());
        let err = claim_window(&mut ledger, &holder, &mut holder_index, &mut entries[..1], (32, 1), T + 200)
            .unwrap_err();
        assert_eq!(err, VestingError::OutOfRange.into());
    }

    #[test]
    fn holder_without_grants_has_no_vestings() {
        let mut ledger = LedgerState::default();
        let holder = Pubkey::new_unique();
        let err = claim_window(&mut ledger, &holder, &mut TestAccount::missing(), &mut [], (0, 1), T)
            .unwrap_err();
        assert_eq!(err, VestingError::NoVestings.into());

        let mut empty = TestAccount::holding(
            &HolderIndex {
                holder,
                ..Default::default()
            },
            HolderIndex::space_for(0),
        );
        let err = claim_window(&mut ledger, &holder, &mut empty, &mut [], (0, 1), T).unwrap_err();
        assert_eq!(err, VestingError::NoVestings.into());
    }

    #[test]
    fn rejected_claims_leave_everything_untouched() {
        let mut ledger = LedgerState::default();
        let holder = Pubkey::new_unique();
        let (mut holder_index, mut entries) = granted(&mut ledger, holder, &[100, 200, 300]);
        let untouched = ledger.clone();

        // Entries out of holder-index order.
        entries.swap(0, 1);
        let err = claim_window(&mut ledger, &holder, &mut holder_index, &mut entries, (0, 3), T + 100)
            .unwrap_err();
        assert_eq!(err, VestingError::InvalidEntryAccount.into());
        entries.swap(0, 1);

        let err = claim_window(&mut ledger, &holder, &mut holder_index, &mut entries[..2], (0, 3), T + 100)
            .unwrap_err();
        assert_eq!(err, VestingError::MissingRemainingAccount.into());

        let err = claim_window(
            &mut ledger,
            &Pubkey::new_unique(),
            &mut holder_index,
            &mut entries,
            (0, 3),
            T + 100,
        )
        .unwrap_err();
        assert_eq!(err, VestingError::InvalidHolderIndex.into());

        ledger.policy.locked = true;
        let err = claim_window(&mut ledger, &holder, &mut holder_index, &mut entries, (0, 3), T + 100)
            .unwrap_err();
        assert_eq!(err, VestingError::LedgerLocked.into());
        ledger.policy.locked = false;

        assert_eq!(ledger.total_claimed, untouched.total_claimed);
        assert!(entries
            .iter()
            .all(|entry| entry.read::<VestingEntry>().claimed == 0));
    }

    #[test]
    fn read_only_entry_is_refused() {
        let mut ledger = LedgerState::default();
        let holder = Pubkey::new_unique();
        let (mut holder_index, mut entries) = granted(&mut ledger, holder, &[100]);

        let index_info = holder_index.info(false);
        let infos = vec![entries[0].info(false)];
        let err = settle_holder_claims(&mut ledger.clone(), &index_info, &holder, (0, 1), &infos, T + 100)
            .unwrap_err();
        assert_eq!(err, VestingError::InvalidEntryAccount.into());
    }
}
