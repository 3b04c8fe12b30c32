use crate::curve::LinearRelease;
use crate::error::VestingError;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// VestingEntry
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive an entry from its global index.
pub const VESTING_ENTRY_SEED: &str = "vesting_entry";

/// One grant. Only `claimed` ever changes after creation.
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct VestingEntry {
    /// PDA bump for this account.
    pub bump: u8,

    /// Global position in the ledger.
    pub index: u64,

    pub holder: Pubkey,

    /// Total tokens granted.
    pub amount: u64,

    /// Released at once when `start_date` is reached.
    pub start_tokens: u64,

    pub start_date: i64,

    pub end_date: i64,

    /// Tokens already paid out; never exceeds `amount`.
    pub claimed: u64,
}

impl VestingEntry {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 8: index
    /// - 32: holder
    /// - 8 * 3: amount, start_tokens, claimed
    /// - 8 * 2: start_date, end_date
    pub const LEN: usize = 8 + 1 + 8 + 32 + 8 * 3 + 8 * 2;

    pub fn address(index: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[VESTING_ENTRY_SEED.as_bytes(), &index.to_le_bytes()],
            &crate::ID,
        )
    }

    pub fn claimable(&self, at: i64) -> Result<u64> {
        LinearRelease::claimable(
            self.amount,
            self.start_tokens,
            self.start_date,
            self.end_date,
            self.claimed,
            at,
        )
    }

    /// Marks everything claimable at `at` as claimed and returns it.
    pub fn take_claimable(&mut self, at: i64) -> Result<u64> {
        let claimable = self.claimable(at)?;
        self.claimed = self
            .claimed
            .checked_add(claimable)
            .ok_or(VestingError::MathOverflow)?;
        require!(self.claimed <= self.amount, VestingError::MathOverflow);
        Ok(claimable)
    }
}

/// Shared schedule and per-holder columns of a `grant_batch` call.
#[derive(Clone, Debug)]
pub struct GrantBatchArgs<'a> {
    pub holders: &'a [Pubkey],
    pub start_tokens: &'a [u64],
    pub total_amounts: &'a [u64],
    pub start_date: i64,
    pub end_date: i64,
}

impl GrantBatchArgs<'_> {
    /// Checks the whole batch before any entry is written.
    pub fn validate(&self) -> Result<()> {
        require!(
            self.holders.len() == self.start_tokens.len()
                && self.holders.len() == self.total_amounts.len(),
            VestingError::LengthMismatch
        );
        require!(!self.holders.is_empty(), VestingError::EmptyBatch);
        require!(self.start_date <= self.end_date, VestingError::InvalidDateRange);

        for ((holder, start_tokens), amount) in self
            .holders
            .iter()
            .zip(self.start_tokens)
            .zip(self.total_amounts)
        {
            require_keys_neq!(*holder, Pubkey::default(), VestingError::NullIdentity);
            require!(*amount > 0, VestingError::ZeroAmount);
            require!(start_tokens <= amount, VestingError::InvalidAllocation);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    /// Entry for grant `i` stored at global `index`.
    pub fn entry(&self, i: usize, index: u64, bump: u8) -> VestingEntry {
        VestingEntry {
            bump,
            index,
            holder: self.holders[i],
            amount: self.total_amounts[i],
            start_tokens: self.start_tokens[i],
            start_date: self.start_date,
            end_date: self.end_date,
            claimed: 0,
        }
    }
}

/// Takes what every entry releases at `now` and returns the total.
///
/// Fails with `NothingToClaim` when the total is zero; the entries are only
/// meaningful to persist on success.
pub fn settle_claims<'a>(
    entries: impl IntoIterator<Item = &'a mut VestingEntry>,
    now: i64,
) -> Result<u64> {
    let mut total: u64 = 0;
    for entry in entries {
        let claimable = entry.take_claimable(now)?;
        total = total
            .checked_add(claimable)
            .ok_or(VestingError::MathOverflow)?;
    }
    require!(total > 0, VestingError::NothingToClaim);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::LedgerState;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const T: i64 = 1_700_000_000;

    fn grant(
        ledger: &mut LedgerState,
        entries: &mut Vec<VestingEntry>,
        args: &GrantBatchArgs,
    ) -> Result<()> {
        args.validate()?;
        for i in 0..args.len() {
            let index = ledger.record_grant(args.total_amounts[i])?;
            entries.push(args.entry(i, index, 255));
        }
        Ok(())
    }

    fn claim(
        ledger: &mut LedgerState,
        entries: &mut [VestingEntry],
        holder: Pubkey,
        now: i64,
    ) -> Result<u64> {
        let mut mine: Vec<VestingEntry> = entries
            .iter()
            .filter(|entry| entry.holder == holder)
            .cloned()
            .collect();
        require!(!mine.is_empty(), VestingError::NoVestings);
        let total = settle_claims(mine.iter_mut(), now)?;
        ledger.record_claim(total)?;
        for entry in mine {
            let index = entry.index as usize;
            entries[index] = entry;
        }
        Ok(total)
    }

    #[test]
    fn batch_validation() {
        let holder = Pubkey::new_unique();
        let ok = GrantBatchArgs {
            holders: &[holder],
            start_tokens: &[100],
            total_amounts: &[1000],
            start_date: T,
            end_date: T,
        };
        ok.validate().unwrap();

        let cases: [(GrantBatchArgs, VestingError); 6] = [
            (
                GrantBatchArgs { start_tokens: &[], ..ok.clone() },
                VestingError::LengthMismatch,
            ),
            (
                GrantBatchArgs {
                    holders: &[],
                    start_tokens: &[],
                    total_amounts: &[],
                    ..ok.clone()
                },
                VestingError::EmptyBatch,
            ),
            (
                GrantBatchArgs { end_date: T - 1, ..ok.clone() },
                VestingError::InvalidDateRange,
            ),
            (
                GrantBatchArgs { holders: &[Pubkey::default()], ..ok.clone() },
                VestingError::NullIdentity,
            ),
            (
                GrantBatchArgs { total_amounts: &[0], start_tokens: &[0], ..ok.clone() },
                VestingError::ZeroAmount,
            ),
            (
                GrantBatchArgs { start_tokens: &[1001], ..ok.clone() },
                VestingError::InvalidAllocation,
            ),
        ];
        for (args, expected) in cases {
            assert_eq!(args.validate().unwrap_err(), expected.into());
        }
    }

    #[test]
    fn claim_scenario() {
        let mut ledger = LedgerState::default();
        let mut entries = Vec::new();
        let holder = Pubkey::new_unique();
        grant(
            &mut ledger,
            &mut entries,
            &GrantBatchArgs {
                holders: &[holder],
                start_tokens: &[100],
                total_amounts: &[1000],
                start_date: T + 10,
                end_date: T + 1010,
            },
        )
        .unwrap();

        let err = claim(&mut ledger, &mut entries, holder, T + 5).unwrap_err();
        assert_eq!(err, VestingError::NothingToClaim.into());

        assert_eq!(claim(&mut ledger, &mut entries, holder, T + 10).unwrap(), 100);
        assert_eq!(claim(&mut ledger, &mut entries, holder, T + 510).unwrap(), 450);
        assert_eq!(entries[0].claimed, 550);

        // Same instant again.
        let err = claim(&mut ledger, &mut entries, holder, T + 510).unwrap_err();
        assert_eq!(err, VestingError::NothingToClaim.into());

        assert_eq!(claim(&mut ledger, &mut entries, holder, T + 5000).unwrap(), 450);
        assert_eq!(entries[0].claimed, 1000);
        assert_eq!(ledger.total_claimed, 1000);

        let err = claim(&mut ledger, &mut entries, Pubkey::new_unique(), T + 5000).unwrap_err();
        assert_eq!(err, VestingError::NoVestings.into());
    }

    #[test]
    fn claim_spans_every_entry_of_the_holder() {
        let mut ledger = LedgerState::default();
        let mut entries = Vec::new();
        let (alice, bob) = (Pubkey::new_unique(), Pubkey::new_unique());
        grant(
            &mut ledger,
            &mut entries,
            &GrantBatchArgs {
                holders: &[alice, bob, alice],
                start_tokens: &[0, 0, 50],
                total_amounts: &[100, 200, 150],
                start_date: T,
                end_date: T + 100,
            },
        )
        .unwrap();

        // 50 + (50 + 50) for alice at the midpoint.
        assert_eq!(claim(&mut ledger, &mut entries, alice, T + 50).unwrap(), 150);
        assert_eq!(entries[1].claimed, 0);
        assert_eq!(ledger.total_vested, 450);
    }

    #[test]
    fn random_claims_keep_totals_consistent() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let holders: Vec<Pubkey> = (0..6).map(|_| Pubkey::new_unique()).collect();
        let mut ledger = LedgerState::default();
        let mut entries: Vec<VestingEntry> = Vec::new();
        let mut now = T;

        for _ in 0..1_000 {
            now += rng.random_range(0..500);
            if rng.random_range(0..4) == 0 {
                let holder = holders[rng.random_range(0..holders.len())];
                let amount = rng.random_range(1..1_000_000u64);
                let start_tokens = rng.random_range(0..=amount);
                let start_date = now + rng.random_range(-1_000..10_000);
                let end_date = start_date + rng.random_range(0..50_000);
                grant(
                    &mut ledger,
                    &mut entries,
                    &GrantBatchArgs {
                        holders: &[holder],
                        start_tokens: &[start_tokens],
                        total_amounts: &[amount],
                        start_date,
                        end_date,
                    },
                )
                .unwrap();
            } else {
                let holder = holders[rng.random_range(0..holders.len())];
                let before: Vec<u64> = entries.iter().map(|entry| entry.claimed).collect();
                let _ = claim(&mut ledger, &mut entries, holder, now);
                for (entry, previous) in entries.iter().zip(before) {
                    assert!(entry.claimed >= previous);
                    assert!(entry.claimed <= entry.amount);
                }
            }

            let vested: u64 = entries.iter().map(|entry| entry.amount).sum();
            let claimed: u64 = entries.iter().map(|entry| entry.claimed).sum();
            assert_eq!(ledger.total_vested, vested);
            assert_eq!(ledger.total_claimed, claimed);
            assert_eq!(ledger.vestings_count, entries.len() as u64);
        }
    }

    #[test]
    fn entry_address_depends_on_index() {
        assert_ne!(VestingEntry::address(0).0, VestingEntry::address(1).0);
    }
}
