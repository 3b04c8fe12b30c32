use crate::error::VestingError;
use crate::MAX_VIEW_ENTRIES;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// LedgerState Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive the ledger state account.
pub const LEDGER_STATE_SEED: &str = "ledger_state";

/// Who administers the ledger and whether grants and claims are frozen.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    pub admin: Pubkey,
    pub locked: bool,
}

impl AccessPolicy {
    pub const LEN: usize = 32 + 1;

    pub fn is_admin(&self, key: &Pubkey) -> bool {
        self.admin == *key
    }

    pub fn ensure_unlocked(&self) -> Result<()> {
        require!(!self.locked, VestingError::LedgerLocked);
        Ok(())
    }
}

/// Ledger-wide configuration and running totals.
///
/// Entries themselves live in one `VestingEntry` PDA per global index; this
/// account only tracks how many exist and what they add up to.
#[account]
#[derive(Default, Debug)]
pub struct LedgerState {
    /// PDA bump for this account.
    pub bump: u8,

    /// Bump of the `AUTH_SEED` PDA that owns the vault.
    pub authority_bump: u8,

    pub policy: AccessPolicy,

    /// Vested token mint.
    pub mint: Pubkey,

    /// Token account the grants are paid from.
    pub vault: Pubkey,

    /// Bound staking pool config; default key while unbound.
    pub staking_pool: Pubkey,

    /// Sum of every entry's `amount`.
    pub total_vested: u64,

    /// Sum of every entry's `claimed`.
    pub total_claimed: u64,

    /// Number of entries ever granted; also the next entry index.
    pub vestings_count: u64,
}

impl LedgerState {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1 + 1: bumps
    /// - AccessPolicy::LEN
    /// - 32 * 3: mint, vault, staking_pool
    /// - 8 * 3: totals and count
    pub const LEN: usize = 8 + 1 + 1 + AccessPolicy::LEN + 32 * 3 + 8 * 3;

    pub fn is_staking_bound(&self) -> bool {
        self.staking_pool != Pubkey::default()
    }

    /// Reserves the next entry index for a grant of `amount`.
    pub fn record_grant(&mut self, amount: u64) -> Result<u64> {
        let index = self.vestings_count;
        self.total_vested = self
            .total_vested
            .checked_add(amount)
            .ok_or(VestingError::MathOverflow)?;
        self.vestings_count = index.checked_add(1).ok_or(VestingError::MathOverflow)?;
        Ok(index)
    }

    pub fn record_claim(&mut self, amount: u64) -> Result<()> {
        let total_claimed = self
            .total_claimed
            .checked_add(amount)
            .ok_or(VestingError::MathOverflow)?;
        require!(total_claimed <= self.total_vested, VestingError::MathOverflow);
        self.total_claimed = total_claimed;
        Ok(())
    }

    pub fn check_index(&self, index: u64) -> Result<()> {
        require!(index < self.vestings_count, VestingError::OutOfRange);
        Ok(())
    }

    /// Validates the inclusive range `[from, to]` and returns its length.
    pub fn check_range(&self, from: u64, to: u64) -> Result<u64> {
        require!(from <= to, VestingError::InvalidRange);
        self.check_index(to)?;
        Ok(to - from + 1)
    }
}

/// Rejects sequences too long to fit in a single return-data payload.
pub fn check_view_len(len: usize) -> Result<()> {
    require!(len <= MAX_VIEW_ENTRIES, VestingError::ViewTooLarge);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(count: u64) -> LedgerState {
        let mut ledger = LedgerState::default();
        for _ in 0..count {
            ledger.record_grant(10).unwrap();
        }
        ledger
    }

    #[test]
    fn grants_take_consecutive_indices() {
        let mut ledger = LedgerState::default();
        assert_eq!(ledger.record_grant(100).unwrap(), 0);
        assert_eq!(ledger.record_grant(250).unwrap(), 1);
        assert_eq!(ledger.vestings_count, 2);
        assert_eq!(ledger.total_vested, 350);
    }

    #[test]
    fn claims_cannot_exceed_vested_total() {
        let mut ledger = ledger_with(1);
        ledger.record_claim(10).unwrap();
        let err = ledger.record_claim(1).unwrap_err();
        assert_eq!(err, VestingError::MathOverflow.into());
        assert_eq!(ledger.total_claimed, 10);
    }

    #[test]
    fn range_is_inclusive() {
        let ledger = ledger_with(5);
        assert_eq!(ledger.check_range(0, 4).unwrap(), 5);
        assert_eq!(ledger.check_range(2, 2).unwrap(), 1);

        let err = ledger.check_range(3, 2).unwrap_err();
        assert_eq!(err, VestingError::InvalidRange.into());
        let err = ledger.check_range(0, 5).unwrap_err();
        assert_eq!(err, VestingError::OutOfRange.into());
    }

    #[test]
    fn empty_ledger_has_no_valid_index() {
        let ledger = LedgerState::default();
        assert_eq!(ledger.check_index(0).unwrap_err(), VestingError::OutOfRange.into());
        assert_eq!(ledger.check_range(0, 0).unwrap_err(), VestingError::OutOfRange.into());
    }

    #[test]
    fn lock_gates_mutations() {
        let admin = Pubkey::new_unique();
        let mut policy = AccessPolicy {
            admin,
            locked: false,
        };
        policy.ensure_unlocked().unwrap();
        policy.locked = true;
        assert_eq!(policy.ensure_unlocked().unwrap_err(), VestingError::LedgerLocked.into());
        assert!(policy.is_admin(&admin));
        assert!(!policy.is_admin(&Pubkey::new_unique()));
    }

    #[test]
    fn view_cap() {
        check_view_len(MAX_VIEW_ENTRIES).unwrap();
        assert_eq!(
            check_view_len(MAX_VIEW_ENTRIES + 1).unwrap_err(),
            VestingError::ViewTooLarge.into()
        );
    }
}
