//! Cliff plus linear release
//!
//! An entry releases `start_tokens` at `start_date` and the rest linearly up
//! to `end_date`. Nothing is released before `start_date`.

use crate::error::VestingError;
use anchor_lang::prelude::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearRelease;

impl LinearRelease {
    /// Tokens released at `at`, independent of what was already claimed.
    pub fn releasable(
        amount: u64,
        start_tokens: u64,
        start_date: i64,
        end_date: i64,
        at: i64,
    ) -> Result<u64> {
        if at < start_date {
            return Ok(0);
        }
        if end_date <= start_date || at >= end_date {
            return Ok(amount);
        }
        let linear_part = amount
            .checked_sub(start_tokens)
            .ok_or(VestingError::InvalidAllocation)?;
        // Both spans are positive here and fit in u64.
        let elapsed = (at as i128 - start_date as i128) as u128;
        let window = (end_date as i128 - start_date as i128) as u128;

        let linear = (linear_part as u128)
            .checked_mul(elapsed)
            .ok_or(VestingError::MathOverflow)?
            / window;
        let released = (start_tokens as u128)
            .checked_add(linear)
            .ok_or(VestingError::MathOverflow)?;
        u64::try_from(released).map_err(|_| error!(VestingError::MathOverflow))
    }

    /// `releasable(at) - claimed`, floored at zero.
    pub fn claimable(
        amount: u64,
        start_tokens: u64,
        start_date: i64,
        end_date: i64,
        claimed: u64,
        at: i64,
    ) -> Result<u64> {
        let released = Self::releasable(amount, start_tokens, start_date, end_date, at)?;
        Ok(released.saturating_sub(claimed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const T: i64 = 1_700_000_000;

    #[test]
    fn cliff_then_linear() {
        let at = |t| LinearRelease::claimable(1000, 100, T + 10, T + 1010, 0, t).unwrap();
        assert_eq!(at(T), 0);
        assert_eq!(at(T + 9), 0);
        assert_eq!(at(T + 10), 100);
        assert_eq!(at(T + 510), 550);
        assert_eq!(at(T + 1010), 1000);
        assert_eq!(at(T + 1_000_000), 1000);
    }

    #[test]
    fn instant_release_when_window_is_empty() {
        assert_eq!(LinearRelease::releasable(500, 0, T, T, T - 1).unwrap(), 0);
        assert_eq!(LinearRelease::releasable(500, 0, T, T, T).unwrap(), 500);
    }

    #[test]
    fn claimed_is_subtracted_and_floored() {
        assert_eq!(LinearRelease::claimable(1000, 100, T, T + 1000, 400, T + 500).unwrap(), 150);
        assert_eq!(LinearRelease::claimable(1000, 100, T, T + 1000, 700, T + 500).unwrap(), 0);
    }

    #[test]
    fn full_range_amounts_do_not_overflow() {
        let released =
            LinearRelease::releasable(u64::MAX, 0, i64::MIN, i64::MAX, 0).unwrap();
        assert!(released <= u64::MAX / 2 + 1);
    }

    quickcheck::quickcheck! {
        fn saturates_after_end(amount: u64, start_tokens: u64, span: u32, after: u32) -> bool {
            let start_tokens = start_tokens.min(amount);
            let end = T + span as i64;
            LinearRelease::releasable(amount, start_tokens, T, end, end + after as i64).unwrap()
                == amount
        }
    }

    proptest! {
        #[test]
        fn releasable_is_monotonic_and_bounded(
            amount in 0u64..=u64::MAX,
            cliff_ratio in 0u64..=100,
            span in 0i64..=10 * 365 * 86_400,
            a in -1_000i64..=20 * 365 * 86_400,
            b in -1_000i64..=20 * 365 * 86_400,
        ) {
            let start_tokens = (amount as u128 * cliff_ratio as u128 / 100) as u64;
            let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
            let r1 = LinearRelease::releasable(amount, start_tokens, T, T + span, T + earlier).unwrap();
            let r2 = LinearRelease::releasable(amount, start_tokens, T, T + span, T + later).unwrap();
            prop_assert!(r1 <= r2);
            prop_assert!(r2 <= amount);
            if earlier >= 0 {
                prop_assert!(r1 >= start_tokens);
            }
        }
    }
}
