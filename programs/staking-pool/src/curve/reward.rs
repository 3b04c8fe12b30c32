//! Reward-per-token accumulator math
//!
//! Rates and the accumulator are fixed-point values scaled by [`PRECISION`].
//! Intermediate products are widened to 256 bits so that long idle intervals
//! or large principals cannot overflow before the final division.

use crate::error::StakingError;
use crate::PRECISION;
use anchor_lang::prelude::*;

#[allow(clippy::assign_op_pattern, clippy::manual_div_ceil, clippy::ptr_offset_with_cast)]
mod wide {
    uint::construct_uint! {
        pub struct U256(4);
    }
}
pub use wide::U256;

fn to_u128(value: U256) -> Result<u128> {
    if value > U256::from(u128::MAX) {
        return err!(StakingError::MathOverflow);
    }
    Ok(value.as_u128())
}

fn to_u64(value: U256) -> Result<u64> {
    if value > U256::from(u64::MAX) {
        return err!(StakingError::MathOverflow);
    }
    Ok(value.as_u64())
}

/// Stateless helpers behind [`crate::states::RewardSchedule`] and
/// [`crate::states::StakeAccount`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RewardCalculator;

impl RewardCalculator {
    /// Emission stops at `period_finish`.
    pub fn last_time_reward_applicable(now: i64, period_finish: i64) -> i64 {
        now.min(period_finish)
    }

    /// Advances the accumulator by `elapsed * rate / total_principal`.
    ///
    /// With nothing staked the accumulator is returned unchanged.
    pub fn reward_per_token(
        stored: u128,
        reward_rate: u128,
        elapsed: u64,
        total_principal: u64,
    ) -> Result<u128> {
        if total_principal == 0 || elapsed == 0 {
            return Ok(stored);
        }
        let delta = U256::from(elapsed)
            .checked_mul(U256::from(reward_rate))
            .ok_or(StakingError::MathOverflow)?
            .checked_div(U256::from(total_principal))
            .ok_or(StakingError::MathOverflow)?;
        stored
            .checked_add(to_u128(delta)?)
            .ok_or(error!(StakingError::MathOverflow))
    }

    /// `rewards + principal * (reward_per_token - paid) / PRECISION`
    pub fn earned(
        principal: u64,
        reward_per_token: u128,
        reward_per_token_paid: u128,
        rewards: u64,
    ) -> Result<u64> {
        let pending_index = reward_per_token
            .checked_sub(reward_per_token_paid)
            .ok_or(StakingError::MathOverflow)?;
        let fresh = U256::from(principal)
            .checked_mul(U256::from(pending_index))
            .ok_or(StakingError::MathOverflow)?
            / U256::from(PRECISION);
        to_u64(fresh)?
            .checked_add(rewards)
            .ok_or(error!(StakingError::MathOverflow))
    }

    /// Unspent emission of a schedule that is still running at `now`, scaled.
    pub fn leftover(reward_rate: u128, now: i64, period_finish: i64) -> Result<u128> {
        if now >= period_finish {
            return Ok(0);
        }
        let remaining = u128::try_from(period_finish - now).map_err(|_| StakingError::MathOverflow)?;
        remaining
            .checked_mul(reward_rate)
            .ok_or(error!(StakingError::MathOverflow))
    }

    /// `(amount * PRECISION + leftover) / duration`
    pub fn reward_rate(amount: u64, leftover: u128, duration: i64) -> Result<u128> {
        require!(duration > 0, StakingError::ZeroDuration);
        let total = U256::from(amount)
            .checked_mul(U256::from(PRECISION))
            .ok_or(StakingError::MathOverflow)?
            .checked_add(U256::from(leftover))
            .ok_or(StakingError::MathOverflow)?;
        to_u128(total / U256::from(duration as u64))
    }

    /// Whole tokens emitted by `reward_rate` over `duration` seconds.
    pub fn emission(reward_rate: u128, duration: i64) -> Result<u64> {
        let duration = u64::try_from(duration).map_err(|_| StakingError::MathOverflow)?;
        let scaled = U256::from(reward_rate)
            .checked_mul(U256::from(duration))
            .ok_or(StakingError::MathOverflow)?;
        to_u64(scaled / U256::from(PRECISION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rate_keeps_sub_token_precision() {
        // 6048 tokens over 60480 seconds is 0.1 token per second.
        let rate = RewardCalculator::reward_rate(6048, 0, 60_480).unwrap();
        assert_eq!(rate, PRECISION / 10);
        assert_eq!(RewardCalculator::emission(rate, 60_480).unwrap(), 6048);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let err = RewardCalculator::reward_rate(100, 0, 0).unwrap_err();
        assert_eq!(err, StakingError::ZeroDuration.into());
    }

    #[test]
    fn idle_pool_does_not_advance() {
        let stored = 42 * PRECISION;
        assert_eq!(
            RewardCalculator::reward_per_token(stored, PRECISION, 1_000, 0).unwrap(),
            stored
        );
    }

    #[test]
    fn leftover_is_zero_after_finish() {
        assert_eq!(RewardCalculator::leftover(PRECISION, 100, 100).unwrap(), 0);
        assert_eq!(RewardCalculator::leftover(PRECISION, 90, 100).unwrap(), 10 * PRECISION);
    }

    #[test]
    fn earned_adds_to_carried_rewards() {
        let earned = RewardCalculator::earned(100, 5 * PRECISION, 2 * PRECISION, 7).unwrap();
        assert_eq!(earned, 307);
    }

    #[test]
    fn earned_rejects_index_regression() {
        let err = RewardCalculator::earned(1, PRECISION, 2 * PRECISION, 0).unwrap_err();
        assert_eq!(err, StakingError::MathOverflow.into());
    }

    proptest! {
        #[test]
        fn accumulator_is_monotonic(
            stored in 0u128..=u64::MAX as u128,
            rate in 0u128..=(u64::MAX as u128) * PRECISION,
            elapsed in 0u64..=10_000_000,
            total in 0u64..=u64::MAX,
        ) {
            let next = RewardCalculator::reward_per_token(stored, rate, elapsed, total).unwrap();
            prop_assert!(next >= stored);
        }

        #[test]
        fn single_staker_never_earns_more_than_emitted(
            amount in 1u64..=1_000_000_000_000,
            duration in 1i64..=10_000_000,
            principal in 1u64..=1_000_000_000_000_000,
        ) {
            let rate = RewardCalculator::reward_rate(amount, 0, duration).unwrap();
            let rpt = RewardCalculator::reward_per_token(0, rate, duration as u64, principal).unwrap();
            let earned = RewardCalculator::earned(principal, rpt, 0, 0).unwrap();
            prop_assert!(earned <= amount);
        }
    }
}
