use crate::curve::RewardCalculator;
use crate::error::StakingError;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// StakeAccount
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive each participant's stake account.
pub const STAKE_ACCOUNT_SEED: &str = "stake_account";

/// Per-participant staking record, derived from `STAKE_ACCOUNT_SEED + owner`.
///
/// Created lazily on the first deposit and never closed: once the principal
/// is withdrawn the record stays behind with `principal == 0` so that any
/// reward still owed remains claimable.
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct StakeAccount {
    /// PDA bump for this account.
    pub bump: u8,

    /// Participant this record belongs to.
    pub owner: Pubkey,

    /// Tokens currently staked.
    pub principal: u64,

    /// Snapshot of `reward_per_token_stored` at the last settlement.
    pub reward_per_token_paid: u128,

    /// Rewards accrued but not yet paid out.
    pub rewards: u64,

    /// Time of the pending unstake request, if any.
    pub unstake_requested_at: Option<i64>,
}

impl StakeAccount {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32: owner
    /// - 8 + 8: principal, rewards
    /// - 16: reward_per_token_paid
    /// - 1 + 8: optional request timestamp
    pub const LEN: usize = 8 + 1 + 32 + 8 * 2 + 16 + 1 + 8;

    /// Binds a freshly created record to its owner; rejects a record that
    /// belongs to someone else.
    pub fn ensure_initialized(&mut self, owner: Pubkey, bump: u8) -> Result<()> {
        if self.owner == Pubkey::default() {
            self.owner = owner;
            self.bump = bump;
        }
        require_keys_eq!(self.owner, owner, StakingError::StakeAccountMismatch);
        Ok(())
    }

    pub fn is_unstake_pending(&self) -> bool {
        self.unstake_requested_at.is_some()
    }

    /// Rewards owed if the global accumulator stood at `reward_per_token`.
    pub fn earned(&self, reward_per_token: u128) -> Result<u64> {
        RewardCalculator::earned(
            self.principal,
            reward_per_token,
            self.reward_per_token_paid,
            self.rewards,
        )
    }

    /// Moves accrued reward into `rewards` and snapshots the accumulator.
    pub fn settle(&mut self, reward_per_token: u128) -> Result<()> {
        self.rewards = self.earned(reward_per_token)?;
        self.reward_per_token_paid = reward_per_token;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PRECISION;

    #[test]
    fn first_binding_sets_owner() {
        let owner = Pubkey::new_unique();
        let mut account = StakeAccount::default();
        account.ensure_initialized(owner, 254).unwrap();
        assert_eq!(account.owner, owner);
        assert_eq!(account.bump, 254);

        let err = account
            .ensure_initialized(Pubkey::new_unique(), 254)
            .unwrap_err();
        assert_eq!(err, StakingError::StakeAccountMismatch.into());
    }

    #[test]
    fn settle_snapshots_index() {
        let mut account = StakeAccount {
            principal: 10,
            reward_per_token_paid: PRECISION,
            rewards: 3,
            ..Default::default()
        };
        account.settle(4 * PRECISION).unwrap();
        assert_eq!(account.rewards, 33);
        assert_eq!(account.reward_per_token_paid, 4 * PRECISION);

        // Settling twice at the same index is a no-op.
        account.settle(4 * PRECISION).unwrap();
        assert_eq!(account.rewards, 33);
    }

    quickcheck::quickcheck! {
        fn settling_in_steps_never_beats_one_step(principal: u32, a: u32, b: u32) -> bool {
            let first = a as u128 * 1_000;
            let second = first + b as u128 * 1_000;
            let mut stepped = StakeAccount {
                principal: principal as u64,
                ..Default::default()
            };
            stepped.settle(first).unwrap();
            stepped.settle(second).unwrap();

            let mut direct = StakeAccount {
                principal: principal as u64,
                ..Default::default()
            };
            direct.settle(second).unwrap();
            stepped.rewards <= direct.rewards && direct.rewards - stepped.rewards <= 1
        }
    }
}
