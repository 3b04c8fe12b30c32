use crate::curve::RewardCalculator;
use crate::error::StakingError;
use crate::states::StakeAccount;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// PoolConfig Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive the pool configuration account.
pub const POOL_CONFIG_SEED: &str = "pool_config";

/// Global emission schedule.
///
/// `reward_rate` and `reward_per_token_stored` are scaled by
/// [`crate::PRECISION`]; timestamps are unix seconds from the `Clock` sysvar.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardSchedule {
    /// Tokens emitted per second, scaled.
    pub reward_rate: u128,

    /// Emission stops at this time.
    pub period_finish: i64,

    /// Time up to which `reward_per_token_stored` has been closed.
    pub last_update_time: i64,

    /// Cumulative reward per staked token, scaled. Never decreases.
    pub reward_per_token_stored: u128,
}

impl RewardSchedule {
    pub const LEN: usize = 16 + 8 + 8 + 16;

    /// Accumulator value at `now` without mutating the schedule.
    pub fn reward_per_token(&self, now: i64, total_principal: u64) -> Result<u128> {
        let applicable = RewardCalculator::last_time_reward_applicable(now, self.period_finish);
        let elapsed = u64::try_from(applicable.saturating_sub(self.last_update_time)).unwrap_or(0);
        RewardCalculator::reward_per_token(
            self.reward_per_token_stored,
            self.reward_rate,
            elapsed,
            total_principal,
        )
    }

    /// Closes the interval `[last_update_time, min(now, period_finish)]`.
    ///
    /// Emission that falls into an interval with nothing staked is not
    /// credited to anyone and stays in the reward vault.
    pub fn settle(&mut self, now: i64, total_principal: u64) -> Result<u128> {
        self.reward_per_token_stored = self.reward_per_token(now, total_principal)?;
        let applicable = RewardCalculator::last_time_reward_applicable(now, self.period_finish);
        self.last_update_time = self.last_update_time.max(applicable);
        Ok(self.reward_per_token_stored)
    }

    /// Starts a new period of `duration` seconds at `now`, folding in what a
    /// still-running period has not emitted yet. Expects a settled schedule.
    pub fn notify(&mut self, amount: u64, duration: i64, now: i64) -> Result<()> {
        require!(duration > 0, StakingError::ZeroDuration);
        let leftover = RewardCalculator::leftover(self.reward_rate, now, self.period_finish)?;
        let reward_rate = RewardCalculator::reward_rate(amount, leftover, duration)?;
        require!(reward_rate > 0, StakingError::RewardRateZero);

        self.reward_rate = reward_rate;
        self.last_update_time = now;
        self.period_finish = now
            .checked_add(duration)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }

    pub fn is_active(&self, now: i64) -> bool {
        now < self.period_finish
    }
}

/// Pool-wide configuration, vault addresses and reward bookkeeping.
///
/// Created once by `initialise_pool`. Principal and rewards are held in two
/// separate vaults so a reward payout can never dip into staked principal.
#[account]
#[derive(Default, Debug)]
pub struct PoolConfig {
    /// PDA bump for this account.
    pub bump: u8,

    /// Bump of the `AUTH_SEED` PDA that owns both vaults.
    pub authority_bump: u8,

    /// Pool admin (reward top-ups, config updates, recovery).
    pub admin: Pubkey,

    /// Staked token mint.
    pub mint: Pubkey,

    /// Vault holding staked principal.
    pub stake_vault: Pubkey,

    /// Vault holding rewards to be paid out.
    pub reward_vault: Pubkey,

    /// Seconds between `request_unstake` and the earliest `unstake`.
    pub unstake_cooldown: i64,

    /// Global emission schedule.
    pub schedule: RewardSchedule,

    /// Sum of every `StakeAccount::principal`.
    pub total_principal: u64,

    /// Rewards deposited through `notify_reward_amount`.
    pub total_reward_injected: u64,

    /// Rewards paid out through `claim_reward`.
    pub total_reward_paid: u64,
}

impl PoolConfig {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1 + 1: bumps
    /// - 32 * 4: four Pubkeys
    /// - 8: unstake_cooldown
    /// - RewardSchedule::LEN
    /// - 8 * 3: three u64 totals
    pub const LEN: usize = 8 + 1 + 1 + 32 * 4 + 8 + RewardSchedule::LEN + 8 * 3;

    /// Settles the global accumulator and, when given, one participant.
    pub fn settle_rewards(&mut self, account: Option<&mut StakeAccount>, now: i64) -> Result<()> {
        let reward_per_token = self.schedule.settle(now, self.total_principal)?;
        if let Some(account) = account {
            account.settle(reward_per_token)?;
        }
        Ok(())
    }

    /// Books a deposit of `amount` into `account`. The caller moves the tokens.
    pub fn add_stake(&mut self, account: &mut StakeAccount, amount: u64, now: i64) -> Result<()> {
        require!(amount > 0, StakingError::ZeroAmount);
        self.settle_rewards(Some(&mut *account), now)?;
        require!(!account.is_unstake_pending(), StakingError::UnableToStake);

        account.principal = account
            .principal
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;
        self.total_principal = self
            .total_principal
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }

    /// Starts the cooldown for the whole principal of `account`.
    pub fn request_unstake(&mut self, account: &mut StakeAccount, now: i64) -> Result<()> {
        self.settle_rewards(Some(&mut *account), now)?;
        require!(account.principal > 0, StakingError::NothingStaked);
        require!(
            !account.is_unstake_pending(),
            StakingError::UnstakeAlreadyRequested
        );
        account.unstake_requested_at = Some(now);
        Ok(())
    }

    /// Earliest time `account` may withdraw, if a request is pending.
    pub fn unlock_time(&self, account: &StakeAccount) -> Result<Option<i64>> {
        account
            .unstake_requested_at
            .map(|requested_at| {
                requested_at
                    .checked_add(self.unstake_cooldown)
                    .ok_or(error!(StakingError::MathOverflow))
            })
            .transpose()
    }

    /// Releases the principal of `account` once the cooldown has elapsed and
    /// returns the amount to pay out.
    pub fn unstake(&mut self, account: &mut StakeAccount, now: i64) -> Result<u64> {
        let unlock_at = self
            .unlock_time(account)?
            .ok_or(StakingError::NoUnstakeRequest)?;
        require!(now >= unlock_at, StakingError::CooldownNotElapsed);

        self.settle_rewards(Some(&mut *account), now)?;
        let principal = account.principal;
        account.principal = 0;
        account.unstake_requested_at = None;
        self.total_principal = self
            .total_principal
            .checked_sub(principal)
            .ok_or(StakingError::MathOverflow)?;
        Ok(principal)
    }

    /// Takes everything `account` has accrued and returns the amount to pay.
    pub fn claim_reward(&mut self, account: &mut StakeAccount, now: i64) -> Result<u64> {
        self.settle_rewards(Some(&mut *account), now)?;
        let reward = account.rewards;
        account.rewards = 0;
        self.total_reward_paid = self
            .total_reward_paid
            .checked_add(reward)
            .ok_or(StakingError::MathOverflow)?;
        Ok(reward)
    }

    /// Starts a new emission period funded with `amount`.
    pub fn notify_reward_amount(&mut self, amount: u64, duration: i64, now: i64) -> Result<()> {
        self.settle_rewards(None, now)?;
        self.schedule.notify(amount, duration, now)?;
        self.total_reward_injected = self
            .total_reward_injected
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }

    /// Tokens the current period will still emit from `now` on.
    pub fn remaining_emission(&self, now: i64) -> Result<u64> {
        let from = now.max(self.schedule.last_update_time);
        if from >= self.schedule.period_finish {
            return Ok(0);
        }
        RewardCalculator::emission(self.schedule.reward_rate, self.schedule.period_finish - from)
    }

    /// Rewards `account` could claim at `now`.
    pub fn pending_rewards(&self, account: &StakeAccount, now: i64) -> Result<u64> {
        let reward_per_token = self.schedule.reward_per_token(now, self.total_principal)?;
        account.earned(reward_per_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PRECISION;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const T0: i64 = 1_700_000_000;
    const COOLDOWN: i64 = 7 * 86_400;

    fn pool() -> PoolConfig {
        PoolConfig {
            unstake_cooldown: COOLDOWN,
            ..Default::default()
        }
    }

    fn staker() -> StakeAccount {
        let mut account = StakeAccount::default();
        account.ensure_initialized(Pubkey::new_unique(), 255).unwrap();
        account
    }

    #[test]
    fn notify_scenario_pays_full_emission_to_sole_staker() {
        let mut pool = pool();
        let mut alice = staker();
        pool.add_stake(&mut alice, 100, T0).unwrap();

        pool.notify_reward_amount(6048, 60_480, T0).unwrap();
        assert_eq!(pool.schedule.reward_rate, PRECISION / 10);

        let paid = pool.claim_reward(&mut alice, T0 + 60_480).unwrap();
        assert_eq!(paid, 6048);
        assert!(pool.total_reward_paid <= pool.total_reward_injected);

        // Nothing more accrues after the period finishes.
        assert_eq!(pool.claim_reward(&mut alice, T0 + 100_000).unwrap(), 0);
    }

    #[test]
    fn cooldown_scenario() {
        let mut pool = pool();
        let mut alice = staker();
        pool.add_stake(&mut alice, 500, T0).unwrap();

        let u = T0 + 10;
        pool.request_unstake(&mut alice, u).unwrap();

        let err = pool.unstake(&mut alice, u + COOLDOWN - 1).unwrap_err();
        assert_eq!(err, StakingError::CooldownNotElapsed.into());

        let paid = pool.unstake(&mut alice, u + COOLDOWN).unwrap();
        assert_eq!(paid, 500);
        assert_eq!(alice.principal, 0);
        assert_eq!(alice.unstake_requested_at, None);
        assert_eq!(pool.total_principal, 0);
    }

    #[test]
    fn stake_is_rejected_during_cooldown() {
        let mut pool = pool();
        let mut alice = staker();
        pool.add_stake(&mut alice, 50, T0).unwrap();
        pool.request_unstake(&mut alice, T0 + 1).unwrap();

        let err = pool.add_stake(&mut alice, 10, T0 + 2).unwrap_err();
        assert_eq!(err, StakingError::UnableToStake.into());
        assert_eq!(alice.principal, 50);
        assert_eq!(pool.total_principal, 50);
    }

    #[test]
    fn unstake_requires_request_and_principal() {
        let mut pool = pool();
        let mut alice = staker();

        let err = pool.request_unstake(&mut alice, T0).unwrap_err();
        assert_eq!(err, StakingError::NothingStaked.into());

        let err = pool.unstake(&mut alice, T0).unwrap_err();
        assert_eq!(err, StakingError::NoUnstakeRequest.into());

        pool.add_stake(&mut alice, 1, T0).unwrap();
        pool.request_unstake(&mut alice, T0).unwrap();
        let err = pool.request_unstake(&mut alice, T0 + 5).unwrap_err();
        assert_eq!(err, StakingError::UnstakeAlreadyRequested.into());
    }

    #[test]
    fn rewards_split_by_principal_and_join_time() {
        let mut pool = pool();
        let mut alice = staker();
        let mut bob = staker();

        pool.add_stake(&mut alice, 100, T0).unwrap();
        pool.notify_reward_amount(1_000, 100, T0).unwrap();

        // Alice alone for 50s: 500 tokens.
        pool.add_stake(&mut bob, 300, T0 + 50).unwrap();
        // Remaining 500 tokens split 1:3.
        let a = pool.claim_reward(&mut alice, T0 + 100).unwrap();
        let b = pool.claim_reward(&mut bob, T0 + 100).unwrap();
        assert_eq!(a, 625);
        assert_eq!(b, 375);
        assert_eq!(pool.total_principal, alice.principal + bob.principal);
    }

    #[test]
    fn renewal_folds_unspent_emission() {
        let mut pool = pool();
        let mut alice = staker();
        pool.add_stake(&mut alice, 10, T0).unwrap();
        pool.notify_reward_amount(1_000, 100, T0).unwrap();

        pool.notify_reward_amount(1_000, 100, T0 + 50).unwrap();
        assert_eq!(pool.schedule.reward_rate, 15 * PRECISION);
        assert_eq!(pool.schedule.period_finish, T0 + 150);
        assert_eq!(pool.remaining_emission(T0 + 50).unwrap(), 1_500);

        let paid = pool.claim_reward(&mut alice, T0 + 150).unwrap();
        assert_eq!(paid, 2_000);
    }

    #[test]
    fn truncated_rate_is_rejected() {
        let mut pool = pool();
        let err = pool
            .notify_reward_amount(1, 2 * PRECISION as i64, T0)
            .unwrap_err();
        assert_eq!(err, StakingError::RewardRateZero.into());

        let err = pool.notify_reward_amount(1_000, 0, T0).unwrap_err();
        assert_eq!(err, StakingError::ZeroDuration.into());
    }

    #[test]
    fn idle_interval_is_not_credited() {
        let mut pool = pool();
        pool.notify_reward_amount(1_000, 100, T0).unwrap();

        let mut alice = staker();
        pool.add_stake(&mut alice, 10, T0 + 40).unwrap();
        assert_eq!(pool.schedule.reward_per_token_stored, 0);
        assert_eq!(pool.schedule.last_update_time, T0 + 40);

        let paid = pool.claim_reward(&mut alice, T0 + 100).unwrap();
        assert_eq!(paid, 600);
    }

    #[test]
    fn pending_rewards_matches_settlement() {
        let mut pool = pool();
        let mut alice = staker();
        pool.add_stake(&mut alice, 10, T0).unwrap();
        pool.notify_reward_amount(700, 70, T0).unwrap();

        let quoted = pool.pending_rewards(&alice, T0 + 30).unwrap();
        let paid = pool.claim_reward(&mut alice, T0 + 30).unwrap();
        assert_eq!(quoted, paid);
        assert_eq!(paid, 300);
    }

    /// Applies `op` to copies of the state and commits only on success,
    /// mirroring transaction rollback.
    fn atomically<T>(
        pool: &mut PoolConfig,
        account: &mut StakeAccount,
        op: impl FnOnce(&mut PoolConfig, &mut StakeAccount) -> Result<T>,
    ) -> Option<T> {
        let mut next_pool = pool.clone();
        let mut next_account = account.clone();
        match op(&mut next_pool, &mut next_account) {
            Ok(value) => {
                *pool = next_pool;
                *account = next_account;
                Some(value)
            }
            Err(_) => None,
        }
    }

    #[test]
    fn random_operations_preserve_invariants() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut pool = pool();
        let mut accounts: Vec<StakeAccount> = (0..5).map(|_| staker()).collect();
        let mut now = T0;
        let mut paid_out = 0u64;
        let mut unstaked = 0u64;
        let mut staked = 0u64;

        for _ in 0..2_000 {
            now += rng.random_range(0..5_000);
            let who = rng.random_range(0..accounts.len());
            let account = &mut accounts[who];
            match rng.random_range(0..5) {
                0 => {
                    let amount = rng.random_range(1..1_000_000);
                    if atomically(&mut pool, account, |p, a| p.add_stake(a, amount, now)).is_some() {
                        staked += amount;
                    }
                }
                1 => {
                    atomically(&mut pool, account, |p, a| p.request_unstake(a, now));
                }
                2 => {
                    if let Some(amount) = atomically(&mut pool, account, |p, a| p.unstake(a, now)) {
                        unstaked += amount;
                    }
                }
                3 => {
                    if let Some(amount) = atomically(&mut pool, account, |p, a| p.claim_reward(a, now)) {
                        paid_out += amount;
                    }
                }
                _ => {
                    let amount = rng.random_range(0..10_000_000);
                    let duration = rng.random_range(1..200_000);
                    let mut next = pool.clone();
                    if next.notify_reward_amount(amount, duration, now).is_ok() {
                        pool = next;
                    }
                }
            }

            let sum: u64 = accounts.iter().map(|a| a.principal).sum();
            assert_eq!(sum, pool.total_principal);
            assert_eq!(staked - unstaked, pool.total_principal);
            assert!(pool.total_reward_paid <= pool.total_reward_injected);
        }

        // Draining every account never pays more than was injected.
        let end = now + 1_000_000;
        for account in accounts.iter_mut() {
            paid_out += pool.claim_reward(account, end).unwrap();
        }
        assert_eq!(paid_out, pool.total_reward_paid);
        assert!(paid_out <= pool.total_reward_injected);
    }
}
