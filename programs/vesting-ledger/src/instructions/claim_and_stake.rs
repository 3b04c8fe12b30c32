use crate::error::VestingError;
use crate::states::*;
use crate::utils::load_program_account;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use staking_pool::{cpi::accounts::DepositStakeFor, program::StakingPool, states::StakeAccount};

use super::settle_holder_claims;

/// Claim like [`super::Claim`] and stake the proceeds for the signer in the
/// bound staking pool.
///
/// Funds movement: ledger vault → pool stake vault, through the pool's
/// `deposit_stake_for` with the ledger authority as depositor. A failing
/// deposit aborts the whole transaction, claim bookkeeping included.
#[derive(Accounts)]
pub struct ClaimAndStake<'info> {
    /// Also pays for the stake account on first stake.
    #[account(mut)]
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

    /// CHECK: PDA derivation enforced by seeds; signs the deposit.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump = ledger_state.authority_bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(mut, address = ledger_state.vault)]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = ledger_state.mint)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: compared with the bound pool here, validated by the staking program.
    #[account(mut)]
    pub pool_config: UncheckedAccount<'info>,

    /// CHECK: created or validated by the staking program.
    #[account(mut)]
    pub stake_account: UncheckedAccount<'info>,

    /// CHECK: validated by the staking program.
    #[account(mut)]
    pub stake_vault: UncheckedAccount<'info>,

    pub staking_program: Program<'info, StakingPool>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

pub fn claim_and_stake(ctx: Context<ClaimAndStake>, from_position: u64, count: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let holder = ctx.accounts.holder.key();
    let amount = book_staked_claim(
        &mut ctx.accounts.ledger_state,
        &ctx.accounts.pool_config.key(),
        &ctx.accounts.stake_account,
        &ctx.accounts.holder_index,
        &holder,
        (from_position, count),
        ctx.remaining_accounts,
        now,
    )?;

    let authority_bump = ctx.accounts.ledger_state.authority_bump;
    let signer_seeds: &[&[&[u8]]] = &[&[crate::AUTH_SEED.as_bytes(), &[authority_bump]]];
    staking_pool::cpi::deposit_stake_for(
        CpiContext::new_with_signer(
            ctx.accounts.staking_program.to_account_info(),
            DepositStakeFor {
                payer: ctx.accounts.holder.to_account_info(),
                depositor: ctx.accounts.authority.to_account_info(),
                pool_config: ctx.accounts.pool_config.to_account_info(),
                stake_account: ctx.accounts.stake_account.to_account_info(),
                source: ctx.accounts.vault.to_account_info(),
                stake_vault: ctx.accounts.stake_vault.to_account_info(),
                mint: ctx.accounts.mint.to_account_info(),
                token_program: ctx.accounts.token_program.to_account_info(),
                system_program: ctx.accounts.system_program.to_account_info(),
            },
            signer_seeds,
        ),
        holder,
        amount,
    )?;

    emit!(Claimed {
        holder,
        amount,
        destination: ctx.accounts.stake_vault.key(),
        staked: true,
    });
    Ok(())
}

/// Ledger side of a claim-and-stake: checks the binding and the holder's
/// stake, then books the claim.
#[allow(clippy::too_many_arguments)]
pub(crate) fn book_staked_claim(
    ledger_state: &mut LedgerState,
    pool_config: &Pubkey,
    stake_account: &AccountInfo,
    holder_index: &AccountInfo,
    holder: &Pubkey,
    window: (u64, u64),
    entry_infos: &[AccountInfo],
    now: i64,
) -> Result<u64> {
    require!(
        ledger_state.is_staking_bound(),
        VestingError::StakingNotConfigured
    );
    require_keys_eq!(
        *pool_config,
        ledger_state.staking_pool,
        VestingError::InvalidParam
    );
    ensure_stake_accepts_deposit(stake_account)?;
    settle_holder_claims(ledger_state, holder_index, holder, window, entry_infos, now)
}

/// Surfaces the pool's cooldown rule as a ledger error before anything is
/// booked. The pool enforces the same rule on its side.
fn ensure_stake_accepts_deposit(stake_account: &AccountInfo) -> Result<()> {
    if let Some(stake) = load_program_account::<StakeAccount>(stake_account)? {
        require!(!stake.is_unstake_pending(), VestingError::UnableToStake);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::account::TestAccount;

    const T: i64 = 1_700_000_000;

    struct Fixture {
        ledger: LedgerState,
        holder: Pubkey,
        pool_config: Pubkey,
        holder_index: TestAccount,
        entry: TestAccount,
    }

    fn fixture() -> Fixture {
        let holder = Pubkey::new_unique();
        let pool_config = Pubkey::new_unique();
        let mut ledger = LedgerState {
            staking_pool: pool_config,
            ..Default::default()
        };
        let index = ledger.record_grant(1_000).unwrap();
        Fixture {
            holder_index: TestAccount::holding(
                &HolderIndex {
                    bump: 255,
                    holder,
                    entries: vec![index],
                },
                HolderIndex::space_for(1),
            ),
            entry: TestAccount::holding(
                &VestingEntry {
                    index,
                    holder,
                    amount: 1_000,
                    start_tokens: 100,
                    start_date: T,
                    end_date: T + 1_000,
                    ..Default::default()
                },
                VestingEntry::LEN,
            ),
            ledger,
            holder,
            pool_config,
        }
    }

    fn stake(unstake_requested_at: Option<i64>) -> TestAccount {
        TestAccount::holding(
            &StakeAccount {
                principal: 50,
                unstake_requested_at,
                ..Default::default()
            },
            StakeAccount::LEN,
        )
    }

    /// Books against a staged copy and commits it only on success.
    fn book(fixture: &mut Fixture, stake_account: &mut TestAccount, pool_config: Pubkey) -> Result<u64> {
        let stake_info = stake_account.info(false);
        let index_info = fixture.holder_index.info(false);
        let infos = vec![fixture.entry.info(true)];
        let mut staged = fixture.ledger.clone();
        let amount = book_staked_claim(
            &mut staged,
            &pool_config,
            &stake_info,
            &index_info,
            &fixture.holder,
            (0, 1),
            &infos,
            T + 500,
        )?;
        fixture.ledger = staged;
        Ok(amount)
    }

    #[test]
    fn pending_unstake_blocks_the_claim() {
        let mut fixture = fixture();
        let pool_config = fixture.pool_config;

        let err = book(&mut fixture, &mut stake(Some(T)), pool_config).unwrap_err();
        assert_eq!(err, VestingError::UnableToStake.into());
        assert_eq!(fixture.ledger.total_claimed, 0);
        assert_eq!(fixture.entry.read::<VestingEntry>().claimed, 0);

        // 100 up front plus half of the remaining 900.
        assert_eq!(book(&mut fixture, &mut stake(None), pool_config).unwrap(), 550);
        assert_eq!(fixture.ledger.total_claimed, 550);
        assert_eq!(fixture.entry.read::<VestingEntry>().claimed, 550);
    }

    #[test]
    fn first_stake_needs_no_stake_account() {
        let mut fixture = fixture();
        let pool_config = fixture.pool_config;
        assert_eq!(book(&mut fixture, &mut TestAccount::missing(), pool_config).unwrap(), 550);
    }

    #[test]
    fn pool_binding_is_enforced() {
        let mut fixture = fixture();
        let err = book(&mut fixture, &mut stake(None), Pubkey::new_unique()).unwrap_err();
        assert_eq!(err, VestingError::InvalidParam.into());

        fixture.ledger.staking_pool = Pubkey::default();
        let err = book(&mut fixture, &mut stake(None), Pubkey::default()).unwrap_err();
        assert_eq!(err, VestingError::StakingNotConfigured.into());
        assert_eq!(fixture.entry.read::<VestingEntry>().claimed, 0);
    }
}
