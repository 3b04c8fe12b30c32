use crate::error::VestingError;
use crate::{states::*, VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `initialise_ledger`.
///
/// Creates the ledger state and its vault, owned by the `AUTH_SEED` PDA.
/// The vault is funded with plain token transfers; granting moves no tokens.
#[derive(Accounts)]
pub struct InitialiseLedger<'info> {
    /// Pays for the new accounts.
    #[account(mut)]
    pub owner: Signer<'info>,

    /// CHECK: PDA derivation enforced via seeds. Not read as an account; used as Pubkey.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(
        init,
        seeds = [LEDGER_STATE_SEED.as_bytes()],
        bump,
        payer = owner,
        space = LedgerState::LEN
    )]
    pub ledger_state: Box<Account<'info, LedgerState>>,

    /// Mint of the vested token.
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        seeds = [VAULT_SEED.as_bytes()],
        bump,
        payer = owner,
        token::mint = mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

pub fn initialise_ledger(ctx: Context<InitialiseLedger>, admin: Pubkey) -> Result<()> {
    require_keys_neq!(admin, Pubkey::default(), VestingError::NullIdentity);

    let ledger_state = &mut ctx.accounts.ledger_state;
    ledger_state.bump = ctx.bumps.ledger_state;
    ledger_state.authority_bump = ctx.bumps.authority;
    ledger_state.policy = AccessPolicy {
        admin,
        locked: false,
    };
    ledger_state.mint = ctx.accounts.mint.key();
    ledger_state.vault = ctx.accounts.vault.key();
    msg!("Ledger state initialized");

    emit!(LedgerInitialized {
        admin,
        mint: ledger_state.mint,
        vault: ledger_state.vault,
    });
    Ok(())
}
