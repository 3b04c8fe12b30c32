use anchor_client::{Client, Cluster};
use anchor_lang::prelude::AccountMeta;
use anyhow::Result;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, system_program};
use spl_associated_token_account::get_associated_token_address_with_program_id;
use std::rc::Rc;

use vesting_ledger::accounts as vesting_accounts;
use vesting_ledger::instruction as vesting_instructions;

use crate::instructions::utils::*;

use super::super::{read_keypair_file, ClientConfig};

fn program_client(config: &ClientConfig) -> Result<Client<Rc<Keypair>>> {
    let payer = read_keypair_file(&config.payer_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    Ok(Client::new(url, Rc::new(payer)))
}

fn mint_token_program(config: &ClientConfig, mint: &Pubkey) -> Result<Pubkey> {
    get_token_program_id(&RpcClient::new(config.http_url.clone()), mint)
}

fn writable(keys: impl IntoIterator<Item = Pubkey>) -> Vec<AccountMeta> {
    keys.into_iter()
        .map(|key| AccountMeta::new(key, false))
        .collect()
}

pub fn initialise_ledger_instr(
    config: &ClientConfig,
    admin: Pubkey,
    mint: Pubkey,
) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.vesting_ledger_program)?;
    let token_program = mint_token_program(config, &mint)?;

    let instructions = program
        .request()
        .accounts(vesting_accounts::InitialiseLedger {
            owner: program.payer(),
            authority: get_ledger_authority_address(&program.id()),
            ledger_state: get_ledger_state_address(&program.id()),
            mint,
            vault: get_ledger_vault_address(&program.id()),
            token_program,
            system_program: system_program::id(),
        })
        .args(vesting_instructions::InitialiseLedger { admin })
        .instructions()?;
    Ok(instructions)
}

/// One `grant_batch` whose entries start at global index `first_index`.
pub fn grant_batch_instr(
    config: &ClientConfig,
    admin: Pubkey,
    holders: Vec<Pubkey>,
    start_tokens: Vec<u64>,
    total_amounts: Vec<u64>,
    start_date: i64,
    end_date: i64,
    first_index: u64,
) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.vesting_ledger_program)?;

    let remaining: Vec<Pubkey> = holders
        .iter()
        .zip(first_index..)
        .flat_map(|(holder, index)| {
            [
                get_vesting_entry_address(index, &program.id()),
                get_holder_index_address(holder, &program.id()),
            ]
        })
        .collect();

    let mut ixs = program
        .request()
        .accounts(vesting_accounts::GrantBatch {
            admin,
            ledger_state: get_ledger_state_address(&program.id()),
            system_program: system_program::id(),
        })
        .args(vesting_instructions::GrantBatch {
            holders,
            start_tokens,
            total_amounts,
            start_date,
            end_date,
        })
        .instructions()?;
    ixs[0].accounts.extend(writable(remaining));
    Ok(ixs)
}

fn entry_metas(entries: &[u64], program_id: &Pubkey) -> Vec<AccountMeta> {
    writable(
        entries
            .iter()
            .map(|index| get_vesting_entry_address(*index, program_id)),
    )
}

/// One page of a claim: `entries` are the global indices found at holder-index
/// positions `from_position..`.
pub fn claim_instr(
    config: &ClientConfig,
    holder: Pubkey,
    from_position: u64,
    entries: &[u64],
) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.vesting_ledger_program)?;
    let ledger_state = get_ledger_state_address(&program.id());
    let state: vesting_ledger::states::LedgerState = program.account(ledger_state)?;
    let token_program = mint_token_program(config, &state.mint)?;

    let mut ixs = program
        .request()
        .accounts(vesting_accounts::Claim {
            holder,
            ledger_state,
            holder_index: get_holder_index_address(&holder, &program.id()),
            authority: get_ledger_authority_address(&program.id()),
            vault: state.vault,
            mint: state.mint,
            holder_token: get_associated_token_address_with_program_id(
                &holder,
                &state.mint,
                &token_program,
            ),
            token_program,
            associated_token_program: spl_associated_token_account::id(),
            system_program: system_program::id(),
        })
        .args(vesting_instructions::Claim {
            from_position,
            count: entries.len() as u64,
        })
        .instructions()?;
    ixs[0].accounts.extend(entry_metas(entries, &program.id()));
    Ok(ixs)
}

pub fn claim_to_instr(
    config: &ClientConfig,
    holder: Pubkey,
    recipient: Pubkey,
    recipient_token: Pubkey,
    from_position: u64,
    entries: &[u64],
) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.vesting_ledger_program)?;
    let ledger_state = get_ledger_state_address(&program.id());
    let state: vesting_ledger::states::LedgerState = program.account(ledger_state)?;

    let mut ixs = program
        .request()
        .accounts(vesting_accounts::ClaimTo {
            holder,
            ledger_state,
            holder_index: get_holder_index_address(&holder, &program.id()),
            authority: get_ledger_authority_address(&program.id()),
            vault: state.vault,
            mint: state.mint,
            recipient_token,
            token_program: mint_token_program(config, &state.mint)?,
        })
        .args(vesting_instructions::ClaimTo {
            recipient,
            from_position,
            count: entries.len() as u64,
        })
        .instructions()?;
    ixs[0].accounts.extend(entry_metas(entries, &program.id()));
    Ok(ixs)
}

pub fn claim_and_stake_instr(
    config: &ClientConfig,
    holder: Pubkey,
    from_position: u64,
    entries: &[u64],
) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.vesting_ledger_program)?;
    let ledger_state = get_ledger_state_address(&program.id());
    let state: vesting_ledger::states::LedgerState = program.account(ledger_state)?;
    let staking_program = config.staking_pool_program;

    let mut ixs = program
        .request()
        .accounts(vesting_accounts::ClaimAndStake {
            holder,
            ledger_state,
            holder_index: get_holder_index_address(&holder, &program.id()),
            authority: get_ledger_authority_address(&program.id()),
            vault: state.vault,
            mint: state.mint,
            pool_config: state.staking_pool,
            stake_account: get_stake_account_address(&holder, &staking_program),
            stake_vault: get_stake_vault_address(&staking_program),
            staking_program,
            token_program: mint_token_program(config, &state.mint)?,
            system_program: system_program::id(),
        })
        .args(vesting_instructions::ClaimAndStake {
            from_position,
            count: entries.len() as u64,
        })
        .instructions()?;
    ixs[0].accounts.extend(entry_metas(entries, &program.id()));
    Ok(ixs)
}

pub fn set_lock_instr(config: &ClientConfig, admin: Pubkey, locked: bool) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.vesting_ledger_program)?;

    let instructions = program
        .request()
        .accounts(vesting_accounts::AdminOnly {
            admin,
            ledger_state: get_ledger_state_address(&program.id()),
        })
        .args(vesting_instructions::SetLock { locked })
        .instructions()?;
    Ok(instructions)
}

pub fn update_admin_instr(
    config: &ClientConfig,
    admin: Pubkey,
    new_admin: Pubkey,
) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.vesting_ledger_program)?;

    let instructions = program
        .request()
        .accounts(vesting_accounts::AdminOnly {
            admin,
            ledger_state: get_ledger_state_address(&program.id()),
        })
        .args(vesting_instructions::UpdateAdmin { new_admin })
        .instructions()?;
    Ok(instructions)
}

pub fn bind_staking_instr(config: &ClientConfig, admin: Pubkey) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.vesting_ledger_program)?;

    let instructions = program
        .request()
        .accounts(vesting_accounts::BindStaking {
            admin,
            ledger_state: get_ledger_state_address(&program.id()),
            pool_config: get_pool_config_address(&config.staking_pool_program),
        })
        .args(vesting_instructions::BindStaking {})
        .instructions()?;
    Ok(instructions)
}

/// `get_claimable(holder, index)`; `entry` is the global index it maps to.
pub fn get_claimable_instr(
    config: &ClientConfig,
    holder: Pubkey,
    index: u64,
    entry: Option<u64>,
) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.vesting_ledger_program)?;

    let mut ixs = program
        .request()
        .accounts(vesting_accounts::HolderView {
            ledger_state: get_ledger_state_address(&program.id()),
            holder_index: get_holder_index_address(&holder, &program.id()),
        })
        .args(vesting_instructions::GetClaimable { holder, index })
        .instructions()?;
    if let Some(entry) = entry {
        ixs[0].accounts.push(AccountMeta::new_readonly(
            get_vesting_entry_address(entry, &program.id()),
            false,
        ));
    }
    Ok(ixs)
}

pub fn get_all_claimable_instr(
    config: &ClientConfig,
    holder: Pubkey,
    entries: &[u64],
) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.vesting_ledger_program)?;

    let mut ixs = program
        .request()
        .accounts(vesting_accounts::HolderView {
            ledger_state: get_ledger_state_address(&program.id()),
            holder_index: get_holder_index_address(&holder, &program.id()),
        })
        .args(vesting_instructions::GetAllClaimable { holder })
        .instructions()?;
    ixs[0].accounts.extend(entries.iter().map(|index| {
        AccountMeta::new_readonly(get_vesting_entry_address(*index, &program.id()), false)
    }));
    Ok(ixs)
}
