use anchor_lang::AccountDeserialize;
use anyhow::Result;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{account::Account, pubkey::Pubkey};
use staking_pool::states::{POOL_CONFIG_SEED, STAKE_ACCOUNT_SEED};
use vesting_ledger::states::{HOLDER_INDEX_SEED, LEDGER_STATE_SEED, VESTING_ENTRY_SEED};

pub fn deserialize_anchor_account<T: AccountDeserialize>(account: &Account) -> Result<T> {
    let mut data: &[u8] = &account.data;
    T::try_deserialize(&mut data).map_err(Into::into)
}

/// Token program that owns `mint`; Token or Token-2022.
pub fn get_token_program_id(rpc_client: &RpcClient, mint: &Pubkey) -> Result<Pubkey> {
    Ok(rpc_client.get_account(mint)?.owner)
}

pub fn get_ledger_state_address(program_id: &Pubkey) -> Pubkey {
    let (ledger_state, _bump) =
        Pubkey::find_program_address(&[LEDGER_STATE_SEED.as_bytes()], program_id);
    ledger_state
}

pub fn get_ledger_authority_address(program_id: &Pubkey) -> Pubkey {
    let (authority, _bump) =
        Pubkey::find_program_address(&[vesting_ledger::AUTH_SEED.as_bytes()], program_id);
    authority
}

pub fn get_ledger_vault_address(program_id: &Pubkey) -> Pubkey {
    let (vault, _bump) =
        Pubkey::find_program_address(&[vesting_ledger::VAULT_SEED.as_bytes()], program_id);
    vault
}

pub fn get_vesting_entry_address(index: u64, program_id: &Pubkey) -> Pubkey {
    let (entry, _bump) = Pubkey::find_program_address(
        &[VESTING_ENTRY_SEED.as_bytes(), &index.to_le_bytes()],
        program_id,
    );
    entry
}

pub fn get_holder_index_address(holder: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (holder_index, _bump) = Pubkey::find_program_address(
        &[HOLDER_INDEX_SEED.as_bytes(), holder.as_ref()],
        program_id,
    );
    holder_index
}

pub fn get_pool_config_address(program_id: &Pubkey) -> Pubkey {
    let (pool_config, _bump) =
        Pubkey::find_program_address(&[POOL_CONFIG_SEED.as_bytes()], program_id);
    pool_config
}

pub fn get_pool_authority_address(program_id: &Pubkey) -> Pubkey {
    let (authority, _bump) =
        Pubkey::find_program_address(&[staking_pool::AUTH_SEED.as_bytes()], program_id);
    authority
}

pub fn get_stake_vault_address(program_id: &Pubkey) -> Pubkey {
    let (stake_vault, _bump) =
        Pubkey::find_program_address(&[staking_pool::STAKE_VAULT_SEED.as_bytes()], program_id);
    stake_vault
}

pub fn get_reward_vault_address(program_id: &Pubkey) -> Pubkey {
    let (reward_vault, _bump) =
        Pubkey::find_program_address(&[staking_pool::REWARD_VAULT_SEED.as_bytes()], program_id);
    reward_vault
}

pub fn get_stake_account_address(owner: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (stake_account, _bump) = Pubkey::find_program_address(
        &[STAKE_ACCOUNT_SEED.as_bytes(), owner.as_ref()],
        program_id,
    );
    stake_account
}
