use anchor_client::{Client, Cluster};
use anchor_lang::prelude::AccountMeta;
use anyhow::Result;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, system_program};
use spl_associated_token_account::get_associated_token_address_with_program_id;
use std::rc::Rc;

use staking_pool::accounts as staking_accounts;
use staking_pool::instruction as staking_instructions;
use staking_pool::states::PoolConfig;

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

pub fn initialise_pool_instr(
    config: &ClientConfig,
    admin: Pubkey,
    mint: Pubkey,
    unstake_cooldown: i64,
) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.staking_pool_program)?;
    let token_program = mint_token_program(config, &mint)?;

    let instructions = program
        .request()
        .accounts(staking_accounts::InitialisePool {
            owner: program.payer(),
            authority: get_pool_authority_address(&program.id()),
            pool_config: get_pool_config_address(&program.id()),
            mint,
            stake_vault: get_stake_vault_address(&program.id()),
            reward_vault: get_reward_vault_address(&program.id()),
            token_program,
            system_program: system_program::id(),
        })
        .args(staking_instructions::InitialisePool {
            admin,
            unstake_cooldown,
        })
        .instructions()?;
    Ok(instructions)
}

pub fn update_pool_config_instr(
    config: &ClientConfig,
    admin: Pubkey,
    param: u8,
    value: u64,
    new_admin: Option<Pubkey>,
) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.staking_pool_program)?;

    let mut ixs = program
        .request()
        .accounts(staking_accounts::UpdateConfig {
            owner: admin,
            pool_config: get_pool_config_address(&program.id()),
        })
        .args(staking_instructions::UpdateConfig { param, value })
        .instructions()?;

    if let Some(new_admin) = new_admin {
        ixs[0]
            .accounts
            .push(AccountMeta::new_readonly(new_admin, false));
    }
    Ok(ixs)
}

pub fn stake_instr(config: &ClientConfig, owner: Pubkey, amount: u64) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.staking_pool_program)?;
    let pool_config = get_pool_config_address(&program.id());
    let pool: PoolConfig = program.account(pool_config)?;
    let token_program = mint_token_program(config, &pool.mint)?;

    let instructions = program
        .request()
        .accounts(staking_accounts::AddTokenStake {
            owner,
            pool_config,
            stake_account: get_stake_account_address(&owner, &program.id()),
            owner_token: get_associated_token_address_with_program_id(&owner, &pool.mint, &token_program),
            stake_vault: pool.stake_vault,
            mint: pool.mint,
            token_program,
            system_program: system_program::id(),
        })
        .args(staking_instructions::AddTokenStake { amount })
        .instructions()?;
    Ok(instructions)
}

pub fn request_unstake_instr(config: &ClientConfig, owner: Pubkey) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.staking_pool_program)?;

    let instructions = program
        .request()
        .accounts(staking_accounts::RequestUnstake {
            owner,
            pool_config: get_pool_config_address(&program.id()),
            stake_account: get_stake_account_address(&owner, &program.id()),
        })
        .args(staking_instructions::RequestUnstake {})
        .instructions()?;
    Ok(instructions)
}

pub fn unstake_instr(config: &ClientConfig, owner: Pubkey) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.staking_pool_program)?;
    let pool_config = get_pool_config_address(&program.id());
    let pool: PoolConfig = program.account(pool_config)?;
    let token_program = mint_token_program(config, &pool.mint)?;

    let instructions = program
        .request()
        .accounts(staking_accounts::Unstake {
            owner,
            pool_config,
            stake_account: get_stake_account_address(&owner, &program.id()),
            authority: get_pool_authority_address(&program.id()),
            stake_vault: pool.stake_vault,
            owner_token: get_associated_token_address_with_program_id(&owner, &pool.mint, &token_program),
            mint: pool.mint,
            token_program,
        })
        .args(staking_instructions::Unstake {})
        .instructions()?;
    Ok(instructions)
}

pub fn claim_reward_instr(config: &ClientConfig, owner: Pubkey) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.staking_pool_program)?;
    let pool_config = get_pool_config_address(&program.id());
    let pool: PoolConfig = program.account(pool_config)?;
    let token_program = mint_token_program(config, &pool.mint)?;

    let instructions = program
        .request()
        .accounts(staking_accounts::ClaimReward {
            owner,
            pool_config,
            stake_account: get_stake_account_address(&owner, &program.id()),
            authority: get_pool_authority_address(&program.id()),
            reward_vault: pool.reward_vault,
            mint: pool.mint,
            owner_token: get_associated_token_address_with_program_id(&owner, &pool.mint, &token_program),
            token_program,
            associated_token_program: spl_associated_token_account::id(),
            system_program: system_program::id(),
        })
        .args(staking_instructions::ClaimReward {})
        .instructions()?;
    Ok(instructions)
}

pub fn notify_reward_instr(
    config: &ClientConfig,
    admin: Pubkey,
    amount: u64,
    duration: i64,
) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.staking_pool_program)?;
    let pool_config = get_pool_config_address(&program.id());
    let pool: PoolConfig = program.account(pool_config)?;
    let token_program = mint_token_program(config, &pool.mint)?;

    let instructions = program
        .request()
        .accounts(staking_accounts::NotifyRewardAmount {
            owner: admin,
            pool_config,
            owner_token: get_associated_token_address_with_program_id(&admin, &pool.mint, &token_program),
            reward_vault: pool.reward_vault,
            mint: pool.mint,
            token_program,
        })
        .args(staking_instructions::NotifyRewardAmount { amount, duration })
        .instructions()?;
    Ok(instructions)
}

pub fn get_stake_account_instr(config: &ClientConfig, owner: Pubkey) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.staking_pool_program)?;

    let instructions = program
        .request()
        .accounts(staking_accounts::StakeView {
            pool_config: get_pool_config_address(&program.id()),
            owner,
            stake_account: get_stake_account_address(&owner, &program.id()),
        })
        .args(staking_instructions::GetStakeAccount {})
        .instructions()?;
    Ok(instructions)
}

pub fn get_earned_instr(config: &ClientConfig, owner: Pubkey) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.staking_pool_program)?;

    let instructions = program
        .request()
        .accounts(staking_accounts::StakeView {
            pool_config: get_pool_config_address(&program.id()),
            owner,
            stake_account: get_stake_account_address(&owner, &program.id()),
        })
        .args(staking_instructions::GetEarned {})
        .instructions()?;
    Ok(instructions)
}

pub fn get_reward_schedule_instr(config: &ClientConfig) -> Result<Vec<Instruction>> {
    let client = program_client(config)?;
    let program = client.program(config.staking_pool_program)?;

    let instructions = program
        .request()
        .accounts(staking_accounts::ScheduleView {
            pool_config: get_pool_config_address(&program.id()),
        })
        .args(staking_instructions::GetRewardSchedule {})
        .instructions()?;
    Ok(instructions)
}
