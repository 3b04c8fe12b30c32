use anyhow::{format_err, Result};
use serde::Serialize;
use solana_client::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use staking_pool::states::{RewardSchedule, StakeAccount};
use vesting_ledger::states::{HolderIndex, LedgerState, VestingEntry};

use crate::instructions::rpc::get_multiple_accounts;
use crate::instructions::utils::*;

/// JSON shape of one entry in query output.
#[derive(Debug, Serialize)]
pub struct EntryView {
    pub index: u64,
    pub holder: String,
    pub amount: u64,
    pub start_tokens: u64,
    pub start_date: i64,
    pub end_date: i64,
    pub claimed: u64,
    pub claimable: u64,
}

impl EntryView {
    pub fn new(entry: &VestingEntry, now: i64) -> Result<Self> {
        Ok(Self {
            index: entry.index,
            holder: entry.holder.to_string(),
            amount: entry.amount,
            start_tokens: entry.start_tokens,
            start_date: entry.start_date,
            end_date: entry.end_date,
            claimed: entry.claimed,
            claimable: entry.claimable(now)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StakeView {
    pub owner: String,
    pub principal: u64,
    pub rewards: u64,
    pub unstake_requested_at: Option<i64>,
    pub earned: u64,
}

impl StakeView {
    pub fn new(account: &StakeAccount, earned: u64) -> Self {
        Self {
            owner: account.owner.to_string(),
            principal: account.principal,
            rewards: account.rewards,
            unstake_requested_at: account.unstake_requested_at,
            earned,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScheduleView {
    /// Scaled by `staking_pool::PRECISION`, kept as a string to survive JSON.
    pub reward_rate: String,
    pub period_finish: i64,
    pub last_update_time: i64,
    pub reward_per_token_stored: String,
}

impl From<&RewardSchedule> for ScheduleView {
    fn from(schedule: &RewardSchedule) -> Self {
        Self {
            reward_rate: schedule.reward_rate.to_string(),
            period_finish: schedule.period_finish,
            last_update_time: schedule.last_update_time,
            reward_per_token_stored: schedule.reward_per_token_stored.to_string(),
        }
    }
}

pub fn fetch_ledger_state(rpc_client: &RpcClient, program_id: &Pubkey) -> Result<LedgerState> {
    let account = rpc_client.get_account(&get_ledger_state_address(program_id))?;
    deserialize_anchor_account(&account)
}

/// Global entry indices of `holder`; empty if it was never granted anything.
pub fn fetch_holder_entries(
    rpc_client: &RpcClient,
    program_id: &Pubkey,
    holder: &Pubkey,
) -> Result<Vec<u64>> {
    let address = get_holder_index_address(holder, program_id);
    let accounts = get_multiple_accounts(rpc_client, &[address])?;
    match accounts.into_iter().next().flatten() {
        Some(account) => Ok(deserialize_anchor_account::<HolderIndex>(&account)?.entries),
        None => Ok(Vec::new()),
    }
}

pub fn fetch_entries(
    rpc_client: &RpcClient,
    program_id: &Pubkey,
    indices: &[u64],
) -> Result<Vec<VestingEntry>> {
    let keys: Vec<Pubkey> = indices
        .iter()
        .map(|index| get_vesting_entry_address(*index, program_id))
        .collect();
    get_multiple_accounts(rpc_client, &keys)?
        .into_iter()
        .zip(indices)
        .map(|(account, index)| {
            let account = account.ok_or_else(|| format_err!("vesting entry {} not found", index))?;
            deserialize_anchor_account::<VestingEntry>(&account)
        })
        .collect()
}

/// Entries `from..=to`, validated against the ledger like the on-chain view
/// but without its size cap.
pub fn fetch_entries_in_range(
    rpc_client: &RpcClient,
    program_id: &Pubkey,
    from: u64,
    to: u64,
) -> Result<Vec<VestingEntry>> {
    let ledger = fetch_ledger_state(rpc_client, program_id)?;
    ledger.check_range(from, to)?;
    let indices: Vec<u64> = (from..=to).collect();
    fetch_entries(rpc_client, program_id, &indices)
}
