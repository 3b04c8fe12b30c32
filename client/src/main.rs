use anyhow::{format_err, Result};
use clap::Parser;
use configparser::ini::Ini;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use spl_associated_token_account::get_associated_token_address_with_program_id;
use std::str::FromStr;

mod instructions;
use instructions::queries::*;
use instructions::rpc::*;
use instructions::staking_instructions::*;
use instructions::utils::get_token_program_id;
use instructions::vesting_instructions::*;

/// Grants per `grant_batch` transaction; each grant adds two accounts and
/// 48 bytes of arguments, which keeps a chunk under the packet size.
const GRANT_CHUNK: usize = 6;

/// Entries per claim transaction; `claim-and-stake` carries the most fixed
/// accounts of the three and still fits.
const CLAIM_CHUNK: usize = 16;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    http_url: String,
    ws_url: String,
    payer_path: String,
    admin_path: String,
    vesting_ledger_program: Pubkey,
    staking_pool_program: Pubkey,
}

fn load_cfg(client_config: &str) -> Result<ClientConfig> {
    let mut config = Ini::new();
    config
        .load(client_config)
        .map_err(|e| format_err!("failed to load {}: {}", client_config, e))?;
    let get = |key: &str| -> Result<String> {
        config
            .get("Global", key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| format_err!("{} must not be empty", key))
    };

    Ok(ClientConfig {
        http_url: get("http_url")?,
        ws_url: get("ws_url")?,
        payer_path: get("payer_path")?,
        admin_path: get("admin_path")?,
        vesting_ledger_program: Pubkey::from_str(&get("vesting_ledger_program")?)?,
        staking_pool_program: Pubkey::from_str(&get("staking_pool_program")?)?,
    })
}

fn read_keypair_file(s: &str) -> Result<Keypair> {
    solana_sdk::signature::read_keypair_file(s)
        .map_err(|_| format_err!("failed to read keypair from {}", s))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Pages of the holder's index with something to claim now, as
/// `(from_position, entry indices)`.
fn claimable_pages(
    rpc_client: &RpcClient,
    ledger_program: &Pubkey,
    holder: &Pubkey,
) -> Result<Vec<(u64, Vec<u64>)>> {
    let now = get_cluster_time(rpc_client)?;
    let indices = fetch_holder_entries(rpc_client, ledger_program, holder)?;
    let entries = fetch_entries(rpc_client, ledger_program, &indices)?;

    let mut pages = Vec::new();
    for (page, chunk) in entries.chunks(CLAIM_CHUNK).enumerate() {
        let mut claimable = 0u64;
        for entry in chunk {
            claimable = claimable
                .checked_add(entry.claimable(now)?)
                .ok_or_else(|| format_err!("claimable overflow"))?;
        }
        if claimable > 0 {
            let from_position = (page * CLAIM_CHUNK) as u64;
            pages.push((from_position, chunk.iter().map(|entry| entry.index).collect()));
        }
    }
    if pages.is_empty() {
        return Err(format_err!("nothing to claim for {}", holder));
    }
    Ok(pages)
}

#[derive(Debug, Parser)]
pub struct Opts {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Parser)]
pub enum Commands {
    InitLedger {
        #[arg(long)]
        admin: Pubkey,
        #[arg(long)]
        mint: Pubkey,
    },
    /// Grants split into as many transactions as needed.
    GrantBatch {
        #[arg(long, value_delimiter = ',')]
        holders: Vec<Pubkey>,
        #[arg(long, value_delimiter = ',')]
        start_tokens: Vec<u64>,
        #[arg(long, value_delimiter = ',')]
        amounts: Vec<u64>,
        #[arg(long, allow_hyphen_values = true)]
        start_date: i64,
        #[arg(long, allow_hyphen_values = true)]
        end_date: i64,
    },
    /// Claims in pages of `CLAIM_CHUNK` entries, skipping pages with nothing released.
    Claim {},
    ClaimTo {
        #[arg(long)]
        recipient: Pubkey,
        /// Defaults to the recipient's associated token account.
        #[arg(long)]
        recipient_token: Option<Pubkey>,
    },
    ClaimAndStake {},
    SetLock {
        #[arg(long)]
        locked: bool,
    },
    UpdateAdmin {
        #[arg(long)]
        new_admin: Pubkey,
    },
    BindStaking {},
    ShowVestings {
        #[arg(long)]
        holder: Option<Pubkey>,
    },
    /// Inclusive range of global entry indices.
    VestingsRange {
        #[arg(long)]
        from: u64,
        #[arg(long)]
        to: u64,
    },
    Claimable {
        #[arg(long)]
        holder: Option<Pubkey>,
        /// Position among the holder's entries; all entries when omitted.
        #[arg(long)]
        index: Option<u64>,
    },
    InitPool {
        #[arg(long)]
        admin: Pubkey,
        #[arg(long)]
        mint: Pubkey,
        #[arg(long)]
        unstake_cooldown: i64,
    },
    Stake {
        #[arg(long)]
        amount: u64,
    },
    RequestUnstake {},
    Unstake {},
    ClaimReward {},
    NotifyReward {
        #[arg(long)]
        amount: u64,
        #[arg(long)]
        duration: i64,
    },
    UpdatePoolConfig {
        #[arg(long)]
        param: u8,
        #[arg(long)]
        value: u64,
        #[arg(long)]
        new_admin: Option<Pubkey>,
    },
    ShowStake {
        #[arg(long)]
        owner: Option<Pubkey>,
    },
    ShowSchedule {},
}

fn main() -> Result<()> {
    let client_config = "client_config.ini";
    let config = load_cfg(client_config)?;
    let payer = read_keypair_file(&config.payer_path)?;
    let admin = read_keypair_file(&config.admin_path)?;
    let rpc_client = RpcClient::new(config.http_url.to_string());
    let ledger_program = config.vesting_ledger_program;

    let opts = Opts::parse();
    match opts.command {
        Commands::InitLedger { admin, mint } => {
            let ixs = initialise_ledger_instr(&config, admin, mint)?;
            let signature = sign_and_send(&rpc_client, &payer, &[], &ixs)?;
            println!("{}", signature);
        }
        Commands::GrantBatch {
            holders,
            start_tokens,
            amounts,
            start_date,
            end_date,
        } => {
            if holders.len() != start_tokens.len() || holders.len() != amounts.len() {
                return Err(format_err!("holders, start-tokens and amounts differ in length"));
            }
            let mut next_index = fetch_ledger_state(&rpc_client, &ledger_program)?.vestings_count;
            for ((holders, start_tokens), amounts) in holders
                .chunks(GRANT_CHUNK)
                .zip(start_tokens.chunks(GRANT_CHUNK))
                .zip(amounts.chunks(GRANT_CHUNK))
            {
                let ixs = grant_batch_instr(
                    &config,
                    admin.pubkey(),
                    holders.to_vec(),
                    start_tokens.to_vec(),
                    amounts.to_vec(),
                    start_date,
                    end_date,
                    next_index,
                )?;
                let signature = sign_and_send(&rpc_client, &payer, &[&admin], &ixs)?;
                println!("entries {}..{}: {}", next_index, next_index + holders.len() as u64, signature);
                next_index += holders.len() as u64;
            }
        }
        Commands::Claim {} => {
            for (from_position, entries) in claimable_pages(&rpc_client, &ledger_program, &payer.pubkey())? {
                let ixs = claim_instr(&config, payer.pubkey(), from_position, &entries)?;
                let signature = sign_and_send(&rpc_client, &payer, &[], &ixs)?;
                println!("positions {}..{}: {}", from_position, from_position + entries.len() as u64, signature);
            }
        }
        Commands::ClaimTo {
            recipient,
            recipient_token,
        } => {
            let recipient_token = match recipient_token {
                Some(token) => token,
                None => {
                    let ledger = fetch_ledger_state(&rpc_client, &ledger_program)?;
                    let token_program = get_token_program_id(&rpc_client, &ledger.mint)?;
                    get_associated_token_address_with_program_id(&recipient, &ledger.mint, &token_program)
                }
            };
            for (from_position, entries) in claimable_pages(&rpc_client, &ledger_program, &payer.pubkey())? {
                let ixs = claim_to_instr(
                    &config,
                    payer.pubkey(),
                    recipient,
                    recipient_token,
                    from_position,
                    &entries,
                )?;
                let signature = sign_and_send(&rpc_client, &payer, &[], &ixs)?;
                println!("positions {}..{}: {}", from_position, from_position + entries.len() as u64, signature);
            }
        }
        Commands::ClaimAndStake {} => {
            for (from_position, entries) in claimable_pages(&rpc_client, &ledger_program, &payer.pubkey())? {
                let ixs = claim_and_stake_instr(&config, payer.pubkey(), from_position, &entries)?;
                let signature = sign_and_send(&rpc_client, &payer, &[], &ixs)?;
                println!("positions {}..{}: {}", from_position, from_position + entries.len() as u64, signature);
            }
        }
        Commands::SetLock { locked } => {
            let ixs = set_lock_instr(&config, admin.pubkey(), locked)?;
            let signature = sign_and_send(&rpc_client, &payer, &[&admin], &ixs)?;
            println!("{}", signature);
        }
        Commands::UpdateAdmin { new_admin } => {
            let ixs = update_admin_instr(&config, admin.pubkey(), new_admin)?;
            let signature = sign_and_send(&rpc_client, &payer, &[&admin], &ixs)?;
            println!("{}", signature);
        }
        Commands::BindStaking {} => {
            let ixs = bind_staking_instr(&config, admin.pubkey())?;
            let signature = sign_and_send(&rpc_client, &payer, &[&admin], &ixs)?;
            println!("{}", signature);
        }
        Commands::ShowVestings { holder } => {
            let holder = holder.unwrap_or_else(|| payer.pubkey());
            let now = get_cluster_time(&rpc_client)?;
            let indices = fetch_holder_entries(&rpc_client, &ledger_program, &holder)?;
            let views = fetch_entries(&rpc_client, &ledger_program, &indices)?
                .iter()
                .map(|entry| EntryView::new(entry, now))
                .collect::<Result<Vec<_>>>()?;
            print_json(&views)?;
        }
        Commands::VestingsRange { from, to } => {
            let now = get_cluster_time(&rpc_client)?;
            let views = fetch_entries_in_range(&rpc_client, &ledger_program, from, to)?
                .iter()
                .map(|entry| EntryView::new(entry, now))
                .collect::<Result<Vec<_>>>()?;
            print_json(&views)?;
        }
        Commands::Claimable { holder, index } => {
            let holder = holder.unwrap_or_else(|| payer.pubkey());
            let entries = fetch_holder_entries(&rpc_client, &ledger_program, &holder)?;
            let claimable: u64 = match index {
                Some(index) => {
                    let entry = usize::try_from(index)
                        .ok()
                        .and_then(|position| entries.get(position))
                        .copied();
                    let ixs = get_claimable_instr(&config, holder, index, entry)?;
                    simulate_view(&rpc_client, &payer, ixs[0].clone())?
                }
                None if entries.len() <= vesting_ledger::MAX_VIEW_ENTRIES => {
                    let ixs = get_all_claimable_instr(&config, holder, &entries)?;
                    simulate_view(&rpc_client, &payer, ixs[0].clone())?
                }
                None => {
                    // Over the view cap; sum off-chain.
                    let now = get_cluster_time(&rpc_client)?;
                    let mut total = 0u64;
                    for entry in fetch_entries(&rpc_client, &ledger_program, &entries)? {
                        total = total
                            .checked_add(entry.claimable(now)?)
                            .ok_or_else(|| format_err!("claimable overflow"))?;
                    }
                    total
                }
            };
            println!("{}", claimable);
        }
        Commands::InitPool {
            admin,
            mint,
            unstake_cooldown,
        } => {
            let ixs = initialise_pool_instr(&config, admin, mint, unstake_cooldown)?;
            let signature = sign_and_send(&rpc_client, &payer, &[], &ixs)?;
            println!("{}", signature);
        }
        Commands::Stake { amount } => {
            let ixs = stake_instr(&config, payer.pubkey(), amount)?;
            let signature = sign_and_send(&rpc_client, &payer, &[], &ixs)?;
            println!("{}", signature);
        }
        Commands::RequestUnstake {} => {
            let ixs = request_unstake_instr(&config, payer.pubkey())?;
            let signature = sign_and_send(&rpc_client, &payer, &[], &ixs)?;
            println!("{}", signature);
        }
        Commands::Unstake {} => {
            let ixs = unstake_instr(&config, payer.pubkey())?;
            let signature = sign_and_send(&rpc_client, &payer, &[], &ixs)?;
            println!("{}", signature);
        }
        Commands::ClaimReward {} => {
            let ixs = claim_reward_instr(&config, payer.pubkey())?;
            let signature = sign_and_send(&rpc_client, &payer, &[], &ixs)?;
            println!("{}", signature);
        }
        Commands::NotifyReward { amount, duration } => {
            let ixs = notify_reward_instr(&config, admin.pubkey(), amount, duration)?;
            let signature = sign_and_send(&rpc_client, &payer, &[&admin], &ixs)?;
            println!("{}", signature);
        }
        Commands::UpdatePoolConfig {
            param,
            value,
            new_admin,
        } => {
            let ixs = update_pool_config_instr(&config, admin.pubkey(), param, value, new_admin)?;
            let signature = sign_and_send(&rpc_client, &payer, &[&admin], &ixs)?;
            println!("{}", signature);
        }
        Commands::ShowStake { owner } => {
            let owner = owner.unwrap_or_else(|| payer.pubkey());
            let ixs = get_stake_account_instr(&config, owner)?;
            let account: staking_pool::states::StakeAccount =
                simulate_view(&rpc_client, &payer, ixs[0].clone())?;
            let ixs = get_earned_instr(&config, owner)?;
            let earned: u64 = simulate_view(&rpc_client, &payer, ixs[0].clone())?;
            print_json(&StakeView::new(&account, earned))?;
        }
        Commands::ShowSchedule {} => {
            let ixs = get_reward_schedule_instr(&config)?;
            let schedule: staking_pool::states::RewardSchedule =
                simulate_view(&rpc_client, &payer, ixs[0].clone())?;
            print_json(&ScheduleView::from(&schedule))?;
        }
    }
    Ok(())
}
