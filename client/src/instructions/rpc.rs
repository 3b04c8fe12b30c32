use anchor_lang::AnchorDeserialize;
use anyhow::{format_err, Result};
use base64::Engine;
use solana_client::{
    rpc_client::RpcClient,
    rpc_config::{RpcSendTransactionConfig, RpcSimulateTransactionConfig},
};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    sysvar::{self, clock::Clock},
    transaction::Transaction,
};

/// Largest batch `getMultipleAccounts` accepts.
const MULTIPLE_ACCOUNTS_LIMIT: usize = 100;

const MAX_RETURN_DATA: usize = 1024;

pub fn send_txn(client: &RpcClient, txn: &Transaction, wait_confirm: bool) -> Result<Signature> {
    Ok(client.send_and_confirm_transaction_with_spinner_and_config(
        txn,
        if wait_confirm {
            CommitmentConfig::confirmed()
        } else {
            CommitmentConfig::processed()
        },
        RpcSendTransactionConfig {
            skip_preflight: false,
            ..RpcSendTransactionConfig::default()
        },
    )?)
}

/// Signs `instructions` with `payer` plus `extra_signers` and sends them.
pub fn sign_and_send(
    client: &RpcClient,
    payer: &Keypair,
    extra_signers: &[&Keypair],
    instructions: &[Instruction],
) -> Result<Signature> {
    let mut signers = vec![payer];
    for signer in extra_signers {
        if signer.pubkey() != payer.pubkey() {
            signers.push(signer);
        }
    }
    let recent_hash = client.get_latest_blockhash()?;
    let txn = Transaction::new_signed_with_payer(
        instructions,
        Some(&payer.pubkey()),
        &signers,
        recent_hash,
    );
    send_txn(client, &txn, true)
}

/// Runs a view instruction in simulation and decodes its return data.
pub fn simulate_view<T: AnchorDeserialize>(
    client: &RpcClient,
    payer: &Keypair,
    instruction: Instruction,
) -> Result<T> {
    let program_id = instruction.program_id;
    let recent_hash = client.get_latest_blockhash()?;
    let txn = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&payer.pubkey()),
        &[payer],
        recent_hash,
    );
    let result = client
        .simulate_transaction_with_config(
            &txn,
            RpcSimulateTransactionConfig {
                sig_verify: false,
                replace_recent_blockhash: true,
                commitment: Some(CommitmentConfig::confirmed()),
                ..RpcSimulateTransactionConfig::default()
            },
        )?
        .value;
    if let Some(err) = result.err {
        return Err(format_err!(
            "view failed: {:?}\n{}",
            err,
            result.logs.unwrap_or_default().join("\n")
        ));
    }

    // Return data comes back with trailing zero bytes trimmed, or not at all
    // when every byte is zero; pad before decoding.
    let mut bytes = match result.return_data {
        Some(return_data) => {
            if return_data.program_id != program_id.to_string() {
                return Err(format_err!(
                    "return data from unexpected program {}",
                    return_data.program_id
                ));
            }
            let (encoded, _encoding) = return_data.data;
            base64::engine::general_purpose::STANDARD.decode(encoded)?
        }
        None => Vec::new(),
    };
    bytes.resize(MAX_RETURN_DATA, 0);
    T::deserialize(&mut bytes.as_slice()).map_err(Into::into)
}

/// Fetches `keys` in order, batching requests; missing accounts are `None`.
pub fn get_multiple_accounts(client: &RpcClient, keys: &[Pubkey]) -> Result<Vec<Option<Account>>> {
    let mut accounts = Vec::with_capacity(keys.len());
    for chunk in keys.chunks(MULTIPLE_ACCOUNTS_LIMIT) {
        accounts.extend(client.get_multiple_accounts(chunk)?);
    }
    Ok(accounts)
}

/// Cluster time as seen by the programs.
pub fn get_cluster_time(client: &RpcClient) -> Result<i64> {
    let account = client.get_account(&sysvar::clock::id())?;
    let clock: Clock = bincode::deserialize(&account.data)?;
    Ok(clock.unix_timestamp)
}
