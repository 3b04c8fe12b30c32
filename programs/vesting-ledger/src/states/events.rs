use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: Emitted for off-chain indexers/clients to track ledger changes
// ──────────────────────────────────────────────────────────────────────────────
//

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct LedgerInitialized {
    pub admin: Pubkey,
    pub mint: Pubkey,
    pub vault: Pubkey,
}

/// Emitted once per granted entry.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Vested {
    pub holder: Pubkey,
    pub index: u64,
    pub amount: u64,
    pub end_date: i64,
}

/// Emitted once per claim, with the amount summed over the holder's entries.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Claimed {
    pub holder: Pubkey,
    pub amount: u64,
    /// Token account that received the tokens, or the stake vault.
    pub destination: Pubkey,
    pub staked: bool,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct LockUpdated {
    pub locked: bool,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct StakingBound {
    pub staking_pool: Pubkey,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct AdminUpdated {
    pub old_admin: Pubkey,
    pub new_admin: Pubkey,
}

/// Emitted when stray (non-managed) assets leave the ledger authority.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct StrayAssetsRecovered {
    /// Mint of the swept tokens, or the default key for lamports.
    pub mint: Pubkey,
    pub amount: u64,
    pub recipient: Pubkey,
}
