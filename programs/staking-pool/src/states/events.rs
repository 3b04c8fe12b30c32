use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: Emitted for off-chain indexers/clients to track pool state changes
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emitted once when the pool is initialized.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct PoolInitialized {
    pub admin: Pubkey,
    pub mint: Pubkey,
    pub stake_vault: Pubkey,
    pub reward_vault: Pubkey,
    pub unstake_cooldown: i64,
}

/// Emitted whenever `update_config` changes a parameter.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct ConfigUpdated {
    pub admin: Pubkey,
    pub unstake_cooldown: i64,
}

/// Emitted for every deposit, direct or on behalf of a holder.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct StakeAdded {
    /// Beneficiary whose principal grew.
    pub holder: Pubkey,
    pub amount: u64,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct UnstakeRequested {
    pub holder: Pubkey,
    pub principal: u64,
    /// Earliest time `unstake` succeeds.
    pub unlock_at: i64,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Unstaked {
    pub holder: Pubkey,
    pub amount: u64,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RewardPaid {
    pub holder: Pubkey,
    pub amount: u64,
}

/// Emitted when the admin funds a new emission period.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RewardAdded {
    pub amount: u64,
    /// New scaled rate (tokens per second * PRECISION).
    pub reward_rate: u128,
    pub period_finish: i64,
}

/// Emitted when stray (non-managed) assets leave the pool authority.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct StrayAssetsRecovered {
    /// Mint of the swept tokens, or the default key for lamports.
    pub mint: Pubkey,
    pub amount: u64,
    pub recipient: Pubkey,
}
