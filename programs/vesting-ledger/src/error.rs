use anchor_lang::prelude::*;

#[error_code]
pub enum VestingError {
    #[msg("Signer is not the ledger admin")]
    Unauthorized,

    #[msg("Null identity is not allowed")]
    NullIdentity,

    #[msg("Invalid parameter provided")]
    InvalidParam,

    #[msg("Grant arrays differ in length")]
    LengthMismatch,

    #[msg("Grant batch is empty")]
    EmptyBatch,

    #[msg("Start date is after end date")]
    InvalidDateRange,

    #[msg("Start tokens exceed the total amount")]
    InvalidAllocation,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Range start is after range end")]
    InvalidRange,

    #[msg("Index out of range")]
    OutOfRange,

    #[msg("Too many entries for a single view")]
    ViewTooLarge,

    #[msg("Ledger is locked")]
    LedgerLocked,

    #[msg("Holder has no vestings")]
    NoVestings,

    #[msg("Nothing to claim")]
    NothingToClaim,

    #[msg("Staking pool is not configured")]
    StakingNotConfigured,

    #[msg("Staking pool is already bound")]
    StakingAlreadyBound,

    #[msg("Staking pool does not use the ledger mint")]
    StakingMintMismatch,

    #[msg("Unable to stake while an unstake request is pending")]
    UnableToStake,

    #[msg("Vesting entry account does not match the expected index")]
    InvalidEntryAccount,

    #[msg("Holder index account does not match the holder")]
    InvalidHolderIndex,

    #[msg("Missing remaining account")]
    MissingRemainingAccount,

    #[msg("The managed token cannot be recovered")]
    ManagedTokenRecovery,

    #[msg("Token account is not held by the ledger authority")]
    InvalidVault,

    #[msg("Math operation overflowed or underflowed")]
    MathOverflow,
}
