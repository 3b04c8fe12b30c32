use anchor_lang::prelude::*;

#[error_code]
pub enum StakingError {
    #[msg("Signer is not the pool admin")]
    Unauthorized,

    #[msg("Null identity is not allowed")]
    NullIdentity,

    #[msg("Invalid parameter provided")]
    InvalidParam,

    #[msg("Missing remaining account")]
    MissingRemainingAccount,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Cooldown must not be negative")]
    InvalidCooldown,

    #[msg("Reward duration must be greater than zero")]
    ZeroDuration,

    #[msg("Reward rate truncates to zero")]
    RewardRateZero,

    #[msg("Reward vault cannot cover the scheduled emission")]
    RewardTooHigh,

    #[msg("Unable to stake while an unstake request is pending")]
    UnableToStake,

    #[msg("Nothing is staked")]
    NothingStaked,

    #[msg("Unstake already requested")]
    UnstakeAlreadyRequested,

    #[msg("No unstake request is pending")]
    NoUnstakeRequest,

    #[msg("Unstake cooldown has not elapsed")]
    CooldownNotElapsed,

    #[msg("Stake account does not belong to the beneficiary")]
    StakeAccountMismatch,

    #[msg("The managed token cannot be recovered")]
    ManagedTokenRecovery,

    #[msg("Token account is not held by the pool authority")]
    InvalidVault,

    #[msg("Math operation overflowed or underflowed")]
    MathOverflow,
}
