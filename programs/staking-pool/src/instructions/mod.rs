pub mod initialise_pool;
pub use initialise_pool::*;

pub mod update_configs;
pub use update_configs::*;

pub mod add_token_stake;
pub use add_token_stake::*;

pub mod request_unstake;
pub use request_unstake::*;

pub mod unstake;
pub use unstake::*;

pub mod claim_reward;
pub use claim_reward::*;

pub mod notify_reward_amount;
pub use notify_reward_amount::*;

pub mod recover_stray_assets;
pub use recover_stray_assets::*;

pub mod views;
pub use views::*;
