pub mod events;
pub use events::*;

pub mod pool_config;
pub use pool_config::*;

pub mod stake_account;
pub use stake_account::*;
