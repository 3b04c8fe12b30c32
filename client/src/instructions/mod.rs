pub mod queries;
pub mod rpc;
pub mod staking_instructions;
pub mod utils;
pub mod vesting_instructions;
