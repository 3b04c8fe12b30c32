pub mod initialise_ledger;
pub use initialise_ledger::*;

pub mod grant_batch;
pub use grant_batch::*;

pub mod claim;
pub use claim::*;

pub mod claim_and_stake;
pub use claim_and_stake::*;

pub mod admin;
pub use admin::*;

pub mod bind_staking;
pub use bind_staking::*;

pub mod recover_stray_assets;
pub use recover_stray_assets::*;

pub mod views;
pub use views::*;
