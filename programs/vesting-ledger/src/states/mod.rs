pub mod events;
pub use events::*;

pub mod ledger_state;
pub use ledger_state::*;

pub mod vesting_entry;
pub use vesting_entry::*;

pub mod holder_index;
pub use holder_index::*;
