pub mod reward;
pub use reward::*;
