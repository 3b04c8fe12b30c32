pub mod account;
pub use account::*;
pub mod token;
pub use token::*;
