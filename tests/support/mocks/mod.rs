// tests/support/mocks/mod.rs
pub mod audit;
pub mod checkers;
pub mod time;

pub use audit::*;
pub use checkers::*;
pub use time::*;
