// src/domain/mod.rs
pub mod audit;
pub mod errors;
pub mod health;
pub mod serde_time;
