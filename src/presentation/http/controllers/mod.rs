// src/presentation/http/controllers/mod.rs
pub mod audit;
pub mod health;
pub mod metrics;
pub mod root;
