// src/lib.rs
//! Compliance and observability core: an in-memory audit trail with
//! retention and export, aggregated health checks, Prometheus metrics and
//! the HTTP boundary that exposes them.
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod telemetry;
