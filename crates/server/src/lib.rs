//! Tirta Depot server library.
//!
//! Exposes the sales-report aggregation engine and its HTTP surface so the
//! binary and the integration tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod reports;
pub mod routes;
pub mod state;
