//! # payflow-database
//!
//! PostgreSQL connection pool management, the migration runner, and
//! repository implementations for Payflow.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
