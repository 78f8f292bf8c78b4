//! PostgreSQL connectivity for the tsundoku services.
//!
//! - `postgres`: pool configuration, connecting (optionally with retry),
//!   running migrations, and health checks.
//! - `common`: the shared `DatabaseError` type and the backoff helper used
//!   while waiting for the database at startup.
//!
//! # Example
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "tsundoku_api").await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
