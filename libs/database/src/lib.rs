//! Data store access for ScholarPath.
//!
//! The store is a PostgREST endpoint (Supabase). This crate owns the HTTP
//! client, the filter vocabulary the services use, RPC calls, and startup
//! health checks.
//!
//! # Features
//!
//! - `config` - `core_config::FromEnv` for [`postgrest::PostgrestConfig`]
//!
//! ```ignore
//! use database::postgrest::{PostgrestConfig, connect_with_retry};
//!
//! let client = connect_with_retry(PostgrestConfig::from_env()?, None).await?;
//!
//! let rows: Vec<Scholarship> = client
//!     .from("scholarships")
//!     .eq("award_type", "Merit")
//!     .execute()
//!     .await?;
//! ```

pub mod common;
pub mod postgrest;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
