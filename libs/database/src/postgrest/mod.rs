//! PostgREST (Supabase) store client.

pub mod client;
pub mod config;
pub mod connector;
pub mod health;
pub mod query;

pub use client::PostgrestClient;
pub use config::PostgrestConfig;
pub use connector::{connect, connect_with_retry};
pub use health::check_health;
pub use query::TableQuery;
