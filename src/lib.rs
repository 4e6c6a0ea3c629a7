pub mod config;
#[cfg(feature = "db")]
pub mod db;
pub mod domain;
pub mod error;
pub mod graphql;
pub mod logging;
pub mod metrics;
pub mod server;
pub mod storage;
