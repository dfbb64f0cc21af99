pub mod commands;
pub mod config;
pub mod dashboard;
pub mod database;
pub mod error;
pub mod evaluation;
pub mod health;
pub mod metrics;
pub mod period;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod test_utils;
pub mod usage_tracking;

pub use config::Config;
pub use server::Server;
