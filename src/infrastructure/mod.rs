//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and schema setup (db)
//! - HTTP server setup (server)
//! - Configuration loading (config)
//! - Demo data (seed)
//! - Repository implementations (repositories)
//! - Application state (state)

pub mod config;
pub mod db;
pub mod repositories;
pub mod seed;
pub mod server;
pub mod state;

pub use config::Config;
pub use repositories::*;
pub use state::AppState;
