// Library Crate Root
// lib.rs
//
// The binary in main.rs imports everything through here like an external crate.
pub mod api;
pub mod config;
pub mod database;
pub mod engine;
pub mod models;

// pub use = re-export at crate root
pub use api::{create_router, AppState};
pub use config::ServerConfig;
pub use database::{establish_connection_pool, Database, MemoryDatabase, SqliteDatabase};
pub use engine::{EngineError, MatchReport, MatchingEngine, MatchingService};
pub use models::{NewOrder, PendingOrder, Trade};
