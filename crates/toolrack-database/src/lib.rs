//! # toolrack-database
//!
//! Store backends for ToolRack: a PostgreSQL implementation (sqlx) and an
//! in-memory implementation used by tests and database-less development.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;

pub use connection::DatabasePool;
pub use memory::MemoryBackend;
