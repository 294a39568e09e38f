//! # toolrack-entity
//!
//! Domain entity models for ToolRack. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.
//!
//! The `store` module holds the abstract datastore contracts implemented
//! by the `toolrack-database` backends.

pub mod damage;
pub mod locker;
pub mod otp;
pub mod profile;
pub mod session;
pub mod store;
pub mod tool;
