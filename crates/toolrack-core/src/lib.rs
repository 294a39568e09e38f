//! # toolrack-core
//!
//! Core crate for ToolRack. Contains configuration schemas, pagination
//! types, the outbound messaging trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other ToolRack crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
