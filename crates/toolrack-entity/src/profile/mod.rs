//! Technician/admin profiles.

pub mod model;

pub use model::{Profile, Role};
