//! Checkout/checkin session grouping.

pub mod model;

pub use model::{LockerSession, LockerSessionItem, NewLockerSession, SessionKind};
