//! Locker custody engine.

pub mod engine;

pub use engine::{CheckinOutcome, CheckoutOutcome, LockerEngine, LockerView};
