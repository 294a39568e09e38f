//! Locker entity: model, status, and audit events.

pub mod event;
pub mod model;
pub mod status;

pub use event::{LockerAction, LockerEvent, NewLockerEvent};
pub use model::{Locker, normalize_code};
pub use status::LockerStatus;
