//! Cross-crate trait seams.

pub mod health;
pub mod messenger;

pub use health::HealthProbe;
pub use messenger::Messenger;
