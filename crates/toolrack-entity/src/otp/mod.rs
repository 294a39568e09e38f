//! One-time passwords for admin login.

pub mod model;

pub use model::{NewOtpCode, OtpCode};
