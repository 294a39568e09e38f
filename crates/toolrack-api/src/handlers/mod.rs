//! HTTP request handlers.

pub mod health;
pub mod locker;
pub mod otp;
pub mod tool;
