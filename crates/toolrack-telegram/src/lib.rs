//! # toolrack-telegram
//!
//! Telegram Bot API implementation of the [`Messenger`] trait, used to
//! deliver admin OTP codes. A no-op messenger is provided for
//! deployments that run with Telegram disabled.
//!
//! [`Messenger`]: toolrack_core::traits::messenger::Messenger

pub mod client;
pub mod noop;

pub use client::TelegramClient;
pub use noop::NoopMessenger;
