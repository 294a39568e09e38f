//! Admin OTP login.

pub mod otp;

pub use otp::OtpService;
