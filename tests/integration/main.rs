//! Integration tests: the full router over the in-memory backend.

mod helpers;

mod locker_flow;
mod otp_flow;
mod tool_flow;
