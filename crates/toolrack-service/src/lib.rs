//! # toolrack-service
//!
//! Business logic layer for ToolRack. The engines here own every state
//! transition: locker checkout/checkin, per-tool actions, session
//! pairing, history recording, and OTP login.
//!
//! Services follow constructor injection — store trait objects are
//! provided at construction time via `Arc` references, so the same
//! engines run against PostgreSQL in production and the in-memory
//! backend in tests.

pub mod actor;
pub mod auth;
pub mod history;
pub mod locker;
pub mod saga;
pub mod session;
pub mod tool;

pub use actor::ActorValidator;
pub use auth::OtpService;
pub use history::HistoryRecorder;
pub use locker::{CheckinOutcome, CheckoutOutcome, LockerEngine, LockerView};
pub use saga::Saga;
pub use session::PairingResolver;
pub use tool::ToolService;
