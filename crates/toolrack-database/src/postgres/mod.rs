//! PostgreSQL store implementations.
//!
//! One store struct per table group, mirroring the abstract contracts in
//! `toolrack_entity::store`. Conditional status updates are plain
//! `UPDATE ... WHERE status = $n` statements; the affected-row count is
//! the concurrency signal.

pub mod damage;
pub mod event;
pub mod locker;
pub mod otp;
pub mod profile;
pub mod session;
pub mod tool;

pub use damage::PgDamageStore;
pub use event::PgEventStore;
pub use locker::PgLockerStore;
pub use otp::PgOtpStore;
pub use profile::PgProfileDirectory;
pub use session::PgSessionStore;
pub use tool::PgToolStore;
