//! Damage reports filed at checkin.

pub mod model;

pub use model::{DamageReport, DamageReportItem, DamagedItem, NewDamageReport};
