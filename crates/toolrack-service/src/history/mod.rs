//! History recording and reads.

pub mod recorder;

pub use recorder::HistoryRecorder;
