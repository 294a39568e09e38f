//! In-memory store backend.

pub mod backend;

pub use backend::MemoryBackend;
