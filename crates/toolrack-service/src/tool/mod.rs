//! Per-tool action service.

pub mod service;

pub use service::ToolService;
