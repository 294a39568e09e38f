//! Backend liveness trait.

use async_trait::async_trait;

/// Liveness check surfaced by the health endpoint.
///
/// Implementations answer whether the backing store currently responds
/// to a round trip; they report, never fail.
#[async_trait]
pub trait HealthProbe: Send + Sync + 'static {
    /// True when the backing store answers.
    async fn is_healthy(&self) -> bool;
}
