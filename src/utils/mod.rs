pub mod logging;
pub mod metrics;
pub mod retry;

pub use metrics::{MetricStats, PerformanceMonitor};
pub use retry::{retry_with_backoff, CircuitBreaker, CircuitState};
