//! Periodic monitor
//!
//! The monitor is the host-side driver: it owns the registry and runs one
//! independent timer per target. Each tick performs a single check through
//! the [`ContentChecker`] pull operation and records the result. Concurrency
//! across targets comes only from the timers; the checker itself stays a
//! single suspending call.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::checker::ContentChecker;
use crate::config::CheckTarget;
use crate::error::ConfigError;
use crate::registry::WatchRegistry;
use crate::result::CheckResult;

/// Drives periodic checks for a set of targets
pub struct Monitor {
    checker: Arc<dyn ContentChecker>,
    registry: Arc<WatchRegistry>,
    handles: Vec<JoinHandle<()>>,
}

impl Monitor {
    /// Create a monitor with an empty registry
    pub fn new(checker: Arc<dyn ContentChecker>) -> Self {
        Self {
            checker,
            registry: Arc::new(WatchRegistry::new()),
            handles: Vec::new(),
        }
    }

    /// Register a target before starting
    pub fn add_target(&self, target: CheckTarget) -> Result<(), ConfigError> {
        self.registry.insert(target)
    }

    /// The shared registry
    pub fn registry(&self) -> Arc<WatchRegistry> {
        Arc::clone(&self.registry)
    }

    /// Run one immediate check for a registered target and record it
    pub async fn check_now(&self, url: &str) -> Option<CheckResult> {
        let target = self.registry.target(url)?;
        let result = self.checker.check(&target).await;
        record_and_log(&self.registry, &target, result.clone());
        Some(result)
    }

    /// Spawn one periodic task per registered target
    ///
    /// Each task checks immediately, then on every interval tick, until the
    /// monitor is stopped. Call once after registering targets; a second
    /// call would double up the timers.
    pub fn start(&mut self) {
        for target in self.registry.targets() {
            let checker = Arc::clone(&self.checker);
            let registry = Arc::clone(&self.registry);

            self.handles.push(tokio::spawn(async move {
                let mut ticker = tokio::time::interval(target.interval());
                loop {
                    ticker.tick().await;
                    let result = checker.check(&target).await;
                    record_and_log(&registry, &target, result);
                }
            }));
        }
        info!(targets = self.registry.len(), "Monitor started");
    }

    /// Abort all periodic tasks
    ///
    /// The registry and its recorded results stay readable after stopping.
    pub fn stop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        info!("Monitor stopped");
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn record_and_log(registry: &WatchRegistry, target: &CheckTarget, result: CheckResult) {
    let state = result.state.clone();
    let previous = registry.record(&target.url, result);

    match (previous, state.fingerprint()) {
        (Some(old), Some(new)) if old != new => {
            info!(url = %target.url, old, new, "Content changed");
        }
        (_, None) => {
            warn!(url = %target.url, "Check failed; state unavailable");
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetConfig;
    use crate::result::{CheckState, LengthField, StatusField};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Checker that returns a different fingerprint on every call
    struct CountingChecker {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentChecker for CountingChecker {
        async fn check(&self, target: &CheckTarget) -> CheckResult {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            CheckResult {
                state: CheckState::Fingerprint(format!("fp{n:06}")),
                error: String::new(),
                extract: String::new(),
                status_code: StatusField::Code(200),
                content_length: LengthField::Unknown,
                timeout: target.timeout_secs,
                interval: target.interval_secs,
            }
        }
    }

    fn counting_monitor() -> (Monitor, Arc<WatchRegistry>) {
        let monitor = Monitor::new(Arc::new(CountingChecker {
            calls: AtomicUsize::new(0),
        }));
        let registry = monitor.registry();
        (monitor, registry)
    }

    #[tokio::test]
    async fn test_check_now_records_result() {
        let (monitor, registry) = counting_monitor();
        let target = TargetConfig::new("https://example.com").build().unwrap();
        monitor.add_target(target).unwrap();

        let result = monitor.check_now("https://example.com").await.unwrap();
        assert!(result.is_available());
        assert_eq!(
            registry.latest("https://example.com").unwrap().state,
            result.state
        );
    }

    #[tokio::test]
    async fn test_check_now_unknown_url() {
        let (monitor, _) = counting_monitor();
        assert!(monitor.check_now("https://nowhere.invalid").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_ticks_record_results() {
        let (mut monitor, registry) = counting_monitor();
        let target = TargetConfig::new("https://example.com")
            .interval(60)
            .build()
            .unwrap();
        monitor.add_target(target).unwrap();
        monitor.start();

        // First tick fires immediately
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        let first = registry.latest("https://example.com").unwrap();

        // Advance past one interval
        tokio::time::sleep(std::time::Duration::from_secs(61)).await;
        let second = registry.latest("https://example.com").unwrap();

        assert_ne!(first.state, second.state);
        monitor.stop();
    }

    #[tokio::test]
    async fn test_stop_aborts_tasks() {
        let (mut monitor, _) = counting_monitor();
        let target = TargetConfig::new("https://example.com").build().unwrap();
        monitor.add_target(target).unwrap();
        monitor.start();
        monitor.stop();
        // Stopping twice is fine
        monitor.stop();
    }
}
