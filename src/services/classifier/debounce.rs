//! Detection Host Loop
//!
//! Re-classification is triggered by content mutations. `DetectionDebouncer`
//! is a single-slot timer: scheduling a run aborts the pending one, so only
//! the last mutation in a burst leads to a classification pass.
//! `DetectionReporter` forwards a detection only when it differs materially
//! from the last one reported.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use policy_guardian_core::Detection;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::settings::ClassifierConfig;

/// Single-slot cancellable timer.
#[derive(Debug)]
pub struct DetectionDebouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DetectionDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Timer using the configured quiet period.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::from_millis(config.debounce_ms)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` once the delay elapses without another `schedule` call.
    pub fn schedule<F, Fut>(&self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task().await;
        });

        let mut slot = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = slot.replace(handle) {
            if !previous.is_finished() {
                debug!("Superseding pending detection run");
            }
            previous.abort();
        }
    }

    /// Drop the pending run, if any.
    pub fn cancel(&self) {
        let mut slot = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = slot.take() {
            previous.abort();
        }
    }

    /// Whether a scheduled run has not completed yet.
    pub fn is_pending(&self) -> bool {
        let slot = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }
}

impl Drop for DetectionDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Remembers the last reported detection for one page.
#[derive(Debug, Clone)]
pub struct DetectionReporter {
    last: Option<Detection>,
    material_delta: f64,
}

impl DetectionReporter {
    pub fn new(material_delta: f64) -> Self {
        Self {
            last: None,
            material_delta,
        }
    }

    /// Returns the detection when it should be reported.
    ///
    /// A pass without a detection leaves the remembered one in place.
    pub fn observe(&mut self, detection: Option<Detection>) -> Option<Detection> {
        let detection = detection?;
        if !detection.differs_materially(self.last.as_ref(), self.material_delta) {
            return None;
        }
        self.last = Some(detection.clone());
        Some(detection)
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.material_change_delta)
    }

    pub fn last(&self) -> Option<&Detection> {
        self.last.as_ref()
    }

    /// Forget the last report (new document loaded).
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use policy_guardian_core::PageType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn detection(page_type: PageType, confidence: f64) -> Detection {
        Detection {
            page_type,
            confidence,
            keyword_matches: Vec::new(),
            content_length: 10,
            title: String::new(),
            url: String::new(),
            detected_at: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_runs_last_scheduled_only() {
        let debouncer = DetectionDebouncer::from_millis(1200);
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let runs = runs.clone();
            debouncer.schedule(move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(800)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_follows_configured_quiet_period() {
        let config = ClassifierConfig {
            debounce_ms: 300,
            ..ClassifierConfig::default()
        };
        assert_eq!(
            DetectionDebouncer::from_config(&ClassifierConfig::default()).delay(),
            Duration::from_millis(1200)
        );

        let debouncer = DetectionDebouncer::from_config(&config);
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        debouncer.schedule(move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_cancel() {
        let debouncer = DetectionDebouncer::from_millis(100);
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        debouncer.schedule(move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_reporter_material_changes() {
        let mut reporter = DetectionReporter::from_config(&ClassifierConfig::default());
        assert!(reporter
            .observe(Some(detection(PageType::PrivacyPolicy, 0.8)))
            .is_some());
        assert!(reporter
            .observe(Some(detection(PageType::PrivacyPolicy, 0.83)))
            .is_none());
        assert!(reporter.observe(None).is_none());
        assert_eq!(reporter.last().map(|d| d.confidence), Some(0.8));
        assert!(reporter
            .observe(Some(detection(PageType::PrivacyPolicy, 0.9)))
            .is_some());
        assert!(reporter
            .observe(Some(detection(PageType::TermsOfService, 0.9)))
            .is_some());

        reporter.reset();
        assert!(reporter
            .observe(Some(detection(PageType::TermsOfService, 0.9)))
            .is_some());
    }
}
