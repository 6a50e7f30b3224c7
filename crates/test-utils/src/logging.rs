//! Capturing log events in tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Counts ERROR events whose target starts with a prefix.
///
/// ```
/// use test_utils::ErrorCounter;
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let counter = ErrorCounter::new("doc");
/// let subscriber = tracing_subscriber::registry().with(counter.clone());
/// tracing::subscriber::with_default(subscriber, || {
///     tracing::error!(target: "doc::test", "boom");
///     tracing::warn!(target: "doc::test", "not counted");
/// });
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ErrorCounter {
    target_prefix: &'static str,
    count: Arc<AtomicUsize>,
}

impl ErrorCounter {
    pub fn new(target_prefix: &'static str) -> Self {
        Self {
            target_prefix,
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() == Level::ERROR && meta.target().starts_with(self.target_prefix) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}
