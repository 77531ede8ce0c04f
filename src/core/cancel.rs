use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// A one-shot stop request shared between the coordinator and a running step.
///
/// Once cancelled a token stays cancelled; every clone observes the same state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
