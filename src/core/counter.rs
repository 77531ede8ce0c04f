use std::sync::atomic::{AtomicU64, Ordering};

/// Number of records handled by a step, readable while the step is running.
#[derive(Debug, Default)]
pub struct LineCounter {
    processed: AtomicU64,
}

impl LineCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one record and returns the new total.
    pub fn increment(&self) -> u64 {
        self.processed.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::LineCounter;

    #[test]
    fn increments_are_not_lost_across_threads() {
        let counter = Arc::new(LineCounter::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..250 {
                        counter.increment();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.get(), 1000);
    }
}
