//! Lock-free floating point accumulator for node statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// `f64` stored as bits in an `AtomicU64`, with a CAS-loop `fetch_add`.
#[derive(Debug, Default)]
pub struct AtomicF64 {
    inner: AtomicU64,
}

impl AtomicF64 {
    pub fn new(value: f64) -> Self {
        Self {
            inner: AtomicU64::new(value.to_bits()),
        }
    }

    #[inline]
    pub fn load(&self, ordering: Ordering) -> f64 {
        f64::from_bits(self.inner.load(ordering))
    }

    #[inline]
    pub fn store(&self, value: f64, ordering: Ordering) {
        self.inner.store(value.to_bits(), ordering);
    }

    /// Add `value`, returning the previous total.
    #[inline]
    pub fn fetch_add(&self, value: f64, ordering: Ordering) -> f64 {
        let mut current = self.inner.load(Ordering::Relaxed);
        loop {
            let new = (f64::from_bits(current) + value).to_bits();
            match self
                .inner
                .compare_exchange_weak(current, new, ordering, Ordering::Relaxed)
            {
                Ok(_) => return f64::from_bits(current),
                Err(actual) => current = actual,
            }
        }
    }
}

impl Clone for AtomicF64 {
    fn clone(&self) -> Self {
        Self::new(self.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_load_store() {
        let value = AtomicF64::new(1.5);
        assert_eq!(value.load(Ordering::Relaxed), 1.5);
        value.store(-2.25, Ordering::Relaxed);
        assert_eq!(value.load(Ordering::Relaxed), -2.25);
    }

    #[test]
    fn test_fetch_add() {
        let value = AtomicF64::default();
        assert_eq!(value.fetch_add(0.5, Ordering::Relaxed), 0.0);
        assert_eq!(value.fetch_add(1.0, Ordering::Relaxed), 0.5);
        assert_eq!(value.load(Ordering::Relaxed), 1.5);
    }

    #[test]
    fn test_concurrent_adds() {
        let value = Arc::new(AtomicF64::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let value = Arc::clone(&value);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        value.fetch_add(0.5, Ordering::Relaxed);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(value.load(Ordering::Relaxed), 2000.0);
    }
}
