//! The single piece of state shared between the listener and the renderer.
//!
//! The listener is the sole writer, the renderer the sole reader. Neither
//! side ever sees the raw storage; the mutex is held only for the swap or
//! the clone, never across I/O.

use std::sync::{Arc, Mutex};

/// A shared, thread-safe message cell. Cloning is cheap and all clones
/// refer to the same underlying value.
#[derive(Clone)]
pub struct SharedMessage {
    inner: Arc<Mutex<String>>,
}

impl SharedMessage {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial.into())),
        }
    }

    /// Replace the current message unconditionally (last write wins).
    pub fn set(&self, message: String) {
        let mut guard = self.inner.lock().unwrap();
        *guard = message;
    }

    /// Take one consistent snapshot of the current message. Callers that
    /// need the value more than once must reuse the snapshot rather than
    /// read again, or they may observe two different writes.
    pub fn snapshot(&self) -> String {
        self.inner.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_initial_value() {
        let msg = SharedMessage::new("hello");
        assert_eq!(msg.snapshot(), "hello");
    }

    #[test]
    fn test_last_write_wins() {
        let msg = SharedMessage::new("initial");
        msg.set("A".to_string());
        msg.set("B".to_string());
        assert_eq!(msg.snapshot(), "B");
    }

    #[test]
    fn test_concurrent_writes_never_tear() {
        let msg = SharedMessage::new("initial");
        let values: Vec<String> = (0..8).map(|i| format!("writer-{}", i)).collect();

        let handles: Vec<_> = values
            .iter()
            .cloned()
            .map(|v| {
                let cell = msg.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        cell.set(v.clone());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // The final snapshot must be exactly one of the written values,
        // never a mixture of two.
        let seen = msg.snapshot();
        assert!(values.contains(&seen), "torn or unknown value: {}", seen);
    }

    #[test]
    fn test_reads_during_writes_see_whole_values() {
        let msg = SharedMessage::new("XXXX");
        let writer_cell = msg.clone();
        let writer = thread::spawn(move || {
            for i in 0..500 {
                let v = if i % 2 == 0 { "AAAA" } else { "BBBB" };
                writer_cell.set(v.to_string());
            }
        });
        for _ in 0..500 {
            let seen = msg.snapshot();
            assert!(
                seen == "XXXX" || seen == "AAAA" || seen == "BBBB",
                "torn value: {}",
                seen
            );
        }
        writer.join().unwrap();
    }
}
