//! Publish/subscribe snapshot cell
//!
//! Holds the latest value and fans each replacement out to subscribers over
//! channels. Values are replaced whole, never mutated in place, so every
//! reader sees a consistent snapshot.

use std::sync::mpsc::{self, Receiver, Sender};

/// Latest-value cell with channel subscribers
#[derive(Debug)]
pub struct Observable<T: Clone> {
    value: T,
    subscribers: Vec<Sender<T>>,
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Vec::new(),
        }
    }

    /// Current snapshot
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and notify subscribers
    ///
    /// Subscribers whose receiver was dropped are forgotten.
    pub fn publish(&mut self, value: T) {
        self.value = value;
        let snapshot = &self.value;
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }

    /// Subscribe to future values; the current value is delivered first
    pub fn subscribe(&mut self) -> Receiver<T> {
        let (tx, rx) = mpsc::channel();
        if tx.send(self.value.clone()).is_ok() {
            self.subscribers.push(tx);
        }
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
