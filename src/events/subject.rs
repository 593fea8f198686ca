//! Owned, single-threaded event channels.
//!
//! A [`Subject`] fans every emitted value out to the [`Subscription`]s created
//! from it. Each subscription is the receiving half of its own channel, so a
//! subscriber that goes away is pruned on the next emission, and a subject that
//! is destroyed (or dropped) disconnects every subscriber at once.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

pub struct Subject<T> {
    senders: RefCell<Vec<Sender<T>>>,
    destroyed: Cell<bool>,
}

impl<T: Clone> Subject<T> {
    pub fn new() -> Self {
        Self { senders: RefCell::new(Vec::new()), destroyed: Cell::new(false) }
    }

    /// Register a new subscriber. Subscribing to a destroyed subject yields a
    /// subscription that is already closed.
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::channel();
        if !self.destroyed.get() {
            self.senders.borrow_mut().push(tx);
        }
        Subscription { rx, peeked: RefCell::new(VecDeque::new()) }
    }

    /// Deliver `value` to every live subscriber. Returns how many received it.
    pub fn emit(&self, value: T) -> usize {
        let mut senders = self.senders.borrow_mut();
        senders.retain(|tx| tx.send(value.clone()).is_ok());
        senders.len()
    }

    pub fn subscribers(&self) -> usize {
        self.senders.borrow().len()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Release every subscriber registration. Later emissions are dropped.
    pub fn destroy(&self) {
        self.destroyed.set(true);
        self.senders.borrow_mut().clear();
    }
}

impl<T: Clone> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("subscribers", &self.senders.borrow().len())
            .field("destroyed", &self.destroyed.get())
            .finish()
    }
}

/// Receiving end of a [`Subject`]. Dropping it unsubscribes.
pub struct Subscription<T> {
    rx: Receiver<T>,
    peeked: RefCell<VecDeque<T>>,
}

impl<T> Subscription<T> {
    /// Next pending event, if any.
    pub fn try_next(&self) -> Option<T> {
        self.peeked.borrow_mut().pop_front().or_else(|| self.rx.try_recv().ok())
    }

    /// All pending events in emission order.
    pub fn drain(&self) -> Vec<T> {
        let mut events: Vec<T> = self.peeked.borrow_mut().drain(..).collect();
        events.extend(self.rx.try_iter());
        events
    }

    /// `true` once the subject has been destroyed or dropped and every
    /// pending event has been consumed.
    pub fn is_closed(&self) -> bool {
        match self.rx.try_recv() {
            Ok(event) => {
                self.peeked.borrow_mut().push_back(event);
                false
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => self.peeked.borrow().is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_every_subscriber() {
        let subject = Subject::new();
        let first = subject.subscribe();
        let second = subject.subscribe();

        assert_eq!(subject.emit(7), 2);
        assert_eq!(first.drain(), vec![7]);
        assert_eq!(second.drain(), vec![7]);
    }

    #[test]
    fn test_dropped_subscription_is_pruned() {
        let subject = Subject::new();
        let kept = subject.subscribe();
        {
            let _gone = subject.subscribe();
            assert_eq!(subject.subscribers(), 2);
        }

        subject.emit("x");
        assert_eq!(subject.subscribers(), 1);
        assert_eq!(kept.try_next(), Some("x"));
    }

    #[test]
    fn test_destroy_releases_subscribers() {
        let subject: Subject<u8> = Subject::new();
        let sub = subject.subscribe();

        subject.destroy();

        assert_eq!(subject.subscribers(), 0);
        assert_eq!(subject.emit(1), 0);
        assert!(sub.is_closed());
    }

    #[test]
    fn test_drop_releases_subscribers() {
        let subject: Subject<u8> = Subject::new();
        let sub = subject.subscribe();
        drop(subject);
        assert!(sub.is_closed());
    }

    #[test]
    fn test_subscribe_after_destroy_is_closed() {
        let subject: Subject<()> = Subject::new();
        subject.destroy();
        let sub = subject.subscribe();
        assert!(sub.is_closed());
    }
}
