use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback = Rc<dyn Fn()>;

#[derive(Default)]
struct Registry {
    next_id: usize,
    subscribers: Vec<(usize, Callback)>,
}

/// Synchronous publish/subscribe hub for state containers.
///
/// Every mutation of a tracked property fires one notification to all current
/// subscribers before the setter returns; there is no batching and no
/// deduplication of rapid successive notifications. Single-threaded on
/// purpose: the containers live on the UI event loop (spec'd cooperative
/// scheduling), so no locking is involved.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    inner: Rc<RefCell<Registry>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback. The subscription lasts until the returned
    /// [`Subscription`] guard is dropped, which scopes notification lifetime
    /// to the consuming view and keeps destroyed views from being notified.
    #[must_use]
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.push((id, Rc::new(callback)));
        Subscription {
            registry: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn notify(&self) {
        // Snapshot first so a callback may subscribe or drop its own
        // subscription without poisoning the borrow.
        let callbacks: Vec<Callback> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Guard tying a subscription to the lifetime of its consumer.
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    id: usize,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .subscribers
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;

    #[test]
    fn every_notify_reaches_every_subscriber() {
        let notifier = ChangeNotifier::new();
        let seen = Rc::new(Cell::new(0));

        let first = Rc::clone(&seen);
        let _a = notifier.subscribe(move || first.set(first.get() + 1));
        let second = Rc::clone(&seen);
        let _b = notifier.subscribe(move || second.set(second.get() + 1));

        notifier.notify();
        notifier.notify();
        assert_eq!(seen.get(), 4);
    }

    #[test]
    fn dropping_the_guard_unsubscribes() {
        let notifier = ChangeNotifier::new();
        let seen = Rc::new(Cell::new(0));

        let counter = Rc::clone(&seen);
        let guard = notifier.subscribe(move || counter.set(counter.get() + 1));
        notifier.notify();
        drop(guard);
        notifier.notify();

        assert_eq!(seen.get(), 1);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn callback_may_drop_its_own_subscription() {
        let notifier = ChangeNotifier::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let inner = Rc::clone(&slot);
        let guard = notifier.subscribe(move || {
            inner.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(guard);

        notifier.notify();
        assert_eq!(notifier.subscriber_count(), 0);
    }
}
