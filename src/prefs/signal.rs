use std::sync::{Arc, Weak};

use parking_lot::Mutex;

type Callback<T> = Box<dyn FnMut(&T) + Send>;

struct Inner<T> {
    value: T,
    next_id: u64,
    subscribers: Vec<(u64, Callback<T>)>,
}

/// An observable value such as the viewport width or the OS color scheme.
///
/// Callbacks run synchronously inside [`Signal::set`] while the signal is
/// locked, so a callback must not read or write the signal it observes.
pub struct Signal<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + Send + 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn get(&self) -> T {
        self.inner.lock().value.clone()
    }

    /// Store a new value and notify subscribers. Returns false when the value
    /// did not change, in which case nobody is notified.
    pub fn set(&self, value: T) -> bool {
        let mut inner = self.inner.lock();
        if inner.value == value {
            return false;
        }
        inner.value = value;

        let Inner {
            value, subscribers, ..
        } = &mut *inner;
        for (_, callback) in subscribers.iter_mut() {
            callback(&*value);
        }
        true
    }

    /// Call `callback` on every future change until the returned
    /// subscription is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&T) + Send + 'static,
    {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, Box::new(callback)));

        let weak: Weak<Mutex<Inner<T>>> = Arc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.lock().subscribers.retain(|(other, _)| *other != id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

/// Keeps a callback registered on a [`Signal`]. Dropping it unsubscribes.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn notifies_only_on_change() {
        let signal = Signal::new(80u16);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = signal.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!signal.set(80));
        assert!(signal.set(120));
        assert!(signal.set(90));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(signal.get(), 90);
    }

    #[test]
    fn drop_unsubscribes() {
        let signal = Signal::new(false);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let sub = signal.subscribe(move |value| log.lock().push(*value));

        signal.set(true);
        drop(sub);
        signal.set(false);

        assert_eq!(*seen.lock(), vec![true]);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn subscription_outliving_signal_is_harmless() {
        let signal = Signal::new(1);
        let sub = signal.subscribe(|_| {});
        drop(signal);
        drop(sub);
    }
}
