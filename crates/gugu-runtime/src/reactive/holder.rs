#![forbid(unsafe_code)]

//! Replay-latest value holder with RAII subscriptions.
//!
//! # Design
//!
//! [`ValueHolder<T>`] keeps one value in shared, reference-counted storage
//! (`Rc<RefCell<..>>`). There is always a current value. A new subscriber
//! receives that value immediately, then every value written after it.
//!
//! Unlike a change-tracking cell, `set` does not compare against the old
//! value: writing the same value twice notifies twice. Consumers that
//! recompute on every write rely on this.
//!
//! # Performance
//!
//! | Operation     | Complexity                 |
//! |---------------|----------------------------|
//! | `get()`       | O(1) + clone               |
//! | `set()`       | O(S) where S = subscribers |
//! | `subscribe()` | O(S) (prunes dead entries) |
//!
//! # Failure Modes
//!
//! - **Re-entrant set**: Calling `set()` from within a subscriber callback
//!   panics. A nested write would reach later subscribers before the outer
//!   value, leaving them on a stale value.
//! - **Held subscriptions**: callbacks stay live for as long as their
//!   [`Subscription`] guard is held. Owners that re-subscribe must drop the
//!   previous guard first.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

struct HolderInner<T> {
    value: T,
    version: u64,
    /// Weak handles; dead entries are pruned on notify and subscribe.
    subscribers: Vec<CallbackWeak<T>>,
}

/// Marks one callback frame; released on drop, including during unwinding.
struct DepthGuard<'a>(&'a Cell<u32>);

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<u32>) -> Self {
        depth.set(depth.get() + 1);
        Self(depth)
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

/// A single mutable slot that replays its latest value to new subscribers.
///
/// Cloning a `ValueHolder` creates another handle to the **same** slot.
///
/// # Invariants
///
/// 1. A current value always exists; no subscriber waits for a first value.
/// 2. `version` increments by exactly 1 on every `set`.
/// 3. Subscribers are notified in registration order.
/// 4. A dropped [`Subscription`] is never called again.
pub struct ValueHolder<T> {
    inner: Rc<RefCell<HolderInner<T>>>,
    depth: Rc<Cell<u32>>,
}

impl<T> Clone for ValueHolder<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            depth: Rc::clone(&self.depth),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ValueHolder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ValueHolder")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Default + Clone + 'static> Default for ValueHolder<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> ValueHolder<T> {
    /// Create a holder with the given initial value at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(HolderInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
            // Callback frames currently on the stack (notify or replay).
            depth: Rc::new(Cell::new(0)),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Store `value` and synchronously notify every live subscriber.
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from within a subscriber callback.
    pub fn set(&self, value: T) {
        assert!(
            self.depth.get() == 0,
            "ValueHolder::set called from within a subscriber callback"
        );
        {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Subscribe to the holder.
    ///
    /// The callback is invoked once with the current value before this
    /// method returns, then with every later value until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner.subscribers.push(Rc::downgrade(&strong));
        }

        let current = self.get();
        {
            let _frame = DepthGuard::enter(&self.depth);
            strong(&current);
        }

        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of writes since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered subscribers, including dropped ones not yet
    /// pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Number of subscribers whose guard is still held.
    #[must_use]
    pub fn live_subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    fn notify(&self) {
        // Snapshot callbacks and value so no borrow is held during the calls.
        let (callbacks, value) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let callbacks: Vec<CallbackRc<T>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (callbacks, inner.value.clone())
        };

        let _frame = DepthGuard::enter(&self.depth);
        for cb in &callbacks {
            cb(&value);
        }
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the guard drops the only strong reference to the callback, so the
/// holder's weak handle fails to upgrade from then on.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
