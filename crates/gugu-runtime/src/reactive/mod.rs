#![forbid(unsafe_code)]

//! Reactive input state for the pipeline.
//!
//! - [`ValueHolder`]: a shared single-slot container that always holds the
//!   latest value and replays it to every new subscriber.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//!
//! # Architecture
//!
//! `ValueHolder<T>` uses `Rc<RefCell<..>>` for single-threaded shared
//! ownership. Subscribers are stored as `Weak` function pointers and cleaned
//! up lazily.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per `set`.
//! 2. Subscribers are notified in registration order.
//! 3. `subscribe` delivers the current value before returning.
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.

pub mod holder;

pub use holder::{Subscription, ValueHolder};
