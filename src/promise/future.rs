//! The promise handle, its executor, and the resolve/reject entry points.
//!
//! A `Promise` is a reference-counted handle; clones alias the same promise. All state lives
//! in a `RefCell`, and no borrow is held while user code (an executor or a handler) runs,
//! so handlers may freely register on or settle any promise, including their own source.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use futures::task::Task;

use policy::{DrainPolicy, Policy};
use super::queue::ContinuationQueue;
use super::state::{State, StateKind, Transition};

pub(crate) struct Inner<T, E> {
    pub policy: Policy,
    pub state: State<T, E>,
    pub resolution: ContinuationQueue<T, T, E>,
    pub rejection: ContinuationQueue<E, T, E>,
    /// futures-rs tasks waiting for this promise to settle.
    pub parked: Vec<Task>,
}

/// A deferred value: pending, then resolved with a `T` or rejected with an `E`.
pub struct Promise<T, E> {
    pub(crate) inner: Rc<RefCell<Inner<T, E>>>,
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Promise { inner: self.inner.clone() }
    }
}

/// Settles a promise with a value. Given to the executor; may be kept and called later.
pub struct Resolver<T, E> {
    promise: Promise<T, E>,
}

/// Settles a promise with a reason. Given to the executor; may be kept and called later.
pub struct Rejecter<T, E> {
    promise: Promise<T, E>,
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Resolver { promise: self.promise.clone() }
    }
}

impl<T, E> Clone for Rejecter<T, E> {
    fn clone(&self) -> Self {
        Rejecter { promise: self.promise.clone() }
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Resolver<T, E> {
    pub fn resolve(&self, value: T) -> Transition {
        self.promise.settle(State::Resolved(value))
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Rejecter<T, E> {
    pub fn reject(&self, reason: E) -> Transition {
        self.promise.settle(State::Rejected(reason))
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Promise<T, E> {
    /// Creates a promise with the default policy and runs `executor` on it immediately.
    ///
    /// The executor gets a `Resolver` and a `Rejecter`. If it returns `Err`, the promise is
    /// rejected with that error, as if the executor had called the rejecter.
    pub fn new<F>(executor: F) -> Self where
    F: FnOnce(Resolver<T, E>, Rejecter<T, E>) -> Result<(), E> {
        Self::with_policy(Policy::default(), executor)
    }

    /// Like `new`, with an explicit policy. Promises chained from this one inherit it.
    pub fn with_policy<F>(policy: Policy, executor: F) -> Self where
    F: FnOnce(Resolver<T, E>, Rejecter<T, E>) -> Result<(), E> {
        let p = Self::detached(policy);
        let resolver = Resolver { promise: p.clone() };
        let rejecter = Rejecter { promise: p.clone() };

        if let Err(e) = executor(resolver, rejecter) {
            debug!("promise #{:x}: executor failed", p.id());
            p.reject(e);
        }

        p
    }

    /// A pending promise with no executor. It is settled only by whoever holds a handle to it.
    pub(crate) fn detached(policy: Policy) -> Self {
        let p = Promise {
            inner: Rc::new(RefCell::new(Inner {
                policy: policy,
                state: State::Pending,
                resolution: ContinuationQueue::new(),
                rejection: ContinuationQueue::new(),
                parked: Vec::new(),
            })),
        };
        trace!("promise #{:x}: created ({})", p.id(), policy);
        p
    }

    #[cfg(test)]
    pub(crate) fn pending() -> Self {
        Self::detached(Policy::default())
    }

    pub(crate) fn resolve(&self, value: T) -> Transition {
        self.settle(State::Resolved(value))
    }

    pub(crate) fn reject(&self, reason: E) -> Transition {
        self.settle(State::Rejected(reason))
    }

    fn settle(&self, next: State<T, E>) -> Transition {
        let kind = next.kind();
        let id = self.id();
        let (policy, transition, parked) = {
            let mut inner = self.inner.borrow_mut();
            let policy = inner.policy;
            let transition = inner.state.settle(next, policy.settle);
            let parked: Vec<Task> = if transition.took_effect() {
                inner.parked.drain(..).collect()
            } else {
                Vec::new()
            };
            (policy, transition, parked)
        };

        match transition {
            Transition::Settled => debug!("promise #{:x}: {}", id, kind),
            Transition::Overwrote => warn!("promise #{:x}: settled again, now {}", id, kind),
            Transition::Ignored => warn!("promise #{:x}: ignored late {}", id, kind),
        }

        for task in parked {
            task.notify();
        }

        if transition.took_effect() && policy.drain == DrainPolicy::Live {
            match self.state() {
                State::Resolved(value) => self.drain_resolution(value),
                State::Rejected(reason) => {
                    self.short_circuit(reason.clone());
                    self.drain_rejection(reason);
                }
                State::Pending => (),
            }
        }

        transition
    }

    /// A snapshot of this promise's state.
    pub fn state(&self) -> State<T, E> {
        self.inner.borrow().state.clone()
    }
}

impl<T, E> Promise<T, E> {
    pub fn kind(&self) -> StateKind {
        self.inner.borrow().state.kind()
    }

    pub fn is_pending(&self) -> bool {
        self.kind() == StateKind::Pending
    }

    pub fn policy(&self) -> Policy {
        self.inner.borrow().policy
    }

    /// Identifies this promise in log output: the address of its shared state, so it is
    /// distinct among live promises and equal across clones of one handle.
    pub fn id(&self) -> usize {
        &*self.inner as *const RefCell<Inner<T, E>> as usize
    }

    /// Number of `then` continuations waiting in this promise's queue.
    pub fn queued_thens(&self) -> usize {
        self.inner.borrow().resolution.len()
    }

    /// Number of `catch` continuations waiting in this promise's queue.
    pub fn queued_catches(&self) -> usize {
        self.inner.borrow().rejection.len()
    }

    /// True if both handles refer to the same promise.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let id = self.id();
        match self.inner.try_borrow() {
            Ok(inner) => f.debug_struct("Promise")
                .field("id", &id)
                .field("state", &inner.state.kind())
                .field("thens", &inner.resolution.len())
                .field("catches", &inner.rejection.len())
                .finish(),
            Err(_) => f.write_str("Promise { <borrowed> }"),
        }
    }
}
