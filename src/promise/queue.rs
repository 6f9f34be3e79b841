//! Continuation records and the FIFO queues that hold them.

use std::collections::VecDeque;
use std::fmt;

use super::Promise;

/// What a continuation handed back: a plain value, or another promise to follow.
pub enum Next<T, E> {
    Value(T),
    Chain(Promise<T, E>),
}

impl<T, E> Next<T, E> {
    pub fn value(t: T) -> Self {
        Next::Value(t)
    }

    pub fn chain(p: Promise<T, E>) -> Self {
        Next::Chain(p)
    }
}

impl<T, E> From<Promise<T, E>> for Next<T, E> {
    fn from(p: Promise<T, E>) -> Self {
        Next::Chain(p)
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Next<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Next::Value(ref t) => f.debug_tuple("Value").field(t).finish(),
            Next::Chain(_) => f.write_str("Chain(..)"),
        }
    }
}

/// The result of running a handler. `Err` means the handler failed, and rejects the target.
pub type Outcome<T, E> = Result<Next<T, E>, E>;

/// A boxed handler taking the settled value (for `then`) or reason (for `catch`).
pub type Handler<I, T, E> = Box<dyn FnOnce(I) -> Outcome<T, E>>;

/// A queued handler, paired with the promise its outcome settles.
pub struct Continuation<I, T, E> {
    pub handler: Handler<I, T, E>,
    pub target: Promise<T, E>,
}

impl<I, T, E> Continuation<I, T, E> {
    pub fn new(handler: Handler<I, T, E>, target: Promise<T, E>) -> Self {
        Continuation {
            handler: handler,
            target: target,
        }
    }
}

pub struct ContinuationQueue<I, T, E> {
    inner: VecDeque<Continuation<I, T, E>>,
}

impl<I, T, E> ContinuationQueue<I, T, E> {
    pub fn new() -> Self {
        ContinuationQueue { inner: VecDeque::new() }
    }

    pub fn push(&mut self, c: Continuation<I, T, E>) {
        self.inner.push_back(c);
    }

    /// Removes the oldest entry.
    pub fn pop(&mut self) -> Option<Continuation<I, T, E>> {
        self.inner.pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<I, T, E> Default for ContinuationQueue<I, T, E> {
    fn default() -> Self {
        Self::new()
    }
}
