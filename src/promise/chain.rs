//! Continuation registration (`then`, `catch`) and the runner that drains the queues.
//!
//! Under the default policy the queues are drained only here, inside the registration call,
//! and only if the promise is already settled when the call is made. A continuation
//! registered on a pending promise stays queued even after the promise settles, until a
//! later registration finds the promise settled and drains the whole queue.
//! Under `DrainPolicy::Live` the same drains also happen at the moment of settlement.

use policy::DrainPolicy;
use super::future::Promise;
use super::queue::{Continuation, Next, Outcome};
use super::state::State;

impl<T: Clone + 'static, E: Clone + 'static> Promise<T, E> {
    /// Registers a continuation for the resolved value, returning the promise it settles.
    ///
    /// If this promise is already resolved, every queued `then` continuation runs before this
    /// returns, in registration order. If it is already rejected, `handler` is not called and
    /// the returned promise is rejected with the same reason. The continuation is still
    /// queued, so if a permissive late resolve re-stamps this promise, the next `then` runs it
    /// and overwrites the returned promise. Under `DrainPolicy::Live` it is dropped instead.
    pub fn then<F>(&self, handler: F) -> Promise<T, E> where
    F: FnOnce(T) -> Outcome<T, E> + 'static {
        let target = Self::detached(self.policy());
        let c: Continuation<T, T, E> = Continuation::new(Box::new(handler), target.clone());
        trace!("promise #{:x}: then -> #{:x}", self.id(), target.id());

        match self.state() {
            State::Resolved(value) => {
                self.inner.borrow_mut().resolution.push(c);
                self.drain_resolution(value);
            }
            State::Rejected(reason) => {
                self.inner.borrow_mut().resolution.push(c);
                if self.policy().drain == DrainPolicy::Live {
                    self.short_circuit(reason);
                } else {
                    target.reject(reason);
                }
            }
            State::Pending => self.inner.borrow_mut().resolution.push(c),
        }

        target
    }

    /// Registers a continuation for the rejection reason, returning the promise it settles.
    ///
    /// If this promise is already rejected, every queued `catch` continuation runs before this
    /// returns. Otherwise the continuation is only queued; in particular, a `catch` on a
    /// resolved promise returns a promise that stays pending.
    pub fn catch<F>(&self, handler: F) -> Promise<T, E> where
    F: FnOnce(E) -> Outcome<T, E> + 'static {
        let target = Self::detached(self.policy());
        let c: Continuation<E, T, E> = Continuation::new(Box::new(handler), target.clone());
        trace!("promise #{:x}: catch -> #{:x}", self.id(), target.id());

        self.inner.borrow_mut().rejection.push(c);
        if let State::Rejected(reason) = self.state() {
            self.drain_rejection(reason);
        }

        target
    }

    pub(crate) fn drain_resolution(&self, value: T) {
        loop {
            // Pop in its own statement, so the borrow ends before the handler runs.
            let next = self.inner.borrow_mut().resolution.pop();
            match next {
                Some(c) => run(c, value.clone()),
                None => return,
            }
        }
    }

    pub(crate) fn drain_rejection(&self, reason: E) {
        loop {
            let next = self.inner.borrow_mut().rejection.pop();
            match next {
                Some(c) => run(c, reason.clone()),
                None => return,
            }
        }
    }

    /// Rejects the target of every queued `then` continuation, without running the handlers.
    pub(crate) fn short_circuit(&self, reason: E) {
        loop {
            let next = self.inner.borrow_mut().resolution.pop();
            match next {
                Some(c) => {
                    c.target.reject(reason.clone());
                }
                None => return,
            }
        }
    }

    /// Settles `target` with the eventual outcome of `self`, using the ordinary registration
    /// path. Whether that happens depends on `self`'s drain policy.
    fn forward(&self, target: Promise<T, E>) {
        let on_value = target.clone();
        let on_reason = target;

        self.then(move |value| {
            on_value.resolve(value.clone());
            Ok(Next::Value(value))
        }).catch(move |reason| {
            on_reason.reject(reason.clone());
            Err(reason)
        });
    }
}

fn run<I, T, E>(c: Continuation<I, T, E>, input: I) where
T: Clone + 'static,
E: Clone + 'static,
{
    let Continuation { handler, target } = c;

    match handler(input) {
        Ok(Next::Value(value)) => {
            target.resolve(value);
        }
        Ok(Next::Chain(nested)) => {
            trace!("promise #{:x}: following #{:x}", target.id(), nested.id());
            nested.forward(target);
        }
        Err(reason) => {
            debug!("promise #{:x}: handler failed", target.id());
            target.reject(reason);
        }
    }
}
