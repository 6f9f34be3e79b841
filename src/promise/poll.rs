//! Lets a promise be driven as a futures-rs `Future`.
//!
//! `Promise` doesn't implement `Future` itself: the trait's by-value `then` would shadow
//! `Promise::then` wherever the trait is in scope. Use `to_future` or `IntoFuture` instead.
//!
//! Polling only observes the state. It never runs continuations, whatever the drain policy.

use futures::{task, Async, Future, IntoFuture, Poll};

use super::future::Promise;
use super::state::State;

/// A future yielding a clone of a promise's value or reason. See `Promise::to_future`.
#[derive(Clone, Debug)]
pub struct PromiseFuture<T, E> {
    promise: Promise<T, E>,
}

impl<T: Clone + 'static, E: Clone + 'static> Promise<T, E> {
    /// Turns this promise into a Future, so it can be combined with future combinators.
    pub fn to_future(&self) -> PromiseFuture<T, E> {
        PromiseFuture { promise: self.clone() }
    }
}

impl<T: Clone + 'static, E: Clone + 'static> IntoFuture for Promise<T, E> {
    type Future = PromiseFuture<T, E>;
    type Item = T;
    type Error = E;

    fn into_future(self) -> PromiseFuture<T, E> {
        PromiseFuture { promise: self }
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Future for PromiseFuture<T, E> {
    type Item = T;
    type Error = E;

    /// While the promise is pending, parks the current task, which is notified when the
    /// promise settles. Must be called from within a futures-rs task.
    fn poll(&mut self) -> Poll<T, E> {
        let mut guard = self.promise.inner.borrow_mut();
        let inner = &mut *guard;

        match inner.state {
            State::Resolved(ref value) => Ok(Async::Ready(value.clone())),
            State::Rejected(ref reason) => Err(reason.clone()),
            State::Pending => {
                if !inner.parked.iter().any(|t| t.will_notify_current()) {
                    inner.parked.push(task::current());
                }
                Ok(Async::NotReady)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::{executor, Async, Future, IntoFuture};
    use futures::executor::Notify;

    use policy::Policy;
    use promise::{Next, Promise, Resolver};
    use testlib;

    struct CountingNotify {
        count: AtomicUsize,
    }

    impl Notify for CountingNotify {
        fn notify(&self, _id: usize) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counter() -> Arc<CountingNotify> {
        Arc::new(CountingNotify { count: AtomicUsize::new(0) })
    }

    fn deferred() -> (Promise<u32, String>, Resolver<u32, String>) {
        let slot = Rc::new(RefCell::new(None));
        let s = slot.clone();
        let p = Promise::with_policy(Policy::default(), move |resolve, _| {
            *s.borrow_mut() = Some(resolve);
            Ok(())
        });
        let resolve = slot.borrow_mut().take().unwrap();
        (p, resolve)
    }

    #[test]
    fn wait_on_settled() {
        testlib::init();

        let p: Promise<u32, String> = Promise::new(|resolve, _| {
            resolve.resolve(3);
            Ok(())
        });
        assert_eq!(p.to_future().wait(), Ok(3));
        // Observing doesn't consume the value.
        assert_eq!(p.into_future().wait(), Ok(3));

        let q: Promise<u32, String> = Promise::new(|_, _| Err("bad".to_string()));
        assert_eq!(q.to_future().wait(), Err("bad".to_string()));
    }

    #[test]
    fn combinators() {
        testlib::init();

        let p: Promise<u32, String> = Promise::new(|resolve, _| {
            resolve.resolve(3);
            Ok(())
        });
        let doubled = p.then(|v| Ok(Next::Value(v * 2)));
        assert_eq!(doubled.to_future().map(|v| v + 1).wait(), Ok(7));
    }

    #[test]
    fn pending_parks_and_is_notified() {
        testlib::init();

        let notify = counter();
        let (p, resolve) = deferred();
        let mut spawned = executor::spawn(p.to_future());

        assert_eq!(spawned.poll_future_notify(&notify, 0), Ok(Async::NotReady));
        // A second poll from the same task doesn't park it twice.
        assert_eq!(spawned.poll_future_notify(&notify, 0), Ok(Async::NotReady));
        assert_eq!(notify.count.load(Ordering::SeqCst), 0);

        resolve.resolve(9);
        assert_eq!(notify.count.load(Ordering::SeqCst), 1);
        assert_eq!(spawned.poll_future_notify(&notify, 0), Ok(Async::Ready(9)));
    }

    #[test]
    fn polling_does_not_drain() {
        testlib::init();

        let notify = counter();
        let (p, resolve) = deferred();
        let child = p.then(|v| Ok(Next::Value(v + 1)));
        resolve.resolve(1);

        let mut spawned = executor::spawn(p.to_future());
        assert_eq!(spawned.poll_future_notify(&notify, 0), Ok(Async::Ready(1)));
        assert!(child.is_pending());
        assert_eq!(p.queued_thens(), 1);
    }
}
