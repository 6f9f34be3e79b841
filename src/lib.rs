//! A synchronous, single-threaded deferred value.
//!
//! A `Promise` eventually holds a value or a rejection reason. It is produced by an executor
//! that runs once, inline, at construction, and consumed by registering continuations with
//! `then` and `catch`. There is no scheduler: every handler runs on the caller's stack,
//! inside the call that triggered it.
//!
//! When continuations run is governed by a `Policy`. See the `policy` module.

extern crate futures;
#[macro_use]
extern crate log;

#[cfg(test)]
extern crate env_logger;
#[cfg(test)]
#[macro_use]
extern crate lazy_static;

// Must come first, so its macros are visible to the other modules' tests.
#[cfg(test)]
#[macro_use]
mod testlib;

pub mod policy;
pub use policy::{DrainPolicy, Policy, PolicyError, SettlePolicy};

pub mod promise;
pub use promise::*;
