//! Shared test scaffolding.

use std::cell::RefCell;
use std::rc::Rc;

use env_logger;

use policy::{DrainPolicy, Policy, SettlePolicy};

lazy_static! {
    static ref LOGGER: () = {
        let _ = env_logger::builder().is_test(true).try_init();
    };
}

/// Installs the test logger. Safe to call from every test.
pub fn init() {
    ::lazy_static::initialize(&LOGGER);
}

pub const MINIMAL: Policy = Policy {
    settle: SettlePolicy::Permissive,
    drain: DrainPolicy::OnRegistration,
};

pub const STRICT: Policy = Policy {
    settle: SettlePolicy::Strict,
    drain: DrainPolicy::OnRegistration,
};

pub const LIVE: Policy = Policy {
    settle: SettlePolicy::Permissive,
    drain: DrainPolicy::Live,
};

pub const STANDARD: Policy = Policy {
    settle: SettlePolicy::Strict,
    drain: DrainPolicy::Live,
};

/// Runs each listed scenario, a `fn(Policy)`, once under every policy.
/// The generated tests are named `<policy>::<scenario>`.
// Alas, one module per policy: macro_rules can't paste identifiers.
macro_rules! deftests {
    (@policy $m:ident, $policy:ident, $($test:ident,)*) => {
        mod $m {
            $(
                #[test]
                fn $test() {
                    $crate::testlib::init();
                    super::$test($crate::testlib::$policy);
                }
            )*
        }
    };
    { $($test:ident,)* } => {
        deftests!(@policy minimal, MINIMAL, $($test,)*);
        deftests!(@policy strict, STRICT, $($test,)*);
        deftests!(@policy live, LIVE, $($test,)*);
        deftests!(@policy standard, STANDARD, $($test,)*);
    };
}

/// Records handler invocations, in order.
#[derive(Clone, Default)]
pub struct Recorder {
    entries: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record<S: ToString>(&self, s: S) {
        self.entries.borrow_mut().push(s.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_shares_entries() {
        let r = Recorder::new();
        let r2 = r.clone();
        assert!(r.is_empty());

        r2.record("a");
        r.record(1);
        assert_eq!(r.entries(), vec!["a", "1"]);
    }

    #[test]
    fn policies_are_distinct() {
        let all = [MINIMAL, STRICT, LIVE, STANDARD];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(a != b);
            }
        }
        assert_eq!(MINIMAL, Policy::default());
        assert_eq!(STANDARD, Policy::standard());
    }
}
