use std::fmt;

use policy::SettlePolicy;

/// The state of a promise. The value or reason is carried by the variant, so only the one
/// matching the state exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum State<T, E> {
    Pending,
    Resolved(T),
    Rejected(E),
}

/// The discriminant of a `State`, without the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateKind {
    Pending,
    Resolved,
    Rejected,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            StateKind::Pending => "Pending",
            StateKind::Resolved => "Resolved",
            StateKind::Rejected => "Rejected",
        })
    }
}

/// What a call to resolve or reject did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The promise went from pending to settled.
    Settled,
    /// The promise was already settled, and the new state replaced the old one.
    Overwrote,
    /// The promise was already settled, and the call was dropped.
    Ignored,
}

impl Transition {
    /// True unless the call was dropped.
    pub fn took_effect(self) -> bool {
        self != Transition::Ignored
    }
}

impl<T, E> State<T, E> {
    pub fn kind(&self) -> StateKind {
        match *self {
            State::Pending => StateKind::Pending,
            State::Resolved(_) => StateKind::Resolved,
            State::Rejected(_) => StateKind::Rejected,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.kind() == StateKind::Pending
    }

    pub fn value(&self) -> Option<&T> {
        match *self {
            State::Resolved(ref v) => Some(v),
            _ => None,
        }
    }

    pub fn reason(&self) -> Option<&E> {
        match *self {
            State::Rejected(ref e) => Some(e),
            _ => None,
        }
    }

    /// Moves this state to `next`, which must be settled, under the given policy.
    pub fn settle(&mut self, next: State<T, E>, policy: SettlePolicy) -> Transition {
        debug_assert!(!next.is_pending(), "cannot settle to Pending");

        if self.is_pending() {
            *self = next;
            return Transition::Settled;
        }

        match policy {
            SettlePolicy::Permissive => {
                *self = next;
                Transition::Overwrote
            }
            SettlePolicy::Strict => Transition::Ignored,
        }
    }
}

impl<T, E> Default for State<T, E> {
    fn default() -> Self {
        State::Pending
    }
}
