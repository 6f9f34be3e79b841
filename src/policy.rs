//! Runtime configuration for promise chains.
//!
//! A `Policy` is picked when a root promise is constructed. Every promise created from it
//! by `then` or `catch` inherits the same policy.
//!
//! The defaults reproduce the minimal contract: late settlement overwrites, and queued
//! continuations only run inside the `then`/`catch` call that finds the promise settled.
//! `Policy::standard()` gives the behaviour most promise libraries have instead.

use std::env;
use std::error;
use std::fmt;
use std::str::FromStr;

/// The environment variable read by `Policy::from_env`.
pub const POLICY_VAR: &'static str = "PROMISE_POLICY";

/// What happens when a settled promise is resolved or rejected again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettlePolicy {
    /// The late call overwrites the value or reason, and the state with it.
    Permissive,
    /// The late call is dropped.
    Strict,
}

impl Default for SettlePolicy {
    fn default() -> Self {
        SettlePolicy::Permissive
    }
}

/// When queued continuations are run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrainPolicy {
    /// Only inside `then`/`catch`, and only if the promise is already settled at that moment.
    /// A continuation registered on a pending promise never runs.
    OnRegistration,
    /// Also at the moment of settlement. Each queued continuation still runs at most once.
    Live,
}

impl Default for DrainPolicy {
    fn default() -> Self {
        DrainPolicy::OnRegistration
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Policy {
    pub settle: SettlePolicy,
    pub drain: DrainPolicy,
}

impl Policy {
    /// Strict settlement with live draining.
    pub fn standard() -> Self {
        Policy {
            settle: SettlePolicy::Strict,
            drain: DrainPolicy::Live,
        }
    }

    pub fn with_settle(self, settle: SettlePolicy) -> Self {
        Policy { settle: settle, ..self }
    }

    pub fn with_drain(self, drain: DrainPolicy) -> Self {
        Policy { drain: drain, ..self }
    }

    /// Reads a policy from `PROMISE_POLICY`, in the `"<settle>,<drain>"` form.
    /// An unset variable gives the default policy.
    pub fn from_env() -> Result<Self, PolicyError> {
        match env::var(POLICY_VAR) {
            Ok(s) => s.parse(),
            Err(env::VarError::NotPresent) => Ok(Policy::default()),
            Err(e) => Err(PolicyError::Env(e)),
        }
    }
}

#[derive(Debug)]
pub enum PolicyError {
    UnknownSettle(String),
    UnknownDrain(String),
    Malformed(String),
    Env(env::VarError),
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PolicyError::UnknownSettle(ref s) => write!(f, "unknown settle policy: {:?}", s),
            PolicyError::UnknownDrain(ref s) => write!(f, "unknown drain policy: {:?}", s),
            PolicyError::Malformed(ref s) => {
                write!(f, "malformed policy {:?}, expected \"<settle>,<drain>\"", s)
            }
            PolicyError::Env(ref e) => write!(f, "cannot read {}: {}", POLICY_VAR, e),
        }
    }
}

impl error::Error for PolicyError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            PolicyError::Env(ref e) => Some(e),
            _ => None,
        }
    }
}

impl FromStr for SettlePolicy {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, PolicyError> {
        match s.trim() {
            "permissive" => Ok(SettlePolicy::Permissive),
            "strict" => Ok(SettlePolicy::Strict),
            other => Err(PolicyError::UnknownSettle(other.to_string())),
        }
    }
}

impl FromStr for DrainPolicy {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, PolicyError> {
        match s.trim() {
            "on-registration" => Ok(DrainPolicy::OnRegistration),
            "live" => Ok(DrainPolicy::Live),
            other => Err(PolicyError::UnknownDrain(other.to_string())),
        }
    }
}

impl FromStr for Policy {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, PolicyError> {
        let mut parts = s.split(',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(settle), Some(drain), None) => Ok(Policy {
                settle: settle.parse()?,
                drain: drain.parse()?,
            }),
            _ => Err(PolicyError::Malformed(s.to_string())),
        }
    }
}

impl fmt::Display for SettlePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            SettlePolicy::Permissive => "permissive",
            SettlePolicy::Strict => "strict",
        })
    }
}

impl fmt::Display for DrainPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            DrainPolicy::OnRegistration => "on-registration",
            DrainPolicy::Live => "live",
        })
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.settle, self.drain)
    }
}
