//! The promise type and its parts.

mod chain;

mod future;
pub use self::future::*;

mod poll;
pub use self::poll::*;

mod queue;
pub use self::queue::*;

mod state;
pub use self::state::*;
