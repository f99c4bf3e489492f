//! Lazy, continuation-passing computations with a rejected and a resolved
//! track.
//!
//! A [`Deferred`] wraps a fork function and does nothing until it is forked,
//! either directly through [`Deferred::fork`] or through the future returned
//! by [`Deferred::to_future`]. Panics raised by closures handed to the
//! combinators are captured and travel down the rejected track.
//!
//! The [`script`] module carries the same type across a dynamically typed
//! boundary, where arguments are checked at runtime.

pub use deferred::{from_future, of, rejected, resolved};
pub use deferred::{Deferred, Rx, Settle};
pub use error::Error;

pub mod deferred;
pub mod script;

mod error;
