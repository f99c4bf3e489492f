use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::debug;
use crate::error::Error;

/// One of the two callbacks handed to a fork function.
///
/// Nothing stops a fork function from calling a `Settle` twice, or from
/// calling both of its callbacks. [`Deferred::to_future`] guards against
/// that; forking directly does not.
///
/// [`Deferred::to_future`]: super::Deferred::to_future
pub struct Settle<T> {
    func: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T> Settle<T> {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self { func: Arc::new(func) }
    }

    pub fn call(&self, value: T) {
        (self.func)(value)
    }
}

impl<T> Clone for Settle<T> {
    fn clone(&self) -> Self {
        Self { func: self.func.clone() }
    }
}

impl<T> fmt::Debug for Settle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settle").finish_non_exhaustive()
    }
}

/// Run user code, turning a panic into an [`Error::Panic`].
pub(crate) fn guard<T, F: FnOnce() -> T>(func: F) -> Result<T, Error> {
    catch_unwind(AssertUnwindSafe(func)).map_err(|payload| {
        let error = Error::panic(payload);
        debug!("captured panic: {error}");
        error
    })
}
