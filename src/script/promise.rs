use std::fmt;
use std::future::{ready, Future};
use std::pin::Pin;
use std::task::{Context, Poll};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use super::value::Value;

/// A future of a settled value that may be awaited through any clone.
#[derive(Clone)]
pub struct Promise {
    inner: Shared<BoxFuture<'static, Result<Value, Value>>>,
}

impl Promise {
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<Value, Value>> + Send + 'static,
    {
        Self { inner: future.boxed().shared() }
    }

    pub fn resolve(value: impl Into<Value>) -> Self {
        Self::new(ready(Ok(value.into())))
    }

    pub fn reject(value: impl Into<Value>) -> Self {
        Self::new(ready(Err(value.into())))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Shared::ptr_eq(&self.inner, &other.inner)
    }
}

impl Future for Promise {
    type Output = Result<Value, Value>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx)
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.peek() {
            Some(Ok(v))  => write!(f, "Promise {{ resolved: {v:?} }}"),
            Some(Err(e)) => write!(f, "Promise {{ rejected: {e:?} }}"),
            None         => f.write_str("Promise { <pending> }"),
        }
    }
}
