use std::panic::AssertUnwindSafe;
use futures::FutureExt;
use tracing::debug;
use crate::deferred::{self, spawn, Deferred, Rx, Settle};
use crate::error::Error;
use super::function::{Args, Function};
use super::value::Value;
#[cfg(feature = "tokio")]
use super::promise::Promise;

/// A [`Deferred`] over dynamically typed values.
///
/// Combinator arguments are checked when the combinator is applied, and the
/// values returned by `chain`, `bichain` and `fold` handlers are checked when
/// the handlers run. A failed check never panics: it yields a computation
/// rejected with a `TypeError`.
#[derive(Clone, Debug)]
pub struct Async(Deferred<Value, Value>);

/// Constructor returned by [`Async::from_future`].
#[derive(Clone, Debug)]
pub struct Lift {
    func: Value,
}

impl Async {
    pub fn new<F>(fork: F) -> Self
    where
        F: Fn(Settle<Value>, Settle<Value>) + Send + Sync + 'static,
    {
        Self(Deferred::new(fork))
    }

    pub fn of(value: impl Into<Value>) -> Self {
        Self(deferred::of(value.into()))
    }

    pub fn resolved(value: impl Into<Value>) -> Self {
        Self(deferred::resolved(value.into()))
    }

    pub fn rejected(value: impl Into<Value>) -> Self {
        Self(deferred::rejected(value.into()))
    }

    /// The check on `func` is deferred until the returned [`Lift`] is called.
    pub fn from_future(func: impl Into<Value>) -> Lift {
        Lift { func: func.into() }
    }

    pub fn fork<R, S>(&self, on_rejected: R, on_resolved: S)
    where
        R: Fn(Value) + Send + Sync + 'static,
        S: Fn(Value) + Send + Sync + 'static,
    {
        self.0.fork(on_rejected, on_resolved)
    }

    pub fn to_future(&self) -> Rx<Value, Value> {
        self.0.to_future()
    }

    #[cfg(feature = "tokio")]
    pub fn to_promise(&self) -> Promise {
        Promise::new(self.to_future())
    }

    pub fn map(&self, func: impl Into<Value>) -> Self {
        let func = match func.into() {
            Value::Function(func) => func,
            other                 => return mismatch("Async.map", "function", other.type_name()),
        };
        Self(self.0.try_map(move |a| func.call(a)))
    }

    pub fn bimap(&self, left: impl Into<Value>, right: impl Into<Value>) -> Self {
        let (left, right) = match functions(left.into(), right.into()) {
            Ok(pair)      => pair,
            Err(received) => return mismatch("Async.bimap", "functions", received),
        };

        Self(self.0.bichain(
            move |e| deferred::rejected(left.call(e).unwrap_or_else(|thrown| thrown)),
            move |a| match right.call(a) {
                Ok(b)       => deferred::resolved(b),
                Err(thrown) => deferred::rejected(thrown),
            },
        ))
    }

    pub fn chain(&self, func: impl Into<Value>) -> Self {
        let func = match func.into() {
            Value::Function(func) => func,
            other                 => return mismatch("Async.chain", "function", other.type_name()),
        };

        Self(self.0.chain(move |a| {
            returned("Async.chain", "function returning Async", func.call(a))
        }))
    }

    pub fn bichain(&self, left: impl Into<Value>, right: impl Into<Value>) -> Self {
        self.branch("Async.bichain", left.into(), right.into())
    }

    /// Same contract as [`bichain`](Async::bichain).
    pub fn fold(&self, left: impl Into<Value>, right: impl Into<Value>) -> Self {
        self.branch("Async.fold", left.into(), right.into())
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }

    fn branch(&self, name: &'static str, left: Value, right: Value) -> Self {
        let (left, right) = match functions(left, right) {
            Ok(pair)      => pair,
            Err(received) => return mismatch(name, "functions", received),
        };

        Self(self.0.bichain(
            move |e| returned(name, "rejected function returning Async", left.call(e)),
            move |a| returned(name, "resolved function returning Async", right.call(a)),
        ))
    }
}

impl Lift {
    pub fn call<A: Args>(&self, args: A) -> Async {
        let func = match &self.func {
            Value::Function(func) => func.clone(),
            other                 => return mismatch("Async.fromFuture", "function", other.type_name()),
        };
        let args = args.args();

        Async::new(move |rej, res| {
            match func.call(args.clone()) {
                Ok(Value::Promise(promise)) => spawn(async move {
                    match AssertUnwindSafe(promise).catch_unwind().await {
                        Ok(Ok(v))  => res.call(v),
                        Ok(Err(e)) => rej.call(e),
                        Err(p)     => rej.call(Error::panic(p).into()),
                    }
                }),
                Ok(value)   => res.call(value),
                Err(thrown) => rej.call(thrown),
            }
        })
    }
}

impl From<Deferred<Value, Value>> for Async {
    fn from(deferred: Deferred<Value, Value>) -> Self {
        Self(deferred)
    }
}

impl From<Lift> for Function {
    fn from(lift: Lift) -> Self {
        Function::new(move |args| Ok(lift.call(args).into()))
    }
}

impl From<Lift> for Value {
    fn from(lift: Lift) -> Self {
        Value::Function(lift.into())
    }
}

fn mismatch(combinator: &'static str, expected: &'static str, received: impl Into<String>) -> Async {
    let error = Error::mismatch(combinator, expected, received);
    debug!("{error}");
    Async::rejected(error)
}

fn functions(left: Value, right: Value) -> Result<(Function, Function), String> {
    match (left, right) {
        (Value::Function(l), Value::Function(r)) => Ok((l, r)),
        (l, r) => Err(format!("{} and {}", l.type_name(), r.type_name())),
    }
}

fn returned(name: &'static str, expected: &'static str, result: Result<Value, Value>) -> Deferred<Value, Value> {
    match result {
        Ok(Value::Async(next)) => next.0,
        Ok(other)   => deferred::rejected(Error::mismatch(name, expected, other.type_name()).into()),
        Err(thrown) => deferred::rejected(thrown),
    }
}
