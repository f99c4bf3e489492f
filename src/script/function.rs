use std::fmt;
use std::sync::Arc;
use crate::deferred::guard;
use super::value::Value;

type Func = dyn Fn(Vec<Value>) -> Result<Value, Value> + Send + Sync;

/// A callable value. Returning `Err` throws; so does panicking.
#[derive(Clone)]
pub struct Function {
    func: Arc<Func>,
}

pub trait Args {
    fn args(self) -> Vec<Value>;
}

impl Function {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, Value> + Send + Sync + 'static,
    {
        Self { func: Arc::new(func) }
    }

    /// A function of one argument; a missing argument reads as `Undefined`.
    pub fn unary<F>(func: F) -> Self
    where
        F: Fn(Value) -> Result<Value, Value> + Send + Sync + 'static,
    {
        Self::new(move |args| {
            let arg = args.into_iter().next().unwrap_or(Value::Undefined);
            func(arg)
        })
    }

    pub fn call<A: Args>(&self, args: A) -> Result<Value, Value> {
        let args = args.args();
        match guard(|| (self.func)(args)) {
            Ok(result) => result,
            Err(e)     => Err(e.into()),
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[function]")
    }
}

impl Args for () {
    fn args(self) -> Vec<Value> {
        Vec::new()
    }
}

impl Args for Value {
    fn args(self) -> Vec<Value> {
        vec![self]
    }
}

impl Args for Vec<Value> {
    fn args(self) -> Vec<Value> {
        self
    }
}
