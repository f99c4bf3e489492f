use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::thread;
use futures::executor::block_on;
use futures::FutureExt;
use tracing::{debug, error};
use crate::error::Error;
use super::settle::{guard, Settle};
use super::task::Deferred;

pub fn of<E, A>(value: A) -> Deferred<E, A>
where
    E: Send + 'static,
    A: Clone + Send + Sync + 'static,
{
    resolved(value)
}

pub fn resolved<E, A>(value: A) -> Deferred<E, A>
where
    E: Send + 'static,
    A: Clone + Send + Sync + 'static,
{
    Deferred::new(move |_, res: Settle<A>| res.call(value.clone()))
}

pub fn rejected<E, A>(value: E) -> Deferred<E, A>
where
    E: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    Deferred::new(move |rej: Settle<E>, _| rej.call(value.clone()))
}

/// Lift a future-returning function into a constructor of [`Deferred`]s.
///
/// Each fork calls `func` with a clone of the arguments and settles with the
/// output of the returned future. The future runs on the current tokio
/// runtime when there is one, otherwise on a thread of its own. That fallback
/// starts one OS thread per fork with no upper bound; if the thread cannot be
/// started the callbacks are dropped and the result is [`Error::Unsettled`].
pub fn from_future<T, E, A, F, Fut>(func: F) -> impl Fn(T) -> Deferred<E, A> + Clone + Send + Sync + 'static
where
    T:   Clone + Send + Sync + 'static,
    E:   From<Error> + Send + 'static,
    A:   Send + 'static,
    F:   Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<A, E>> + Send + 'static,
{
    let func = Arc::new(func);

    move |args: T| {
        let func = func.clone();

        Deferred::new(move |rej: Settle<E>, res: Settle<A>| {
            let future = match guard(|| func(args.clone())) {
                Ok(future) => future,
                Err(e)     => return rej.call(e.into()),
            };

            spawn(async move {
                match AssertUnwindSafe(future).catch_unwind().await {
                    Ok(Ok(a))  => res.call(a),
                    Ok(Err(e)) => rej.call(e),
                    Err(p)     => rej.call(Error::panic(p).into()),
                }
            });
        })
    }
}

#[cfg(feature = "tokio")]
pub(crate) fn spawn<F>(task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => drop(handle.spawn(task)),
        Err(_)     => detach(task),
    }
}

#[cfg(not(feature = "tokio"))]
pub(crate) fn spawn<F>(task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    detach(task)
}

fn detach<F>(task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    debug!("no runtime, driving future on a dedicated thread");

    let thread = thread::Builder::new().name("deferred".to_owned());
    if let Err(e) = thread.spawn(move || block_on(task)) {
        error!("driver thread failed to start: {e:?}");
    }
}
