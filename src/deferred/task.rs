use std::fmt;
use std::sync::Arc;
use parking_lot::Mutex;
use tracing::trace;
use crate::error::Error;
use super::channel::{oneshot, Rx};
use super::settle::{guard, Settle};

type Fork<E, A> = dyn Fn(Settle<E>, Settle<A>) + Send + Sync;

/// A lazy computation that either rejects with an `E` or resolves with an `A`.
///
/// Constructing a `Deferred` runs nothing. Every call to [`fork`] runs the
/// computation from scratch, and every combinator returns a new value that
/// closes over the fork function of the old one.
///
/// Closures passed to the combinators may panic; the panic is caught where
/// the closure runs and delivered as a rejection through `E: From<Error>`.
///
/// [`fork`]: Deferred::fork
pub struct Deferred<E, A> {
    fork: Arc<Fork<E, A>>,
}

impl<E, A> Deferred<E, A>
where
    E: Send + 'static,
    A: Send + 'static,
{
    pub fn new<F>(fork: F) -> Self
    where
        F: Fn(Settle<E>, Settle<A>) + Send + Sync + 'static,
    {
        Self { fork: Arc::new(fork) }
    }

    /// Run the computation, calling `on_rejected` or `on_resolved` when it
    /// settles. Callbacks may fire after `fork` returns.
    pub fn fork<R, S>(&self, on_rejected: R, on_resolved: S)
    where
        R: Fn(E) + Send + Sync + 'static,
        S: Fn(A) + Send + Sync + 'static,
    {
        self.fork_with(Settle::new(on_rejected), Settle::new(on_resolved))
    }

    pub fn fork_with(&self, rej: Settle<E>, res: Settle<A>) {
        (self.fork)(rej, res)
    }

    pub fn map<B, F>(&self, func: F) -> Deferred<E, B>
    where
        B: Send + 'static,
        E: From<Error>,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        self.try_map(move |a| Ok::<B, E>(func(a)))
    }

    /// Like [`map`](Deferred::map), with `Err` routed to the rejected track.
    pub fn try_map<B, F>(&self, func: F) -> Deferred<E, B>
    where
        B: Send + 'static,
        E: From<Error>,
        F: Fn(A) -> Result<B, E> + Send + Sync + 'static,
    {
        let fork = self.fork.clone();
        let func = Arc::new(func);

        Deferred::new(move |rej: Settle<E>, res: Settle<B>| {
            let func = func.clone();
            let next = rej.clone();

            (fork)(rej, Settle::new(move |a: A| {
                match guard(|| func(a)) {
                    Ok(Ok(b))  => res.call(b),
                    Ok(Err(e)) => next.call(e),
                    Err(e)     => next.call(e.into()),
                }
            }));
        })
    }

    pub fn bimap<E2, B, F, G>(&self, left: F, right: G) -> Deferred<E2, B>
    where
        E2: From<Error> + Send + 'static,
        B:  Send + 'static,
        F:  Fn(E) -> E2 + Send + Sync + 'static,
        G:  Fn(A) -> B + Send + Sync + 'static,
    {
        let fork  = self.fork.clone();
        let left  = Arc::new(left);
        let right = Arc::new(right);

        Deferred::new(move |rej: Settle<E2>, res: Settle<B>| {
            let on_rejected = {
                let left = left.clone();
                let rej  = rej.clone();
                Settle::new(move |e: E| match guard(|| left(e)) {
                    Ok(e)  => rej.call(e),
                    Err(e) => rej.call(e.into()),
                })
            };

            let right = right.clone();
            let on_resolved = Settle::new(move |a: A| match guard(|| right(a)) {
                Ok(b)  => res.call(b),
                Err(e) => rej.call(e.into()),
            });

            (fork)(on_rejected, on_resolved);
        })
    }

    pub fn chain<B, F>(&self, func: F) -> Deferred<E, B>
    where
        B: Send + 'static,
        E: From<Error>,
        F: Fn(A) -> Deferred<E, B> + Send + Sync + 'static,
    {
        let fork = self.fork.clone();
        let func = Arc::new(func);

        Deferred::new(move |rej: Settle<E>, res: Settle<B>| {
            let func = func.clone();
            let next = rej.clone();

            (fork)(rej, Settle::new(move |a: A| {
                match guard(|| func(a)) {
                    Ok(deferred) => deferred.fork_with(next.clone(), res.clone()),
                    Err(e)       => next.call(e.into()),
                }
            }));
        })
    }

    pub fn bichain<E2, B, F, G>(&self, left: F, right: G) -> Deferred<E2, B>
    where
        E2: From<Error> + Send + 'static,
        B:  Send + 'static,
        F:  Fn(E) -> Deferred<E2, B> + Send + Sync + 'static,
        G:  Fn(A) -> Deferred<E2, B> + Send + Sync + 'static,
    {
        let fork  = self.fork.clone();
        let left  = Arc::new(left);
        let right = Arc::new(right);

        Deferred::new(move |rej: Settle<E2>, res: Settle<B>| {
            let on_rejected = {
                let left = left.clone();
                let rej  = rej.clone();
                let res  = res.clone();
                Settle::new(move |e: E| match guard(|| left(e)) {
                    Ok(deferred) => deferred.fork_with(rej.clone(), res.clone()),
                    Err(e)       => rej.call(e.into()),
                })
            };

            let on_resolved = {
                let right = right.clone();
                Settle::new(move |a: A| match guard(|| right(a)) {
                    Ok(deferred) => deferred.fork_with(rej.clone(), res.clone()),
                    Err(e)       => rej.call(e.into()),
                })
            };

            (fork)(on_rejected, on_resolved);
        })
    }

    /// Collapse both tracks into a single computation. Behaves exactly like
    /// [`bichain`](Deferred::bichain).
    pub fn fold<E2, B, F, G>(&self, left: F, right: G) -> Deferred<E2, B>
    where
        E2: From<Error> + Send + 'static,
        B:  Send + 'static,
        F:  Fn(E) -> Deferred<E2, B> + Send + Sync + 'static,
        G:  Fn(A) -> Deferred<E2, B> + Send + Sync + 'static,
    {
        self.bichain(left, right)
    }

    /// Fork once and expose the outcome as a [`Rx`].
    ///
    /// Only the first settlement counts; later calls to either callback are
    /// dropped. A panic while forking rejects the result.
    pub fn to_future(&self) -> Rx<A, E>
    where
        E: From<Error>,
    {
        let (tx, rx) = oneshot();
        let slot     = Mutex::new(Some(tx));

        let commit = Arc::new(move |result: Result<A, E>| {
            let tx = slot.lock().take();
            match tx {
                Some(tx) => tx.send(result),
                None     => trace!("ignoring repeated settlement"),
            }
        });

        let rej = {
            let commit = commit.clone();
            Settle::new(move |e: E| commit(Err(e)))
        };

        let res = {
            let commit = commit.clone();
            Settle::new(move |a: A| commit(Ok(a)))
        };

        if let Err(e) = guard(|| self.fork_with(rej, res)) {
            commit(Err(e.into()));
        }

        rx
    }

    /// Whether both values share one fork function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.fork) as *const () == Arc::as_ptr(&other.fork) as *const ()
    }
}

impl<E, A> Clone for Deferred<E, A> {
    fn clone(&self) -> Self {
        Self { fork: self.fork.clone() }
    }
}

impl<E, A> fmt::Debug for Deferred<E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").finish_non_exhaustive()
    }
}
