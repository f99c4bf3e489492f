use std::future::{ready, Ready};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use anyhow::{anyhow, Result};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::runtime::Runtime;
use deferred::{from_future, of, rejected, resolved, Deferred, Error};
use common::fetch::{self, Post, Response, TITLE};
mod common;

#[derive(Clone, Debug, PartialEq, Error)]
enum Failure {
    #[error("code {0}")]
    Code(i32),
    #[error(transparent)]
    Deferred(#[from] Error),
}

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Rejected(Failure),
    Resolved(i32),
}

fn record(deferred: &Deferred<Failure, i32>) -> Vec<Call> {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let rej   = calls.clone();
    let res   = calls.clone();

    deferred.fork(
        move |e| rej.lock().push(Call::Rejected(e)),
        move |a| res.lock().push(Call::Resolved(a)),
    );

    let calls = calls.lock().clone();
    calls
}

fn panicked(message: &str) -> Failure {
    Failure::Deferred(Error::Panic(message.to_owned()))
}

#[test]
fn resolved_calls_resolve_once() {
    common::init();
    assert_eq!(record(&resolved(7)), vec![Call::Resolved(7)]);
    assert_eq!(record(&of(7)), vec![Call::Resolved(7)]);
}

#[test]
fn rejected_calls_reject_once() {
    assert_eq!(record(&rejected(Failure::Code(7))), vec![Call::Rejected(Failure::Code(7))]);
}

#[test]
fn construction_is_lazy_and_forks_rerun() {
    let count = Arc::new(AtomicUsize::new(0));
    let seen  = count.clone();

    let deferred = Deferred::<Failure, usize>::new(move |_, res| {
        res.call(seen.fetch_add(1, Ordering::SeqCst));
    }).map(|n| n * 10);

    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(deferred.to_future().recv(), Ok(0));
    assert_eq!(deferred.to_future().recv(), Ok(10));
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn map_composes() {
    let f = |x: i32| x + 1;
    let g = |x: i32| x * 3;

    let stepwise = resolved::<Failure, i32>(4).map(f).map(g);
    let composed = resolved::<Failure, i32>(4).map(move |v| g(f(v)));

    assert_eq!(stepwise.to_future().recv(), Ok(15));
    assert_eq!(stepwise.to_future().recv(), composed.to_future().recv());
}

#[test]
fn map_passes_rejection_through() {
    let deferred = rejected::<Failure, i32>(Failure::Code(1)).map(|x| x + 1);
    assert_eq!(record(&deferred), vec![Call::Rejected(Failure::Code(1))]);
}

#[test]
fn map_panic_rejects() -> Result<()> {
    let deferred = resolved::<anyhow::Error, i32>(1).map(|_| -> i32 { panic!("boom") });

    match deferred.to_future().recv() {
        Ok(v)  => Err(anyhow!("resolved with {v}")),
        Err(e) => Ok(assert_eq!(e.to_string(), "boom")),
    }
}

#[test]
fn try_map_routes_err() {
    let deferred = resolved::<Failure, i32>(1).try_map(|x| match x {
        1 => Err(Failure::Code(99)),
        x => Ok(x),
    });
    assert_eq!(deferred.to_future().recv(), Err(Failure::Code(99)));
}

#[test]
fn chain_flattens() {
    let deferred = resolved::<Failure, i32>(1).chain(|v| resolved(v + 1));
    assert_eq!(record(&deferred), vec![Call::Resolved(2)]);
}

#[test]
fn chain_passes_rejection_through() {
    let deferred = rejected::<Failure, i32>(Failure::Code(3)).chain(|v| resolved(v + 1));
    assert_eq!(record(&deferred), vec![Call::Rejected(Failure::Code(3))]);
}

#[test]
fn chain_panic_rejects() {
    let deferred = resolved::<Failure, i32>(1).chain(|_| -> Deferred<Failure, i32> { panic!("oops") });
    assert_eq!(deferred.to_future().recv(), Err(panicked("oops")));
}

#[test]
fn bimap_transforms_both_tracks() {
    let left  = rejected::<Failure, i32>(Failure::Code(1)).bimap(|_| Failure::Code(2), |x| x + 1);
    let right = resolved::<Failure, i32>(1).bimap(|_| Failure::Code(2), |x| x + 1);

    assert_eq!(record(&left), vec![Call::Rejected(Failure::Code(2))]);
    assert_eq!(record(&right), vec![Call::Resolved(2)]);
}

#[test]
fn bimap_left_panic_rejects() {
    let deferred = rejected::<Failure, i32>(Failure::Code(1))
        .bimap(|_| -> Failure { panic!("left") }, |x: i32| x);
    assert_eq!(deferred.to_future().recv(), Err(panicked("left")));
}

#[test]
fn bichain_recovers_rejection() {
    let deferred = rejected::<Failure, i32>(Failure::Code(5)).bichain(
        |e| match e {
            Failure::Code(n) => resolved(n * 2),
            e                => rejected(e),
        },
        resolved,
    );
    assert_eq!(record(&deferred), vec![Call::Resolved(10)]);
}

#[test]
fn bichain_left_panic_rejects() {
    let deferred = rejected::<Failure, i32>(Failure::Code(1))
        .bichain(|_| -> Deferred<Failure, i32> { panic!("leftChain") }, resolved);
    assert_eq!(deferred.to_future().recv(), Err(panicked("leftChain")));
}

#[test]
fn fold_unifies_tracks() {
    let fold = |d: Deferred<Failure, i32>| d.fold(
        |_| resolved::<Failure, String>("rejected".to_owned()),
        |x| resolved(format!("resolved {x}")),
    );

    assert_eq!(fold(resolved(1)).to_future().recv(), Ok("resolved 1".to_owned()));
    assert_eq!(fold(rejected(Failure::Code(1))).to_future().recv(), Ok("rejected".to_owned()));
}

#[test]
fn to_future_settles_once() {
    let both = Deferred::<Failure, i32>::new(|rej, res| {
        res.call(1);
        rej.call(Failure::Code(2));
        res.call(3);
    });

    let twice = Deferred::<Failure, i32>::new(|rej, _| {
        rej.call(Failure::Code(4));
        rej.call(Failure::Code(5));
    });

    assert_eq!(both.to_future().recv(), Ok(1));
    assert_eq!(twice.to_future().recv(), Err(Failure::Code(4)));
}

#[test]
fn fork_is_unguarded() {
    let both = Deferred::<Failure, i32>::new(|rej, res| {
        res.call(1);
        rej.call(Failure::Code(2));
    });
    assert_eq!(record(&both), vec![Call::Resolved(1), Call::Rejected(Failure::Code(2))]);
}

#[test]
fn to_future_catches_fork_panic() {
    let deferred = Deferred::<Failure, i32>::new(|_, _| panic!("fork"));
    assert_eq!(deferred.to_future().recv(), Err(panicked("fork")));
}

#[test]
fn to_future_reports_unsettled() {
    let deferred = Deferred::<Failure, i32>::new(|_, _| ());
    assert_eq!(deferred.to_future().recv(), Err(Failure::Deferred(Error::Unsettled)));
}

#[test]
fn from_future_pipeline() -> Result<()> {
    common::init();

    let runtime = Runtime::new()?;
    let get     = from_future(fetch::fetch);
    let json    = from_future(|res: Response| async move { res.json::<Post>().await });

    let title = runtime.block_on(async {
        of(1)
            .chain(move |n: i32| get(fetch::url(n)))
            .chain(json)
            .map(|post| post.title)
            .to_future()
            .await
    })?;

    assert_eq!(title, TITLE);

    Ok(())
}

#[test]
fn from_future_rejection() -> Result<()> {
    let runtime = Runtime::new()?;
    let fail    = from_future(|code: i32| async move { Err::<i32, _>(Failure::Code(code)) });

    let result = runtime.block_on(fail(9).to_future());
    assert_eq!(result, Err(Failure::Code(9)));

    Ok(())
}

#[test]
fn from_future_sync_panic_rejects() -> Result<()> {
    let bad = from_future(|()| -> Ready<Result<i32>> { panic!("bad") });

    match bad(()).to_future().recv() {
        Ok(v)  => Err(anyhow!("resolved with {v}")),
        Err(e) => Ok(assert_eq!(e.to_string(), "bad")),
    }
}

#[test]
fn from_future_without_runtime() {
    let double = from_future(|n: i32| ready(Ok::<_, Failure>(n * 2)));
    assert_eq!(double(21).to_future().recv(), Ok(42));
}

#[test]
fn from_future_defers_and_reruns() {
    let count = Arc::new(AtomicUsize::new(0));
    let seen  = count.clone();

    let lift = from_future(move |n: i32| {
        seen.fetch_add(1, Ordering::SeqCst);
        ready(Ok::<_, Failure>(n))
    });

    let deferred = lift(5);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    assert_eq!(deferred.to_future().recv(), Ok(5));
    assert_eq!(deferred.to_future().recv(), Ok(5));
    assert_eq!(count.load(Ordering::SeqCst), 2);
}
