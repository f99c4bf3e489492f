#[cfg(not(feature = "tokio"))]
use crossbeam_channel::{bounded, Sender, Receiver};
#[cfg(feature = "tokio")]
use std::{future::Future, pin::Pin, task::{Context, Poll}};
#[cfg(feature = "tokio")]
use tokio::sync::oneshot::{channel, Sender, Receiver};
use crate::error::Error;

pub struct Tx<A, E>(Sender<Result<A, E>>);

/// Receiving half of [`Deferred::to_future`].
///
/// With the `tokio` feature this is a `Future`; in either configuration
/// [`Rx::recv`] blocks the current thread until the computation settles.
/// Under `tokio`, `recv` panics when called from within a runtime context;
/// await the `Rx` there instead.
///
/// [`Deferred::to_future`]: super::Deferred::to_future
pub struct Rx<A, E>(Receiver<Result<A, E>>);

#[cfg(not(feature = "tokio"))]
pub fn oneshot<A, E>() -> (Tx<A, E>, Rx<A, E>) {
    let (tx, rx) = bounded(1);
    (Tx(tx), Rx(rx))
}

#[cfg(feature = "tokio")]
pub fn oneshot<A, E>() -> (Tx<A, E>, Rx<A, E>) {
    let (tx, rx) = channel();
    (Tx(tx), Rx(rx))
}

impl<A, E> Tx<A, E> {
    pub fn send(self, result: Result<A, E>) {
        match self.0.send(result) {
            Ok(()) => (),
            Err(_) => (),
        }
    }
}

#[cfg(not(feature = "tokio"))]
impl<A, E: From<Error>> Rx<A, E> {
    pub fn recv(self) -> Result<A, E> {
        match self.0.recv() {
            Ok(result) => result,
            Err(_)     => Err(Error::Unsettled.into()),
        }
    }
}

#[cfg(feature = "tokio")]
impl<A, E: From<Error>> Rx<A, E> {
    pub fn recv(self) -> Result<A, E> {
        match self.0.blocking_recv() {
            Ok(result) => result,
            Err(_)     => Err(Error::Unsettled.into()),
        }
    }
}

#[cfg(feature = "tokio")]
impl<A, E: From<Error>> Future for Rx<A, E> {
    type Output = Result<A, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.0).poll(cx) {
            Poll::Ready(Ok(r))  => Poll::Ready(r),
            Poll::Ready(Err(_)) => Poll::Ready(Err(Error::Unsettled.into())),
            Poll::Pending       => Poll::Pending,
        }
    }
}
