//! Structured fan-out for independent store reads.
//!
//! Every branch runs to completion before results are inspected; the first
//! failure in argument order is returned and no partial result escapes.

use std::thread;

use crate::error::{Error, Result};

fn settle<T>(joined: thread::Result<Result<T>>) -> Result<T> {
    joined.map_err(|_| Error::Internal("statistics worker panicked".into()))?
}

pub(crate) fn join2<A, B, FA, FB>(fa: FA, fb: FB) -> Result<(A, B)>
where
    A: Send,
    B: Send,
    FA: FnOnce() -> Result<A> + Send,
    FB: FnOnce() -> Result<B> + Send,
{
    thread::scope(|scope| {
        let a = scope.spawn(fa);
        let b = scope.spawn(fb);

        let (a, b) = (a.join(), b.join());

        Ok((settle(a)?, settle(b)?))
    })
}
