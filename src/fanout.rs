//! Fan-out/fan-in over independent gateway calls.
//!
//! A view that needs several resources issues them together and renders only once all
//! of them are in. The first failure fails the whole group and the remaining requests
//! are dropped. Completion order never affects the result order.

use std::future::Future;

use futures_util::future::{try_join, try_join_all};

use crate::error::ClientResult;

/// Run homogeneous calls concurrently; results come back in input order.
pub async fn fan_out<I, F, T>(calls: I) -> ClientResult<Vec<T>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = ClientResult<T>>,
{
    let out = try_join_all(calls).await;
    if let Err(e) = &out {
        tracing::debug!(operation = e.operation(), "fan_out aborted on first failure");
    }
    out
}

/// Pair form for two differently-typed calls, e.g. facilities plus my bookings.
pub async fn fan_out2<A, B, FA, FB>(a: FA, b: FB) -> ClientResult<(A, B)>
where
    FA: Future<Output = ClientResult<A>>,
    FB: Future<Output = ClientResult<B>>,
{
    try_join(a, b).await
}
