//! Injectable delay source.
//!
//! The engine gives no completion signals, so the whole lifecycle is paced by
//! fixed settle pauses and retry delays. Hiding the sleeps behind [`Clock`]
//! lets tests drive the full state machine without real waits.

use std::future::Future;
use std::time::Duration;

pub trait Clock: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production clock backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
