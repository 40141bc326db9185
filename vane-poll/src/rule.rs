//! Poll rules: interval, producer, postprocess
//!
//! A rule is associated 1:1 with a cell at spawn time. The producer
//! yields a raw value (command output, file contents), the postprocess
//! step turns it into the cell's value type.

use std::future::Future;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::{PollError, Result};

pub(crate) type Producer<R> = Box<dyn Fn() -> BoxFuture<'static, Result<R>> + Send + Sync>;
pub(crate) type Postprocess<R, T> = Box<dyn Fn(R) -> Result<T> + Send + Sync>;

/// A refresh rule: how often to poll and how to produce the value
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use vane_poll::PollRule;
///
/// let rule = PollRule::new(
///     Duration::from_secs(1),
///     || async { Ok("1500\n".to_string()) },
///     |raw: String| {
///         raw.trim()
///             .parse::<u32>()
///             .map_err(|e| vane_poll::PollError::RefreshFailed(e.to_string()))
///     },
/// )
/// .unwrap();
///
/// assert_eq!(rule.interval(), Duration::from_secs(1));
/// ```
pub struct PollRule<R, T> {
    pub(crate) interval: Duration,
    pub(crate) producer: Producer<R>,
    pub(crate) postprocess: Postprocess<R, T>,
}

impl<R: Send + 'static, T> PollRule<R, T> {
    /// Create a rule, rejecting a zero interval
    pub fn new<P, F, Post>(interval: Duration, producer: P, postprocess: Post) -> Result<Self>
    where
        P: Fn() -> F + Send + Sync + 'static,
        F: Future<Output = Result<R>> + Send + 'static,
        Post: Fn(R) -> Result<T> + Send + Sync + 'static,
    {
        if interval.is_zero() {
            return Err(PollError::InvalidInterval);
        }
        Ok(Self {
            interval,
            producer: Box::new(move || producer().boxed()),
            postprocess: Box::new(postprocess),
        })
    }

    /// The tick interval
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl<R, T> std::fmt::Debug for PollRule<R, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollRule")
            .field("interval", &self.interval)
            .finish()
    }
}
