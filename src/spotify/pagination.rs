use std::{future::Future, time::Duration};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::FetchError;

/// Outcome of a single request that did not fail outright.
#[derive(Debug)]
pub enum Attempt<T> {
    Done(T),
    /// The endpoint answered `429`; reissue the same request after the delay.
    RetryAfter(Duration),
}

/// One page of a cursor-linked list endpoint.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Entries the server sent, counting the `null` ones dropped from `items`.
    pub received: usize,
    /// Absolute URL of the following page, absent on the last one.
    pub next: Option<String>,
    pub total: Option<u64>,
}

/// Anything that can fetch a single page by URL.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<Attempt<Page<T>>, FetchError>;
}

/// How outbound calls react to rate limiting and transient failures.
///
/// Rate-limit waits are unbounded in count and always honour the server's
/// `retry-after`. Transient failures back off exponentially from
/// `base_delay` and give up after `max_retries` retries.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self, failures: u32) -> Duration {
        let shift = failures.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << shift)
    }

    /// Drives `op` until it yields a value, a non-transient error, or the
    /// retry budget is spent.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Attempt<T>, FetchError>>,
    {
        let mut failures = 0u32;

        loop {
            match op().await {
                Ok(Attempt::Done(value)) => return Ok(value),
                Ok(Attempt::RetryAfter(wait)) => {
                    warn!(retry_after = wait.as_secs(), "rate limited, waiting");
                    sleep(wait).await;
                }
                Err(err) if err.is_transient() => {
                    if failures >= self.max_retries {
                        return Err(FetchError::Exhausted {
                            attempts: failures + 1,
                            last: Box::new(err),
                        });
                    }
                    failures += 1;
                    let wait = self.backoff(failures);
                    warn!(
                        error = %err,
                        attempt = failures,
                        max_retries = self.max_retries,
                        "transient fetch failure, retrying in {:?}",
                        wait
                    );
                    sleep(wait).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Parses a `retry-after` header given in whole seconds.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Drains a paginated endpoint into a single list, following `next` links.
///
/// A page that comes back with no entries ends the walk even if it carries a
/// `next` link. A page whose entries were all `null` is not empty and the
/// walk goes on. Failures never look like an empty page because they surface
/// as `Err` once the retry budget is exhausted.
pub async fn fetch_all<T, S>(
    source: &S,
    first_url: &str,
    policy: &RetryPolicy,
) -> Result<Vec<T>, FetchError>
where
    S: PageSource<T> + ?Sized,
{
    let mut items = Vec::new();
    let mut next = Some(first_url.to_string());

    while let Some(url) = next.take() {
        let page = policy.run(|| source.fetch_page(&url)).await?;
        if page.received == 0 {
            break;
        }

        items.extend(page.items);
        debug!(
            url = %url,
            fetched = items.len(),
            total = ?page.total,
            "page fetched"
        );
        next = page.next;
    }

    Ok(items)
}
