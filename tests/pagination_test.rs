use std::{collections::VecDeque, sync::Mutex, time::Duration};

use async_trait::async_trait;
use getunes::error::FetchError;
use getunes::spotify::pagination::retry_after;
use getunes::spotify::{Attempt, Page, PageSource, RetryPolicy, fetch_all};
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use tokio::time::Instant;

type Step = Result<Attempt<Page<u32>>, FetchError>;

/// Answers requests from a fixed script and records every URL asked for.
struct ScriptedSource {
    script: Mutex<VecDeque<Step>>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedSource {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(steps.into()),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource<u32> for ScriptedSource {
    async fn fetch_page(&self, url: &str) -> Result<Attempt<Page<u32>>, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Attempt::Done(create_test_page(&[], None))))
    }
}

fn create_test_page(items: &[u32], next: Option<&str>) -> Page<u32> {
    Page {
        items: items.to_vec(),
        received: items.len(),
        next: next.map(str::to_string),
        total: None,
    }
}

fn done(items: &[u32], next: Option<&str>) -> Step {
    Ok(Attempt::Done(create_test_page(items, next)))
}

fn network_error() -> Step {
    Err(FetchError::Network("connection reset".to_string()))
}

fn policy(max_retries: u32, base_ms: u64) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        base_delay: Duration::from_millis(base_ms),
    }
}

#[tokio::test]
async fn test_fetch_all_follows_next_links() {
    let source = ScriptedSource::new(vec![
        done(&[1, 2, 3], Some("p1")),
        done(&[4, 5, 6], Some("p2")),
        done(&[7], None),
    ]);

    let items = fetch_all(&source, "p0", &RetryPolicy::default())
        .await
        .unwrap();

    assert_eq!(items, vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(source.requested(), vec!["p0", "p1", "p2"]);
}

#[tokio::test]
async fn test_fetch_all_stops_on_empty_page() {
    let source = ScriptedSource::new(vec![
        done(&[1, 2], Some("p1")),
        done(&[], Some("p2")),
        done(&[3], None),
    ]);

    let items = fetch_all(&source, "p0", &RetryPolicy::default())
        .await
        .unwrap();

    assert_eq!(items, vec![1, 2]);
    assert_eq!(source.requested(), vec!["p0", "p1"]);
}

#[tokio::test]
async fn test_page_of_null_entries_does_not_stop_the_walk() {
    let unavailable_only = Page {
        items: Vec::new(),
        received: 3,
        next: Some("p2".to_string()),
        total: None,
    };
    let source = ScriptedSource::new(vec![
        done(&[1], Some("p1")),
        Ok(Attempt::Done(unavailable_only)),
        done(&[2], None),
    ]);

    let items = fetch_all(&source, "p0", &RetryPolicy::default())
        .await
        .unwrap();

    assert_eq!(items, vec![1, 2]);
    assert_eq!(source.requested(), vec!["p0", "p1", "p2"]);
}

#[tokio::test]
async fn test_fetch_all_with_empty_first_page() {
    let source = ScriptedSource::new(vec![done(&[], None)]);
    let items = fetch_all(&source, "p0", &RetryPolicy::default())
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_waits_and_reissues_same_url() {
    let source = ScriptedSource::new(vec![
        done(&[1], Some("p1")),
        Ok(Attempt::RetryAfter(Duration::from_secs(2))),
        done(&[2], None),
    ]);

    let start = Instant::now();
    let items = fetch_all(&source, "p0", &RetryPolicy::default())
        .await
        .unwrap();

    assert_eq!(items, vec![1, 2]);
    assert_eq!(source.requested(), vec!["p0", "p1", "p1"]);
    assert!(start.elapsed() >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_does_not_consume_retry_budget() {
    let source = ScriptedSource::new(vec![
        Ok(Attempt::RetryAfter(Duration::from_secs(1))),
        Ok(Attempt::RetryAfter(Duration::from_secs(1))),
        Ok(Attempt::RetryAfter(Duration::from_secs(1))),
        network_error(),
        done(&[1], None),
    ]);

    let items = fetch_all(&source, "p0", &policy(1, 100)).await.unwrap();

    assert_eq!(items, vec![1]);
    assert_eq!(source.requested().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_are_retried() {
    let source = ScriptedSource::new(vec![
        network_error(),
        Err(FetchError::Status {
            status: 503,
            url: "p0".into(),
        }),
        done(&[1, 2], None),
    ]);

    let start = Instant::now();
    let items = fetch_all(&source, "p0", &policy(3, 100)).await.unwrap();

    assert_eq!(items, vec![1, 2]);
    assert_eq!(source.requested(), vec!["p0", "p0", "p0"]);
    assert!(start.elapsed() >= Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn test_retries_exhausted_surface_as_error() {
    let source = ScriptedSource::new((0..10).map(|_| network_error()).collect());

    let result = fetch_all(&source, "p0", &policy(2, 100)).await;

    match result {
        Err(FetchError::Exhausted { attempts, last }) => {
            assert_eq!(attempts, 3);
            assert!(matches!(*last, FetchError::Network(_)));
        }
        other => panic!("expected exhausted retries, got {:?}", other),
    }
    assert_eq!(source.requested().len(), 3);
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let source = ScriptedSource::new(vec![Err(FetchError::Unauthorized { url: "p0".into() })]);

    let result = fetch_all(&source, "p0", &policy(5, 100)).await;

    assert!(matches!(result, Err(FetchError::Unauthorized { .. })));
    assert_eq!(source.requested().len(), 1);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let source = ScriptedSource::new(vec![Err(FetchError::Status {
        status: 404,
        url: "p0".into(),
    })]);

    let result = fetch_all(&source, "p0", &policy(5, 100)).await;

    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
    assert_eq!(source.requested().len(), 1);
}

#[test]
fn test_backoff_doubles() {
    let policy = policy(5, 250);
    assert_eq!(policy.backoff(1), Duration::from_millis(250));
    assert_eq!(policy.backoff(2), Duration::from_millis(500));
    assert_eq!(policy.backoff(4), Duration::from_millis(2000));
}

#[test]
fn test_is_transient() {
    assert!(FetchError::Network("x".into()).is_transient());
    assert!(
        FetchError::Parse {
            url: "u".into(),
            message: "m".into()
        }
        .is_transient()
    );
    assert!(
        FetchError::Status {
            status: 502,
            url: "u".into()
        }
        .is_transient()
    );
    assert!(
        !FetchError::Status {
            status: 400,
            url: "u".into()
        }
        .is_transient()
    );
    assert!(!FetchError::Unauthorized { url: "u".into() }.is_transient());
}

#[test]
fn test_retry_after_header() {
    let mut headers = HeaderMap::new();
    assert_eq!(retry_after(&headers), None);

    headers.insert(RETRY_AFTER, HeaderValue::from_static("2"));
    assert_eq!(retry_after(&headers), Some(Duration::from_secs(2)));

    headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));
    assert_eq!(retry_after(&headers), None);
}
