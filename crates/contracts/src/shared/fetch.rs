//! Request/response state shared by every remote fetcher.
//!
//! A fetcher is idle until its inputs resolve, loading while a request is in
//! flight, and settled afterwards. Superseded requests are detected with a
//! [`FetchGeneration`]: each new parameter set takes a fresh [`FetchTicket`]
//! and a result is applied only while its ticket is still current.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::try_join_all;
use serde::Deserialize;
use thiserror::Error;

/// Page size for row-level reads.
pub const PAGE_SIZE: usize = 1000;

/// Classified failure of a remote call. `Display` is the message shown to
/// the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("{0}")]
    Network(String),
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("{0}")]
    Auth(String),
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl FetchError {
    /// Build an error from a non-2xx response, preferring the message the
    /// backend put in its JSON body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .or(parsed.msg)
            .or(parsed.error_description)
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP error: {}", status));
        FetchError::Http { status, message }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, FetchError::Http { status: 401, .. } | FetchError::Auth(_))
    }
}

/// Observable state of one fetcher.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    /// Nothing to fetch (inputs unresolved). Not an error.
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Idle
    }
}

impl<T> FetchState<T> {
    pub fn settle(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(data) => FetchState::Ready(data),
            Err(err) => FetchState::Failed(err.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}

/// Monotonic generation counter owned by one fetcher.
#[derive(Debug, Clone, Default)]
pub struct FetchGeneration(Arc<AtomicU64>);

impl FetchGeneration {
    /// Start a new request, superseding every earlier ticket.
    pub fn begin(&self) -> FetchTicket {
        let id = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        FetchTicket {
            counter: self.0.clone(),
            id,
        }
    }

    /// Supersede the in-flight request without starting a new one.
    pub fn invalidate(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct FetchTicket {
    counter: Arc<AtomicU64>,
    id: u64,
}

impl FetchTicket {
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.id
    }
}

/// Read every page of a paginated source. A page shorter than `page_size`
/// ends the scan.
pub async fn fetch_all_pages<T, F, Fut>(page_size: usize, mut fetch_page: F) -> Result<Vec<T>, FetchError>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, FetchError>>,
{
    let page_size = page_size.max(1);
    let mut all = Vec::new();
    let mut from = 0;
    loop {
        let batch = fetch_page(from, from + page_size - 1).await?;
        let len = batch.len();
        all.extend(batch);
        if len < page_size {
            break;
        }
        from += page_size;
    }
    Ok(all)
}

/// Run one fetch per year concurrently and concatenate the results in the
/// order of `years`. The first failure fails the whole fetch.
pub async fn fetch_per_year<T, F, Fut>(years: &[i32], fetch_year: F) -> Result<Vec<T>, FetchError>
where
    F: Fn(i32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, FetchError>>,
{
    let chunks = try_join_all(years.iter().map(|&year| fetch_year(year))).await?;
    Ok(chunks.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_error_message_from_body() {
        let err = FetchError::from_response(400, r#"{"message":"function get_kpis does not exist"}"#);
        assert_eq!(err.to_string(), "function get_kpis does not exist");

        let err = FetchError::from_response(400, r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#);
        assert_eq!(err.to_string(), "Invalid login credentials");

        let err = FetchError::from_response(502, "<html>bad gateway</html>");
        assert_eq!(err.to_string(), "HTTP error: 502");
    }

    #[test]
    fn test_settle() {
        let ok: FetchState<u32> = FetchState::settle(Ok(3));
        assert_eq!(ok.data(), Some(&3));
        let failed: FetchState<u32> = FetchState::settle(Err(FetchError::Network("offline".into())));
        assert_eq!(failed.error(), Some("offline"));
        assert!(failed.data().is_none());
    }

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let generation = FetchGeneration::default();
        let first = generation.begin();
        assert!(first.is_current());
        let second = generation.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
        generation.invalidate();
        assert!(!second.is_current());
    }

    #[tokio::test]
    async fn test_pages_until_short_page() {
        let calls = RefCell::new(Vec::new());
        let rows = fetch_all_pages(3, |from, to| {
            calls.borrow_mut().push((from, to));
            let total = 7usize;
            let page: Vec<usize> = (from..=to).filter(|i| *i < total).collect();
            async move { Ok::<_, FetchError>(page) }
        })
        .await
        .unwrap();
        assert_eq!(rows, (0..7).collect::<Vec<_>>());
        assert_eq!(*calls.borrow(), vec![(0, 2), (3, 5), (6, 8)]);
    }

    #[tokio::test]
    async fn test_exact_multiple_needs_one_empty_page() {
        let calls = RefCell::new(0);
        let rows = fetch_all_pages(2, |from, _to| {
            *calls.borrow_mut() += 1;
            let page: Vec<usize> = if from < 4 { vec![from, from + 1] } else { vec![] };
            async move { Ok::<_, FetchError>(page) }
        })
        .await
        .unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(*calls.borrow(), 3);
    }

    #[tokio::test]
    async fn test_page_error_propagates() {
        let result: Result<Vec<u8>, _> = fetch_all_pages(2, |from, _| async move {
            if from == 0 {
                Ok(vec![1, 2])
            } else {
                Err(FetchError::Network("connection reset".into()))
            }
        })
        .await;
        assert_eq!(result, Err(FetchError::Network("connection reset".into())));
    }

    #[tokio::test]
    async fn test_per_year_merge_keeps_year_order() {
        let rows = fetch_per_year(&[2025, 2024], |year| async move {
            Ok::<_, FetchError>(vec![year * 10, year * 10 + 1])
        })
        .await
        .unwrap();
        assert_eq!(rows, vec![20250, 20251, 20240, 20241]);
    }

    #[tokio::test]
    async fn test_per_year_fails_as_a_whole() {
        let result = fetch_per_year(&[2023, 2024], |year| async move {
            if year == 2024 {
                Err(FetchError::Http { status: 500, message: "boom".into() })
            } else {
                Ok(vec![year])
            }
        })
        .await;
        assert!(result.is_err());
    }
}
