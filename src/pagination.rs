//! Multi-page response accumulation
//!
//! Collection endpoints answer with one page at a time:
//!
//! ```text
//! { "results": [ ... ], "nextPageUrl": "https://.../employees?page=2" | null }
//! ```
//!
//! [`PageAccumulator`] is a small state machine that hands out the next
//! request to make and absorbs each response. The caller owns the actual
//! I/O, which lets the client route every page through the refresh-and-retry
//! wrapper. The first request carries the caller's query parameters; every
//! later request uses the server's `nextPageUrl` verbatim because it already
//! embeds them.
//!
//! Results are all-or-nothing: an error on any page drops everything
//! accumulated so far.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{InsperityError, Result};
use crate::transport::RawResponse;

/// One decoded page of a collection
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Records on this page
    pub results: Vec<T>,
    /// Absolute URL of the next page; `None` on the last page
    #[serde(rename = "nextPageUrl", default)]
    pub next_page_url: Option<String>,
}

/// A page request: URL plus query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Absolute URL
    pub url: String,
    /// Query parameters (empty for server-supplied next-page URLs)
    pub query: Vec<(String, String)>,
}

impl PageRequest {
    /// First request of a listing
    pub fn first(url: impl Into<String>, query: Vec<(String, String)>) -> Self {
        Self {
            url: url.into(),
            query,
        }
    }

    /// Follow-up request for a server-supplied next-page URL
    pub fn next(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
        }
    }
}

/// Accumulates the `results` of a chain of pages.
///
/// # Example
///
/// ```
/// use insperity_client::pagination::{PageAccumulator, PageRequest};
/// use insperity_client::transport::RawResponse;
///
/// # fn main() -> insperity_client::Result<()> {
/// let mut pages = PageAccumulator::<u32>::new(PageRequest::first("https://x/items", vec![]), 10);
///
/// let first = pages.next_request()?.unwrap();
/// pages.push(RawResponse::new(200, first.url, r#"{"results":[1,2],"nextPageUrl":"https://x/items?p=2"}"#))?;
///
/// let second = pages.next_request()?.unwrap();
/// assert_eq!(second.url, "https://x/items?p=2");
/// pages.push(RawResponse::new(200, second.url, r#"{"results":[3],"nextPageUrl":null}"#))?;
///
/// assert!(pages.next_request()?.is_none());
/// assert_eq!(pages.finish(), vec![1, 2, 3]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PageAccumulator<T> {
    pending: Option<PageRequest>,
    results: Vec<T>,
    pages: usize,
    max_pages: usize,
}

impl<T: DeserializeOwned> PageAccumulator<T> {
    /// Start a listing at `first`, following at most `max_pages` pages.
    /// The first page is always requested, so a cap of 0 acts as 1.
    #[must_use]
    pub fn new(first: PageRequest, max_pages: usize) -> Self {
        Self {
            pending: Some(first),
            results: Vec::new(),
            pages: 0,
            max_pages: max_pages.max(1),
        }
    }

    /// The next request to issue, or `None` when the chain is exhausted.
    ///
    /// # Errors
    ///
    /// `PageLimitExceeded` if another page is pending after `max_pages`
    /// pages have already been requested.
    pub fn next_request(&mut self) -> Result<Option<PageRequest>> {
        let Some(request) = self.pending.take() else {
            return Ok(None);
        };
        if self.pages >= self.max_pages {
            tracing::warn!(
                limit = self.max_pages,
                next = %request.url,
                "Pagination limit reached, aborting listing"
            );
            return Err(InsperityError::page_limit_exceeded(
                self.max_pages,
                request.url,
            ));
        }
        self.pages += 1;
        Ok(Some(request))
    }

    /// Absorb the response to the last request.
    ///
    /// # Errors
    ///
    /// `Http` for a non-success status, `JsonDecode` when the body is not a
    /// `{results, nextPageUrl}` page.
    pub fn push(&mut self, response: RawResponse) -> Result<()> {
        let response = response.error_for_status()?;
        let page: Page<T> = response.json()?;
        tracing::debug!(
            page = self.pages,
            records = page.results.len(),
            more = page.next_page_url.is_some(),
            "Received page"
        );
        self.results.extend(page.results);
        self.pending = page
            .next_page_url
            .filter(|url| !url.is_empty())
            .map(PageRequest::next);
        Ok(())
    }

    /// Number of pages requested so far
    #[must_use]
    pub fn pages_requested(&self) -> usize {
        self.pages
    }

    /// All accumulated records, first page first
    #[must_use]
    pub fn finish(self) -> Vec<T> {
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(results: &[i64], next: Option<&str>) -> String {
        json!({"results": results, "nextPageUrl": next}).to_string()
    }

    /// Drive an accumulator over canned (status, body) pairs keyed by URL order
    fn drive(
        accumulator: &mut PageAccumulator<i64>,
        responses: Vec<(u16, String)>,
    ) -> Result<Vec<PageRequest>> {
        let mut issued = Vec::new();
        let mut responses = responses.into_iter();
        while let Some(request) = accumulator.next_request()? {
            let (status, body) = responses.next().expect("more requests than pages");
            accumulator.push(RawResponse::new(status, request.url.clone(), body))?;
            issued.push(request);
        }
        Ok(issued)
    }

    #[test]
    fn test_concatenates_pages_in_order() {
        let first = PageRequest::first(
            "https://x/employees",
            vec![("employeeStatusFilter".to_string(), "Active".to_string())],
        );
        let mut accumulator = PageAccumulator::new(first.clone(), 100);

        let issued = drive(
            &mut accumulator,
            vec![
                (200, page(&[1, 2], Some("https://x/employees?page=2&employeeStatusFilter=Active"))),
                (200, page(&[3], Some("https://x/employees?page=3&employeeStatusFilter=Active"))),
                (200, page(&[4, 5, 6], None)),
            ],
        )
        .unwrap();

        assert_eq!(accumulator.pages_requested(), 3);
        assert_eq!(accumulator.finish(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(issued[0], first);
        assert_eq!(
            issued[1],
            PageRequest::next("https://x/employees?page=2&employeeStatusFilter=Active")
        );
        assert!(issued[2].query.is_empty());
    }

    #[test]
    fn test_single_page_without_next_key() {
        let mut accumulator = PageAccumulator::new(PageRequest::first("https://x/e", vec![]), 5);
        drive(&mut accumulator, vec![(200, r#"{"results":[7]}"#.to_string())]).unwrap();
        assert_eq!(accumulator.finish(), vec![7]);
    }

    #[test]
    fn test_empty_next_url_ends_chain() {
        let mut accumulator = PageAccumulator::new(PageRequest::first("https://x/e", vec![]), 5);
        drive(&mut accumulator, vec![(200, page(&[1], Some("")))]).unwrap();
        assert_eq!(accumulator.finish(), vec![1]);
    }

    #[test]
    fn test_failure_mid_chain_is_http_error() {
        let mut accumulator = PageAccumulator::new(PageRequest::first("https://x/e", vec![]), 5);
        let err = drive(
            &mut accumulator,
            vec![
                (200, page(&[1, 2], Some("https://x/e?page=2"))),
                (500, "server error".to_string()),
            ],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            InsperityError::Http { status: 500, ref url, .. } if url == "https://x/e?page=2"
        ));
    }

    #[test]
    fn test_page_limit() {
        let mut accumulator = PageAccumulator::new(PageRequest::first("https://x/e", vec![]), 2);
        let err = drive(
            &mut accumulator,
            vec![
                (200, page(&[1], Some("https://x/e?page=2"))),
                (200, page(&[2], Some("https://x/e?page=3"))),
            ],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            InsperityError::PageLimitExceeded { limit: 2, ref url } if url == "https://x/e?page=3"
        ));
    }

    #[test]
    fn test_zero_page_cap_still_fetches_first_page() {
        let mut accumulator = PageAccumulator::new(PageRequest::first("https://x/e", vec![]), 0);
        drive(&mut accumulator, vec![(200, page(&[1, 2], None))]).unwrap();
        assert_eq!(accumulator.finish(), vec![1, 2]);

        let mut accumulator = PageAccumulator::new(PageRequest::first("https://x/e", vec![]), 0);
        let err = drive(
            &mut accumulator,
            vec![(200, page(&[1], Some("https://x/e?page=2")))],
        )
        .unwrap_err();
        assert!(matches!(err, InsperityError::PageLimitExceeded { limit: 1, .. }));
    }

    #[test]
    fn test_missing_results_is_decode_error() {
        let mut accumulator = PageAccumulator::new(PageRequest::first("https://x/e", vec![]), 5);
        let err = drive(&mut accumulator, vec![(200, r#"{"nextPageUrl":null}"#.to_string())])
            .unwrap_err();
        assert!(matches!(err, InsperityError::JsonDecode(_)));
    }
}
