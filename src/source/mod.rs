//! Article source: fetching and decoding.
//!
//! This module defines the [`Fetcher`] seam, the [`NewsItem`] record and the
//! [`fetch_news`] pipeline that the loader runs in the background.
//!
//! ## For contributors
//!
//! * [`fetch`] holds the real HTTP implementation ([`HttpFetcher`]).
//! * [`parse`] turns a response body into items and knows nothing about
//!   HTTP, so it can be tested with plain strings.
//! * Tests that need a fetcher without a network implement [`Fetcher`]
//!   directly; see the loader tests for examples.

mod fetch;
mod news_item;
mod parse;

pub use fetch::{HttpFetcher, Timeouts};
pub use news_item::NewsItem;
pub use parse::parse_news;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{ErrorKind, FetchError};
use crate::loader::LoadResult;

/// Something that can retrieve a response body for a URL.
///
/// The loader calls [`fetch()`](Fetcher::fetch) from a tokio task, so
/// implementations must be `Send + Sync`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform one request and return the body as UTF-8 text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetch `url` and decode the body, logging any failure with its context.
pub async fn fetch_news(fetcher: &dyn Fetcher, url: &str) -> LoadResult {
    let body = match fetcher.fetch(url).await {
        Ok(body) => body,
        Err(FetchError::HttpStatus(status)) => {
            warn!(%url, status, "unexpected HTTP status");
            return LoadResult::Failure(FetchError::HttpStatus(status).into());
        }
        Err(e) => {
            warn!(%url, error = %e, "problem making the HTTP request");
            return LoadResult::Failure(e.into());
        }
    };

    match parse_news(Some(&body)) {
        Ok(items) => {
            info!(%url, count = items.len(), "articles loaded");
            LoadResult::Success(items)
        }
        Err(e) => {
            warn!(%url, error = %e, "problem parsing the news response");
            LoadResult::Failure(ErrorKind::Parse(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    struct Canned(Result<String, FetchError>);

    #[async_trait]
    impl Fetcher for Canned {
        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn successful_body_becomes_success() {
        let body = r#"{"response":{"results":[{"webTitle":"A","sectionName":"World","webUrl":"http://a"}]}}"#;
        let result = fetch_news(&Canned(Ok(body.into())), "http://api").await;
        assert_eq!(
            result,
            LoadResult::Success(vec![NewsItem::new("A", "World", "http://a")])
        );
    }

    #[tokio::test]
    async fn fetch_error_is_kept_distinct() {
        let result = fetch_news(&Canned(Err(FetchError::HttpStatus(503))), "http://api").await;
        assert_eq!(
            result,
            LoadResult::Failure(ErrorKind::Fetch(FetchError::HttpStatus(503)))
        );
    }

    #[tokio::test]
    async fn empty_body_is_parse_empty() {
        let result = fetch_news(&Canned(Ok(String::new())), "http://api").await;
        assert_eq!(result, LoadResult::Failure(ErrorKind::Parse(ParseError::Empty)));
    }
}
