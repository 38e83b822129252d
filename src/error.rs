//! Error taxonomy for the fetch → parse → load pipeline.
//!
//! Every failure is caught where it happens and turned into one of these
//! values.  They travel back to the owning context inside
//! [`LoadResult::Failure`](crate::loader::LoadResult::Failure) instead of
//! being collapsed into an empty list, so the display layer can tell "the
//! server said 404" apart from "the server returned zero articles".
//!
//! All types are `Clone + PartialEq` because a failed outcome is cached by
//! the loader and replayed to re-attached subscribers.

use thiserror::Error;

/// Errors raised while performing the HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request URL is not an absolute `http`/`https` URL.
    #[error("malformed URL {url:?}: {reason}")]
    UrlMalformed { url: String, reason: String },

    /// DNS failure, refused connection, timeout, or a broken body stream.
    #[error("connection to {url} failed: {reason}")]
    ConnectionFailure { url: String, reason: String },

    /// The server answered with something other than `200 OK`.
    #[error("server responded with HTTP status {0}")]
    HttpStatus(u16),
}

/// Errors raised while decoding the JSON envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The response body was absent or blank.
    #[error("response body is empty")]
    Empty,

    /// The body is not the expected envelope.
    ///
    /// `path` points at the offending location, e.g.
    /// `response.results[2].webUrl`, or `$` when the text is not JSON.
    #[error("malformed response at `{path}`: {reason}")]
    Malformed { path: String, reason: String },
}

/// The failure half of a load outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The loader has no request URL configured.
    #[error("no request URL configured")]
    NoUrl,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The background task ended without producing an outcome.
    #[error("background load ended without a result")]
    Aborted,
}
