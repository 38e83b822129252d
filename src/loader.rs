//! Asynchronous, cached article loader.
//!
//! A [`NewsLoader`] lives on the owning context (the terminal event loop or
//! the `--plain` driver) and runs the fetch → parse pipeline as a tokio task
//! on a runtime handle it was given.  Outcomes travel back over a oneshot
//! channel and are applied on the owning context by [`NewsLoader::poll`] or
//! [`NewsLoader::finished`], which then forward them to the subscriber.
//!
//! ```text
//!            start()                      poll() / finished()
//! Idle/Reset ───────► Loading ──(task)──► Loaded(result) ──► subscriber
//!     ▲                  │                      │
//!     └──── reset() ─────┴──────────────────────┘
//! ```
//!
//! Guarantees:
//!
//! * at most one load is in flight per loader; `start()` while loading is a
//!   no-op, so each accepted `start()` produces exactly one `Finished`;
//! * the last outcome is cached until `reset()` and replayed to a new
//!   subscriber without touching the network;
//! * `reset()` and dropping the loader cancel the in-flight request, and a
//!   cancelled load never delivers anything.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::ErrorKind;
use crate::source::{fetch_news, Fetcher, NewsItem};

/// Outcome of one load cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadResult {
    /// Articles in server order.  May be empty.
    Success(Vec<NewsItem>),
    Failure(ErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderState {
    Idle,
    Loading,
    Loaded(LoadResult),
    /// Cached data was discarded by `reset()`.  Behaves like `Idle`.
    Reset,
}

/// Notifications sent to the subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderEvent {
    Started,
    Finished(LoadResult),
    Reset,
}

impl LoaderEvent {
    /// Route this event to the matching callback.
    pub fn dispatch(self, callbacks: &mut impl LoaderCallbacks) {
        match self {
            LoaderEvent::Started => callbacks.on_load_started(),
            LoaderEvent::Finished(result) => callbacks.on_load_finished(result),
            LoaderEvent::Reset => callbacks.on_reset(),
        }
    }
}

/// Consumer-side view of the loader lifecycle.
pub trait LoaderCallbacks {
    /// A fetch began.
    fn on_load_started(&mut self);

    /// A load cycle ended, or a cached outcome is being replayed.
    fn on_load_finished(&mut self, result: LoadResult);

    /// Cached data was cleared.
    fn on_reset(&mut self);
}

struct InFlight {
    cancel: CancellationToken,
    done: oneshot::Receiver<LoadResult>,
}

pub struct NewsLoader {
    url: Option<String>,
    fetcher: Arc<dyn Fetcher>,
    runtime: Handle,
    state: LoaderState,
    subscriber: Option<UnboundedSender<LoaderEvent>>,
    in_flight: Option<InFlight>,
}

impl NewsLoader {
    /// Create an idle loader for `url`.
    ///
    /// Background work is spawned on `runtime`; the loader itself can be
    /// used from outside the runtime.
    pub fn new(url: Option<String>, fetcher: Arc<dyn Fetcher>, runtime: Handle) -> Self {
        Self {
            url,
            fetcher,
            runtime,
            state: LoaderState::Idle,
            subscriber: None,
            in_flight: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoaderState::Loading
    }

    /// The cached outcome, if the last cycle completed and was not reset.
    pub fn current_result(&self) -> Option<&LoadResult> {
        match &self.state {
            LoaderState::Loaded(result) => Some(result),
            _ => None,
        }
    }

    /// Register the consumer, replacing any previous one.
    ///
    /// A cached outcome is replayed straight away as `Finished`; a load in
    /// progress is announced as `Started` and its outcome will follow.
    pub fn subscribe(&mut self) -> UnboundedReceiver<LoaderEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscriber = Some(tx);

        let replay = match &self.state {
            LoaderState::Loaded(result) => Some(LoaderEvent::Finished(result.clone())),
            LoaderState::Loading => Some(LoaderEvent::Started),
            LoaderState::Idle | LoaderState::Reset => None,
        };
        if let Some(event) = replay {
            debug!(?event, "replaying state to new subscriber");
            self.emit(event);
        }
        rx
    }

    /// Detach the consumer.  A load in flight still completes and is
    /// cached, but nothing is delivered.
    pub fn unsubscribe(&mut self) {
        self.subscriber = None;
    }

    /// Begin a load cycle.
    ///
    /// Returns `false` when a load is already in flight; in that case
    /// nothing happens.
    pub fn start(&mut self) -> bool {
        if self.is_loading() {
            debug!("load already in flight; ignoring start");
            return false;
        }

        let url = match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => {
                warn!("no request URL configured");
                self.complete(LoadResult::Failure(ErrorKind::NoUrl));
                return true;
            }
        };

        self.state = LoaderState::Loading;
        self.emit(LoaderEvent::Started);

        let cancel = CancellationToken::new();
        let (tx, done) = oneshot::channel();
        let fetcher = Arc::clone(&self.fetcher);
        let token = cancel.clone();

        self.runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => debug!(%url, "load cancelled"),
                result = fetch_news(fetcher.as_ref(), &url) => {
                    // The loader may have been dropped in the meantime.
                    let _ = tx.send(result);
                }
            }
        });

        self.in_flight = Some(InFlight { cancel, done });
        true
    }

    /// Apply a completed load, if there is one, without blocking.
    pub fn poll(&mut self) -> Option<&LoadResult> {
        let in_flight = self.in_flight.as_mut()?;
        match in_flight.done.try_recv() {
            Ok(result) => self.complete(result),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => self.abort(),
        }
        self.current_result()
    }

    /// Wait for the in-flight load, if any, and return the cached outcome.
    pub async fn finished(&mut self) -> Option<&LoadResult> {
        if let Some(in_flight) = self.in_flight.as_mut() {
            match (&mut in_flight.done).await {
                Ok(result) => self.complete(result),
                Err(_) => self.abort(),
            }
        }
        self.current_result()
    }

    /// Cancel any in-flight load and forget the cached outcome.
    pub fn reset(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!("cancelling in-flight load on reset");
            in_flight.cancel.cancel();
        }
        self.state = LoaderState::Reset;
        self.emit(LoaderEvent::Reset);
    }

    fn complete(&mut self, result: LoadResult) {
        self.in_flight = None;
        self.state = LoaderState::Loaded(result.clone());
        self.emit(LoaderEvent::Finished(result));
    }

    fn abort(&mut self) {
        warn!("background load ended without a result");
        self.complete(LoadResult::Failure(ErrorKind::Aborted));
    }

    fn emit(&mut self, event: LoaderEvent) {
        let Some(tx) = &self.subscriber else {
            return;
        };
        if tx.send(event).is_err() {
            debug!("subscriber went away; dropping it");
            self.subscriber = None;
        }
    }
}

impl Drop for NewsLoader {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel.cancel();
        }
    }
}
