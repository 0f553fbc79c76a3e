//! Keeps a single watch open on the location provider
//!
//! ```text
//!            start                    hidden
//!   Idle ───────────────► Watching ──────────► Suspended
//!    ▲                     │   ▲                  │
//!    │   permission denied │   └──────────────────┘
//!    └─────────────────────┘         visible
//! ```
//!
//! Starting always cancels the previous watch first, so there is never more
//! than one open.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::position::{PositionReading, ProviderError, Status, WatchId, WatchOptions};

/// Why a watch could not be opened.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WatchError {
    /// The device has no location capability.
    #[error("Geolocation is not supported")]
    Unsupported,

    /// The provider threw while opening the watch.
    #[error("Failed to start watch: {0}")]
    Failed(String),
}

/// A push source of position fixes.
///
/// Implementations deliver results for a watch as [`FeedEvent`]s tagged
/// with the id returned from [`LocationProvider::watch`].
pub trait LocationProvider {
    /// Open a standing request for updates.
    ///
    /// # Errors
    ///
    /// Returns an error if the watch cannot be opened.
    fn watch(&mut self, options: &WatchOptions) -> Result<WatchId, WatchError>;

    /// Cancel a watch opened by [`LocationProvider::watch`].
    fn clear_watch(&mut self, id: WatchId);
}

/// What the provider reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedEventKind {
    /// A new fix.
    Position(PositionReading),
    /// A failure.
    Error(ProviderError),
}

/// An event from one watch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedEvent {
    /// The watch that produced this event.
    pub watch: WatchId,
    /// The event.
    pub kind: FeedEventKind,
}

/// Where the adapter is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// No watch, and none will be started automatically.
    Idle,
    /// A watch is open.
    Watching(WatchId),
    /// The page is hidden; a watch will be started when it is visible.
    Suspended,
}

/// Adapter between the location provider and the rest of the app.
///
/// This is the only writer of the current reading and status.
pub struct PositionFeed<P> {
    provider: P,
    options: WatchOptions,
    state: FeedState,
    reading: Option<PositionReading>,
    status: Status,
}

impl<P: LocationProvider> PositionFeed<P> {
    /// Create an idle feed.
    pub const fn new(provider: P, options: WatchOptions) -> Self {
        Self {
            provider,
            options,
            state: FeedState::Idle,
            reading: None,
            status: Status::Requesting,
        }
    }

    /// The most recent fix, if the last event was a fix.
    #[must_use]
    pub const fn reading(&self) -> Option<&PositionReading> {
        self.reading.as_ref()
    }

    /// The current status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// The current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> FeedState {
        self.state
    }

    /// The options used for new watches.
    #[must_use]
    pub const fn options(&self) -> &WatchOptions {
        &self.options
    }

    /// Access the provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    fn cancel(&mut self) {
        if let FeedState::Watching(id) = self.state {
            debug!("Clearing watch {id:?}");
            self.provider.clear_watch(id);
        }
    }

    /// Open a new watch, cancelling any open one first.
    pub fn start(&mut self) {
        self.cancel();
        match self.provider.watch(&self.options) {
            Ok(id) => {
                info!("Started watch {id:?}");
                self.state = FeedState::Watching(id);
                self.status = Status::Requesting;
            }
            Err(WatchError::Unsupported) => {
                warn!("Geolocation is not supported");
                self.state = FeedState::Idle;
                self.status = Status::Unsupported;
            }
            Err(err @ WatchError::Failed(_)) => {
                warn!("{err}");
                self.state = FeedState::Idle;
                self.status = Status::UnknownError;
            }
        }
    }

    /// Process an event from the provider.
    ///
    /// Events from a watch that is no longer open are ignored.
    pub fn handle(&mut self, event: FeedEvent) {
        if self.state != FeedState::Watching(event.watch) {
            debug!("Ignoring event from stale watch {:?}", event.watch);
            return;
        }

        match event.kind {
            FeedEventKind::Position(reading) => {
                self.reading = Some(reading);
                self.status = Status::Ready;
            }
            FeedEventKind::Error(error) => {
                warn!("Geolocation error: {error:?}");
                self.reading = None;
                self.status = error.into();
                if error == ProviderError::PermissionDenied {
                    // Retrying cannot help until the user grants access.
                    self.cancel();
                    self.state = FeedState::Idle;
                }
            }
        }
    }

    /// The page became visible or hidden.
    pub fn set_visible(&mut self, visible: bool) {
        match (visible, self.state) {
            (false, FeedState::Watching(_)) => {
                debug!("Page hidden, suspending watch");
                self.cancel();
                self.state = FeedState::Suspended;
            }
            (true, FeedState::Suspended) => {
                debug!("Page visible, resuming watch");
                self.start();
            }
            _ => {}
        }
    }

    /// The page is going away, or into the back/forward cache.
    ///
    /// An open watch is closed and resumes if the page becomes visible again.
    /// A feed stopped by an error stays stopped.
    pub fn teardown(&mut self) {
        if self.state == FeedState::Idle {
            return;
        }
        self.cancel();
        self.state = FeedState::Suspended;
    }
}
