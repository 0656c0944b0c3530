//! Shutdown coordination.
//!
//! A single `begin()` call stops the background check schedulers and wakes
//! everything draining the process: `server::run` uses it to drive axum's
//! graceful shutdown, and `POST /shutdown` and OS signals funnel into it.
//! Injected into HTTP handlers as a capability so tests can observe a
//! shutdown request without the process exiting.

use crate::health::CancelHandle;
use tokio::sync::watch;

/// Why the process is going down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// `POST /shutdown` was called.
    HttpRequest,
    /// Ctrl+C on the controlling terminal.
    Interrupt,
    /// SIGTERM from the operator/orchestrator.
    Terminate,
}

impl ShutdownReason {
    /// Stable label for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HttpRequest => "http-request",
            Self::Interrupt => "ctrl-c",
            Self::Terminate => "sigterm",
        }
    }
}

/// Coordinates the one-way transition from running to draining.
///
/// Owns the check schedulers' [`CancelHandle`]: beginning shutdown stops
/// the scheduler loops in the same step, so there is no window where the
/// server is draining but checks keep firing. Beginning is idempotent and
/// non-recoverable; the first reason wins and later calls are no-ops.
#[derive(Clone, Debug)]
pub struct ShutdownCoordinator {
    schedulers: CancelHandle,
    reason: watch::Sender<Option<ShutdownReason>>,
}

impl ShutdownCoordinator {
    /// Create a coordinator owning the schedulers' cancel handle.
    pub fn new(schedulers: CancelHandle) -> Self {
        let (reason, _) = watch::channel(None);
        Self { schedulers, reason }
    }

    /// Begin shutdown: stop the check schedulers and wake all waiters.
    ///
    /// The first recorded reason sticks; repeated calls are harmless.
    pub fn begin(&self, reason: ShutdownReason) {
        self.schedulers.cancel();
        self.reason.send_if_modified(|current| {
            if current.is_none() {
                *current = Some(reason);
                true
            } else {
                false
            }
        });
    }

    /// Why shutdown began, or `None` while still running.
    pub fn reason(&self) -> Option<ShutdownReason> {
        *self.reason.borrow()
    }

    /// Returns true once shutdown has begun.
    pub fn is_shutting_down(&self) -> bool {
        self.reason().is_some()
    }

    /// Wait until shutdown begins.
    pub async fn begun(&self) {
        let mut rx = self.reason.subscribe();
        // self holds the sender, so the channel cannot close while we wait
        let _ = rx.wait_for(|reason| reason.is_some()).await;
    }
}
