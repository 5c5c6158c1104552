//! Rate-limited FIFO request queue.
//!
//! Guarantees that no two dispatches begin less than `min_delay` apart, no
//! matter how many callers submit concurrently. Tasks run one at a time in
//! submission order.
//!
//! The dispatch loop is spawned lazily: the first submission on an idle
//! queue starts it, and it exits once the queue drains. The `dispatching`
//! flag is checked and set under the same lock as the append, so at most one
//! loop is ever active, even on the multi-threaded runtime.
//!
//! Each action runs in its own Tokio task. A panicking action is reported to
//! its own caller as a transport failure and does not stall the queue.
//!
//! ```no_run
//! # async fn demo() {
//! use std::time::Duration;
//! use calmprice::application::queue::RequestQueue;
//!
//! let queue: RequestQueue<u32> = RequestQueue::new(Duration::from_millis(1200));
//! let first = queue.submit(|| async { Ok(1) });
//! let second = queue.submit(|| async { Ok(2) });
//! assert_eq!(first.await, Ok(1));
//! assert_eq!(second.await, Ok(2)); // started >= 1.2s after `first`
//! # }
//! ```

mod task;

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::domain::TaskId;
use crate::error::FetchError;

pub use task::TaskHandle;
use task::QueuedTask;

/// Default spacing between consecutive dispatch starts.
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(1200);

/// Mutable queue state, guarded by one mutex.
struct RateLimiterState<T> {
    last_dispatch_at: Option<Instant>,
    queue: VecDeque<QueuedTask<T>>,
    dispatching: bool,
    dispatched: u64,
}

struct Shared<T> {
    min_delay: Duration,
    state: Mutex<RateLimiterState<T>>,
}

/// FIFO admission queue enforcing a minimum delay between dispatch starts.
///
/// Cloning yields another handle to the same queue.
pub struct RequestQueue<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for RequestQueue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Send + 'static> RequestQueue<T> {
    /// Create an idle queue.
    #[must_use]
    pub fn new(min_delay: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                min_delay,
                state: Mutex::new(RateLimiterState {
                    last_dispatch_at: None,
                    queue: VecDeque::new(),
                    dispatching: false,
                    dispatched: 0,
                }),
            }),
        }
    }

    #[must_use]
    pub fn min_delay(&self) -> Duration {
        self.shared.min_delay
    }

    /// Enqueue `action` and return a handle resolving to its result.
    ///
    /// Never waits: the task is appended and the dispatch loop is started if
    /// idle. Must be called from within a Tokio runtime.
    ///
    /// Dropping the handle does not withdraw the task; it still runs in turn
    /// and its result is discarded.
    pub fn submit<F, Fut>(&self, action: F) -> TaskHandle<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let id = TaskId::new();
        let (sink, receiver) = oneshot::channel();
        let task = QueuedTask {
            id,
            action: Box::new(move || action().boxed()),
            sink,
        };

        let start_loop = {
            let mut state = self.shared.state.lock();
            state.queue.push_back(task);
            trace!(task = %id, pending = state.queue.len(), "Task queued");
            !std::mem::replace(&mut state.dispatching, true)
        };

        if start_loop {
            tokio::spawn(dispatch_loop(Arc::clone(&self.shared)));
        }

        TaskHandle::new(id, receiver)
    }

    /// Tasks queued and not yet dispatched.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.state.lock().queue.len()
    }

    /// Whether a dispatch loop is currently active.
    #[must_use]
    pub fn is_dispatching(&self) -> bool {
        self.shared.state.lock().dispatching
    }

    /// Total tasks dispatched over the queue's lifetime.
    #[must_use]
    pub fn dispatched(&self) -> u64 {
        self.shared.state.lock().dispatched
    }
}

impl<T> std::fmt::Debug for RequestQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("RequestQueue")
            .field("min_delay", &self.shared.min_delay)
            .field("pending", &state.queue.len())
            .field("dispatching", &state.dispatching)
            .finish()
    }
}

/// Drain the queue one task at a time, spacing dispatch starts.
async fn dispatch_loop<T: Send + 'static>(shared: Arc<Shared<T>>) {
    debug!("Dispatch loop started");

    loop {
        let wait = {
            let mut state = shared.state.lock();
            if state.queue.is_empty() {
                state.dispatching = false;
                break;
            }
            state
                .last_dispatch_at
                .map(|last| shared.min_delay.saturating_sub(last.elapsed()))
                .unwrap_or_default()
        };

        if !wait.is_zero() {
            trace!(wait_ms = wait.as_millis() as u64, "Spacing next dispatch");
            tokio::time::sleep(wait).await;
        }

        // Only this loop pops, so the head observed above is still there.
        let task = {
            let mut state = shared.state.lock();
            let Some(task) = state.queue.pop_front() else {
                state.dispatching = false;
                break;
            };
            state.last_dispatch_at = Some(Instant::now());
            state.dispatched += 1;
            task
        };

        let QueuedTask { id, action, sink } = task;
        debug!(task = %id, "Dispatching task");

        let result = match tokio::spawn(action()).await {
            Ok(result) => result,
            Err(e) => Err(FetchError::transport(format!("queued task {id} aborted: {e}"))),
        };

        if sink.send(result).is_err() {
            debug!(task = %id, "Caller dropped its handle, result discarded");
        }
    }

    debug!("Dispatch loop idle");
}
