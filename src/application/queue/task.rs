//! Queued units of work and the handles callers await.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use tokio::sync::oneshot;

use crate::domain::TaskId;
use crate::error::FetchError;

pub(super) type Action<T> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T, FetchError>> + Send>;

/// A task owned by the queue until dispatched.
pub(super) struct QueuedTask<T> {
    pub(super) id: TaskId,
    pub(super) action: Action<T>,
    pub(super) sink: oneshot::Sender<Result<T, FetchError>>,
}

/// Awaitable result of a submitted task. Resolves exactly once.
#[must_use = "the task runs regardless, but its result is lost unless awaited"]
#[derive(Debug)]
pub struct TaskHandle<T> {
    id: TaskId,
    receiver: oneshot::Receiver<Result<T, FetchError>>,
}

impl<T> TaskHandle<T> {
    pub(super) fn new(id: TaskId, receiver: oneshot::Receiver<Result<T, FetchError>>) -> Self {
        Self { id, receiver }
    }

    /// Identifier assigned at submission.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T, FetchError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|delivered| {
            delivered.unwrap_or_else(|_| Err(FetchError::transport("request queue dropped the task")))
        })
    }
}
