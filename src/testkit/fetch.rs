//! Fake upstream for testing.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::error::FetchError;
use crate::port::outbound::fetch::Fetcher;

type Reply = Result<Vec<u8>, FetchError>;

struct Route {
    pattern: String,
    replies: VecDeque<Reply>,
}

/// A [`Fetcher`] that answers from a script.
///
/// Each route matches URLs containing its pattern; the first matching route
/// wins. A route's replies are consumed in order and the last one repeats.
/// Unmatched URLs fail with a 404.
///
/// Every call is recorded with its (Tokio) start time, so tests on a paused
/// clock can assert request spacing.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: Mutex<Vec<Route>>,
    latency: Duration,
    log: Mutex<Vec<(String, Instant)>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs containing `pattern` with `body`.
    pub fn respond(self, pattern: &str, body: impl Into<Vec<u8>>) -> Self {
        self.push(pattern, Ok(body.into()))
    }

    /// Fail URLs containing `pattern` with `error`.
    pub fn fail(self, pattern: &str, error: FetchError) -> Self {
        self.push(pattern, Err(error))
    }

    /// Delay every reply by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of fetches made so far.
    pub fn calls(&self) -> usize {
        self.log.lock().len()
    }

    /// URLs fetched, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().iter().map(|(url, _)| url.clone()).collect()
    }

    /// Start instants of every fetch, in call order.
    pub fn request_times(&self) -> Vec<Instant> {
        self.log.lock().iter().map(|(_, at)| *at).collect()
    }

    fn push(self, pattern: &str, reply: Reply) -> Self {
        {
            let mut routes = self.routes.lock();
            match routes.iter_mut().find(|r| r.pattern == pattern) {
                Some(route) => route.replies.push_back(reply),
                None => routes.push(Route {
                    pattern: pattern.to_string(),
                    replies: VecDeque::from([reply]),
                }),
            }
        }
        self
    }

    fn next_reply(&self, url: &str) -> Reply {
        let mut routes = self.routes.lock();
        let Some(route) = routes.iter_mut().find(|r| url.contains(&r.pattern)) else {
            return Err(FetchError::RequestFailed {
                status: 404,
                message: format!("no scripted response for {url}"),
            });
        };
        let reply = if route.replies.len() > 1 {
            route.replies.pop_front()
        } else {
            route.replies.front().cloned()
        };
        reply.unwrap_or_else(|| Err(FetchError::transport("empty script")))
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.log.lock().push((url.to_string(), Instant::now()));
        let reply = self.next_reply(url);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        reply
    }
}
