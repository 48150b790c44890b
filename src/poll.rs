//! Long-poll retrieval.
//!
//! A poll probes once immediately. If nothing newer than the watermark exists it sleeps
//! and re-queries on a widening schedule, returning as soon as any attempt finds
//! messages. After [`RETRY_ATTEMPTS`] empty retries it gives up with an empty list.

use std::{future::Future, time::Duration};

use tracing::debug;

use crate::{store::Message, AppResult};

pub const RETRY_ATTEMPTS: u32 = 36;
pub const NORMAL_START: Duration = Duration::from_millis(500);
pub const EXTENDED_START: Duration = Duration::from_millis(5000);
pub const STEP: Duration = Duration::from_millis(125);
pub const MAX_INTERVAL: Duration = Duration::from_millis(5000);

/// Anything that can answer "messages after this sequence number, newest first".
pub trait MessageSource {
    fn messages_since(&self, watermark: i64) -> impl Future<Output = AppResult<Vec<Message>>> + Send;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WaitMode {
    #[default]
    Normal,
    /// `wt=max`: start at the interval ceiling.
    Extended,
}

impl WaitMode {
    pub fn from_query(wt: Option<&str>) -> Self {
        match wt {
            Some("max") => WaitMode::Extended,
            _ => WaitMode::Normal,
        }
    }

    fn start(self) -> Duration {
        match self {
            WaitMode::Normal => NORMAL_START,
            WaitMode::Extended => EXTENDED_START,
        }
    }
}

/// Delays to sleep before each retry attempt.
#[derive(Debug, Clone)]
pub struct Backoff {
    interval: Duration,
    remaining: u32,
}

impl Backoff {
    pub fn new(mode: WaitMode) -> Self {
        Self {
            interval: mode.start(),
            remaining: RETRY_ATTEMPTS,
        }
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = self.interval;
        self.interval = (self.interval + STEP).min(MAX_INTERVAL);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for Backoff {}

pub async fn poll<S: MessageSource>(source: &S, watermark: i64, mode: WaitMode) -> AppResult<Vec<Message>> {
    let messages = source.messages_since(watermark).await?;
    if !messages.is_empty() {
        return Ok(messages);
    }

    debug!(watermark, ?mode, "nothing new, waiting");
    for (attempt, wait) in Backoff::new(mode).enumerate() {
        tokio::time::sleep(wait).await;

        let messages = source.messages_since(watermark).await?;
        if !messages.is_empty() {
            debug!(watermark, attempt = attempt + 1, count = messages.len(), "new messages");
            return Ok(messages);
        }
    }

    debug!(watermark, "poll exhausted");
    Ok(Vec::new())
}
