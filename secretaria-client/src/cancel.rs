//! Cancellation token over a `watch` channel.
//!
//! Controllers hold one token each and trip it on teardown; in-flight work
//! raced through [`CancelToken::run`] then resolves to `ClientError::Cancelled`
//! instead of writing state.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{ClientError, ClientResult};

/// Cloneable cancellation signal. All clones observe the same state.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx: Arc::new(tx), rx }
    }

    /// Trip the token. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the token is tripped.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // The sender lives as long as any clone of this token, so this only
        // returns early if the channel is gone, which cannot happen here.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Run `fut` unless the token trips first.
    pub async fn run<F, T>(&self, fut: F) -> ClientResult<T>
    where
        F: Future<Output = T>,
    {
        if self.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => {
                tracing::debug!("operation cancelled");
                Err(ClientError::Cancelled)
            }
            out = fut => Ok(out),
        }
    }
}
