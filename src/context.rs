use std::future::Future;
use std::io;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Payload of the io errors [`ReadContext::run`] returns when it gives up.
///
/// [`Error::is_cancelled`](crate::Error::is_cancelled) looks for this rather
/// than the io kind, so a genuine `EINTR` is not mistaken for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ReadAborted {
    #[error("read cancelled")]
    Cancelled,
    #[error("read deadline exceeded")]
    DeadlineExceeded,
}

impl ReadAborted {
    pub fn kind(self) -> io::ErrorKind {
        match self {
            ReadAborted::Cancelled => io::ErrorKind::Interrupted,
            ReadAborted::DeadlineExceeded => io::ErrorKind::TimedOut,
        }
    }

    /// True when `err` was produced by a [`ReadContext`].
    pub fn is_cause_of(err: &io::Error) -> bool {
        err.get_ref().is_some_and(|inner| inner.is::<ReadAborted>())
    }
}

impl From<ReadAborted> for io::Error {
    fn from(reason: ReadAborted) -> Self {
        io::Error::new(reason.kind(), reason)
    }
}

/// Cancellation and deadline for the `*_with_context` reads.
///
/// Cloning shares the token, so cancelling any clone cancels them all.
#[derive(Clone, Debug, Default)]
pub struct ReadContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl ReadContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// Uses an existing token, e.g. a child of a service shutdown token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Sets the deadline to `timeout` from now.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drives `fut` until it finishes, the token fires, or the deadline passes.
    ///
    /// On cancellation `fut` is dropped and an [`io::ErrorKind::Interrupted`]
    /// error is returned; past the deadline the kind is [`io::ErrorKind::TimedOut`].
    pub async fn run<F, T>(&self, fut: F) -> io::Result<T>
    where
        F: Future<Output = io::Result<T>>,
    {
        if self.token.is_cancelled() {
            return Err(ReadAborted::Cancelled.into());
        }
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ReadAborted::Cancelled.into()),
            _ = expired => Err(ReadAborted::DeadlineExceeded.into()),
            res = fut => res,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completes_when_not_cancelled() {
        let ctx = ReadContext::background();
        let value = ctx.run(async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn pre_cancelled_never_polls_the_future() {
        let ctx = ReadContext::background();
        ctx.cancel();
        let polled = std::sync::atomic::AtomicBool::new(false);
        let err = ctx
            .run(async {
                polled.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
        assert!(!polled.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn deadline_interrupts_a_hung_future() {
        let ctx = ReadContext::with_timeout(Duration::from_millis(20));
        let err = ctx
            .run(std::future::pending::<io::Result<()>>())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        assert!(ReadAborted::is_cause_of(&err));
    }

    #[test]
    fn plain_interrupted_is_not_an_abort() {
        let eintr = io::Error::from(io::ErrorKind::Interrupted);
        assert!(!ReadAborted::is_cause_of(&eintr));
        assert!(ReadAborted::is_cause_of(&ReadAborted::Cancelled.into()));
        assert_eq!(
            io::Error::from(ReadAborted::Cancelled).to_string(),
            "read cancelled"
        );
    }

    #[tokio::test]
    async fn cancel_from_a_clone() {
        let ctx = ReadContext::background();
        let handle = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.cancel();
        });
        let err = ctx
            .run(std::future::pending::<io::Result<()>>())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
    }
}
