use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use crate::TransportError;

/// Cancellation and deadline for API calls.
///
/// Every operation on [`Client`](crate::Client) takes a context. Waiting on
/// the API stops as soon as the context is cancelled or its deadline passes,
/// and the call fails with a [`TransportError`]. Cloned contexts share the
/// same cancellation state.
///
/// ```
/// use std::time::Duration;
/// use porkbun::Context;
///
/// let ctx = Context::new().with_timeout(Duration::from_secs(30));
/// let other = ctx.clone();
///
/// other.cancel();
/// assert!(ctx.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context cancelled through the given token.
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Sets the deadline, keeping an earlier one if already set.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Sets the deadline to `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// A context cancelled along with this one, but which can also be
    /// cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// A handle that cancels this context.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Drives `fut` until it completes or the context ends.
    pub(crate) async fn run<F, T>(&self, fut: F) -> Result<T, TransportError>
    where
        F: Future<Output = Result<T, reqwest::Error>>,
    {
        if self.token.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        if self.deadline.is_some_and(|d| d <= Instant::now()) {
            return Err(TransportError::DeadlineExceeded);
        }

        let deadline = async {
            match self.deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(TransportError::Cancelled),
            _ = deadline => Err(TransportError::DeadlineExceeded),
            res = fut => res.map_err(TransportError::Http),
        }
    }
}
