//! Cancellable request wrapper.
//!
//! Gives any future-returning call an abort handle. The executor receives a
//! [`CancellationToken`] it may observe to stop work early; independently of
//! that, the wrapper stops polling the executor's future once the handle is
//! cancelled and resolves to [`CancellableError::Cancelled`].
//!
//! ```ignore
//! let CancellableRequest { request, cancel } =
//!     make_cancellable(|token| async move { parser.parse_natural_language_query(q, &cfg).await });
//! tokio::spawn(async move { tokio::signal::ctrl_c().await.ok(); cancel.cancel(); });
//! let result = request.await;
//! ```

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Boxed request future, resolved exactly once.
pub type RequestFuture<T, E> =
    Pin<Box<dyn Future<Output = Result<T, CancellableError<E>>> + Send>>;

/// Outcome of a cancellable request that did not succeed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CancellableError<E> {
    /// The handle was cancelled before the executor settled.
    #[error("request was cancelled")]
    Cancelled,

    /// The executor itself failed; the error passes through unchanged.
    #[error("{0}")]
    Failed(E),
}

impl<E> CancellableError<E> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The executor's own error, if that is what happened.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Cancelled => None,
            Self::Failed(e) => Some(e),
        }
    }
}

/// Cheap, cloneable abort handle. Cancelling is idempotent and has no
/// effect once the request has settled.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// A request future paired with the handle that can abort it.
pub struct CancellableRequest<T, E> {
    pub request: RequestFuture<T, E>,
    pub cancel: CancelHandle,
}

impl<T, E> CancellableRequest<T, E> {
    /// Cancel the request. Shorthand for `self.cancel.cancel()`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

/// Wrap `executor` so that its future can be cancelled from outside.
///
/// The executor is invoked immediately with the request's token. Work that
/// never awaits (or never checks the token) cannot be interrupted; it only
/// stops being polled at its next await point.
pub fn make_cancellable<T, E, F, Fut>(executor: F) -> CancellableRequest<T, E>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let token = CancellationToken::new();
    let work = executor(token.clone());
    let observed = token.clone();

    let request = Box::pin(async move {
        tokio::select! {
            biased;
            () = observed.cancelled() => {
                tracing::debug!("cancellable request aborted before settling");
                Err(CancellableError::Cancelled)
            }
            result = work => result.map_err(CancellableError::Failed),
        }
    });

    CancellableRequest {
        request,
        cancel: CancelHandle { token },
    }
}
