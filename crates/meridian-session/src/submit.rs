//! # Order Submission Seam
//!
//! The async collaborator that turns an assembled [`OrderPayload`] into
//! a real order. The session layer only knows this trait; the concrete
//! implementation (HTTP client to the order service, direct DB write on
//! a standalone register) lives with the application shell.
//!
//! Submission is the one network round-trip in a sale's life. On success
//! the session clears the draft; on failure the draft is retained
//! untouched so the cashier retries without re-entering anything.

use std::future::Future;

use thiserror::Error;

use meridian_core::OrderPayload;

/// Order submission failures. All retryable from the cashier's seat.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The order service understood the request and said no.
    #[error("Order service rejected the sale: {0}")]
    Rejected(String),

    /// The order service could not be reached.
    #[error("Order service unavailable: {0}")]
    Unavailable(String),
}

/// The Order Submission collaborator.
///
/// Methods return `impl Future + Send` so `complete()` can be awaited
/// from any runtime thread.
pub trait SubmitOrders: Send + Sync {
    /// Submits an assembled order. Returns the created order id.
    fn submit(&self, order: OrderPayload)
        -> impl Future<Output = Result<String, SubmitError>> + Send;
}

/// Shared ownership delegates, so a submitter can be held by the session
/// and inspected from elsewhere (tests, metrics).
impl<T: SubmitOrders> SubmitOrders for std::sync::Arc<T> {
    fn submit(
        &self,
        order: OrderPayload,
    ) -> impl Future<Output = Result<String, SubmitError>> + Send {
        T::submit(self, order)
    }
}
