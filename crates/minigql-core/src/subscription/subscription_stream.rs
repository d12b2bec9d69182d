use crate::execution::ExecutionResult;
use futures::Stream;
use futures::StreamExt;
use futures::stream::BoxStream;
use futures::stream::FusedStream;
use std::future::Future;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;
use tokio_util::sync::CancellationToken;
use tokio_util::sync::WaitForCancellationFutureOwned;
use tracing::debug;

/// The results of a running subscription, one per source event.
///
/// Ends when the source ends or the cancellation token fires. Cancelling
/// drops the source (and any event still being executed) on the next poll.
pub struct SubscriptionStream {
    events: Option<BoxStream<'static, ExecutionResult>>,
    token: CancellationToken,
    cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
}

impl SubscriptionStream {
    pub(crate) fn new(events: BoxStream<'static, ExecutionResult>, token: CancellationToken) -> Self {
        let cancelled = Box::pin(token.clone().cancelled_owned());
        Self {
            events: Some(events),
            token,
            cancelled,
        }
    }

    /// Stops the subscription; no further results are produced.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Stream for SubscriptionStream {
    type Item = ExecutionResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        if this.events.is_none() {
            return Poll::Ready(None);
        }

        if this.cancelled.as_mut().poll(cx).is_ready() {
            this.events = None;
            debug!("subscription cancelled");
            return Poll::Ready(None);
        }

        let Some(events) = this.events.as_mut() else {
            return Poll::Ready(None);
        };
        match events.poll_next_unpin(cx) {
            Poll::Ready(None) => {
                this.events = None;
                debug!("subscription source ended");
                Poll::Ready(None)
            },
            other => other,
        }
    }
}

impl FusedStream for SubscriptionStream {
    fn is_terminated(&self) -> bool {
        self.events.is_none()
    }
}

impl std::fmt::Debug for SubscriptionStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionStream")
            .field("terminated", &self.events.is_none())
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}
