use crate::engine::Response;
use futures::Stream;
use futures::StreamExt;
use futures::stream::BoxStream;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;
use tokio_util::sync::CancellationToken;

/// One [`Response`] per subscription event.
///
/// A subscription that cannot start yields a single error response and
/// ends.
pub struct ResponseStream {
    responses: BoxStream<'static, Response>,
    token: CancellationToken,
}

impl ResponseStream {
    pub(crate) fn new(responses: BoxStream<'static, Response>, token: CancellationToken) -> Self {
        Self { responses, token }
    }

    pub(crate) fn failed(response: Response) -> Self {
        Self::new(futures::stream::once(async { response }).boxed(), CancellationToken::new())
    }

    /// Stops the subscription and releases its event source.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Stream for ResponseStream {
    type Item = Response;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Response>> {
        self.responses.poll_next_unpin(cx)
    }
}

impl std::fmt::Debug for ResponseStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseStream")
            .field("cancelled", &self.token.is_cancelled())
            .finish_non_exhaustive()
    }
}
