//! Server-sent-event plumbing for the chat stream endpoint.

pub mod event;
pub mod sse;

pub use event::StreamEvent;
pub use sse::SseDecoder;

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};

use crate::api::ApiError;

/// Inbound byte chunks from the open HTTP response.
type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, reqwest::Error>> + Send>>;

/// One open chat stream: inbound bytes decoded into [`StreamEvent`]s.
///
/// Yields `None` once the connection closes; a transport failure surfaces as
/// one final `Err` item. Dropping the stream closes the connection, which is
/// the only cancellation primitive.
pub struct ChatStream {
    bytes: ByteStream,
    decoder: SseDecoder,
    queued: VecDeque<String>,
    closed: bool,
}

impl ChatStream {
    /// Wrap an established streaming response.
    pub(crate) fn from_response(response: reqwest::Response) -> Self {
        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()));
        Self {
            bytes: Box::pin(bytes),
            decoder: SseDecoder::new(),
            queued: VecDeque::new(),
            closed: false,
        }
    }

    /// Build a stream over pre-decoded payloads, bypassing the transport.
    #[cfg(test)]
    fn from_payloads(payloads: Vec<&str>) -> Self {
        let chunks: Vec<Result<Vec<u8>, reqwest::Error>> = payloads
            .into_iter()
            .map(|payload| Ok(format!("data: {payload}\n\n").into_bytes()))
            .collect();
        Self {
            bytes: Box::pin(futures::stream::iter(chunks)),
            decoder: SseDecoder::new(),
            queued: VecDeque::new(),
            closed: false,
        }
    }
}

impl Stream for ChatStream {
    type Item = Result<StreamEvent, ApiError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(payload) = this.queued.pop_front() {
                return Poll::Ready(Some(StreamEvent::parse(&payload)));
            }
            if this.closed {
                return Poll::Ready(None);
            }
            match this.bytes.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => this.queued.extend(this.decoder.feed(&chunk)),
                Poll::Ready(Some(Err(e))) => {
                    this.closed = true;
                    return Poll::Ready(Some(Err(ApiError::Http(e))));
                }
                Poll::Ready(None) => this.closed = true,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::ConversationId;

    #[tokio::test]
    async fn test_chat_stream_decodes_frames_in_order() {
        let mut stream = ChatStream::from_payloads(vec![
            "{\"conversation_id\": 42}",
            "{\"content\": \"Hi\"}",
            "{\"done\": true}",
        ]);

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.conversation_id, Some(ConversationId::new(42)));
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(second.content.as_deref(), Some("Hi"));
        let third = stream.next().await.unwrap().unwrap();
        assert!(third.done);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_chat_stream_surfaces_bad_payloads() {
        let mut stream = ChatStream::from_payloads(vec!["not json"]);
        let item = stream.next().await.unwrap();
        assert!(matches!(item, Err(ApiError::Stream(_))));
        assert!(stream.next().await.is_none());
    }
}
