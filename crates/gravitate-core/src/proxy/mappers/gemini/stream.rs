//! Streaming unwrap for native Gemini clients.

use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::Value;

use super::wrapper::unwrap_response;
use crate::proxy::common::sse::{event_data, SseFramer};
use gravitate_types::ProxyError;

/// Re-frames each upstream event with the envelope stripped.
pub struct UnwrapTranscoder<F> {
    framer: SseFramer,
    on_chunk: F,
}

impl<F> UnwrapTranscoder<F>
where
    F: FnMut(&Value),
{
    pub fn new(on_chunk: F) -> Self {
        Self { framer: SseFramer::new(), on_chunk }
    }

    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<Bytes>, ProxyError> {
        let events = self.framer.push(chunk)?;
        Ok(events.iter().filter_map(|event| self.process_event(event)).collect())
    }

    /// End of upstream. A buffered partial event is discarded.
    pub fn finish(&mut self) {
        if let Some(partial) = self.framer.finish() {
            tracing::warn!(
                "[Gemini-SSE] Discarding incomplete trailing event ({} bytes)",
                partial.len()
            );
        }
    }

    fn process_event(&mut self, block: &str) -> Option<Bytes> {
        let data = event_data(block)?;
        let trimmed = data.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed == "[DONE]" {
            return Some(Bytes::from_static(b"data: [DONE]\n\n"));
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(json) => {
                let unwrapped = unwrap_response(&json);
                (self.on_chunk)(&unwrapped);
                let encoded = serde_json::to_string(&unwrapped).unwrap_or_default();
                Some(Bytes::from(format!("data: {encoded}\n\n")))
            },
            Err(e) => {
                tracing::warn!("[Gemini-SSE] Forwarding unparseable event as-is: {}", e);
                Some(Bytes::from(format!("{block}\n\n")))
            },
        }
    }
}

pub type UnwrapStream = Pin<Box<dyn Stream<Item = Result<Bytes, ProxyError>> + Send>>;

/// Unwrap every event of an upstream SSE body, calling `on_chunk` with each
/// unwrapped payload.
pub fn create_unwrap_stream<S, F>(
    upstream: S,
    on_chunk: F,
    read_timeout: Option<Duration>,
) -> UnwrapStream
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
    F: FnMut(&Value) + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut upstream = Box::pin(upstream);
        let mut transcoder = UnwrapTranscoder::new(on_chunk);

        loop {
            let next = match read_timeout {
                Some(limit) => match tokio::time::timeout(limit, upstream.next()).await {
                    Ok(item) => item,
                    Err(_) => {
                        tracing::warn!("[Gemini-SSE] No upstream data for {:?}, closing stream", limit);
                        break;
                    },
                },
                None => upstream.next().await,
            };

            match next {
                Some(Ok(chunk)) => match transcoder.push(&chunk) {
                    Ok(events) => {
                        for event in events {
                            yield Ok(event);
                        }
                    },
                    Err(e) => {
                        yield Err(e);
                        return;
                    },
                },
                Some(Err(e)) => {
                    tracing::error!("[Gemini-SSE] Upstream stream error: {}", e);
                    yield Err(ProxyError::StreamError { message: e.to_string() });
                    return;
                },
                None => break,
            }
        }

        transcoder.finish();
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(chunks: &[Bytes]) -> String {
        chunks.iter().map(|b| String::from_utf8_lossy(b).into_owned()).collect()
    }

    #[test]
    fn test_unwraps_each_event_and_reports_chunks() {
        let mut seen = Vec::new();
        let mut transcoder = UnwrapTranscoder::new(|v: &Value| seen.push(v.clone()));

        let first = transcoder.push(b"data: {\"response\":{\"candidates\":[{\"index\":0}]}}\n\ndata: {\"resp").unwrap();
        let second = transcoder.push(b"onse\":{\"candidates\":[{\"index\":1}]}}\n\n").unwrap();
        transcoder.finish();
        drop(transcoder);

        assert_eq!(text(&first), "data: {\"candidates\":[{\"index\":0}]}\n\n");
        assert_eq!(text(&second), "data: {\"candidates\":[{\"index\":1}]}\n\n");
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1]["candidates"][0]["index"], 1);
    }

    #[test]
    fn test_done_and_unparseable_pass_through() {
        let mut transcoder = UnwrapTranscoder::new(|_: &Value| {});
        let out = transcoder.push(b"data: oops\n\ndata: [DONE]\n\n").unwrap();
        assert_eq!(text(&out), "data: oops\n\ndata: [DONE]\n\n");
    }

    #[tokio::test]
    async fn test_stream_drops_trailing_partial() {
        let chunks: Vec<Result<Bytes, reqwest::Error>> = vec![
            Ok(Bytes::from_static(b"data: {\"response\":{\"a\":1}}\n\n")),
            Ok(Bytes::from_static(b"data: {\"response\":{\"b\"")),
        ];
        let stream = create_unwrap_stream(futures::stream::iter(chunks), |_| {}, None);
        let out: Vec<Bytes> = stream.filter_map(|r| async move { r.ok() }).collect().await;
        assert_eq!(text(&out), "data: {\"a\":1}\n\n");
    }
}
