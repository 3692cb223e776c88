// SSE stream transformation: Gemini → Claude format

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt};

use super::streaming::ClaudeStreamTranscoder;
use crate::proxy::signature_cache::SignatureCache;
use gravitate_types::ProxyError;

pub type ClaudeSseStream = Pin<Box<dyn Stream<Item = Result<Bytes, ProxyError>> + Send>>;

/// Create Gemini SSE stream to Claude SSE stream converter
pub fn create_claude_sse_stream<S>(
    gemini_stream: S,
    signatures: Arc<SignatureCache>,
    model_name: String,
    read_timeout: Option<Duration>,
) -> ClaudeSseStream
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut gemini_stream = Box::pin(gemini_stream);
        let mut transcoder = ClaudeStreamTranscoder::new(signatures, model_name);

        loop {
            let next = match read_timeout {
                Some(limit) => match tokio::time::timeout(limit, gemini_stream.next()).await {
                    Ok(item) => item,
                    Err(_) => {
                        tracing::warn!("[Claude-SSE] No upstream data for {:?}, closing stream", limit);
                        break;
                    },
                },
                None => gemini_stream.next().await,
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
                    tracing::error!("[Claude-SSE] Upstream stream error: {}", e);
                    yield Err(ProxyError::StreamError { message: format!("Stream error: {e}") });
                    return;
                },
                None => break,
            }
        }

        for event in transcoder.finish() {
            yield Ok(event);
        }
    })
}
