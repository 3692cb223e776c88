//! Server-sent-event framing over an arbitrary byte stream.
//!
//! Reads may split events anywhere (even inside a UTF-8 sequence), so bytes
//! are buffered until a blank-line terminator arrives. Whatever is left when
//! the stream ends is an incomplete event and is handed back for logging.

use bytes::BytesMut;
use gravitate_types::ProxyError;

pub const MAX_BUFFER_SIZE: usize = 10 * 1024 * 1024;

/// Longest terminator (`\r\n\r\n`) minus one: a match can start this far
/// back from the end of an already scanned buffer.
const TERMINATOR_OVERLAP: usize = 3;

pub struct SseFramer {
    buffer: BytesMut,
    /// Offset below which the buffer is known to hold no terminator.
    scan_from: usize,
    max_buffer: usize,
}

impl Default for SseFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl SseFramer {
    pub fn new() -> Self {
        Self::with_limit(MAX_BUFFER_SIZE)
    }

    pub fn with_limit(max_buffer: usize) -> Self {
        Self { buffer: BytesMut::new(), scan_from: 0, max_buffer }
    }

    /// Append bytes and return every event block completed by them, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, ProxyError> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some((end, terminator_len)) = find_terminator(&self.buffer, self.scan_from) {
            let raw = self.buffer.split_to(end + terminator_len);
            self.scan_from = 0;
            match std::str::from_utf8(&raw[..end]) {
                Ok(block) => {
                    if !block.trim().is_empty() {
                        events.push(block.to_string());
                    }
                },
                Err(e) => {
                    tracing::warn!("[SSE] Event UTF-8 decode error: {} | {} bytes", e, raw.len());
                },
            }
        }

        self.scan_from = self.buffer.len().saturating_sub(TERMINATOR_OVERLAP);

        if self.buffer.len() > self.max_buffer {
            tracing::error!(
                "[SSE] Buffer exceeded {} bytes without an event terminator",
                self.max_buffer
            );
            self.buffer.clear();
            self.scan_from = 0;
            return Err(ProxyError::StreamError {
                message: "SSE buffer overflow: event too large".to_string(),
            });
        }

        Ok(events)
    }

    /// Drain the trailing partial event, if any.
    pub fn finish(&mut self) -> Option<String> {
        let rest = self.buffer.split();
        self.scan_from = 0;
        let text = String::from_utf8_lossy(&rest);
        if text.trim().is_empty() {
            None
        } else {
            Some(text.into_owned())
        }
    }

    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}

/// Earliest `\n\n` or `\r\n\r\n` at or after `from`, as (offset, length).
fn find_terminator(buf: &[u8], from: usize) -> Option<(usize, usize)> {
    (from..buf.len()).find_map(|i| {
        let rest = &buf[i..];
        if rest.starts_with(b"\n\n") {
            Some((i, 2))
        } else if rest.starts_with(b"\r\n\r\n") {
            Some((i, 4))
        } else {
            None
        }
    })
}

/// Parse a single SSE line into (key, value) pair.
///
/// SSE format: `key: value`
pub fn parse_sse_line(line: &str) -> Option<(String, String)> {
    let colon_pos = line.find(':')?;
    let key = &line[..colon_pos];
    let value = line[colon_pos + 1..].strip_prefix(' ').unwrap_or(&line[colon_pos + 1..]);
    Some((key.to_string(), value.to_string()))
}

/// Concatenated `data:` payload of an event block, or `None` for comment-only blocks.
pub fn event_data(block: &str) -> Option<String> {
    let mut data: Option<String> = None;
    for line in block.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        if let Some((key, value)) = parse_sse_line(line) {
            if key == "data" {
                match data.as_mut() {
                    Some(existing) => {
                        existing.push('\n');
                        existing.push_str(&value);
                    },
                    None => data = Some(value),
                }
            }
        }
    }
    data
}
