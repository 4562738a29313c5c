//! Long-lived event stream over a chunked HTTP response.
//!
//! The upstream delivers one JSON object per line over an open connection,
//! with blank lines as keepalives. This module buffers the response body and
//! yields decoded messages one line at a time.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::stream::Stream;
use tracing::{debug, warn};

use crate::error::StreamError;
use crate::types::StreamActivity;

/// One decoded unit from the open stream connection.
#[derive(Debug, Clone)]
pub enum StreamMessage {
    /// A user event with an author.
    Activity(StreamActivity),
    /// A system/heartbeat message from the upstream (no author). Carried as
    /// raw text for logging.
    System(String),
    /// A blank keepalive line. Counts as received data for idle-timeout
    /// purposes but carries nothing.
    Keepalive,
}

type BytesStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Upper bound on one buffered line. A line that exceeds this before its
/// newline arrives is discarded, so a misbehaving upstream cannot grow the
/// buffer without bound.
const MAX_LINE_BYTES: usize = 1 << 20;

/// A stream of messages decoded from the open connection.
pub struct EventStream {
    body: BytesStream,
    buffer: Vec<u8>,
    discarding: bool,
    ended: bool,
}

impl EventStream {
    pub(crate) fn new(body: BytesStream) -> Self {
        Self {
            body,
            buffer: Vec::new(),
            discarding: false,
            ended: false,
        }
    }

    /// Take the next complete line out of the buffer, if one is present.
    fn take_line(&mut self) -> Option<String> {
        let newline = self.buffer.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.buffer.drain(..=newline).collect();
        Some(String::from_utf8_lossy(&line).trim_end().to_string())
    }

    /// Decode one line into a message. Unparseable lines yield `None` and
    /// are logged; they must not surface as transport faults.
    fn decode_line(line: String) -> Option<StreamMessage> {
        if line.trim().is_empty() {
            return Some(StreamMessage::Keepalive);
        }
        match serde_json::from_str::<StreamActivity>(&line) {
            Ok(activity) if activity.actor.is_some() => {
                Some(StreamMessage::Activity(activity))
            }
            Ok(_) => Some(StreamMessage::System(line)),
            Err(e) => {
                warn!("Failed to parse stream line: {}", e);
                debug!("Raw line: {}", line);
                None
            }
        }
    }
}

impl Stream for EventStream {
    type Item = Result<StreamMessage, StreamError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(line) = self.take_line() {
                // The tail of a line whose head was already discarded.
                if self.discarding {
                    self.discarding = false;
                    continue;
                }
                match Self::decode_line(line) {
                    Some(message) => return Poll::Ready(Some(Ok(message))),
                    None => continue,
                }
            }

            if self.buffer.len() > MAX_LINE_BYTES {
                warn!(
                    "Dropping oversized stream line ({} bytes buffered without a newline)",
                    self.buffer.len()
                );
                self.buffer.clear();
                self.discarding = true;
            }

            if self.ended {
                return Poll::Ready(None);
            }

            match Pin::new(&mut self.body).poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    self.buffer.extend_from_slice(&chunk);
                    continue;
                }
                Poll::Ready(Some(Err(e))) => {
                    return Poll::Ready(Some(Err(StreamError::Http(e))));
                }
                Poll::Ready(None) => {
                    // Flush any trailing partial line before ending.
                    self.ended = true;
                    if !self.buffer.is_empty() {
                        self.buffer.push(b'\n');
                        continue;
                    }
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
