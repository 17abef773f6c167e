//! Lazy text stream over a raw byte stream.

pub mod utf8;

pub use utf8::Utf8Decoder;

use std::fmt::Display;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::stream::{BoxStream, FusedStream};
use futures::{ready, Stream, StreamExt};
use tracing::debug;

use crate::error::{LanguageModelError, Result};

/// Raw response body as delivered by the transport.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Decoded text chunks of a streaming generation.
///
/// Chunks arrive in the order their bytes arrive. The stream is single-pass.
/// A read failure or malformed bytes yield one `Err` and then the stream ends.
/// Text decoded ahead of malformed bytes in the same chunk is yielded first.
/// Dropping the stream, or calling [`TextStream::cancel`], releases the
/// underlying connection.
pub struct TextStream {
    source: Option<ByteStream>,
    decoder: Utf8Decoder,
    bytes_read: usize,
}

impl TextStream {
    /// Wrap a byte stream. Read errors surface as [`LanguageModelError::Decode`].
    pub fn new<S, E>(bytes: S) -> Self
    where
        S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
        E: Display + 'static,
    {
        let source = bytes
            .map(|chunk| {
                chunk.map_err(|e| LanguageModelError::Decode(format!("stream read failed: {e}")))
            })
            .boxed();
        Self {
            source: Some(source),
            decoder: Utf8Decoder::new(),
            bytes_read: 0,
        }
    }

    /// Stop reading and release the underlying connection.
    ///
    /// Safe to call any number of times, including after the stream ended.
    pub fn cancel(&mut self) {
        if self.source.take().is_some() {
            debug!(bytes_read = self.bytes_read, "text stream cancelled");
        }
    }

    /// Drain the remaining chunks into one string.
    pub async fn collect_text(mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(chunk) = self.next().await {
            text.push_str(&chunk?);
        }
        Ok(text)
    }

    fn release(&mut self) {
        self.source = None;
    }
}

impl std::fmt::Debug for TextStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextStream")
            .field("open", &self.source.is_some())
            .field("bytes_read", &self.bytes_read)
            .finish()
    }
}

impl Stream for TextStream {
    type Item = Result<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            let Some(source) = this.source.as_mut() else {
                return Poll::Ready(None);
            };
            if let Some(e) = this.decoder.take_error() {
                this.release();
                return Poll::Ready(Some(Err(e)));
            }

            match ready!(source.poll_next_unpin(cx)) {
                Some(Ok(bytes)) => {
                    this.bytes_read += bytes.len();
                    match this.decoder.decode(&bytes) {
                        Ok(text) if text.is_empty() => continue,
                        Ok(text) => return Poll::Ready(Some(Ok(text))),
                        Err(e) => {
                            this.release();
                            return Poll::Ready(Some(Err(e)));
                        }
                    }
                }
                Some(Err(e)) => {
                    this.release();
                    return Poll::Ready(Some(Err(e)));
                }
                None => {
                    this.release();
                    debug!(bytes_read = this.bytes_read, "text stream finished");
                    return Poll::Ready(this.decoder.finish().err().map(Err));
                }
            }
        }
    }
}

impl FusedStream for TextStream {
    fn is_terminated(&self) -> bool {
        self.source.is_none()
    }
}
