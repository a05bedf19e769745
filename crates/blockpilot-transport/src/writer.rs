//! NDJSON line writer for the bridge's input stream

use crate::error::Result;
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Writes one serialized JSON object per line, flushed immediately
///
/// The bridge reads line-buffered, so every message is followed by a
/// newline and an explicit flush; nothing sits in the write buffer.
pub struct JsonLineWriter<W> {
    inner: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin> JsonLineWriter<W> {
    /// Wrap a writable stream
    pub fn new(stream: W) -> Self {
        Self {
            inner: BufWriter::new(stream),
        }
    }

    /// Serialize a message and write it as a single newline-terminated line
    pub async fn send<T: Serialize>(&mut self, message: &T) -> Result<()> {
        let json = serde_json::to_string(message)?;
        self.inner.write_all(json.as_bytes()).await?;
        self.inner.write_all(b"\n").await?;
        self.inner.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpilot_protocol::Command;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_send_writes_one_flushed_line() {
        let (tx, mut rx) = tokio::io::duplex(256);
        let mut writer = JsonLineWriter::new(tx);

        writer.send(&Command::say("hello world")).await.unwrap();

        let mut buf = vec![0u8; 256];
        let n = rx.read(&mut buf).await.unwrap();
        assert_eq!(
            &buf[..n],
            b"{\"type\":\"say\",\"message\":\"hello world\"}\n"
        );
    }

    #[tokio::test]
    async fn test_send_to_closed_stream_is_an_error() {
        let (tx, rx) = tokio::io::duplex(256);
        drop(rx);
        let mut writer = JsonLineWriter::new(tx);

        let result = writer.send(&Command::quit()).await;
        assert!(result.is_err());
    }
}
