//! Background line reader for the bridge's output stream
//!
//! The bridge emits unsolicited lines (logs, async errors) at any time,
//! so the reader runs on its own task for the whole child lifetime and
//! forwards lines one-way through the callback.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Read lines from a stream until EOF, forwarding each non-blank line
///
/// Bytes are decoded with best-effort UTF-8 replacement, so malformed
/// output from the child never aborts the reader. Lines are trimmed and
/// blank lines are dropped before the callback sees them. EOF ends the
/// loop silently; it is the normal way the child's exit is observed.
pub async fn read_lines<R, F>(stream: R, mut on_line: F)
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let decoded = String::from_utf8_lossy(&buf);
                let line = decoded.trim();
                if line.is_empty() {
                    continue;
                }
                on_line(line);
            }
            Err(err) => {
                tracing::debug!(%err, "bridge output stream closed with error");
                break;
            }
        }
    }
}
