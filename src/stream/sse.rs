//! Incremental decoder for the server-sent-event wire format.
//!
//! Only the `data:` field matters to this client; `event:`, `id:`, `retry:`
//! and comment lines are skipped. Frames are delimited by a blank line, and
//! a frame's multiple `data:` lines are joined with a newline.

/// Incremental SSE frame decoder.
///
/// Feed raw bytes as they arrive; complete frames come back as the joined
/// `data:` payload. Bytes of an unterminated line are buffered across calls,
/// so chunk boundaries can fall anywhere, including inside a UTF-8 sequence.
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes of the current, not-yet-terminated line.
    pending: Vec<u8>,
    /// `data:` lines of the frame being assembled.
    data: Vec<String>,
}

impl SseDecoder {
    /// Create an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning the payload of every frame completed.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut frames = Vec::new();
        for &byte in bytes {
            if byte == b'\n' {
                let raw = std::mem::take(&mut self.pending);
                let line = String::from_utf8_lossy(&raw);
                let line = line.strip_suffix('\r').unwrap_or(&line);
                if line.is_empty() {
                    if !self.data.is_empty() {
                        frames.push(self.data.join("\n"));
                        self.data.clear();
                    }
                } else if let Some(value) = line.strip_prefix("data:") {
                    self.data
                        .push(value.strip_prefix(' ').unwrap_or(value).to_string());
                }
            } else {
                self.pending.push(byte);
            }
        }
        frames
    }
}
