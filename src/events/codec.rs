//! Line-oriented event framing
//!
//! ```text
//! STATUS:Translating topic 1 of 2: Linear Algebra\n
//! STATUS:Collecting sources for topic 1 of 2\n
//! RESULT:[{"topic":"Linear Algebra", ...}]
//! ```
//!
//! Status frames are single lines. The terminal frame (`RESULT:` or `ERROR:`)
//! is unterminated and runs to the end of the stream, so its payload may span
//! several lines.

use super::SubmissionEvent;
use crate::types::{Result, SubmissionResult};

pub const STATUS_PREFIX: &str = "STATUS:";
pub const RESULT_PREFIX: &str = "RESULT:";
pub const ERROR_PREFIX: &str = "ERROR:";

/// Serialize one event to its wire frame
pub fn encode_event(event: &SubmissionEvent) -> Result<String> {
    match event {
        SubmissionEvent::Progress(text) => {
            let line = text.replace(['\r', '\n'], " ");
            Ok(format!("{STATUS_PREFIX}{line}\n"))
        }
        SubmissionEvent::Result(result) => Ok(format!("{RESULT_PREFIX}{}", result.to_json()?)),
        SubmissionEvent::Failure(message) => Ok(format!("{ERROR_PREFIX}{message}")),
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown frame: {0}")]
    UnknownFrame(String),

    #[error("Stream ended without a result or error frame")]
    MissingTerminal,

    #[error("Invalid result payload: {0}")]
    InvalidResult(String),

    #[error("Stream is not valid UTF-8")]
    InvalidUtf8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TerminalKind {
    Result,
    Error,
}

/// Incremental consumer-side decoder.
///
/// Feed raw chunks with [`FrameDecoder::push`] as they arrive; status events are
/// returned as soon as their line is complete. Call [`FrameDecoder::finish`] at
/// end of stream to obtain the terminal event.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    terminal: Option<TerminalKind>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> std::result::Result<Vec<SubmissionEvent>, DecodeError> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while self.terminal.is_none() {
            if let Some(kind) = terminal_kind(&self.buffer) {
                self.terminal = Some(kind);
                break;
            }

            let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') else {
                break;
            };

            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = std::str::from_utf8(&line[..newline]).map_err(|_| DecodeError::InvalidUtf8)?;
            let line = line.strip_suffix('\r').unwrap_or(line);

            match line.strip_prefix(STATUS_PREFIX) {
                Some(text) => events.push(SubmissionEvent::Progress(text.to_string())),
                None => return Err(DecodeError::UnknownFrame(line.to_string())),
            }
        }

        Ok(events)
    }

    /// Close the stream and decode its terminal frame
    pub fn finish(self) -> std::result::Result<SubmissionEvent, DecodeError> {
        let Some(kind) = self.terminal.or_else(|| terminal_kind(&self.buffer)) else {
            if is_known_or_partial_prefix(&self.buffer) {
                return Err(DecodeError::MissingTerminal);
            }
            let partial = String::from_utf8_lossy(&self.buffer).into_owned();
            return Err(DecodeError::UnknownFrame(partial));
        };

        let frame = String::from_utf8(self.buffer).map_err(|_| DecodeError::InvalidUtf8)?;
        match kind {
            TerminalKind::Result => {
                let payload = &frame[RESULT_PREFIX.len()..];
                SubmissionResult::from_json(payload)
                    .map(SubmissionEvent::Result)
                    .map_err(|e| DecodeError::InvalidResult(e.to_string()))
            }
            TerminalKind::Error => Ok(SubmissionEvent::Failure(
                frame[ERROR_PREFIX.len()..].to_string(),
            )),
        }
    }
}

fn terminal_kind(buffer: &[u8]) -> Option<TerminalKind> {
    if buffer.starts_with(RESULT_PREFIX.as_bytes()) {
        Some(TerminalKind::Result)
    } else if buffer.starts_with(ERROR_PREFIX.as_bytes()) {
        Some(TerminalKind::Error)
    } else {
        None
    }
}

/// Status frame cut short, or a stream that stopped in the middle of a marker
fn is_known_or_partial_prefix(buffer: &[u8]) -> bool {
    buffer.starts_with(STATUS_PREFIX.as_bytes())
        || [STATUS_PREFIX, RESULT_PREFIX, ERROR_PREFIX]
            .iter()
            .any(|prefix| prefix.as_bytes().starts_with(buffer))
}

/// Decode a complete stream, terminal event last
pub fn decode_all(bytes: &[u8]) -> std::result::Result<Vec<SubmissionEvent>, DecodeError> {
    let mut decoder = FrameDecoder::new();
    let mut events = decoder.push(bytes)?;
    events.push(decoder.finish()?);
    Ok(events)
}
