//! Submission events
//!
//! A submission reports its work as an ordered sequence of [`SubmissionEvent`]s:
//! zero or more [`SubmissionEvent::Progress`] values followed by exactly one
//! terminal value, either the full [`SubmissionResult`] or a failure message.
//! Events travel over a `tokio::sync::mpsc` channel; [`codec`] turns them into
//! the line-oriented wire format used by streaming responses and back.

use crate::types::SubmissionResult;

/// Wire encoding and incremental decoding of events.
pub mod codec;

pub use codec::{DecodeError, FrameDecoder, decode_all, encode_event};

/// One observable step of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    /// Human-readable status line
    Progress(String),
    /// Final results, always last
    Result(SubmissionResult),
    /// Submission-level failure, always last
    Failure(String),
}

impl SubmissionEvent {
    pub fn progress(message: impl Into<String>) -> Self {
        Self::Progress(message.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// Whether this event ends the stream
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }
}
