//! API request handlers.

/// Topic summarization handler (JSON and streamed).
pub mod summarize;
