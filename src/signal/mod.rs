//! Pulse/gap signal processing pipeline.
//!
//! Turns one raw mode2 capture session into a canonical timing signature:
//! the capture text is parsed into equal-shaped sample vectors, the vectors
//! are averaged position-wise, and the result is rendered as a fixed-width
//! raw-codes text block. Every function here is pure and deterministic.

mod average;
mod format;
mod parse;

pub use average::average_samples;
pub use format::{format_raw_block, DEFAULT_PREFIX_SPACES};
pub use parse::parse_capture;

use thiserror::Error;

/// Errors produced by the capture → signature pipeline.
///
/// All variants are fatal to the command being captured. Retrying is a
/// prompt-loop policy, never handled here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignalError {
    /// Malformed or truncated capture text.
    #[error("malformed capture: {0}")]
    Parse(String),

    /// Sample vectors within one capture disagree in length.
    #[error("sample {sample_index} has {found} values, expected {expected}; retry with cleaner presses")]
    LengthMismatch {
        expected: usize,
        found: usize,
        sample_index: usize,
    },

    /// No samples were captured at all.
    #[error("no samples captured; hold the button longer or check the receiver")]
    EmptyInput,
}
