//! Parser for raw mode2 capture output.
//!
//! mode2 -m prints a driver banner line followed by rows of pulse/gap
//! durations; repeated button presses are separated by a blank line. The
//! first value of each press is a line-start marker, not a timing value.

use super::SignalError;
use tracing::warn;

/// Split one capture session into its per-press sample vectors.
///
/// The header line is discarded, the remainder is tokenized as integers,
/// and the flat stream is sliced into one chunk per blank-line-delimited
/// press with the leading marker value dropped from each chunk.
///
/// # Errors
///
/// Returns [`SignalError::Parse`] when the header line is missing, no
/// complete press was recorded, or a token is not an unsigned integer.
pub fn parse_capture(raw: &str) -> Result<Vec<Vec<u32>>, SignalError> {
    let (_header, body) = raw
        .split_once('\n')
        .ok_or_else(|| SignalError::Parse("capture has no header line".into()))?;

    let count = body.matches("\n\n").count();
    if count == 0 {
        return Err(SignalError::Parse(
            "no complete sample found (missing blank-line separator)".into(),
        ));
    }

    let codes = body
        .split_whitespace()
        .map(|token| {
            token
                .parse::<u32>()
                .map_err(|_| SignalError::Parse(format!("non-numeric token '{token}'")))
        })
        .collect::<Result<Vec<u32>, _>>()?;

    let sig_len = codes.len() / count;
    if sig_len == 0 {
        return Err(SignalError::Parse(
            "capture contains no timing values".into(),
        ));
    }
    let dropped = codes.len() - sig_len * count;
    if dropped > 0 {
        // Trailing partial press, most likely the operator releasing
        // mid-burst. Matches the original floor-division behavior.
        warn!(dropped, count, sig_len, "dropping trailing capture values");
    }

    Ok((0..count)
        .map(|i| codes[(i * sig_len) + 1..(i + 1) * sig_len].to_vec())
        .collect())
}
