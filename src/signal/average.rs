//! Position-wise averaging of repeated press samples.

use super::SignalError;

/// Reduce equal-length sample vectors into one signature vector.
///
/// Each output element is the integer floor-mean of that position across
/// all samples. Truncation (not round-to-nearest) is deliberate: it is
/// what keeps regenerated config files byte-identical to existing ones.
///
/// # Errors
///
/// Returns [`SignalError::EmptyInput`] for an empty slice and
/// [`SignalError::LengthMismatch`] when any sample disagrees in length
/// with the first. Lengths are checked up-front, before any arithmetic.
pub fn average_samples(samples: &[Vec<u32>]) -> Result<Vec<u32>, SignalError> {
    let first = samples.first().ok_or(SignalError::EmptyInput)?;
    let expected = first.len();
    for (sample_index, sample) in samples.iter().enumerate() {
        if sample.len() != expected {
            return Err(SignalError::LengthMismatch {
                expected,
                found: sample.len(),
                sample_index,
            });
        }
    }

    let n = samples.len() as u64;
    Ok((0..expected)
        .map(|i| {
            let sum: u64 = samples.iter().map(|sample| u64::from(sample[i])).sum();
            (sum / n) as u32
        })
        .collect())
}
