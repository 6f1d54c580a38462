// Block Progress Reporting
// Per-element progress events for sequence encryption/decryption

use tracing::trace;

use super::bigint::{mod_pow, Precision};
use crate::error::{RsaError, RsaResult};

/// Progress of a block operation, emitted once per processed element
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub percent: u8,
    /// "value → transformed value", or `None` when identical to the previous line
    pub trace: Option<String>,
}

impl Progress {
    pub fn new(current: usize, total: usize, trace: Option<String>) -> Self {
        let percent = if total > 0 {
            (current * 100 / total) as u8
        } else {
            0
        };

        Self {
            current,
            total,
            percent,
            trace,
        }
    }
}

/// Observer invoked with each progress event
pub type ProgressObserver<'a> = &'a mut dyn FnMut(&Progress);

/// Suppresses a trace line when it repeats the previous emitted one
#[derive(Debug, Default)]
pub struct TraceFilter {
    last: Option<String>,
}

impl TraceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the line if it differs from the last one passed through
    pub fn filter(&mut self, line: String) -> Option<String> {
        if self.last.as_deref() == Some(line.as_str()) {
            return None;
        }
        self.last = Some(line.clone());
        Some(line)
    }
}

/// Apply `value^exponent mod n` to every value, in order, reporting progress.
///
/// Fails before touching any element when `n == 0`, so there is never a partial result.
pub(crate) fn process_blocks(
    values: &[u64],
    exponent: u64,
    n: u64,
    precision: Precision,
    label: &str,
    mut observer: Option<ProgressObserver<'_>>,
) -> RsaResult<Vec<u64>> {
    if n == 0 {
        return Err(RsaError::ArithmeticDomain { modulus: n });
    }

    let total = values.len();
    let mut filter = TraceFilter::new();
    let mut output = Vec::with_capacity(total);

    for (i, &value) in values.iter().enumerate() {
        let transformed = mod_pow(value, exponent, n, precision)?;
        trace!(value, transformed, "{label} block");
        output.push(transformed);

        if let Some(observer) = observer.as_mut() {
            let line = filter.filter(format!("{label}: {value} → {transformed}"));
            observer(&Progress::new(i + 1, total, line));
        }
    }

    Ok(output)
}
