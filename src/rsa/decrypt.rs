// RSA Decryption Implementation
// Textbook RSA per symbol: m = c^d mod n, with tolerant cipher text parsing

use std::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::ToPrimitive;
use tracing::debug;

use super::bigint::{mod_pow, Precision};
use super::codec::{decode, format_numbers};
use super::keygen::PrivateKey;
use super::progress::{process_blocks, ProgressObserver};
use crate::error::{RsaError, RsaResult};

/// Decrypt a single block: c^d mod n
pub fn decrypt_block(c: u64, d: u64, n: u64, precision: Precision) -> RsaResult<u64> {
    mod_pow(c, d, n, precision)
}

/// Decrypt every value in order. Output has the same length and order as the input.
pub fn decrypt_sequence(
    ciphertext: &[u64],
    d: u64,
    n: u64,
    precision: Precision,
    observer: Option<ProgressObserver<'_>>,
) -> RsaResult<Vec<u64>> {
    process_blocks(ciphertext, d, n, precision, "Decrypting", observer)
}

/// Split on whitespace and keep the tokens that parse as integers of any
/// sign and width. Malformed tokens are dropped, not reported.
pub fn parse_cipher_text(raw: &str) -> Vec<BigInt> {
    raw.split_whitespace()
        .filter_map(|token| token.parse::<BigInt>().ok())
        .collect()
}

/// Reduce parsed tokens into `[0, n)` so each one is a valid block for modulus `n`
pub fn reduce_cipher_text(tokens: &[BigInt], n: u64) -> RsaResult<Vec<u64>> {
    if n == 0 {
        return Err(RsaError::ArithmeticDomain { modulus: n });
    }

    let modulus = BigInt::from(n);
    tokens
        .iter()
        .map(|token| {
            // mod_floor with a positive modulus is always in [0, n)
            token
                .mod_floor(&modulus)
                .to_u64()
                .ok_or(RsaError::ArithmeticDomain { modulus: n })
        })
        .collect()
}

/// Result of decrypting a cipher text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptionReport {
    pub decrypted: Vec<u64>,
    pub message: String,
}

impl fmt::Display for DecryptionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Decrypted numbers: {}\nMessage: {}",
            format_numbers(&self.decrypted),
            self.message
        )
    }
}

/// Parse, decrypt and decode a whitespace-delimited cipher text
pub fn decrypt_message(
    raw: &str,
    d: u64,
    n: u64,
    include_punctuation: bool,
    precision: Precision,
    observer: Option<ProgressObserver<'_>>,
) -> RsaResult<DecryptionReport> {
    let ciphertext = reduce_cipher_text(&parse_cipher_text(raw), n)?;
    let decrypted = decrypt_sequence(&ciphertext, d, n, precision, observer)?;
    let message = decode(&decrypted, include_punctuation);
    debug!(symbols = decrypted.len(), chars = message.len(), "decrypted message");

    Ok(DecryptionReport { decrypted, message })
}

impl PrivateKey {
    /// Decrypt a whitespace-delimited cipher text with this private key
    pub fn decrypt(&self, raw: &str, include_punctuation: bool, precision: Precision) -> RsaResult<DecryptionReport> {
        decrypt_message(raw, self.d, self.n, include_punctuation, precision, None)
    }
}
