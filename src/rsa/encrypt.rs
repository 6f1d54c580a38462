// RSA Encryption Implementation
// Textbook RSA per symbol: c = m^e mod n, no padding

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, warn};

use super::bigint::{mod_pow, Precision};
use super::codec::{encode_with, format_numbers, CodecOptions, PUNCTUATION};
use super::keygen::PublicKey;
use super::progress::{process_blocks, ProgressObserver};
use crate::error::RsaResult;

/// Encrypt a single block: m^e mod n
pub fn encrypt_block(m: u64, e: u64, n: u64, precision: Precision) -> RsaResult<u64> {
    mod_pow(m, e, n, precision)
}

/// Encrypt every value in order. Output has the same length and order as the input.
pub fn encrypt_sequence(
    values: &[u64],
    e: u64,
    n: u64,
    precision: Precision,
    observer: Option<ProgressObserver<'_>>,
) -> RsaResult<Vec<u64>> {
    process_blocks(values, e, n, precision, "Encrypting", observer)
}

/// Result of encrypting a text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionReport {
    pub original: Vec<u64>,
    pub encrypted: Vec<u64>,
    pub skipped: BTreeSet<char>,
}

impl fmt::Display for EncryptionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Original numbers: {}\nEncrypted: {}",
            format_numbers(&self.original),
            format_numbers(&self.encrypted)
        )?;

        if !self.skipped.is_empty() {
            let skipped: String = self.skipped.iter().collect();
            write!(
                f,
                "\n\n[Warning] The following character(s) were skipped: {skipped}"
            )?;
            if self.skipped.iter().any(|c| PUNCTUATION.contains(c)) {
                write!(f, "\nTo include punctuation, enable the 'include punctuation' option.")?;
            }
        }

        Ok(())
    }
}

/// Encode a text message and encrypt it symbol by symbol
pub fn encrypt_message(
    text: &str,
    e: u64,
    n: u64,
    options: &CodecOptions,
    precision: Precision,
    observer: Option<ProgressObserver<'_>>,
) -> RsaResult<EncryptionReport> {
    let encoded = encode_with(text, options);
    if !encoded.skipped.is_empty() {
        warn!(count = encoded.skipped.len(), "skipped unmappable characters");
    }

    let encrypted = encrypt_sequence(&encoded.values, e, n, precision, observer)?;
    debug!(symbols = encrypted.len(), "encrypted message");

    Ok(EncryptionReport {
        original: encoded.values,
        encrypted,
        skipped: encoded.skipped,
    })
}

impl PublicKey {
    /// Encrypt a text message with this public key
    pub fn encrypt(&self, text: &str, options: &CodecOptions, precision: Precision) -> RsaResult<EncryptionReport> {
        encrypt_message(text, self.e, self.n, options, precision, None)
    }
}
