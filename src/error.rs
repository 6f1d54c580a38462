// RSA Engine Errors
// Error taxonomy shared by the number theory kernel, key derivation and codec

use thiserror::Error;

/// Errors raised by the RSA engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RsaError {
    /// p or q not prime, p == q, or n too small. Carries every problem found.
    #[error("invalid prime pair: {}", .errors.join("; "))]
    InvalidPrimePair { errors: Vec<String> },

    /// e shares a factor with φ(n)
    #[error("e={e} is not coprime with φ(n)={phi}")]
    ExponentNotCoprime { e: u64, phi: u64 },

    /// gcd(e, φ) != 1. Wrapped into `ExponentNotCoprime` by key derivation.
    #[error("modular inverse does not exist")]
    NoInverseExists,

    /// Modulus of zero passed to modular exponentiation
    #[error("arithmetic domain error: modulus must be positive, got {modulus}")]
    ArithmeticDomain { modulus: u64 },

    /// p × q or (p-1) × (q-1) does not fit in 64 bits
    #[error("modulus overflow: {p} × {q} does not fit in 64 bits")]
    ModulusOverflow { p: u64, q: u64 },

    /// Prime generation outside the supported size range
    #[error("unsupported prime size: {bits} bits (must be between 4 and 31)")]
    UnsupportedBitLength { bits: u32 },
}

/// Result type for engine operations
pub type RsaResult<T> = Result<T, RsaError>;
