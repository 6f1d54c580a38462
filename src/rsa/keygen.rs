// RSA Key Derivation
// Validates a prime pair, derives n, φ(n) and d, and grades the modulus

use std::fmt;

use num_traits::ToPrimitive;
use tracing::{debug, warn};

use super::bigint::{entropy_bits, gcd, is_prime, mod_inverse, random_prime, Precision};
use crate::error::{RsaError, RsaResult};

/// Smallest value accepted for either prime
pub const MIN_PRIME_SIZE: u64 = 2;

/// Primes below this trigger a security warning (still usable)
pub const MIN_SECURE_PRIME: u64 = 11;

/// Smallest modulus that covers the whole alphabet (letters, punctuation, space = 32)
pub const MIN_MODULUS: u64 = 33;

/// Bit size used when generating a demo prime pair
pub const DEFAULT_PRIME_BITS: u32 = 16;

/// Two primes chosen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimePair {
    pub p: u64,
    pub q: u64,
}

impl PrimePair {
    pub fn new(p: u64, q: u64) -> Self {
        Self { p, q }
    }

    /// Check the pair, see [`validate_prime_pair`]
    pub fn validate(&self) -> PrimeValidation {
        validate_prime_pair(self.p, self.q)
    }
}

/// Outcome of prime pair validation. Errors block key derivation, warnings do not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimeValidation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl PrimeValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Textbook RSA key material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPair {
    pub p: u64,
    pub q: u64,
    pub n: u64,   // Modulus
    pub phi: u64, // φ(n) = (p-1)(q-1)
    pub e: u64,   // Public exponent
    pub d: u64,   // Private exponent
}

/// RSA Public Key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    pub n: u64,
    pub e: u64,
}

/// RSA Private Key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivateKey {
    pub n: u64,
    pub d: u64,
}

/// Educational security grade of a modulus
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SecurityLevel {
    VeryLow,
    Low,
    Medium,
    GoodEducational,
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SecurityLevel::VeryLow => "Very Low",
            SecurityLevel::Low => "Low",
            SecurityLevel::Medium => "Medium",
            SecurityLevel::GoodEducational => "Good (Educational)",
        };
        f.write_str(label)
    }
}

/// Entropy estimate and grade for a modulus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecurityAssessment {
    pub entropy_bits: f64,
    pub level: SecurityLevel,
}

/// Validate a prime pair for RSA.
///
/// All problems are collected so the caller can show them at once.
pub fn validate_prime_pair(p: u64, q: u64) -> PrimeValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !is_prime(p) {
        errors.push(format!("{p} is not prime"));
    }
    if !is_prime(q) {
        errors.push(format!("{q} is not prime"));
    }

    if p == q {
        errors.push("p and q must be different primes".to_string());
    }

    if p < MIN_PRIME_SIZE || q < MIN_PRIME_SIZE {
        errors.push(format!("Primes must be at least {MIN_PRIME_SIZE}"));
    }

    if p < MIN_SECURE_PRIME || q < MIN_SECURE_PRIME {
        warnings.push(format!(
            "For better security, use primes ≥ {MIN_SECURE_PRIME} (weak for security, but still usable)"
        ));
    }

    // Saturating: an overflowing product is certainly large enough
    if p.saturating_mul(q) < MIN_MODULUS {
        errors.push(format!(
            "n = p×q must be at least {MIN_MODULUS} to handle all characters"
        ));
    }

    debug!(p, q, errors = errors.len(), warnings = warnings.len(), "validated prime pair");
    PrimeValidation { errors, warnings }
}

/// Derive the full key pair from (p, q, e).
///
/// Pure: the pair is revalidated and every value recomputed on each call.
pub fn derive_keys(p: u64, q: u64, e: u64) -> RsaResult<KeyPair> {
    let validation = validate_prime_pair(p, q);
    if !validation.is_valid() {
        return Err(RsaError::InvalidPrimePair {
            errors: validation.errors,
        });
    }
    for warning in &validation.warnings {
        warn!(p, q, "{warning}");
    }

    // Step 1: n = p * q
    let n = p.checked_mul(q).ok_or(RsaError::ModulusOverflow { p, q })?;

    // Step 2: φ(n) = (p-1)(q-1), never larger than n
    let phi = (p - 1) * (q - 1);

    // Step 3: e must be coprime with φ(n)
    if gcd(e, phi) != 1 {
        return Err(RsaError::ExponentNotCoprime { e, phi });
    }

    // Step 4: d = e^(-1) mod φ(n)
    let d = mod_inverse(e, phi).map_err(|_| RsaError::ExponentNotCoprime { e, phi })?;

    debug!(n, phi, e, d, "derived key pair");
    Ok(KeyPair { p, q, n, phi, e, d })
}

/// Grade a modulus by log2(n). Boundaries belong to the higher bucket.
pub fn classify_security(n: u64) -> SecurityAssessment {
    let entropy = entropy_bits(n);

    let level = if entropy < 10.0 {
        SecurityLevel::VeryLow
    } else if entropy < 20.0 {
        SecurityLevel::Low
    } else if entropy < 40.0 {
        SecurityLevel::Medium
    } else {
        SecurityLevel::GoodEducational
    };

    SecurityAssessment {
        entropy_bits: entropy,
        level,
    }
}

/// Generate two distinct random primes of `bits` bits each
pub fn generate_prime_pair(bits: u32) -> RsaResult<PrimePair> {
    if !(4..=31).contains(&bits) {
        return Err(RsaError::UnsupportedBitLength { bits });
    }

    let next = || -> RsaResult<u64> {
        random_prime(bits)
            .to_u64()
            .ok_or(RsaError::UnsupportedBitLength { bits })
    };

    let p = next()?;
    let mut q = next()?;
    while p == q {
        q = next()?;
    }

    debug!(p, q, bits, "generated prime pair");
    Ok(PrimePair { p, q })
}

impl KeyPair {
    /// Prime pair this key was derived from
    pub fn primes(&self) -> PrimePair {
        PrimePair::new(self.p, self.q)
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey { n: self.n, e: self.e }
    }

    pub fn private_key(&self) -> PrivateKey {
        PrivateKey { n: self.n, d: self.d }
    }

    /// Security grade of the modulus
    pub fn security(&self) -> SecurityAssessment {
        classify_security(self.n)
    }

    /// Step-by-step derivation report
    pub fn details(&self, precision: Precision) -> String {
        let assessment = self.security();
        // e·d can exceed u64 for wide keys
        let check = (u128::from(self.e) * u128::from(self.d)) % u128::from(self.phi);
        let arithmetic = match precision {
            Precision::Native => "standard arithmetic",
            Precision::Arbitrary => "arbitrary-precision arithmetic",
        };

        format!(
            "Calculation Steps:\n\
             1. n = p × q = {p} × {q} = {n}\n\
             2. φ(n) = (p-1) × (q-1) = {pm} × {qm} = {phi}\n\
             3. Public key e = {e} (must be coprime with φ(n))\n\
             4. Private key d = {d} (calculated as modular inverse of e mod φ(n))\n\
             5. Verification: (e × d) mod φ(n) = ({e} × {d}) mod {phi} = {check}\n\
             6. Key size: {entropy:.1} bits of entropy\n\
             \n\
             Security Assessment:\n\
             - Security level: {level}\n\
             - Primes are different\n\
             - Modulus n = {n} (sufficient for all characters)\n\
             - Using {arithmetic}",
            p = self.p,
            q = self.q,
            n = self.n,
            pm = self.p - 1,
            qm = self.q - 1,
            phi = self.phi,
            e = self.e,
            d = self.d,
            entropy = assessment.entropy_bits,
            level = assessment.level,
        )
    }
}
