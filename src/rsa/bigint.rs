// RSA Number Theory Kernel
// gcd, primality, modular inverse and modular exponentiation for toy-sized keys,
// with a num-bigint path for arbitrary-precision arithmetic

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::thread_rng;

use crate::error::{RsaError, RsaResult};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Arithmetic mode for modular exponentiation.
///
/// Both modes produce identical results for every `u64` input; `Arbitrary`
/// routes the computation through [`RsaBigInt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// Fixed-width arithmetic with 128-bit intermediates
    #[default]
    Native,
    /// Arbitrary-precision arithmetic via num-bigint
    Arbitrary,
}

impl Precision {
    /// Map the "use large numbers" flag onto a precision mode
    pub fn from_large_numbers(use_large_numbers: bool) -> Self {
        if use_large_numbers {
            Precision::Arbitrary
        } else {
            Precision::Native
        }
    }
}

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Greatest common divisor (Euclidean algorithm). `gcd(a, 0) == a`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Deterministic primality test by trial division.
///
/// Iterates while `i <= n / i`, so the bound is exact and cannot overflow.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut i = 3u64;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
pub fn extended_gcd(a: i128, b: i128) -> (i128, i128, i128) {
    if b == 0 {
        return (a, 1, 0);
    }

    let (gcd, x1, y1) = extended_gcd(b, a % b);
    let x = y1;
    let y = x1 - (a / b) * y1;

    (gcd, x, y)
}

/// Compute modular inverse: e^(-1) mod phi
///
/// Returns the unique value in `[0, phi)` with `(e * v) % phi == 1`, or
/// [`RsaError::NoInverseExists`] when `gcd(e, phi) != 1`.
pub fn mod_inverse(e: u64, phi: u64) -> RsaResult<u64> {
    if phi == 0 {
        return Err(RsaError::NoInverseExists);
    }

    let phi = i128::from(phi);
    let (gcd, x, _) = extended_gcd(i128::from(e) % phi, phi);
    if gcd != 1 {
        return Err(RsaError::NoInverseExists);
    }

    // rem_euclid keeps the value in [0, phi), which always fits back in u64
    Ok(x.rem_euclid(phi) as u64)
}

/// Modular exponentiation: base^exp mod modulus
///
/// Fails with [`RsaError::ArithmeticDomain`] when `modulus == 0`.
pub fn mod_pow(base: u64, exp: u64, modulus: u64, precision: Precision) -> RsaResult<u64> {
    if modulus == 0 {
        return Err(RsaError::ArithmeticDomain { modulus });
    }

    let result = match precision {
        Precision::Native => mod_pow_native(base, exp, modulus),
        Precision::Arbitrary => {
            let r = mod_pow_big(&from_u64(base), &from_u64(exp), &from_u64(modulus));
            // r < modulus, so at most one 64-bit digit
            r.to_u64_digits().first().copied().unwrap_or(0)
        }
    };

    Ok(result)
}

/// Square-and-multiply over u128 intermediates
fn mod_pow_native(base: u64, exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }

    let m = u128::from(modulus);
    let mut result: u128 = 1;
    let mut base = u128::from(base) % m;
    let mut exp = exp;

    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % m;
        }
        base = base * base % m;
        exp >>= 1;
    }

    result as u64
}

/// Modular exponentiation over big integers: base^exp mod modulus
/// Uses square-and-multiply algorithm
pub fn mod_pow_big(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Approximate entropy of the modulus in bits: log2(n)
pub fn entropy_bits(n: u64) -> f64 {
    (n as f64).log2()
}

/// Miller-Rabin primality test
/// Returns true if n is probably prime
pub fn is_probable_prime(n: &RsaBigInt, iterations: u32) -> bool {
    if n < &RsaBigInt::from(2u8) {
        return false;
    }
    if n == &RsaBigInt::from(2u8) || n == &RsaBigInt::from(3u8) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n-1 as d * 2^s with d odd
    let mut d = n.clone() - 1u8;
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    let mut rng = thread_rng();
    let two = RsaBigInt::from(2u8);
    let n_minus_one = n - 1u8;
    let n_minus_two = n - 2u8;

    'witness: for _ in 0..iterations {
        // Pick random witness a in [2, n-2)
        let a = rng.gen_biguint_range(&two, &n_minus_two);

        let mut x = mod_pow_big(&a, &d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = mod_pow_big(&x, &two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Generate a random prime of specified bit length
pub fn random_prime(bit_length: u32) -> RsaBigInt {
    let mut rng = thread_rng();
    let lower = RsaBigInt::one() << (bit_length - 1);
    let upper = (RsaBigInt::one() << bit_length) - 1u8;

    loop {
        let mut candidate = rng.gen_biguint_range(&lower, &upper);

        // Make it odd
        if candidate.is_even() {
            candidate += 1u8;
        }

        if is_probable_prime(&candidate, 10) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(20, 3), 1);
        assert_eq!(gcd(12, 8), 4);
        assert_eq!(gcd(8, 12), 4);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(0, 7), 7);
        assert_eq!(gcd(0, 0), 0);
    }

    #[test]
    fn test_is_prime() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(4));
        assert!(is_prime(11));
        assert!(!is_prime(25));
        assert!(!is_prime(49));
        assert!(is_prime(65_537));
        // Largest prime below 2^32, squared bound sits right at the edge
        assert!(is_prime(4_294_967_291));
        assert!(!is_prime(4_294_967_291 * 3));
    }

    #[test]
    fn test_mod_inverse() {
        assert_eq!(mod_inverse(3, 20), Ok(7));
        assert_eq!(mod_inverse(3, 7), Ok(5));
        // e larger than phi is reduced first
        assert_eq!(mod_inverse(23, 20), Ok(7));
    }

    #[test]
    fn test_mod_inverse_not_coprime() {
        assert_eq!(mod_inverse(4, 20), Err(RsaError::NoInverseExists));
        assert_eq!(mod_inverse(5, 20), Err(RsaError::NoInverseExists));
        assert_eq!(mod_inverse(3, 0), Err(RsaError::NoInverseExists));
    }

    #[test]
    fn test_mod_pow() {
        // 3^5 mod 7 = 243 mod 7 = 5
        assert_eq!(mod_pow(3, 5, 7, Precision::Native), Ok(5));
        assert_eq!(mod_pow(3, 5, 7, Precision::Arbitrary), Ok(5));
        assert_eq!(mod_pow(5, 0, 7, Precision::Native), Ok(1));
        assert_eq!(mod_pow(5, 3, 1, Precision::Native), Ok(0));
        assert_eq!(mod_pow(5, 3, 1, Precision::Arbitrary), Ok(0));
    }

    #[test]
    fn test_mod_pow_zero_modulus() {
        assert_eq!(
            mod_pow(3, 5, 0, Precision::Native),
            Err(RsaError::ArithmeticDomain { modulus: 0 })
        );
        assert_eq!(
            mod_pow(3, 5, 0, Precision::Arbitrary),
            Err(RsaError::ArithmeticDomain { modulus: 0 })
        );
    }

    #[test]
    fn test_mod_pow_wide_modulus() {
        let m = u64::MAX - 58; // largest 64-bit prime
        let native = mod_pow(u64::MAX - 1, 65_537, m, Precision::Native).unwrap();
        let big = mod_pow(u64::MAX - 1, 65_537, m, Precision::Arbitrary).unwrap();
        assert_eq!(native, big);
        assert!(native < m);
    }

    #[test]
    fn test_mod_pow_big() {
        let base = from_u64(4);
        let exp = from_u64(13);
        let modulus = from_u64(497);
        assert_eq!(mod_pow_big(&base, &exp, &modulus), from_u64(445));
    }

    #[test]
    fn test_entropy_bits() {
        assert_eq!(entropy_bits(1024), 10.0);
        assert!((entropy_bits(33) - 5.044).abs() < 0.001);
    }

    #[test]
    fn test_is_probable_prime() {
        assert!(is_probable_prime(&from_u64(2), 5));
        assert!(is_probable_prime(&from_u64(3), 5));
        assert!(is_probable_prime(&from_u64(7), 5));
        assert!(!is_probable_prime(&from_u64(4), 5));
        assert!(!is_probable_prime(&from_u64(9), 5));
        assert!(is_probable_prime(&from_u64(65_537), 10));
    }

    #[test]
    fn test_random_prime_has_requested_size() {
        for bits in [4u32, 8, 16] {
            let p = random_prime(bits);
            assert_eq!(p.bits(), u64::from(bits));
            let p = p.to_u64_digits()[0];
            assert!(is_prime(p), "{p} should be prime");
        }
    }
}
