//! Property-based tests for the RSA engine
//!
//! Uses proptest to check the number theory and codec invariants across input ranges.

use proptest::prelude::*;

use rsa_toy::rsa::{
    decode, decrypt_block, derive_keys, encode, encrypt_block, gcd, is_prime, mod_inverse,
    mod_pow, Precision,
};
use rsa_toy::RsaError;

fn trial_division(n: u64) -> bool {
    n >= 2 && (2..n).take_while(|i| i * i <= n).all(|i| n % i != 0)
}

// Any two distinct entries multiply to at least 33
const SMALL_PRIMES: [u64; 14] = [5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// Smallest exponent >= `from` that is coprime with `phi`
fn next_coprime(from: u64, phi: u64) -> u64 {
    (from..).find(|&e| gcd(e, phi) == 1).unwrap_or(phi + 1)
}

#[test]
fn is_prime_matches_ground_truth_up_to_10000() {
    for n in 0..=10_000u64 {
        assert_eq!(is_prime(n), trial_division(n), "mismatch at {n}");
    }
}

proptest! {
    #[test]
    fn gcd_is_symmetric(a in any::<u64>(), b in any::<u64>()) {
        prop_assert_eq!(gcd(a, b), gcd(b, a));
        prop_assert_eq!(gcd(a, 0), a);
    }

    #[test]
    fn mod_inverse_contract(e in 0u64..5000, phi in 2u64..5000) {
        match mod_inverse(e, phi) {
            Ok(v) => {
                prop_assert_eq!(gcd(e, phi), 1);
                prop_assert!(v < phi);
                prop_assert_eq!((e * v) % phi, 1);
            }
            Err(err) => {
                prop_assert_ne!(gcd(e, phi), 1);
                prop_assert_eq!(err, RsaError::NoInverseExists);
            }
        }
    }

    #[test]
    fn mod_pow_precision_modes_agree(base in any::<u64>(), exp in 0u64..100_000, modulus in 1u64..=u64::MAX) {
        prop_assert_eq!(
            mod_pow(base, exp, modulus, Precision::Native),
            mod_pow(base, exp, modulus, Precision::Arbitrary)
        );
    }

    #[test]
    fn decrypt_inverts_encrypt(
        pi in 0usize..SMALL_PRIMES.len(),
        offset in 1usize..SMALL_PRIMES.len(),
        e_seed in 2u64..200,
        m_seed in any::<u64>(),
    ) {
        let p = SMALL_PRIMES[pi];
        let q = SMALL_PRIMES[(pi + offset) % SMALL_PRIMES.len()];
        let e = next_coprime(e_seed, (p - 1) * (q - 1));
        let keys = derive_keys(p, q, e).unwrap();

        let m = m_seed % keys.n;
        let c = encrypt_block(m, keys.e, keys.n, Precision::Native).unwrap();
        prop_assert_eq!(decrypt_block(c, keys.d, keys.n, Precision::Native).unwrap(), m);
    }

    #[test]
    fn codec_roundtrip_uppercases(text in "[a-zA-Z .,!?;]{0,64}") {
        let encoded = encode(&text, true);
        prop_assert!(encoded.skipped.is_empty());
        prop_assert_eq!(decode(&encoded.values, true), text.to_uppercase());
    }
}
