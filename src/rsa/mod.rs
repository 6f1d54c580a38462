// RSA Module - Main module file
// Exports the number theory kernel, key derivation and message codec

pub mod bigint;
pub mod codec;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod progress;

pub use bigint::{entropy_bits, gcd, is_prime, mod_inverse, mod_pow, mod_pow_big, Precision};
pub use codec::{decode, encode, encode_with, format_numbers, CodecOptions, Encoded, Encoder, WhitespacePolicy};
pub use decrypt::{
    decrypt_block, decrypt_message, decrypt_sequence, parse_cipher_text, reduce_cipher_text, DecryptionReport,
};
pub use encrypt::{encrypt_block, encrypt_message, encrypt_sequence, EncryptionReport};
pub use keygen::{
    classify_security, derive_keys, generate_prime_pair, validate_prime_pair, KeyPair, PrimePair,
    PrimeValidation, PrivateKey, PublicKey, SecurityAssessment, SecurityLevel,
};
pub use progress::{Progress, ProgressObserver, TraceFilter};
