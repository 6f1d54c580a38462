//! End-to-end scenarios across key derivation and the message codec.

use num_bigint::BigInt;

use rsa_toy::rsa::{
    classify_security, decode, decrypt_message, derive_keys, encode, encrypt_message,
    format_numbers, parse_cipher_text, reduce_cipher_text, validate_prime_pair, CodecOptions,
    Precision, Progress, SecurityLevel,
};
use rsa_toy::util::file_ops::{export_keys, import_keys, import_record};
use rsa_toy::{Config, RsaError, Session};

#[test]
fn reference_example_end_to_end() {
    let keys = derive_keys(3, 11, 3).unwrap();
    assert_eq!((keys.n, keys.phi, keys.d), (33, 20, 7));

    let report = encrypt_message(
        "A CAB",
        keys.e,
        keys.n,
        &CodecOptions::new(false),
        Precision::Native,
        None,
    )
    .unwrap();
    assert_eq!(format_numbers(&report.original), "01 32 03 01 02");
    assert_eq!(format_numbers(&report.encrypted), "01 32 27 01 08");

    let plain = decrypt_message("01 32 27 01 08", keys.d, keys.n, false, Precision::Native, None).unwrap();
    assert_eq!(plain.message, "A CAB");
}

#[test]
fn validation_examples() {
    assert!(!validate_prime_pair(3, 3).errors.is_empty());

    let v = validate_prime_pair(3, 11);
    assert!(v.errors.is_empty());
    assert!(v.warnings.iter().all(|w| w.contains("security")));
}

#[test]
fn malformed_cipher_tokens_are_dropped() {
    assert_eq!(parse_cipher_text("07 xx 03"), vec![BigInt::from(7), BigInt::from(3)]);

    // The dropped token does not shift the remaining symbols
    let keys = derive_keys(3, 11, 3).unwrap();
    let plain = decrypt_message("01 ?? 32 27 01 08", keys.d, keys.n, false, Precision::Native, None).unwrap();
    assert_eq!(plain.message, "A CAB");
}

#[test]
fn out_of_range_cipher_tokens_wrap_into_modulus() {
    let tokens = parse_cipher_text("-32 01 34 18446744073709551616");
    assert_eq!(tokens.len(), 4);
    assert_eq!(reduce_cipher_text(&tokens, 33).unwrap(), vec![1, 1, 1, 16]);

    let keys = derive_keys(3, 11, 3).unwrap();
    let plain = decrypt_message("-32 01", keys.d, keys.n, false, Precision::Native, None).unwrap();
    assert_eq!(plain.message, "AA");
}

#[test]
fn punctuation_vanishes_on_decode_when_disabled() {
    let keys = derive_keys(61, 53, 17).unwrap();
    let options = CodecOptions::new(true);
    let report = encrypt_message("Hi, you!", keys.e, keys.n, &options, Precision::Native, None).unwrap();
    let cipher = format_numbers(&report.encrypted);

    let with = decrypt_message(&cipher, keys.d, keys.n, true, Precision::Native, None).unwrap();
    assert_eq!(with.message, "HI, YOU!");

    let without = decrypt_message(&cipher, keys.d, keys.n, false, Precision::Native, None).unwrap();
    assert_eq!(without.message, "HI YOU");
    assert_eq!(without.decrypted, with.decrypted);
}

#[test]
fn whitespace_other_than_space_is_skipped_by_default() {
    let encoded = encode("A\tB", false);
    assert_eq!(encoded.values, vec![1, 2]);
    assert!(encoded.skipped.contains(&'\t'));
    assert_eq!(decode(&encoded.values, false), "AB");
}

#[test]
fn entropy_classification_boundaries() {
    assert_eq!(classify_security(1023).level, SecurityLevel::VeryLow);
    assert_eq!(classify_security(1024).level, SecurityLevel::Low);
    assert_eq!(classify_security(3233).level, SecurityLevel::Low);
}

#[test]
fn progress_trace_suppresses_repeated_lines() {
    let keys = derive_keys(3, 11, 3).unwrap();
    let mut events: Vec<Progress> = Vec::new();
    let mut observer = |p: &Progress| events.push(p.clone());

    encrypt_message("AAB", keys.e, keys.n, &CodecOptions::default(), Precision::Native, Some(&mut observer)).unwrap();

    let traces: Vec<Option<&str>> = events.iter().map(|e| e.trace.as_deref()).collect();
    assert_eq!(
        traces,
        vec![Some("Encrypting: 1 → 1"), None, Some("Encrypting: 2 → 8")]
    );
    assert_eq!(events.last().map(|e| e.percent), Some(100));
}

#[test]
fn precision_modes_agree_end_to_end() {
    let keys = derive_keys(251, 241, 7).unwrap();
    let options = CodecOptions::new(true);
    let text = "The quick brown fox; jumps!";

    let native = encrypt_message(text, keys.e, keys.n, &options, Precision::Native, None).unwrap();
    let big = encrypt_message(text, keys.e, keys.n, &options, Precision::Arbitrary, None).unwrap();
    assert_eq!(native, big);
}

#[test]
fn session_export_import_rederives() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.json");

    let mut session = Session::new(&Config::default());
    session.set_primes(61, 53);
    session.set_exponent(17);
    let keys = session.calculate_keys().unwrap();
    export_keys(&path, &keys).unwrap();

    assert_eq!(import_keys(&path).unwrap(), keys);

    let mut fresh = Session::new(&Config::default());
    let record = import_record(&path).unwrap();
    assert_eq!(fresh.load_record(&record).unwrap(), keys);
    assert_eq!(fresh.exponent(), 17);
}

#[test]
fn exponent_errors_are_not_retried() {
    assert_eq!(
        derive_keys(3, 11, 2),
        Err(RsaError::ExponentNotCoprime { e: 2, phi: 20 })
    );
}
