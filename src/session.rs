// Key Session
// Caller-owned mutable state: current p, q, e and codec options.
// The engine stays stateless; keys are re-derived whenever an input changes.

use tracing::debug;

use crate::config::{CodecConfig, Config};
use crate::error::RsaResult;
use crate::rsa::bigint::Precision;
use crate::rsa::decrypt::{decrypt_message, DecryptionReport};
use crate::rsa::encrypt::{encrypt_message, EncryptionReport};
use crate::rsa::keygen::{derive_keys, generate_prime_pair, KeyPair, PrimePair, PrimeValidation};
use crate::rsa::progress::ProgressObserver;
use crate::util::file_ops::KeyRecord;

/// Session state for one user of the engine
#[derive(Debug, Clone)]
pub struct Session {
    primes: PrimePair,
    e: u64,
    codec: CodecConfig,
    keys: Option<KeyPair>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            primes: PrimePair::new(config.keys.p, config.keys.q),
            e: config.keys.e,
            codec: config.codec.clone(),
            keys: None,
        }
    }

    pub fn primes(&self) -> PrimePair {
        self.primes
    }

    pub fn exponent(&self) -> u64 {
        self.e
    }

    pub fn precision(&self) -> Precision {
        self.codec.precision()
    }

    pub fn set_primes(&mut self, p: u64, q: u64) {
        let primes = PrimePair::new(p, q);
        if primes != self.primes {
            self.primes = primes;
            self.keys = None;
        }
    }

    pub fn set_exponent(&mut self, e: u64) {
        if e != self.e {
            self.e = e;
            self.keys = None;
        }
    }

    pub fn set_use_large_numbers(&mut self, use_large_numbers: bool) {
        self.codec.use_large_numbers = use_large_numbers;
    }

    /// Keys derived from the current inputs, if derivation has run since the last change
    pub fn keys(&self) -> Option<&KeyPair> {
        self.keys.as_ref()
    }

    pub fn validate(&self) -> PrimeValidation {
        self.primes.validate()
    }

    /// Derive keys from the current p, q and e
    pub fn calculate_keys(&mut self) -> RsaResult<KeyPair> {
        self.keys = None;
        let keys = derive_keys(self.primes.p, self.primes.q, self.e)?;
        self.keys = Some(keys);
        Ok(keys)
    }

    /// Replace p and q with a random pair of `bits`-bit primes
    pub fn generate_primes(&mut self, bits: u32) -> RsaResult<PrimePair> {
        let pair = generate_prime_pair(bits)?;
        self.set_primes(pair.p, pair.q);
        Ok(pair)
    }

    /// Take p, q and e from an imported record and re-derive
    pub fn load_record(&mut self, record: &KeyRecord) -> RsaResult<KeyPair> {
        self.set_primes(record.p, record.q);
        self.set_exponent(record.e);
        let keys = record.derive()?;
        self.keys = Some(keys);
        Ok(keys)
    }

    fn current_keys(&mut self) -> RsaResult<KeyPair> {
        match self.keys {
            Some(keys) => Ok(keys),
            None => self.calculate_keys(),
        }
    }

    pub fn encrypt(
        &mut self,
        text: &str,
        include_punctuation: bool,
        observer: Option<ProgressObserver<'_>>,
    ) -> RsaResult<EncryptionReport> {
        let keys = self.current_keys()?;
        let options = self.codec.options(include_punctuation);
        debug!(n = keys.n, e = keys.e, "session encrypt");
        encrypt_message(text, keys.e, keys.n, &options, self.precision(), observer)
    }

    pub fn decrypt(
        &mut self,
        raw: &str,
        include_punctuation: bool,
        observer: Option<ProgressObserver<'_>>,
    ) -> RsaResult<DecryptionReport> {
        let keys = self.current_keys()?;
        debug!(n = keys.n, "session decrypt");
        decrypt_message(raw, keys.d, keys.n, include_punctuation, self.precision(), observer)
    }
}
