//! Educational textbook RSA.
//!
//! Derives a toy key pair from two small primes and encrypts short text one
//! symbol at a time through a fixed alphabet (A-Z = 1-26, `. , ! ? ;` = 27-31,
//! space = 32). Not a cryptographic library: no padding, tiny keys.
//!
//! ```
//! use rsa_toy::rsa::{derive_keys, encrypt_message, decrypt_message, CodecOptions, Precision};
//!
//! let keys = derive_keys(3, 11, 3).unwrap();
//! let report = encrypt_message("A CAB", keys.e, keys.n, &CodecOptions::default(), Precision::Native, None).unwrap();
//! assert_eq!(report.encrypted, vec![1, 32, 27, 1, 8]);
//!
//! let plain = decrypt_message("01 32 27 01 08", keys.d, keys.n, false, Precision::Native, None).unwrap();
//! assert_eq!(plain.message, "A CAB");
//! ```

pub mod config;
pub mod error;
pub mod rsa;
pub mod session;
pub mod util;

pub use config::Config;
pub use error::{RsaError, RsaResult};
pub use session::Session;
