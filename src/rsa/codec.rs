// Message Codec
// Maps text onto the fixed RSA alphabet and back:
// A-Z = 1-26, . , ! ? ; = 27-31 (optional), space = 32

use std::collections::BTreeSet;
use std::str::Chars;

use serde::{Deserialize, Serialize};

/// Code for the space character
pub const SPACE_CODE: u64 = 32;

/// Supported punctuation in code order, 27 through 31
pub const PUNCTUATION: [char; 5] = ['.', ',', '!', '?', ';'];

const FIRST_PUNCTUATION_CODE: u64 = 27;

/// Which whitespace characters map to [`SPACE_CODE`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhitespacePolicy {
    /// Only `' '` maps to 32; tabs and newlines are unmappable
    #[default]
    SpaceOnly,
    /// Every Unicode whitespace character maps to 32
    AnyWhitespace,
}

/// Options shared by encode and decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecOptions {
    pub include_punctuation: bool,
    pub whitespace: WhitespacePolicy,
}

impl CodecOptions {
    pub fn new(include_punctuation: bool) -> Self {
        Self {
            include_punctuation,
            ..Self::default()
        }
    }

    pub fn with_whitespace(mut self, whitespace: WhitespacePolicy) -> Self {
        self.whitespace = whitespace;
        self
    }

    /// Code for one character, or `None` when it is unmappable under these options
    pub fn char_to_code(&self, c: char) -> Option<u64> {
        if c.is_ascii_alphabetic() {
            return Some(u64::from(c.to_ascii_lowercase() as u8 - b'a') + 1);
        }
        if let Some(idx) = PUNCTUATION.iter().position(|&p| p == c) {
            return self
                .include_punctuation
                .then(|| FIRST_PUNCTUATION_CODE + idx as u64);
        }
        let is_space = match self.whitespace {
            WhitespacePolicy::SpaceOnly => c == ' ',
            WhitespacePolicy::AnyWhitespace => c.is_whitespace(),
        };
        is_space.then_some(SPACE_CODE)
    }

    /// Character for one code, or `None` when the code is dropped
    pub fn code_to_char(&self, code: u64) -> Option<char> {
        match code {
            1..=26 => Some(char::from(b'A' + (code - 1) as u8)),
            27..=31 if self.include_punctuation => {
                PUNCTUATION.get((code - FIRST_PUNCTUATION_CODE) as usize).copied()
            }
            SPACE_CODE => Some(' '),
            _ => None,
        }
    }
}

/// Lazy encoder over a borrowed string.
///
/// Yields one code per mappable character in input order. Cloning restarts
/// from the clone point, so the sequence can be walked more than once.
#[derive(Debug, Clone)]
pub struct Encoder<'a> {
    chars: Chars<'a>,
    options: CodecOptions,
}

impl<'a> Encoder<'a> {
    pub fn new(text: &'a str, options: CodecOptions) -> Self {
        Self {
            chars: text.chars(),
            options,
        }
    }

    /// Next character as its code, or `Err(c)` when `c` has no code
    pub fn next_symbol(&mut self) -> Option<Result<u64, char>> {
        let c = self.chars.next()?;
        Some(self.options.char_to_code(c).ok_or(c))
    }
}

impl Iterator for Encoder<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        while let Some(symbol) = self.next_symbol() {
            if let Ok(code) = symbol {
                return Some(code);
            }
        }
        None
    }
}

/// Encoded message: codes in order plus the distinct characters that were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoded {
    pub values: Vec<u64>,
    pub skipped: BTreeSet<char>,
}

/// Encode text with the default whitespace policy
pub fn encode(text: &str, include_punctuation: bool) -> Encoded {
    encode_with(text, &CodecOptions::new(include_punctuation))
}

/// Encode text, collecting unmappable characters instead of failing
pub fn encode_with(text: &str, options: &CodecOptions) -> Encoded {
    let mut encoded = Encoded::default();
    let mut encoder = Encoder::new(text, *options);

    while let Some(symbol) = encoder.next_symbol() {
        match symbol {
            Ok(code) => encoded.values.push(code),
            Err(c) => {
                encoded.skipped.insert(c);
            }
        }
    }

    encoded
}

/// Decode codes back to text. Unknown codes, and punctuation when it is
/// disabled, are dropped silently. Letters always come back uppercase.
pub fn decode(values: &[u64], include_punctuation: bool) -> String {
    let options = CodecOptions::new(include_punctuation);
    values.iter().filter_map(|&v| options.code_to_char(v)).collect()
}

/// Format codes as space-separated, at least two-digit decimal tokens ("01 32 27")
pub fn format_numbers(values: &[u64]) -> String {
    values
        .iter()
        .map(|v| format!("{v:02}"))
        .collect::<Vec<_>>()
        .join(" ")
}
