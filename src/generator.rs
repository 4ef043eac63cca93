//! Random password generator
//!
//! Builds an alphabet from the enabled character classes and samples it with
//! the OS random source. Sampling uses rejection so every character of the
//! alphabet is equally likely.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use serde::{Deserialize, Serialize};

use crate::error::{VaultError, VaultResult};

pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:,.?";

/// Classes with the visually similar characters already removed
pub const UPPERCASE_UNAMBIGUOUS: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ";
pub const LOWERCASE_UNAMBIGUOUS: &str = "abcdefghijkmnopqrstuvwxyz";
pub const DIGITS_UNAMBIGUOUS: &str = "23456789";

/// Stripped again from the assembled alphabet when excluding ambiguous characters
const AMBIGUOUS: [char; 5] = ['O', 'I', 'l', '1', '0'];

/// Generator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Number of characters to produce (at least 1)
    pub length: usize,
    pub include_upper: bool,
    pub include_lower: bool,
    pub include_numbers: bool,
    pub include_symbols: bool,
    /// Drop `0 O 1 l I`
    pub exclude_ambiguous: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: 16,
            include_upper: true,
            include_lower: true,
            include_numbers: true,
            include_symbols: true,
            exclude_ambiguous: true,
        }
    }
}

impl GeneratorOptions {
    /// The alphabet these options sample from, in class order
    pub fn alphabet(&self) -> Vec<char> {
        let (upper, lower, digits) = if self.exclude_ambiguous {
            (UPPERCASE_UNAMBIGUOUS, LOWERCASE_UNAMBIGUOUS, DIGITS_UNAMBIGUOUS)
        } else {
            (UPPERCASE, LOWERCASE, DIGITS)
        };

        let mut alphabet = String::new();
        if self.include_upper {
            alphabet.push_str(upper);
        }
        if self.include_lower {
            alphabet.push_str(lower);
        }
        if self.include_numbers {
            alphabet.push_str(digits);
        }
        if self.include_symbols {
            alphabet.push_str(SYMBOLS);
        }

        if self.exclude_ambiguous {
            alphabet.retain(|c| !AMBIGUOUS.contains(&c));
        }

        alphabet.chars().collect()
    }

    /// Entropy of one generated password in bits
    pub fn entropy_bits(&self) -> f64 {
        let size = self.alphabet().len();
        if size == 0 {
            return 0.0;
        }
        self.length as f64 * (size as f64).log2()
    }
}

/// Generate a password
pub fn generate(options: &GeneratorOptions) -> VaultResult<String> {
    if options.length == 0 {
        return Err(VaultError::InvalidInput(
            "password length must be at least 1".into(),
        ));
    }

    let alphabet = options.alphabet();
    if alphabet.is_empty() {
        return Err(VaultError::NoAlphabetSelected);
    }

    let mut output = String::with_capacity(options.length);
    for _ in 0..options.length {
        output.push(alphabet[sample_index(alphabet.len())]);
    }
    Ok(output)
}

/// Uniform index in `0..len` from single random bytes
///
/// Bytes at or above the largest multiple of `len` that fits in 256 are
/// redrawn, which removes the modulo bias.
fn sample_index(len: usize) -> usize {
    debug_assert!(len > 0 && len <= 256);
    let limit = 256 - (256 % len);
    let mut byte = [0u8; 1];
    loop {
        OsRng.fill_bytes(&mut byte);
        let value = byte[0] as usize;
        if value < limit {
            return value % len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(upper: bool, lower: bool, numbers: bool, symbols: bool) -> GeneratorOptions {
        GeneratorOptions {
            length: 20,
            include_upper: upper,
            include_lower: lower,
            include_numbers: numbers,
            include_symbols: symbols,
            exclude_ambiguous: true,
        }
    }

    #[test]
    fn test_uppercase_unambiguous() {
        let options = only(true, false, false, false);
        let password = generate(&options).unwrap();

        assert_eq!(password.chars().count(), 20);
        assert!(password
            .chars()
            .all(|c| "ABCDEFGHJKLMNPQRSTUVWXYZ".contains(c)));
    }

    #[test]
    fn test_no_classes_fails() {
        let options = GeneratorOptions {
            length: 10,
            include_upper: false,
            include_lower: false,
            include_numbers: false,
            include_symbols: false,
            exclude_ambiguous: false,
        };
        assert!(matches!(
            generate(&options),
            Err(VaultError::NoAlphabetSelected)
        ));
    }

    #[test]
    fn test_zero_length_fails() {
        let mut options = GeneratorOptions::default();
        options.length = 0;
        assert!(matches!(
            generate(&options),
            Err(VaultError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_alphabet_sizes() {
        assert_eq!(only(true, false, false, false).alphabet().len(), 24);
        assert_eq!(only(false, true, false, false).alphabet().len(), 25);
        assert_eq!(only(false, false, true, false).alphabet().len(), 8);
        assert_eq!(only(false, false, false, true).alphabet().len(), SYMBOLS.len());
        assert_eq!(
            only(true, true, true, true).alphabet().len(),
            24 + 25 + 8 + SYMBOLS.len()
        );

        let mut full = only(true, true, true, false);
        full.exclude_ambiguous = false;
        assert_eq!(full.alphabet().len(), 62);
    }

    #[test]
    fn test_ambiguous_characters_never_appear() {
        let options = GeneratorOptions {
            length: 200,
            ..GeneratorOptions::default()
        };
        let password = generate(&options).unwrap();
        assert!(!password.chars().any(|c| AMBIGUOUS.contains(&c)));
    }

    #[test]
    fn test_ambiguous_allowed_when_not_excluded() {
        let mut options = only(false, false, true, false);
        options.exclude_ambiguous = false;
        let alphabet: String = options.alphabet().into_iter().collect();
        assert_eq!(alphabet, DIGITS);
    }

    #[test]
    fn test_only_selected_classes_used() {
        let options = GeneratorOptions {
            length: 100,
            ..only(false, false, true, true)
        };
        let password = generate(&options).unwrap();
        assert!(password
            .chars()
            .all(|c| DIGITS_UNAMBIGUOUS.contains(c) || SYMBOLS.contains(c)));
    }

    #[test]
    fn test_entropy_bits() {
        let options = GeneratorOptions {
            length: 10,
            ..only(false, false, true, false)
        };
        // 8 symbols -> 3 bits each
        assert!((options.entropy_bits() - 30.0).abs() < 1e-9);

        let empty = GeneratorOptions {
            length: 10,
            ..only(false, false, false, false)
        };
        assert_eq!(empty.entropy_bits(), 0.0);
    }

    #[test]
    fn test_sample_index_covers_range() {
        let mut seen = [false; 7];
        for _ in 0..2_000 {
            seen[sample_index(7)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_passwords_differ() {
        let options = GeneratorOptions::default();
        assert_ne!(generate(&options).unwrap(), generate(&options).unwrap());
    }
}
