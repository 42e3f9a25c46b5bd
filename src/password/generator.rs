//! Random password generation.
//!
//! Generated passwords always contain at least one lowercase letter,
//! one uppercase letter, and one digit, plus one ASCII punctuation
//! character when specials are enabled.  The rest is drawn from the
//! union of the enabled sets and the result is shuffled.

use rand::seq::SliceRandom;
use rand::Rng;
use zeroize::Zeroize;

use crate::errors::{PassVaultError, Result};

/// Default length used by the CLI when none is given.
pub const DEFAULT_LENGTH: usize = 16;

/// Longest password we agree to generate.
pub const MAX_LENGTH: usize = 1024;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Generate a random password of exactly `length` characters.
pub fn generate_password(length: usize, include_special: bool) -> Result<String> {
    let mut classes: Vec<&[u8]> = vec![LOWERCASE, UPPERCASE, DIGITS];
    if include_special {
        classes.push(SPECIAL);
    }

    if length == 0 {
        return Err(PassVaultError::InvalidInput(
            "password length must be positive".into(),
        ));
    }
    if length < classes.len() {
        return Err(PassVaultError::InvalidInput(format!(
            "password length must be at least {} to include every character type",
            classes.len()
        )));
    }
    if length > MAX_LENGTH {
        return Err(PassVaultError::InvalidInput(format!(
            "password length cannot exceed {MAX_LENGTH}"
        )));
    }

    let mut rng = rand::rng();
    let all: Vec<u8> = classes.concat();

    let mut chars: Vec<u8> = Vec::with_capacity(length);
    for class in &classes {
        chars.push(pick(class, &mut rng));
    }
    while chars.len() < length {
        chars.push(pick(&all, &mut rng));
    }
    chars.shuffle(&mut rng);

    let password = chars.iter().map(|&b| char::from(b)).collect();
    chars.zeroize();
    Ok(password)
}

fn pick(set: &[u8], rng: &mut impl Rng) -> u8 {
    set[rng.random_range(0..set.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_in(password: &str, set: &[u8]) -> usize {
        password.bytes().filter(|b| set.contains(b)).count()
    }

    #[test]
    fn has_requested_length() {
        for len in [4, 5, 16, 64] {
            assert_eq!(generate_password(len, true).unwrap().len(), len);
        }
        assert_eq!(generate_password(3, false).unwrap().len(), 3);
    }

    #[test]
    fn contains_every_enabled_class() {
        for _ in 0..50 {
            let pw = generate_password(4, true).unwrap();
            assert!(count_in(&pw, LOWERCASE) >= 1);
            assert!(count_in(&pw, UPPERCASE) >= 1);
            assert!(count_in(&pw, DIGITS) >= 1);
            assert!(count_in(&pw, SPECIAL) >= 1);
        }
    }

    #[test]
    fn no_special_characters_when_disabled() {
        for _ in 0..50 {
            let pw = generate_password(32, false).unwrap();
            assert_eq!(count_in(&pw, SPECIAL), 0);
            assert!(pw.bytes().all(|b| b.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn rejects_zero_length() {
        assert!(matches!(
            generate_password(0, true),
            Err(PassVaultError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_length_below_class_count() {
        assert!(generate_password(3, true).is_err());
        assert!(generate_password(2, false).is_err());
    }

    #[test]
    fn rejects_absurd_length() {
        assert!(generate_password(MAX_LENGTH + 1, true).is_err());
    }

    #[test]
    fn successive_passwords_differ() {
        let a = generate_password(DEFAULT_LENGTH, true).unwrap();
        let b = generate_password(DEFAULT_LENGTH, true).unwrap();
        assert_ne!(a, b);
    }
}
