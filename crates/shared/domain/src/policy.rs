//! Password composition policy.
//!
//! Validation and generation share one character-class partition, so every
//! generated password passes validation by construction.

use rand::Rng;

use crate::constants::{
    MAX_GENERATED_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH, MIN_GENERATED_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH, PASSWORD_DIGITS, PASSWORD_LOWERCASE, PASSWORD_SPECIAL,
    PASSWORD_UPPERCASE,
};
use crate::error::{DomainError, DomainResult};

const COMPOSITION_MESSAGE: &str = "the password must contain at least one digit(0-9), \
     one lowercase letter(a-z), one uppercase letter(A-Z), one special character (@,#,%,&,!,$)";

/// Character classes a policy-compliant password draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Digit,
    Lower,
    Upper,
    Special,
}

impl CharClass {
    pub const ALL: [CharClass; 4] = [
        CharClass::Upper,
        CharClass::Digit,
        CharClass::Lower,
        CharClass::Special,
    ];

    /// Characters belonging to this class.
    pub fn alphabet(self) -> &'static str {
        match self {
            CharClass::Digit => PASSWORD_DIGITS,
            CharClass::Lower => PASSWORD_LOWERCASE,
            CharClass::Upper => PASSWORD_UPPERCASE,
            CharClass::Special => PASSWORD_SPECIAL,
        }
    }

    /// Class of a character, `None` when it is outside every class.
    pub fn of(c: char) -> Option<CharClass> {
        Self::ALL
            .into_iter()
            .find(|class| class.alphabet().contains(c))
    }

    fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> char {
        pick_from(self.alphabet(), rng)
    }
}

/// Password validation and generation rules.
pub struct PasswordPolicy;

impl PasswordPolicy {
    /// Check a candidate password against the composition rules.
    ///
    /// An empty candidate is accepted: it asks the service to generate one.
    pub fn validate(candidate: &str) -> DomainResult<()> {
        if candidate.is_empty() {
            return Ok(());
        }

        let length = candidate.chars().count();
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
            return Err(DomainError::policy(format!(
                "the length of the password should be between {} to {} characters",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            )));
        }

        if candidate.chars().any(char::is_whitespace) {
            return Err(DomainError::policy("password should not contain any space"));
        }

        let mut seen = [false; 4];
        for c in candidate.chars() {
            let class = CharClass::of(c).ok_or_else(|| DomainError::policy(COMPOSITION_MESSAGE))?;
            seen[class as usize] = true;
        }

        if seen.iter().all(|present| *present) {
            Ok(())
        } else {
            Err(DomainError::policy(COMPOSITION_MESSAGE))
        }
    }

    /// Generate a random policy-compliant password using the thread-local RNG.
    pub fn generate() -> String {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Generate a password from the given random source.
    ///
    /// The first four characters are one of each class, the rest are drawn
    /// uniformly from the combined alphabet.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
        let length = rng.gen_range(MIN_GENERATED_PASSWORD_LENGTH..=MAX_GENERATED_PASSWORD_LENGTH);
        let combined: String = CharClass::ALL.iter().map(|c| c.alphabet()).collect();

        let mut password = String::with_capacity(length);
        for class in CharClass::ALL {
            password.push(class.pick(rng));
        }
        while password.len() < length {
            password.push(pick_from(&combined, rng));
        }
        password
    }
}

/// Alphabets are ASCII, so byte indexing yields whole characters.
fn pick_from<R: Rng + ?Sized>(alphabet: &str, rng: &mut R) -> char {
    let bytes = alphabet.as_bytes();
    bytes[rng.gen_range(0..bytes.len())] as char
}
