//! Heuristic password strength scoring.
//!
//! Scores length, character variety, well-known weak substrings, and
//! runs of the same character.  The report is stored as part of a
//! credential's annotation and shown by the CLI.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Substrings that make a password trivially guessable.
const COMMON_PATTERNS: &str = r"(?i)12345|qwerty|password|admin";

/// Coarse strength bucket derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Weak,
    Medium,
    Strong,
}

impl Rating {
    fn from_score(score: i32) -> Self {
        if score >= 4 {
            Self::Strong
        } else if score >= 2 {
            Self::Medium
        } else {
            Self::Weak
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthReport {
    pub score: i32,
    pub rating: Rating,
    pub feedback: Vec<String>,
    pub has_lowercase: bool,
    pub has_uppercase: bool,
    pub has_digit: bool,
    pub has_special: bool,
}

/// Analyse `password` and return its score, rating, and feedback lines.
pub fn analyse_strength(password: &str) -> StrengthReport {
    let mut score = 0;
    let mut feedback = Vec::new();

    let length = password.chars().count();
    if length < 8 {
        score -= 2;
        feedback.push("Password is too short (< 8 characters)".to_string());
    } else if length >= 12 {
        score += 2;
        feedback.push("Good length".to_string());
    } else {
        score += 1;
    }

    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());

    let char_types = [has_lowercase, has_uppercase, has_digit, has_special]
        .iter()
        .filter(|&&present| present)
        .count();

    match char_types {
        4 => {
            score += 3;
            feedback.push("Excellent character variety".to_string());
        }
        3 => {
            score += 2;
            feedback.push("Good character variety".to_string());
        }
        2 => {
            score += 1;
            feedback.push("Limited character variety".to_string());
        }
        _ => {
            score -= 1;
            feedback.push("Poor character variety".to_string());
        }
    }

    if common_patterns().is_some_and(|re| re.is_match(password)) {
        score -= 3;
        feedback.push("Contains common patterns".to_string());
    }

    if has_triple_repeat(password) {
        score -= 1;
        feedback.push("Contains repeating characters".to_string());
    }

    StrengthReport {
        score,
        rating: Rating::from_score(score),
        feedback,
        has_lowercase,
        has_uppercase,
        has_digit,
        has_special,
    }
}

fn common_patterns() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(COMMON_PATTERNS).ok()).as_ref()
}

/// Same character three times in a row.
fn has_triple_repeat(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password() {
        let report = analyse_strength("Tr0ub4dor&3xyz");
        assert_eq!(report.score, 5);
        assert_eq!(report.rating, Rating::Strong);
        assert!(report.has_lowercase && report.has_uppercase);
        assert!(report.has_digit && report.has_special);
        assert_eq!(
            report.feedback,
            vec!["Good length", "Excellent character variety"]
        );
    }

    #[test]
    fn short_single_class_password_is_weak() {
        let report = analyse_strength("abc");
        assert_eq!(report.score, -3);
        assert_eq!(report.rating, Rating::Weak);
        assert_eq!(
            report.feedback,
            vec![
                "Password is too short (< 8 characters)",
                "Poor character variety"
            ]
        );
    }

    #[test]
    fn medium_length_three_classes() {
        // 10 chars: +1, three classes: +2.
        let report = analyse_strength("Abcdefgh12");
        assert_eq!(report.score, 3);
        assert_eq!(report.rating, Rating::Medium);
    }

    #[test]
    fn common_pattern_regex_compiles() {
        let re = common_patterns().expect("common-pattern regex must compile");
        for word in ["12345", "QWERTY", "Password", "admin"] {
            assert!(re.is_match(word), "{word} should match");
        }
        assert!(!re.is_match("Xk7!mZq2rTw9"));
    }

    #[test]
    fn common_pattern_is_penalised_case_insensitively() {
        let report = analyse_strength("MyPassWord!9xx");
        // length +2, variety +3, common -3
        assert_eq!(report.score, 2);
        assert!(report
            .feedback
            .contains(&"Contains common patterns".to_string()));
    }

    #[test]
    fn triple_repeat_is_penalised() {
        let report = analyse_strength("Zaaa9!bcdefg");
        assert!(report
            .feedback
            .contains(&"Contains repeating characters".to_string()));

        let clean = analyse_strength("Zaa9!abcdefg");
        assert!(!clean
            .feedback
            .contains(&"Contains repeating characters".to_string()));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // Seven characters, more than eight bytes.
        let report = analyse_strength("ééééééé");
        assert!(report
            .feedback
            .contains(&"Password is too short (< 8 characters)".to_string()));
    }

    #[test]
    fn rating_displays_as_word() {
        assert_eq!(Rating::Medium.to_string(), "Medium");
    }
}
