// src/engine/strength.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Symbols that count towards the "has symbol" criterion.
const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Password strength tier. Doubles as the scoring oracle for
/// password-strength questions and as live feedback for the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strength {
    Weak,
    Moderate,
    Strong,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Strength::Weak => "Weak",
            Strength::Moderate => "Moderate",
            Strength::Strong => "Strong",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Strength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Weak" => Ok(Strength::Weak),
            "Moderate" => Ok(Strength::Moderate),
            "Strong" => Ok(Strength::Strong),
            other => Err(format!("unknown strength tier '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub strength: Strength,
    pub feedback: &'static str,
}

/// Grades a candidate password into Weak/Moderate/Strong.
///
/// Deterministic rule evaluation, no external state:
/// 1. Shorter than 8 characters is always Weak.
/// 2. Otherwise count satisfied criteria among uppercase, lowercase,
///    digit and symbol. 4 criteria and 12+ characters make Strong,
///    2+ criteria make Moderate, anything else stays Weak.
pub fn classify(password: &str) -> Assessment {
    let length = password.chars().count();

    if length < 8 {
        return Assessment {
            strength: Strength::Weak,
            feedback: "Too short! Add more characters.",
        };
    }

    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| SYMBOLS.contains(c));

    let criteria_met = [has_uppercase, has_lowercase, has_digit, has_symbol]
        .iter()
        .filter(|&&c| c)
        .count();

    if criteria_met >= 4 && length >= 12 {
        Assessment {
            strength: Strength::Strong,
            feedback: "Great! Includes numbers, symbols, and mixed case!",
        }
    } else if criteria_met >= 2 {
        Assessment {
            strength: Strength::Moderate,
            feedback: "Good, but add more variety (e.g., symbols or numbers).",
        }
    } else {
        Assessment {
            strength: Strength::Weak,
            feedback: "Too simple! Add uppercase, numbers, or symbols.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_are_always_weak() {
        for pw in ["", "a", "1234567", "A1$bcde"] {
            assert_eq!(classify(pw).strength, Strength::Weak, "password: {:?}", pw);
        }
        assert_eq!(classify("1234567").feedback, "Too short! Add more characters.");
    }

    #[test]
    fn all_criteria_and_twelve_chars_is_strong() {
        assert_eq!(classify("K9$mP!xQz@2023").strength, Strength::Strong);
        assert_eq!(classify("Aa1!Aa1!Aa1!").strength, Strength::Strong);
    }

    #[test]
    fn known_examples() {
        assert_eq!(classify("123456").strength, Strength::Weak);
        assert_eq!(classify("SunnyDay2023").strength, Strength::Moderate);
        assert_eq!(classify("K9$mP!xQz@2023").strength, Strength::Strong);
    }

    #[test]
    fn long_but_single_criterion_is_weak() {
        let assessment = classify("abcdefghijkl");
        assert_eq!(assessment.strength, Strength::Weak);
        assert_eq!(
            assessment.feedback,
            "Too simple! Add uppercase, numbers, or symbols."
        );
    }

    #[test]
    fn four_criteria_but_short_of_twelve_is_moderate() {
        assert_eq!(classify("Aa1!Aa1!").strength, Strength::Moderate);
    }

    #[test]
    fn tier_parses_from_label() {
        assert_eq!("Strong".parse::<Strength>().unwrap(), Strength::Strong);
        assert!("strong".parse::<Strength>().is_err());
    }
}
