//! Free-text validation rules.

use std::sync::LazyLock;

use regex::Regex;

/// `lat:lon` style in-game coordinates, e.g. `56:123` or `-7:40`.
static COORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[0-9]{1,3}:[0-9]{1,6}$").expect("coordinate pattern is valid")
});

pub const COORDS_WARNING: &str = "⚠️ Неверный формат координат.\nВведите в формате: 56:123";

/// Validation applied to a text answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRule {
    /// Non-blank after trimming, at most `max_len` characters.
    NonEmpty {
        max_len: usize,
        warning: &'static str,
    },
    /// In-game coordinates.
    Coords,
}

impl TextRule {
    /// Validate `input`, returning the trimmed value to store or the
    /// warning to show.
    pub fn apply(&self, input: &str) -> Result<String, String> {
        let value = input.trim();
        match *self {
            TextRule::NonEmpty { max_len, warning } => {
                if value.is_empty() {
                    Err(warning.to_string())
                } else if value.chars().count() > max_len {
                    Err(format!("⚠️ Слишком длинный текст (максимум {max_len} символов)."))
                } else {
                    Ok(value.to_string())
                }
            }
            TextRule::Coords => {
                if COORDS_RE.is_match(value) {
                    Ok(value.to_string())
                } else {
                    Err(COORDS_WARNING.to_string())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NICK: TextRule = TextRule::NonEmpty {
        max_len: 5,
        warning: "bad",
    };

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(NICK.apply("  Rex \n"), Ok("Rex".to_string()));
    }

    #[test]
    fn test_non_empty_rejects_blank() {
        assert_eq!(NICK.apply("   "), Err("bad".to_string()));
    }

    #[test]
    fn test_non_empty_counts_chars_not_bytes() {
        assert!(NICK.apply("Щукар").is_ok());
        assert!(NICK.apply("Щукарь").is_err());
    }

    #[test]
    fn test_coords_accepts_valid() {
        for input in ["56:123", "-12:4", "-7:40", " 100:999999 "] {
            assert!(TextRule::Coords.apply(input).is_ok(), "{input}");
        }
    }

    #[test]
    fn test_coords_rejects_invalid() {
        for input in ["", "56", "56:", "56-123", "1234:1", "56:1234567", "56,123", "a:b", "５６:123"] {
            assert_eq!(
                TextRule::Coords.apply(input),
                Err(COORDS_WARNING.to_string()),
                "{input}"
            );
        }
    }
}
