//! Citation level values.
//!
//! A level of the citation hierarchy holds either a number (`12`) or a
//! piece of text (`"12a"`, `"b"`, `"Prol"`). Levels switch freely between
//! the two representations.

use std::fmt;

/// Initial value of every hierarchy level.
pub const INITIAL_LEVEL_VALUE: u32 = 1;

/// The value held by one citation level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CitationValue {
    /// A plain number.
    Number(u32),
    /// Text, possibly starting with digits (`"12a"`).
    Text(String),
}

/// Outcome of [`CitationValue::incremented`] when no successor is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoSuccessor;

impl CitationValue {
    /// The value every level starts from.
    pub const fn initial() -> Self {
        Self::Number(INITIAL_LEVEL_VALUE)
    }

    /// Check whether this is the initial value.
    pub fn is_initial(&self) -> bool {
        matches!(self, Self::Number(INITIAL_LEVEL_VALUE))
    }

    /// Numeric value, if this is a number or purely numeric text.
    pub fn as_number(&self) -> Option<u32> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(t) => t.parse().ok(),
        }
    }

    /// Successor value used by the increment action.
    ///
    /// - numbers (and purely numeric text) advance by one;
    /// - a single ASCII letter advances to the next letter;
    /// - text with a leading number and a suffix (`"12a"`) advances the
    ///   number and drops the suffix.
    ///
    /// There is no successor for `z`, `Z`, `u32::MAX`, or text without a
    /// leading number.
    pub fn incremented(&self) -> Result<Self, NoSuccessor> {
        match self {
            Self::Number(n) => n.checked_add(1).map(Self::Number).ok_or(NoSuccessor),
            Self::Text(text) => {
                let mut chars = text.chars();
                if let (Some(c), None) = (chars.next(), chars.next())
                    && c.is_ascii_alphabetic()
                {
                    if c == 'z' || c == 'Z' {
                        return Err(NoSuccessor);
                    }
                    return Ok(Self::Text(char::from(c as u8 + 1).to_string()));
                }

                let digits: String = text.chars().take_while(char::is_ascii_digit).collect();
                digits
                    .parse::<u32>()
                    .ok()
                    .and_then(|n| n.checked_add(1))
                    .map(Self::Number)
                    .ok_or(NoSuccessor)
            }
        }
    }

    /// Value with `suffix` appended to its text rendering.
    pub fn appended(&self, suffix: char) -> Self {
        let mut text = self.to_string();
        text.push(suffix);
        Self::Text(text)
    }
}

impl Default for CitationValue {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for CitationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(t) => f.write_str(t),
        }
    }
}

impl From<u32> for CitationValue {
    fn from(n: u32) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for CitationValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for CitationValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial() {
        assert!(CitationValue::initial().is_initial());
        assert!(CitationValue::default().is_initial());
        assert!(!CitationValue::from("1").is_initial());
    }

    #[test]
    fn test_increment_number() {
        assert_eq!(
            CitationValue::Number(41).incremented(),
            Ok(CitationValue::Number(42))
        );
        assert_eq!(
            CitationValue::Number(u32::MAX).incremented(),
            Ok(CitationValue::Number(u32::MAX))
        );
    }

    #[test]
    fn test_increment_letter() {
        assert_eq!(
            CitationValue::from("a").incremented(),
            Ok(CitationValue::from("b"))
        );
        assert_eq!(
            CitationValue::from("Y").incremented(),
            Ok(CitationValue::from("Z"))
        );
    }

    #[test]
    fn test_increment_past_z_unsupported() {
        assert_eq!(CitationValue::from("z").incremented(), Err(NoSuccessor));
        assert_eq!(CitationValue::from("Z").incremented(), Err(NoSuccessor));
    }

    #[test]
    fn test_increment_past_u32_max_unsupported() {
        assert_eq!(
            CitationValue::Number(u32::MAX).incremented(),
            Err(NoSuccessor)
        );
        assert_eq!(
            CitationValue::from("4294967295b").incremented(),
            Err(NoSuccessor)
        );
        assert_eq!(
            CitationValue::Number(u32::MAX - 1).incremented(),
            Ok(CitationValue::Number(u32::MAX))
        );
    }

    #[test]
    fn test_increment_numeric_text() {
        assert_eq!(
            CitationValue::from("12a").incremented(),
            Ok(CitationValue::Number(13))
        );
        assert_eq!(
            CitationValue::from("7").incremented(),
            Ok(CitationValue::Number(8))
        );
        assert_eq!(CitationValue::from("Prol").incremented(), Err(NoSuccessor));
        assert_eq!(CitationValue::from("").incremented(), Err(NoSuccessor));
    }

    #[test]
    fn test_appended() {
        assert_eq!(CitationValue::Number(4).appended('b'), CitationValue::from("4b"));
        assert_eq!(CitationValue::from("x").appended('y'), CitationValue::from("xy"));
    }

    #[test]
    fn test_display_and_as_number() {
        assert_eq!(CitationValue::Number(300).to_string(), "300");
        assert_eq!(CitationValue::from("12a").to_string(), "12a");
        assert_eq!(CitationValue::from("12").as_number(), Some(12));
        assert_eq!(CitationValue::from("12a").as_number(), None);
    }
}
