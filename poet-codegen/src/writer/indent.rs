//! Indentation configuration for rendered code.

use serde::Deserialize;

/// Indentation style for rendered code.
///
/// Deserializes from a width (`2`, `4`) or the string `"tab"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IndentRepr")]
pub enum Indent {
    /// Spaces with the specified width.
    Spaces(u8),
    /// Tab character.
    Tab,
}

impl Indent {
    /// 2-space indentation, the Kotlin convention used by default.
    pub const KOTLIN: Self = Self::Spaces(2);

    /// Tab indentation.
    pub const TAB: Self = Self::Tab;

    /// The string for one indent level.
    pub fn unit(&self) -> String {
        match self {
            Self::Spaces(width) => " ".repeat(usize::from(*width)),
            Self::Tab => "\t".to_string(),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::KOTLIN
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IndentRepr {
    Width(u8),
    Named(String),
}

impl TryFrom<IndentRepr> for Indent {
    type Error = String;

    fn try_from(repr: IndentRepr) -> Result<Self, Self::Error> {
        match repr {
            IndentRepr::Width(width) => Ok(Self::Spaces(width)),
            IndentRepr::Named(name) if name.eq_ignore_ascii_case("tab") => Ok(Self::Tab),
            IndentRepr::Named(name) => Err(format!(
                "invalid indent '{name}', expected a number of spaces or \"tab\""
            )),
        }
    }
}
