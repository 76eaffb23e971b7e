//! Shared string helpers.

/// Uppercase the first character (e.g., "tacos" -> "Tacos")
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

/// Lowercase the first character (e.g., "SquareupTacos" -> "squareupTacos")
pub fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("tacos"), "Tacos");
        assert_eq!(capitalize("Tacos"), "Tacos");
        assert_eq!(capitalize("$foo"), "$foo");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_decapitalize() {
        assert_eq!(decapitalize("SquareupTacos"), "squareupTacos");
        assert_eq!(decapitalize("x"), "x");
        assert_eq!(decapitalize(""), "");
    }
}
