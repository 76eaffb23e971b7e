//! Collision-free names for generated locals.

use std::collections::{BTreeSet, HashMap};

use ktpoet_core::{Error, KEYWORDS, Result, is_identifier_part, is_identifier_start};

/// Hands out identifiers that are legal, not keywords and unique within the
/// allocator, remembering each one under a caller-chosen tag.
///
/// ```
/// use ktpoet_codegen::generation::NameAllocator;
///
/// let mut names = NameAllocator::new();
/// assert_eq!(names.new_name("when", "branch").unwrap(), "when_");
/// assert_eq!(names.new_name("1st place", "first").unwrap(), "_1st_place");
/// assert_eq!(names.get("branch").unwrap(), "when_");
/// ```
#[derive(Debug, Clone)]
pub struct NameAllocator {
    allocated: BTreeSet<String>,
    by_tag: HashMap<String, String>,
}

impl Default for NameAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl NameAllocator {
    /// An allocator with every Kotlin keyword already taken.
    pub fn new() -> Self {
        Self {
            allocated: KEYWORDS.iter().map(|k| k.to_string()).collect(),
            by_tag: HashMap::new(),
        }
    }

    /// An allocator that treats keywords like any other name.
    pub fn without_keywords() -> Self {
        Self {
            allocated: BTreeSet::new(),
            by_tag: HashMap::new(),
        }
    }

    /// Allocate a name based on `suggestion` and record it under `tag`.
    pub fn new_name(&mut self, suggestion: &str, tag: impl Into<String>) -> Result<String> {
        let tag = tag.into();
        if let Some(existing) = self.by_tag.get(&tag) {
            return Err(Error::invalid_spec(format!(
                "tag '{tag}' is already used for '{existing}'"
            )));
        }

        let mut name = to_identifier(suggestion);
        while self.allocated.contains(&name) {
            name.push('_');
        }
        self.allocated.insert(name.clone());
        self.by_tag.insert(tag, name.clone());
        Ok(name)
    }

    /// The name allocated under `tag`.
    pub fn get(&self, tag: &str) -> Result<&str> {
        self.by_tag
            .get(tag)
            .map(String::as_str)
            .ok_or_else(|| Error::invalid_spec(format!("unknown tag: {tag}")))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    /// An independent copy for a nested scope.
    pub fn copy(&self) -> Self {
        self.clone()
    }
}

fn to_identifier(suggestion: &str) -> String {
    let mut out = String::with_capacity(suggestion.len() + 1);
    for (i, c) in suggestion.chars().enumerate() {
        if i == 0 && !is_identifier_start(c) && is_identifier_part(c) {
            out.push('_');
        }
        out.push(if is_identifier_part(c) && c != '$' { c } else { '_' });
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collisions_get_underscores() {
        let mut names = NameAllocator::new();
        assert_eq!(names.new_name("foo", "a").unwrap(), "foo");
        assert_eq!(names.new_name("foo", "b").unwrap(), "foo_");
        assert_eq!(names.new_name("foo", "c").unwrap(), "foo__");
    }

    #[test]
    fn test_illegal_characters() {
        let mut names = NameAllocator::new();
        assert_eq!(names.new_name("a-b", "dash").unwrap(), "a_b");
        assert_eq!(names.new_name("1ab", "digit").unwrap(), "_1ab");
        assert_eq!(names.new_name("a$b", "dollar").unwrap(), "a_b_");
    }

    #[test]
    fn test_keywords() {
        let mut names = NameAllocator::new();
        assert_eq!(names.new_name("fun", "f").unwrap(), "fun_");

        let mut plain = NameAllocator::without_keywords();
        assert_eq!(plain.new_name("fun", "f").unwrap(), "fun");
    }

    #[test]
    fn test_tags() {
        let mut names = NameAllocator::new();
        names.new_name("sb", "string builder").unwrap();
        assert_eq!(names.get("string builder").unwrap(), "sb");
        assert!(names.contains("string builder"));

        let err = names.get("missing").unwrap_err();
        assert_eq!(err.to_string(), "unknown tag: missing");

        let err = names.new_name("other", "string builder").unwrap_err();
        assert!(matches!(*err, Error::InvalidSpec { .. }));
        // The failed call allocates nothing.
        assert_eq!(names.new_name("other", "o").unwrap(), "other");
    }

    #[test]
    fn test_copy_is_independent() {
        let mut outer = NameAllocator::new();
        outer.new_name("x", "x").unwrap();
        let mut inner = outer.copy();
        assert_eq!(inner.new_name("x", "inner x").unwrap(), "x_");
        assert!(!outer.contains("inner x"));
        assert_eq!(outer.new_name("y", "y").unwrap(), "y");
    }
}
