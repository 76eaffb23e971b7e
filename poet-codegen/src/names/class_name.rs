//! Qualified declaration names.

use std::{cmp::Ordering, fmt};

use ktpoet_core::{Error, Result};

use crate::spec::AnnotationSpec;

/// A fully-qualified class name: a package plus one or more nested simple names.
///
/// Nullability and type annotations are display metadata, but they take part
/// in equality so `Taco` and `Taco?` are distinct keys. Use [`ClassName::bare`]
/// to compare names only.
///
/// # Example
///
/// ```
/// use ktpoet_codegen::names::ClassName;
///
/// let entry = ClassName::new("kotlin.collections", ["Map", "Entry"]).unwrap();
/// assert_eq!(entry.canonical_name(), "kotlin.collections.Map.Entry");
/// assert_eq!(entry.simple_name(), "Entry");
/// assert_eq!(entry.top_level().simple_name(), "Map");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassName {
    package: String,
    simple_names: Vec<String>,
    nullable: bool,
    annotations: Vec<AnnotationSpec>,
}

impl ClassName {
    /// Create a class name from a package and its nested simple names.
    pub fn new(
        package: impl Into<String>,
        simple_names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        let package = package.into();
        let simple_names: Vec<String> = simple_names.into_iter().map(Into::into).collect();
        let canonical = || {
            let mut segments = vec![package.clone()];
            segments.extend(simple_names.iter().cloned());
            segments.join(".")
        };

        if simple_names.is_empty() {
            return Err(Error::invalid_name(
                canonical(),
                "a class name needs at least one simple name",
            ));
        }
        if simple_names.iter().any(String::is_empty) {
            return Err(Error::invalid_name(canonical(), "simple names cannot be empty"));
        }
        if !package.is_empty() && package.split('.').any(str::is_empty) {
            return Err(Error::invalid_name(
                canonical(),
                "package segments cannot be empty",
            ));
        }

        Ok(Self {
            package,
            simple_names,
            nullable: false,
            annotations: Vec::new(),
        })
    }

    /// Guess a class name from a dotted string.
    ///
    /// Leading lowercase segments form the package; the first segment that
    /// starts with an uppercase letter begins the simple names.
    pub fn best_guess(name: &str) -> Result<Self> {
        let segments: Vec<&str> = name.split('.').collect();
        let Some(first_class) = segments
            .iter()
            .position(|s| s.chars().next().is_some_and(char::is_uppercase))
        else {
            return Err(Error::invalid_name(
                name,
                "couldn't guess a class name: no segment starts with an uppercase letter",
            ));
        };
        Self::new(
            segments[..first_class].join("."),
            segments[first_class..].iter().copied(),
        )
    }

    /// The package, empty for the default package.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The innermost simple name.
    pub fn simple_name(&self) -> &str {
        self.simple_names.last().map(String::as_str).unwrap_or_default()
    }

    /// All simple names from outermost to innermost.
    pub fn simple_names(&self) -> &[String] {
        &self.simple_names
    }

    /// Package and simple names joined with dots.
    pub fn canonical_name(&self) -> String {
        self.segments().collect::<Vec<_>>().join(".")
    }

    /// Package segments followed by the simple names.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.package
            .split('.')
            .filter(|s| !s.is_empty())
            .chain(self.simple_names.iter().map(String::as_str))
    }

    /// A class nested inside this one.
    pub fn nested(&self, name: impl Into<String>) -> Result<Self> {
        let mut simple_names = self.simple_names.clone();
        simple_names.push(name.into());
        Self::new(self.package.clone(), simple_names)
    }

    /// A class with the same enclosing class (or package) as this one.
    pub fn peer(&self, name: impl Into<String>) -> Result<Self> {
        let mut simple_names = self.simple_names.clone();
        simple_names.pop();
        simple_names.push(name.into());
        Self::new(self.package.clone(), simple_names)
    }

    /// The enclosing class, or `None` for a top-level class.
    pub fn enclosing(&self) -> Option<Self> {
        if self.simple_names.len() == 1 {
            return None;
        }
        Some(Self {
            package: self.package.clone(),
            simple_names: self.simple_names[..self.simple_names.len() - 1].to_vec(),
            nullable: false,
            annotations: Vec::new(),
        })
    }

    /// The outermost class that contains this one.
    pub fn top_level(&self) -> Self {
        Self {
            package: self.package.clone(),
            simple_names: self.simple_names[..1].to_vec(),
            nullable: false,
            annotations: Vec::new(),
        }
    }

    /// This name stripped of nullability and annotations.
    pub fn bare(&self) -> Self {
        Self {
            package: self.package.clone(),
            simple_names: self.simple_names.clone(),
            nullable: false,
            annotations: Vec::new(),
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Copy with a different nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn annotations(&self) -> &[AnnotationSpec] {
        &self.annotations
    }

    /// Copy with the given type annotations appended.
    pub fn annotated(mut self, annotations: impl IntoIterator<Item = AnnotationSpec>) -> Self {
        self.annotations.extend(annotations);
        self
    }

    /// Copy with all type annotations removed.
    pub fn without_annotations(mut self) -> Self {
        self.annotations.clear();
        self
    }
}

impl PartialOrd for ClassName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClassName {
    /// Segment by segment, then shorter package first, then unannotated
    /// before annotated, then non-null before nullable.
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments()
            .cmp(other.segments())
            .then_with(|| self.package.cmp(&other.package))
            .then_with(|| self.simple_names.cmp(&other.simple_names))
            .then_with(|| {
                (!self.annotations.is_empty()).cmp(&!other.annotations.is_empty())
            })
            .then_with(|| self.nullable.cmp(&other.nullable))
            .then_with(|| self.annotations.cmp(&other.annotations))
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_name())?;
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(package: &str, names: &[&str]) -> ClassName {
        ClassName::new(package, names.iter().copied()).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_segments() {
        assert!(ClassName::new("com.example", Vec::<String>::new()).is_err());
        assert!(ClassName::new("com.example", ["Taco", ""]).is_err());
        assert!(ClassName::new("com..example", ["Taco"]).is_err());
        let err = ClassName::new("com.example", [""]).unwrap_err();
        assert!(matches!(*err, Error::InvalidName { .. }));
    }

    #[test]
    fn test_default_package() {
        let taco = class("", &["Taco"]);
        assert_eq!(taco.canonical_name(), "Taco");
        assert_eq!(taco.package(), "");
    }

    #[test]
    fn test_best_guess() {
        let entry = ClassName::best_guess("kotlin.collections.Map.Entry").unwrap();
        assert_eq!(entry.package(), "kotlin.collections");
        assert_eq!(entry.simple_names(), ["Map", "Entry"]);
        assert!(ClassName::best_guess("kotlin.collections").is_err());
    }

    #[test]
    fn test_nesting() {
        let map = class("kotlin.collections", &["Map"]);
        let entry = map.nested("Entry").unwrap();
        assert_eq!(entry.enclosing(), Some(map.clone()));
        assert_eq!(entry.top_level(), map);
        assert_eq!(
            entry.peer("Key").unwrap().canonical_name(),
            "kotlin.collections.Map.Key"
        );
        assert_eq!(map.enclosing(), None);
    }

    #[test]
    fn test_nullability_participates_in_equality() {
        let taco = class("com.squareup.tacos", &["Taco"]);
        let nullable = taco.clone().with_nullable(true);
        assert_ne!(taco, nullable);
        assert_eq!(taco, nullable.bare());
        assert_eq!(nullable.to_string(), "com.squareup.tacos.Taco?");
    }

    #[test]
    fn test_ordering_is_segment_based() {
        let mut names = vec![
            class("com.twitter.tacos", &["Taco"]),
            class("com.squareup.tacos", &["Taco"]).with_nullable(true),
            class("com.squareup.tacos", &["Taco"]),
            class("com.squareup", &["Tacos"]),
        ];
        names.sort();
        let rendered: Vec<String> = names.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            [
                "com.squareup.Tacos",
                "com.squareup.tacos.Taco",
                "com.squareup.tacos.Taco?",
                "com.twitter.tacos.Taco",
            ]
        );
    }

    #[test]
    fn test_ordering_agrees_with_equality() {
        let nested = class("com", &["a", "B"]);
        let packaged = class("com.a", &["B"]);
        assert_eq!(nested.canonical_name(), packaged.canonical_name());
        assert_ne!(nested, packaged);
        assert_eq!(nested.cmp(&packaged), Ordering::Less);

        let set: std::collections::BTreeSet<ClassName> = [nested, packaged].into();
        assert_eq!(set.len(), 2);
    }
}
