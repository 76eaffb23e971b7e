use std::fmt;

use ktpoet_core::{Error, Result};

use super::ClassName;

/// A top-level or class-scoped member (function or property) that can be imported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberName {
    package: String,
    enclosing: Option<ClassName>,
    simple_name: String,
    is_extension: bool,
}

impl MemberName {
    /// A top-level member in `package`.
    pub fn new(package: impl Into<String>, simple_name: impl Into<String>) -> Result<Self> {
        let package = package.into();
        let simple_name = simple_name.into();
        if simple_name.is_empty() {
            return Err(Error::invalid_name(package, "member name cannot be empty"));
        }
        Ok(Self {
            package,
            enclosing: None,
            simple_name,
            is_extension: false,
        })
    }

    /// A member declared inside `enclosing`, such as a companion function.
    pub fn in_class(enclosing: ClassName, simple_name: impl Into<String>) -> Result<Self> {
        let simple_name = simple_name.into();
        if simple_name.is_empty() {
            return Err(Error::invalid_name(
                enclosing.canonical_name(),
                "member name cannot be empty",
            ));
        }
        Ok(Self {
            package: enclosing.package().to_string(),
            enclosing: Some(enclosing.bare()),
            simple_name,
            is_extension: false,
        })
    }

    /// Guess a member from a dotted string (`kotlin.collections.listOf`,
    /// `com.example.Taco.Companion.create`).
    pub fn best_guess(name: &str) -> Result<Self> {
        let Some((owner, simple_name)) = name.rsplit_once('.') else {
            return Self::new("", name);
        };
        let has_class = owner
            .split('.')
            .any(|s| s.chars().next().is_some_and(char::is_uppercase));
        if has_class {
            Self::in_class(ClassName::best_guess(owner)?, simple_name)
        } else {
            Self::new(owner, simple_name)
        }
    }

    /// Mark as an extension member. Extensions stay importable even when the
    /// current type declares a function of the same name.
    pub fn extension(mut self) -> Self {
        self.is_extension = true;
        self
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn enclosing(&self) -> Option<&ClassName> {
        self.enclosing.as_ref()
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn is_extension(&self) -> bool {
        self.is_extension
    }

    pub fn canonical_name(&self) -> String {
        match &self.enclosing {
            Some(class) => format!("{}.{}", class.canonical_name(), self.simple_name),
            None if self.package.is_empty() => self.simple_name.clone(),
            None => format!("{}.{}", self.package, self.simple_name),
        }
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}
