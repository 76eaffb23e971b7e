//! Type expressions as written in manifests.
//!
//! ```text
//! type     := "*" | ("out" | "in") type | name args? "?"?
//! name     := ident ("." ident)*
//! args     := "<" type ("," type)* ">"
//! ```
//!
//! A single-segment name that matches a type variable in scope is that
//! variable; every other name must be a qualified class name.

use std::collections::BTreeSet;

use ktpoet_codegen::names::{ClassName, TypeName, TypeVariableName, Variance, WildcardTypeName};

/// Parse a type reference. The error is the reason, without the expression.
pub(crate) fn parse_type(expression: &str, variables: &BTreeSet<String>) -> Result<TypeName, String> {
    let mut parser = Parser::new(expression, variables);
    let type_name = parser.parse_type()?;
    parser.expect_end()?;
    Ok(type_name)
}

/// Parse a type variable declaration: `T`, `out T`, `reified T` or
/// `T : Bound, OtherBound`. Bounds may refer to `variables`.
pub(crate) fn parse_type_variable(
    declaration: &str,
    variables: &BTreeSet<String>,
) -> Result<TypeVariableName, String> {
    let mut parser = Parser::new(declaration, variables);
    let mut variance = None;
    let mut reified = false;
    let name = loop {
        let word = parser.identifier()?;
        match word.as_str() {
            "in" if variance.is_none() => variance = Some(Variance::In),
            "out" if variance.is_none() => variance = Some(Variance::Out),
            "reified" if !reified => reified = true,
            _ => break word,
        }
    };

    let mut variable = TypeVariableName::new(name);
    if let Some(variance) = variance {
        variable = variable.variance(variance);
    }
    if reified {
        variable = variable.reified();
    }
    if parser.eat(':') {
        loop {
            variable = variable.bound(parser.parse_type()?);
            if !parser.eat(',') {
                break;
            }
        }
    }
    parser.expect_end()?;
    Ok(variable)
}

/// The name a type variable declaration introduces.
pub(crate) fn declared_name(declaration: &str) -> Option<&str> {
    declaration
        .split(':')
        .next()?
        .split_whitespace()
        .find(|word| !matches!(*word, "in" | "out" | "reified"))
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    variables: &'a BTreeSet<String>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, variables: &'a BTreeSet<String>) -> Self {
        Self {
            input,
            pos: 0,
            variables,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.rest().chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect_end(&mut self) -> Result<(), String> {
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(format!("unexpected '{c}' at offset {}", self.pos)),
        }
    }

    fn identifier(&mut self) -> Result<String, String> {
        self.skip_whitespace();
        let len = self
            .rest()
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(self.rest().len());
        if len == 0 {
            return Err(match self.rest().chars().next() {
                Some(c) => format!("expected a name, found '{c}'"),
                None => "expected a name".to_string(),
            });
        }
        let identifier = self.rest()[..len].to_string();
        self.pos += len;
        Ok(identifier)
    }

    fn parse_type(&mut self) -> Result<TypeName, String> {
        if self.eat('*') {
            return Ok(WildcardTypeName::star().into());
        }

        let start = self.pos;
        let first = self.identifier()?;
        // `out`/`in` only project when another type follows.
        if matches!(first.as_str(), "out" | "in")
            && self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '*')
        {
            let bound = self.parse_type()?;
            return Ok(if first == "out" {
                WildcardTypeName::producer_of(bound).into()
            } else {
                WildcardTypeName::consumer_of(bound).into()
            });
        }
        self.pos = start;

        let mut segments = vec![self.identifier()?];
        while self.eat('.') {
            segments.push(self.identifier()?);
        }

        let mut arguments = Vec::new();
        if self.eat('<') {
            loop {
                arguments.push(self.parse_type()?);
                if self.eat('>') {
                    break;
                }
                if !self.eat(',') {
                    return Err("expected ',' or '>' in type arguments".to_string());
                }
            }
        }
        let nullable = self.eat('?');

        let type_name = match segments.as_slice() {
            [name] if self.variables.contains(name) => {
                if !arguments.is_empty() {
                    return Err(format!("type variable {name} cannot have type arguments"));
                }
                TypeName::from(TypeVariableName::new(name.clone()))
            }
            [name] => {
                return Err(format!(
                    "{name} is not a declared type variable; classes need their package"
                ));
            }
            _ => {
                let class = ClassName::best_guess(&segments.join(".")).map_err(|e| e.to_string())?;
                if arguments.is_empty() {
                    TypeName::from(class)
                } else {
                    class.parameterized_by(arguments)
                }
            }
        };
        Ok(type_name.with_nullable(nullable))
    }
}

#[cfg(test)]
mod tests {
    use ktpoet_codegen::names::kotlin;

    use super::*;

    fn parse(expression: &str) -> TypeName {
        parse_type(expression, &BTreeSet::new()).unwrap()
    }

    #[test]
    fn test_simple_class() {
        assert_eq!(parse("kotlin.String"), TypeName::from(kotlin::string()));
        assert_eq!(
            parse("kotlin.String?"),
            TypeName::from(kotlin::string()).with_nullable(true)
        );
    }

    #[test]
    fn test_nested_class() {
        let entry = ClassName::new("kotlin.collections", ["Map", "Entry"]).unwrap();
        assert_eq!(parse("kotlin.collections.Map.Entry"), TypeName::from(entry));
    }

    #[test]
    fn test_generic_arguments() {
        let expected = kotlin::map().parameterized_by([
            TypeName::from(kotlin::string()),
            kotlin::list().parameterized_by([WildcardTypeName::producer_of(kotlin::int()).into()]),
        ]);
        assert_eq!(
            parse("kotlin.collections.Map<kotlin.String, kotlin.collections.List<out kotlin.Int>>"),
            expected
        );
        assert_eq!(
            parse("kotlin.collections.List<*>"),
            kotlin::list().parameterized_by([WildcardTypeName::star().into()])
        );
    }

    #[test]
    fn test_type_variables_in_scope() {
        let scope: BTreeSet<String> = ["T".to_string()].into();
        assert_eq!(
            parse_type("T?", &scope).unwrap(),
            TypeName::from(TypeVariableName::new("T")).with_nullable(true)
        );
        assert_eq!(
            parse_type("T", &BTreeSet::new()).unwrap_err(),
            "T is not a declared type variable; classes need their package"
        );
        assert!(parse_type("kotlin.collections.List<T>", &BTreeSet::new()).is_err());
    }

    #[test]
    fn test_rejects_malformed_expressions() {
        assert!(parse_type("kotlin.collections.List<kotlin.Int", &BTreeSet::new()).is_err());
        assert!(parse_type("kotlin.String kotlin.Int", &BTreeSet::new()).is_err());
        assert!(parse_type("com.example.lower", &BTreeSet::new()).is_err());
        assert!(parse_type("", &BTreeSet::new()).is_err());
    }

    #[test]
    fn test_type_variable_declarations() {
        let scope: BTreeSet<String> = ["T".to_string()].into();
        let variable = parse_type_variable("out T : kotlin.Comparable<T>", &scope).unwrap();
        assert_eq!(variable.name, "T");
        assert_eq!(variable.variance, Some(Variance::Out));
        assert_eq!(
            variable.bounds,
            [kotlin::comparable().parameterized_by([TypeVariableName::new("T").into()])]
        );

        let reified = parse_type_variable("reified R", &BTreeSet::new()).unwrap();
        assert!(reified.reified);
        assert_eq!(declared_name("out T : kotlin.Number"), Some("T"));
    }
}
