//! Render configuration.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::writer::Indent;

/// Settings for one render call.
///
/// Every field has a default, so an empty TOML table is a valid config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Preferred maximum line width. Lines only break at wrap points.
    pub column_limit: usize,
    pub indent: Indent,
    /// Extra indent levels for wrapped lines and statement continuations.
    pub continuation_indent: usize,
    /// Margin character for multi-line raw strings.
    pub margin: char,
    /// Caller-supplied aliases, canonical name to alias.
    pub aliases: IndexMap<String, String>,
    pub alias_policy: AliasPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            column_limit: 100,
            indent: Indent::default(),
            continuation_indent: 2,
            margin: '|',
            aliases: IndexMap::new(),
            alias_policy: AliasPolicy::default(),
        }
    }
}

impl RenderConfig {
    pub fn column_limit(mut self, column_limit: usize) -> Self {
        self.column_limit = column_limit;
        self
    }

    pub fn indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    /// Import `canonical_name` under `alias`.
    pub fn alias(mut self, canonical_name: impl Into<String>, alias: impl Into<String>) -> Self {
        self.aliases.insert(canonical_name.into(), alias.into());
        self
    }
}

/// How generated aliases are built when simple names collide.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AliasPolicy {
    /// Path segments ignored when building an alias.
    pub skip_segments: Vec<String>,
    /// Let the first colliding owner (in name order) keep its plain name.
    pub keep_first_plain: bool,
    /// Highest numeric suffix tried once path segments run out.
    pub max_suffix: usize,
}

impl Default for AliasPolicy {
    fn default() -> Self {
        Self {
            skip_segments: vec!["Companion".to_string()],
            keep_first_plain: false,
            max_suffix: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.column_limit, 100);
        assert_eq!(config.indent, Indent::Spaces(2));
        assert_eq!(config.continuation_indent, 2);
        assert_eq!(config.margin, '|');
        assert_eq!(config.alias_policy.skip_segments, ["Companion"]);
    }

    #[test]
    fn test_deserialize_partial_table() {
        let config: RenderConfig = toml::from_str(
            r##"
            column_limit = 80
            indent = "tab"
            margin = "#"

            [aliases]
            "java.sql.Date" = "SqlDate"
            "java.util.Date" = "UtilDate"

            [alias_policy]
            keep_first_plain = true
            "##,
        )
        .unwrap();
        assert_eq!(config.column_limit, 80);
        assert_eq!(config.indent, Indent::Tab);
        assert_eq!(config.margin, '#');
        assert_eq!(
            config.aliases.keys().collect::<Vec<_>>(),
            ["java.sql.Date", "java.util.Date"]
        );
        assert!(config.alias_policy.keep_first_plain);
        assert_eq!(config.alias_policy.max_suffix, 1000);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(toml::from_str::<RenderConfig>("colum_limit = 80").is_err());
    }
}
