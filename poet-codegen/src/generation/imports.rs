//! Import collection and alias resolution.
//!
//! The first render pass records every name that could be imported, grouped
//! by the simple name it would occupy in scope. [`resolve`] turns those groups
//! into an [`ImportTable`], generating aliases where owners collide.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use ktpoet_core::{
    Error, Result, capitalize, decapitalize, escape_as_alias, escape_if_necessary,
    escape_segments_if_necessary, is_keyword,
};
use serde::Serialize;

use crate::{
    config::AliasPolicy,
    names::{ClassName, MemberName},
};

/// One `import` line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Import {
    path: String,
    alias: Option<String>,
}

impl Import {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    pub fn aliased(path: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: Some(alias.into()),
        }
    }

    /// The imported canonical name.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The package or class the imported name lives in.
    pub fn parent(&self) -> &str {
        self.path.rsplit_once('.').map_or("", |(parent, _)| parent)
    }

    /// The import as written after `import `, with segments escaped.
    pub fn render(&self) -> Result<String> {
        let mut out = escape_segments_if_necessary(&self.path, '.')?;
        if let Some(alias) = &self.alias {
            out.push_str(" as ");
            out.push_str(&escape_if_necessary(alias)?);
        }
        Ok(out)
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if let Some(alias) = &self.alias {
            write!(f, " as {alias}")?;
        }
        Ok(())
    }
}

/// Names that may be imported, keyed by the simple name (or explicit alias)
/// they would occupy in scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Collected {
    pub types: BTreeMap<String, BTreeSet<ClassName>>,
    pub members: BTreeMap<String, BTreeSet<MemberName>>,
    /// Simple names already used unqualified, e.g. same-package types.
    pub referenced: BTreeSet<String>,
}

impl Collected {
    pub fn add_type(&mut self, in_scope: String, class: ClassName) {
        self.types.entry(in_scope).or_default().insert(class);
    }

    pub fn add_member(&mut self, in_scope: String, member: MemberName) {
        self.members.entry(in_scope).or_default().insert(member);
    }
}

/// The finished import decisions for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportTable {
    /// Canonical name to import.
    imports: BTreeMap<String, Import>,
    /// In-scope name to the class it refers to.
    #[serde(skip)]
    types: BTreeMap<String, ClassName>,
    /// In-scope name to the member it refers to.
    #[serde(skip)]
    members: BTreeMap<String, MemberName>,
}

impl ImportTable {
    /// A table holding only caller-requested imports, used while collecting.
    pub(crate) fn explicit(imports: impl IntoIterator<Item = Import>) -> Result<Self> {
        let mut table = Self::default();
        for import in imports {
            if import.path == "*" || import.path.ends_with(".*") {
                return Err(Error::unsupported_import(import.path));
            }
            table.imports.insert(import.path.clone(), import);
        }
        Ok(table)
    }

    /// The explicit import or alias for a canonical name.
    pub fn import(&self, canonical_name: &str) -> Option<&Import> {
        self.imports.get(canonical_name)
    }

    pub fn alias_of(&self, canonical_name: &str) -> Option<&str> {
        self.imports.get(canonical_name).and_then(Import::alias)
    }

    pub fn imported_type(&self, in_scope: &str) -> Option<&ClassName> {
        self.types.get(in_scope)
    }

    pub fn imported_member(&self, in_scope: &str) -> Option<&MemberName> {
        self.members.get(in_scope)
    }

    /// Every import, sorted by path then alias.
    pub fn imports(&self) -> Vec<&Import> {
        let mut imports: Vec<&Import> = self.imports.values().collect();
        imports.sort();
        imports
    }

    /// In-scope names and the classes they refer to.
    pub fn types(&self) -> impl Iterator<Item = (&str, &ClassName)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// In-scope names and the members they refer to.
    pub fn members(&self) -> impl Iterator<Item = (&str, &MemberName)> {
        self.members.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Turn collected names into final import decisions.
///
/// Groups are visited in name order. Within a group types come before
/// members, each in their own order, so the result depends only on the
/// collected sets, never on traversal order.
pub(crate) fn resolve(
    explicit: &ImportTable,
    collected: &Collected,
    policy: &AliasPolicy,
) -> Result<ImportTable> {
    let mut table = explicit.clone();

    let mut groups: BTreeMap<&String, Vec<Owner<'_>>> = BTreeMap::new();
    for (name, classes) in &collected.types {
        groups.entry(name).or_default().extend(classes.iter().map(Owner::Type));
    }
    for (name, members) in &collected.members {
        groups.entry(name).or_default().extend(members.iter().map(Owner::Member));
    }
    groups.retain(|name, _| !collected.referenced.contains(*name));

    // Names that groups, explicit imports and unqualified references already
    // occupy.
    let mut taken: BTreeSet<String> = collected.referenced.clone();
    taken.extend(groups.keys().map(|k| (*k).clone()));
    taken.extend(explicit.imports.values().map(|i| i.in_scope().to_string()));

    for (name, owners) in &groups {
        // A plain explicit import of something else holds the name.
        let claimed = explicit.imports.values().any(|i| {
            i.alias.is_none()
                && i.in_scope() == name.as_str()
                && !owners.iter().any(|o| o.canonical_name() == i.path)
        });
        let paths: BTreeSet<String> = owners.iter().map(Owner::canonical_name).collect();
        if !claimed && paths.len() == 1 {
            // One import covers a class and a member sharing a path.
            for owner in owners {
                table.record(name, owner, None);
            }
            continue;
        }

        tracing::debug!(
            name = %name,
            owners = ?paths,
            claimed,
            "simple name collision"
        );

        // The first owner the caller imported explicitly keeps the plain name.
        let keeper = if claimed {
            None
        } else {
            owners
                .iter()
                .position(|o| explicit.imports.contains_key(&o.canonical_name()))
                .or(policy.keep_first_plain.then_some(0))
        };
        let to_alias: Vec<&Owner<'_>> = owners
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != keeper)
            .map(|(_, o)| o)
            .collect();
        if let Some(i) = keeper {
            table.record(name, &owners[i], None);
        }

        for (owner, alias) in generate_aliases(name, &to_alias, policy, &taken)? {
            tracing::debug!(owner = %owner.canonical_name(), alias = %alias, "generated import alias");
            taken.insert(alias.clone());
            table.record(&alias, owner, Some(alias.clone()));
        }
    }

    table.check_conflicts()?;
    Ok(table)
}

#[derive(Debug, Clone, Copy)]
enum Owner<'a> {
    Type(&'a ClassName),
    Member(&'a MemberName),
}

impl Owner<'_> {
    fn canonical_name(&self) -> String {
        match self {
            Self::Type(class) => class.canonical_name(),
            Self::Member(member) => member.canonical_name(),
        }
    }
}

impl Import {
    /// The name this import brings into scope.
    fn in_scope(&self) -> &str {
        match &self.alias {
            Some(alias) => alias.as_str(),
            None => self
                .path
                .rsplit_once('.')
                .map_or(self.path.as_str(), |(_, name)| name),
        }
    }
}

impl ImportTable {
    fn record(&mut self, in_scope: &str, owner: &Owner<'_>, alias: Option<String>) {
        let path = owner.canonical_name();
        match alias {
            // Replaces a plain explicit import that would clash.
            Some(alias) => {
                self.imports.insert(path.clone(), Import::aliased(path, alias));
            }
            // Keeps an explicit alias.
            None => {
                self.imports
                    .entry(path.clone())
                    .or_insert_with(|| Import::new(path));
            }
        }
        match owner {
            Owner::Type(class) => {
                self.types.insert(in_scope.to_string(), (*class).clone());
            }
            Owner::Member(member) => {
                self.members.insert(in_scope.to_string(), (*member).clone());
            }
        }
    }

    /// Fail if two imports bring the same name into scope.
    fn check_conflicts(&self) -> Result<()> {
        let mut by_name: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for import in self.imports.values() {
            by_name.entry(import.in_scope()).or_default().push(&import.path);
        }
        match by_name.into_iter().find(|(_, paths)| paths.len() > 1) {
            Some((name, paths)) => Err(Error::conflicting_imports(name, paths)),
            None => Ok(()),
        }
    }
}

/// Build aliases for colliding owners from their path segments, nearest
/// segment first, using the same number of segments for every owner until
/// all aliases are distinct. Numeric suffixes take over when segments run out.
fn generate_aliases<'o, 'a>(
    simple_name: &str,
    owners: &[&'o Owner<'a>],
    policy: &AliasPolicy,
    taken: &BTreeSet<String>,
) -> Result<Vec<(&'o Owner<'a>, String)>> {
    if owners.is_empty() {
        return Ok(Vec::new());
    }

    let segments: Vec<Vec<String>> = owners
        .iter()
        .map(|owner| {
            let canonical = owner.canonical_name();
            let mut parts: Vec<&str> = canonical.split('.').collect();
            parts.pop();
            parts
                .into_iter()
                .filter(|s| !policy.skip_segments.iter().any(|skip| skip == s))
                .map(capitalize)
                .collect()
        })
        .collect();
    let max_segments = segments.iter().map(Vec::len).max().unwrap_or_default();

    // Members alias to lower camel case, types to upper.
    let candidate = |owner: &Owner<'_>, segments: &[String], count: usize| {
        let prefix = segments[segments.len() - count.min(segments.len())..].concat();
        let alias = format!("{prefix}{}", capitalize(simple_name));
        let alias = match owner {
            Owner::Member(_) => decapitalize(&alias),
            Owner::Type(_) => alias,
        };
        escape_as_alias(&alias)
    };
    let usable = |alias: &String| !taken.contains(alias) && !is_keyword(alias);

    for count in 1..=max_segments.max(1) {
        let aliases: Vec<String> = owners
            .iter()
            .zip(&segments)
            .map(|(owner, s)| candidate(*owner, s, count))
            .collect();
        let distinct: BTreeSet<&String> = aliases.iter().collect();
        if distinct.len() == aliases.len() && aliases.iter().all(usable) {
            return Ok(owners.iter().copied().zip(aliases).collect());
        }
    }

    // Segments exhausted: number the longest candidates in owner order.
    let mut assigned: BTreeSet<String> = BTreeSet::new();
    let mut out = Vec::with_capacity(owners.len());
    for (owner, segments) in owners.iter().zip(&segments) {
        let base = candidate(*owner, segments, max_segments);
        let alias = std::iter::once(base.clone())
            .chain((2..=policy.max_suffix).map(|n| format!("{base}{n}")))
            .find(|a| usable(a) && !assigned.contains(a))
            .ok_or_else(|| {
                Error::collision_exhausted(
                    simple_name,
                    owners.iter().map(|o| o.canonical_name()),
                )
            })?;
        assigned.insert(alias.clone());
        out.push((*owner, alias));
    }
    Ok(out)
}
