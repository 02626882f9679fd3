//! Type lookup for placeholder type tokens.
//!
//! The generator never talks to a compiler directly. Hosts implement
//! [`SymbolLookup`] over whatever they know about the compilation, and the
//! core asks it for every visible symbol with a given name.
//! [`SymbolTable`] is the in-memory implementation used by the Rust host
//! and by tests.

use std::collections::HashMap;
use std::fmt;

use crate::error::BindError;

/// A resolved type, identified by its short and fully qualified names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    name: String,
    qualified: String,
}

impl TypeRef {
    /// Creates an empty value.
    pub fn new(name: impl Into<String>, qualified: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualified: qualified.into(),
        }
    }

    /// Simple name, e.g. `User`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path, e.g. `crate::model::User`.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified)
    }
}

/// Whether a symbol names a type or a namespace.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// Names a type.
    Type,
    /// Names a module or namespace.
    Namespace,
}

/// A named entity visible at some location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    kind: SymbolKind,
    target: TypeRef,
}

impl Symbol {
    /// A type visible as `name`, defined at `qualified`.
    pub fn ty(name: impl Into<String>, qualified: impl Into<String>) -> Self {
        Self {
            kind: SymbolKind::Type,
            target: TypeRef::new(name, qualified),
        }
    }

    /// A namespace (module) visible as `name`.
    pub fn namespace(name: impl Into<String>, qualified: impl Into<String>) -> Self {
        Self {
            kind: SymbolKind::Namespace,
            target: TypeRef::new(name, qualified),
        }
    }

    /// Whether this is a type or a namespace.
    #[must_use]
    pub const fn kind(&self) -> SymbolKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.target.name()
    }

    #[must_use]
    pub fn qualified_name(&self) -> &str {
        self.target.qualified_name()
    }
}

/// Where a lookup happens: the enclosing namespace and the chain of
/// enclosing types, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    namespace: String,
    nesting: Vec<String>,
}

impl Location {
    /// Creates an empty value.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            nesting: Vec::new(),
        }
    }

    /// Sets the enclosing types, outermost first.
    #[must_use]
    pub fn with_nesting(mut self, nesting: Vec<String>) -> Self {
        self.nesting = nesting;
        self
    }

    /// Namespace path, e.g. `crate::app`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Enclosing types, outermost first.
    #[must_use]
    pub fn nesting(&self) -> &[String] {
        &self.nesting
    }
}

/// Symbol lookup over a compilation.
#[allow(clippy::module_name_repetitions)]
pub trait SymbolLookup: Sync {
    /// Every namespace or type named `name` that is visible at `location`.
    fn lookup(&self, location: &Location, name: &str) -> Vec<Symbol>;
}

/// Resolves `token` to the one type it names at `location`.
///
/// Candidates that are namespaces are ignored, and candidates that point at
/// the same qualified type count once.
///
/// # Errors
///
/// Returns [`BindError::AmbiguousOrUnresolvedType`] unless exactly one type
/// matches.
pub fn resolve_single_type(
    lookup: &dyn SymbolLookup,
    location: &Location,
    token: &str,
) -> Result<TypeRef, BindError> {
    let mut candidates: Vec<TypeRef> = Vec::new();
    for symbol in lookup.lookup(location, token) {
        if symbol.kind == SymbolKind::Type
            && !candidates
                .iter()
                .any(|c| c.qualified_name() == symbol.qualified_name())
        {
            candidates.push(symbol.target);
        }
    }

    if candidates.len() != 1 {
        return Err(BindError::AmbiguousOrUnresolvedType {
            token: token.to_owned(),
            candidates: candidates.len(),
        });
    }
    Ok(candidates.remove(0))
}

/// An in-memory symbol table with global symbols visible everywhere and
/// symbols scoped to a single namespace.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    global: Vec<Symbol>,
    scoped: HashMap<String, Vec<Symbol>>,
}

impl SymbolTable {
    /// Creates an empty value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a symbol visible in every namespace.
    pub fn add_global(&mut self, symbol: Symbol) {
        self.global.push(symbol);
    }

    /// Adds a symbol visible only in `namespace`.
    pub fn add(&mut self, namespace: &str, symbol: Symbol) {
        self.scoped
            .entry(namespace.to_owned())
            .or_default()
            .push(symbol);
    }

    /// Symbols registered for `namespace`, not counting globals.
    #[must_use]
    pub fn scope(&self, namespace: &str) -> &[Symbol] {
        self.scoped.get(namespace).map_or(&[][..], Vec::as_slice)
    }
}

impl SymbolLookup for SymbolTable {
    fn lookup(&self, location: &Location, name: &str) -> Vec<Symbol> {
        self.global
            .iter()
            .chain(self.scope(location.namespace()))
            .filter(|symbol| symbol.name() == name)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SymbolTable {
        let mut table = SymbolTable::new();
        table.add_global(Symbol::ty("int", "System.Int32"));
        table.add("App", Symbol::ty("Foo", "App.Foo"));
        table.add("App", Symbol::ty("Foo", "Vendor.Foo"));
        table.add("App", Symbol::ty("Bar", "App.Bar"));
        table.add("App", Symbol::ty("Bar", "App.Bar"));
        table.add("App", Symbol::namespace("Baz", "App.Baz"));
        table.add("Other", Symbol::ty("Baz", "Other.Baz"));
        table
    }

    #[test]
    fn resolves_exactly_one_candidate() {
        let resolved = resolve_single_type(&table(), &Location::new("App"), "int")
            .expect("int is visible");
        assert_eq!(resolved, TypeRef::new("int", "System.Int32"));
        assert_eq!(resolved.to_string(), "System.Int32");
    }

    #[test]
    fn rejects_two_distinct_types() {
        assert_eq!(
            resolve_single_type(&table(), &Location::new("App"), "Foo"),
            Err(BindError::AmbiguousOrUnresolvedType {
                token: "Foo".into(),
                candidates: 2
            })
        );
    }

    #[test]
    fn same_type_seen_twice_is_one_candidate() {
        let resolved = resolve_single_type(&table(), &Location::new("App"), "Bar")
            .expect("Bar is visible");
        assert_eq!(resolved.qualified_name(), "App.Bar");
    }

    #[test]
    fn ignores_namespaces_and_other_scopes() {
        assert_eq!(
            resolve_single_type(&table(), &Location::new("App"), "Baz"),
            Err(BindError::AmbiguousOrUnresolvedType {
                token: "Baz".into(),
                candidates: 0
            })
        );
        assert!(resolve_single_type(&table(), &Location::new("Other"), "Baz").is_ok());
    }
}
