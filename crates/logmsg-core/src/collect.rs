//! Collects annotated type declarations.
//!
//! Hosts describe each candidate declaration with a [`Declaration`]: its
//! name, modifiers, the scopes enclosing it and the attributes attached to
//! it. The [`Collector`] keeps the declarations that carry at least one
//! logger message attribute that binds.

use log::{debug, warn};

use crate::binder::{bind, Argument, AttributeBinding};
use crate::cancel::CancellationToken;
use crate::error::{Cancelled, CollectError, Diagnostic, DiagnosticKind};
use crate::event_id::EventId;
use crate::symbol::{Location, SymbolLookup};

/// A scope enclosing a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// A namespace, by its full path.
    Namespace(String),
    /// An enclosing type, by name.
    Type(String),
    /// Any other construct, named by its kind (e.g. `fn`).
    Other(String),
}

/// An attribute attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSyntax {
    /// Fully qualified name of the attribute as resolved by the host.
    pub name: String,
    /// Arguments as written.
    pub arguments: Vec<Argument>,
}

/// A candidate type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Type name.
    pub name: String,
    /// Visibility as written, e.g. `pub(crate)`.
    pub modifiers: String,
    /// Innermost scope first.
    pub enclosing: Vec<Scope>,
    /// Every attribute on the type, in source order.
    pub attributes: Vec<AttributeSyntax>,
}

/// A declaration with at least one bound logger message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedDeclaration {
    namespace: String,
    nesting: Vec<String>,
    modifiers: String,
    type_name: String,
    attributes: Vec<AttributeBinding>,
}

impl AnnotatedDeclaration {
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

    /// Visibility as written.
    #[must_use]
    pub fn modifiers(&self) -> &str {
        &self.modifiers
    }

    /// Name of the annotated type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Bound attributes in source order. Never empty.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeBinding] {
        &self.attributes
    }
}

/// Result of a collection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    /// Collected declarations; their index is the declaration ordinal.
    pub declarations: Vec<AnnotatedDeclaration>,
    /// Why bindings or declarations were skipped.
    pub diagnostics: Vec<Diagnostic>,
}

impl Collection {
    /// Every message with its event id, where the declaration ordinal is the
    /// declaration's index in this collection.
    pub fn messages(
        &self,
    ) -> impl Iterator<Item = (&AnnotatedDeclaration, &AttributeBinding, EventId)> {
        self.declarations
            .iter()
            .enumerate()
            .flat_map(|(ordinal, declaration)| {
                declaration.attributes.iter().enumerate().map(move |(index, binding)| {
                    (declaration, binding, binding.event_id(ordinal, index))
                })
            })
    }
}

/// Finds the namespace and the enclosing types of a declaration.
fn hierarchy(declaration: &Declaration) -> Result<(String, Vec<String>), CollectError> {
    let mut nesting = Vec::new();
    for scope in &declaration.enclosing {
        match scope {
            Scope::Type(name) => nesting.push(name.clone()),
            Scope::Namespace(namespace) => {
                nesting.reverse();
                return Ok((namespace.clone(), nesting));
            }
            Scope::Other(kind) => {
                return Err(CollectError::DisallowedScope {
                    declaration: declaration.name.clone(),
                    scope: kind.clone(),
                });
            }
        }
    }
    Err(CollectError::MissingEnclosingNamespace {
        declaration: declaration.name.clone(),
    })
}

/// Binds the logger messages of candidate declarations.
pub struct Collector<'a> {
    lookup: &'a dyn SymbolLookup,
    attribute: &'a str,
    cancellation: Option<&'a CancellationToken>,
}

impl<'a> Collector<'a> {
    /// A collector for attributes whose qualified name is `attribute`.
    pub fn new(lookup: &'a dyn SymbolLookup, attribute: &'a str) -> Self {
        Self {
            lookup,
            attribute,
            cancellation: None,
        }
    }

    /// Checks `token` before each declaration.
    #[must_use]
    pub const fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Collects one declaration. Dropped bindings and structural problems are
    /// pushed to `diagnostics`; neither stops the caller from moving on.
    pub fn collect(
        &self,
        declaration: &Declaration,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<AnnotatedDeclaration> {
        let matching: Vec<_> = declaration
            .attributes
            .iter()
            .filter(|attribute| attribute.name == self.attribute)
            .collect();
        if matching.is_empty() {
            return None;
        }

        let (namespace, nesting) = match hierarchy(declaration) {
            Ok(found) => found,
            Err(error) => {
                warn!("{error}");
                diagnostics.push(Diagnostic {
                    declaration: declaration.name.clone(),
                    kind: DiagnosticKind::Declaration(error),
                });
                return None;
            }
        };

        let location = Location::new(namespace.clone()).with_nesting(nesting.clone());
        let mut attributes = Vec::with_capacity(matching.len());
        for (index, attribute) in matching.into_iter().enumerate() {
            match bind(&attribute.arguments, self.lookup, &location) {
                Ok(binding) => attributes.push(binding),
                Err(error) => {
                    let diagnostic = Diagnostic {
                        declaration: declaration.name.clone(),
                        kind: DiagnosticKind::Binding {
                            attribute: index,
                            error,
                        },
                    };
                    warn!("{diagnostic}");
                    diagnostics.push(diagnostic);
                }
            }
        }

        if attributes.is_empty() {
            return None;
        }

        debug!(
            "Collected {} logger message(s) on {namespace}::{}",
            attributes.len(),
            declaration.name
        );
        Some(AnnotatedDeclaration {
            namespace,
            nesting,
            modifiers: declaration.modifiers.clone(),
            type_name: declaration.name.clone(),
            attributes,
        })
    }

    /// Collects every declaration, in order.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if the token fires; nothing collected so far is
    /// returned in that case.
    pub fn collect_all<'d, I>(&self, declarations: I) -> Result<Collection, Cancelled>
    where
        I: IntoIterator<Item = &'d Declaration>,
    {
        let mut collection = Collection::default();
        for declaration in declarations {
            if let Some(token) = self.cancellation {
                token.check()?;
            }
            if let Some(annotated) = self.collect(declaration, &mut collection.diagnostics) {
                collection.declarations.push(annotated);
            }
        }
        Ok(collection)
    }
}
