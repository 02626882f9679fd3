//! Core of the logger message generator.
//!
//! Given type declarations annotated with a logger message attribute, this
//! crate binds each attribute's arguments, scans the message template for
//! `{Alias:Type}` placeholders, resolves every placeholder type through a
//! host supplied [`SymbolLookup`](symbol::SymbolLookup), and derives event
//! ids where none are given. The result is one
//! [`AnnotatedDeclaration`](collect::AnnotatedDeclaration) per annotated
//! type, ready for code emission.
//!
//! The crate knows nothing about any particular syntax tree; hosts translate
//! their declarations into [`collect::Declaration`] values.

pub mod binder;
mod cancel;
pub mod collect;
/// Errors and diagnostics.
pub mod error;
pub mod event_id;
pub mod symbol;
pub mod template;

pub use binder::{bind, ArgValue, Argument, AttributeBinding, ExtensionScope, MemberRef, Parameter};
pub use cancel::CancellationToken;
pub use collect::{AnnotatedDeclaration, AttributeSyntax, Collection, Collector, Declaration, Scope};
pub use error::{BindError, Cancelled, CollectError, Diagnostic, DiagnosticKind};
pub use event_id::{EventId, Severity};
pub use symbol::{Location, Symbol, SymbolKind, SymbolLookup, SymbolTable, TypeRef};
pub use template::{ArgumentBinding, MessageTemplate};
