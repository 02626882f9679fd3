//! Emits Rust source for collected logger messages.
//!
//! Each annotated type gets one file. The file is meant to be `include!`d
//! into the module that declares the type, so the type itself is named
//! without a path while placeholder types are written fully qualified.
//!
//! For a declaration like
//!
//! ```text
//! #[logger_message("LoginFailed", LogLevel::Warning, "User = {User:String}.")]
//! pub struct Accounts;
//! ```
//!
//! the emitted code is roughly
//!
//! ```text
//! impl Accounts {
//!     pub const LOGIN_FAILED_EVENT_ID: i32 = 805306368;
//!
//!     pub fn login_failed(user: &String, error: Option<&(dyn std::error::Error + 'static)>) {
//!         match error {
//!             Some(error) => log::log!(
//!                 target: "crate::Accounts",
//!                 log::Level::Warn,
//!                 "User = {}.: {}",
//!                 user,
//!                 error
//!             ),
//!             None => log::log!(target: "crate::Accounts", log::Level::Warn, "User = {}.", user),
//!         }
//!     }
//! }
//! ```
//!
//! Messages declared with `Scope::Interface` are instead methods of an
//! `AccountsLoggerMessages` trait implemented for every `log::Log`.
//! Messages at `LogLevel::None` keep their signature but never log.

use std::collections::HashSet;
use std::fmt::Write;

use heck::{ToShoutySnakeCase, ToSnakeCase};
use log::debug;
use logmsg_core::{AnnotatedDeclaration, AttributeBinding, EventId, ExtensionScope, Severity};
use proc_macro2::{Ident, Literal, Span, TokenStream};
use quote::{format_ident, quote};
use syn::{Path, Type, Visibility};

use crate::config::Config;
use crate::error::{Context, ErrorKind, Fallible};
use crate::syntax::NEVER_LOGS;

/// A generated source file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    name: String,
    type_path: String,
    contents: String,
}

impl GeneratedFile {
    /// File name, e.g. `net__client_logger_messages.rs`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module path of the type the file extends, e.g. `crate::net::Client`.
    #[must_use]
    pub fn type_path(&self) -> &str {
        &self.type_path
    }

    /// Rust source, header included.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }
}

/// One message, ready to be quoted.
struct Message {
    doc: String,
    constant: Ident,
    method: Ident,
    event_id: Literal,
    /// `None` for messages that never log.
    level: Option<TokenStream>,
    format: String,
    params: Vec<Ident>,
    types: Vec<Type>,
    /// Trailing parameter carrying the optional error.
    error: Ident,
    scope: ExtensionScope,
}

impl Message {
    /// The format string used when an error is passed: the message followed
    /// by `: <error>`.
    fn format_with_error(&self) -> String {
        format!("{}: {{}}", self.format)
    }
}

/// Turns collected declarations into Rust source.
pub struct Emitter<'c> {
    config: &'c Config,
    log_crate: Path,
}

impl<'c> Emitter<'c> {
    /// # Errors
    ///
    /// Returns an error if the configured `log_crate` is not a Rust path.
    pub fn new(config: &'c Config) -> Fallible<Self> {
        let log_crate =
            syn::parse_str(&config.log_crate).with_context(|| ErrorKind::InvalidConfigPath {
                field: "log_crate",
                value: config.log_crate.clone(),
            })?;
        Ok(Self { config, log_crate })
    }

    /// Emits the file for the declaration at `ordinal` in its collection.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit event id is not an `i32`, or if a
    /// resolved type or log level cannot be written as Rust.
    pub fn emit(
        &self,
        ordinal: usize,
        declaration: &AnnotatedDeclaration,
    ) -> Fallible<GeneratedFile> {
        let type_path = format!("{}::{}", declaration.namespace(), declaration.type_name());
        let mut methods = HashSet::new();
        let messages = declaration
            .attributes()
            .iter()
            .enumerate()
            .map(|(index, binding)| {
                self.message(binding, binding.event_id(ordinal, index), &mut methods)
            })
            .collect::<Fallible<Vec<_>>>()?;

        let vis = visibility(declaration.modifiers());
        let error_type = quote!(Option<&(dyn ::std::error::Error + 'static)>);
        let ty = Ident::new(&sanitize(declaration.type_name()), Span::call_site());
        let log = &self.log_crate;

        let constants = messages.iter().map(|message| {
            let Message {
                doc, constant, event_id, ..
            } = message;
            let doc = format!("Event id of {doc}");
            quote! {
                #[doc = #doc]
                pub const #constant: i32 = #event_id;
            }
        });
        let functions = messages
            .iter()
            .filter(|message| message.scope == ExtensionScope::Generic)
            .map(|message| {
                let Message {
                    doc,
                    method,
                    level,
                    format,
                    params,
                    types,
                    error,
                    ..
                } = message;
                let format_with_error = message.format_with_error();
                let body = level.as_ref().map_or_else(
                    || quote!(let _ = (#(#params,)* #error);),
                    |level| {
                        quote! {
                            match #error {
                                Some(#error) => #log::log!(
                                    target: #type_path,
                                    #level,
                                    #format_with_error,
                                    #(#params,)*
                                    #error
                                ),
                                None => #log::log!(
                                    target: #type_path,
                                    #level,
                                    #format,
                                    #(#params),*
                                ),
                            }
                        }
                    },
                );
                quote! {
                    #[doc = #doc]
                    #vis fn #method(#(#params: &#types,)* #error: #error_type) {
                        #body
                    }
                }
            });

        let mut contents = String::new();
        if self.config.include_header {
            let _ = writeln!(
                contents,
                "// @generated by logmsg from the logger messages on `{type_path}`.\n\
                 // Do not edit by hand.\n"
            );
        }
        let _ = writeln!(
            contents,
            "{}",
            quote! {
                impl #ty {
                    #(#constants)*
                    #(#functions)*
                }
            }
        );

        let interface: Vec<_> = messages
            .iter()
            .filter(|message| message.scope == ExtensionScope::Interface)
            .collect();
        if !interface.is_empty() {
            let name = format_ident!("{}LoggerMessages", ty);
            let signatures = interface.iter().map(|message| {
                let Message {
                    doc,
                    method,
                    params,
                    types,
                    error,
                    ..
                } = message;
                quote! {
                    #[doc = #doc]
                    fn #method(&self, #(#params: &#types,)* #error: #error_type);
                }
            });
            let bodies = interface.iter().map(|message| {
                let Message {
                    method,
                    level,
                    format,
                    params,
                    types,
                    error,
                    ..
                } = message;
                let format_with_error = message.format_with_error();
                let body = level.as_ref().map_or_else(
                    || quote!(let _ = (#(#params,)* #error);),
                    |level| {
                        quote! {
                            let level = #level;
                            let metadata = #log::Metadata::builder()
                                .level(level)
                                .target(#type_path)
                                .build();
                            if level <= #log::max_level() && self.enabled(&metadata) {
                                match #error {
                                    Some(#error) => self.log(
                                        &#log::Record::builder()
                                            .metadata(metadata)
                                            .args(format_args!(
                                                #format_with_error,
                                                #(#params,)*
                                                #error
                                            ))
                                            .build(),
                                    ),
                                    None => self.log(
                                        &#log::Record::builder()
                                            .metadata(metadata)
                                            .args(format_args!(#format, #(#params),*))
                                            .build(),
                                    ),
                                }
                            }
                        }
                    },
                );
                quote! {
                    fn #method(&self, #(#params: &#types,)* #error: #error_type) {
                        #body
                    }
                }
            });
            let doc = format!("Logger messages of `{type_path}`, callable on any logger.");
            let _ = writeln!(
                contents,
                "\n{}\n\n{}",
                quote! {
                    #[doc = #doc]
                    #vis trait #name {
                        #(#signatures)*
                    }
                },
                quote! {
                    impl<L: #log::Log + ?Sized> #name for L {
                        #(#bodies)*
                    }
                }
            );
        }

        debug!("Emitted {} logger message(s) for {type_path}", messages.len());
        Ok(GeneratedFile {
            name: file_name(declaration),
            type_path,
            contents,
        })
    }

    fn message(
        &self,
        binding: &AttributeBinding,
        event_id: EventId,
        methods: &mut HashSet<String>,
    ) -> Fallible<Message> {
        let event_id = match event_id {
            EventId::Derived(id) => id,
            EventId::Explicit(value) => value.parse().with_context(|| ErrorKind::InvalidEventId {
                message: binding.name().to_owned(),
                value: value.clone(),
            })?,
        };

        let method = unique(sanitize(&binding.name().to_snake_case()), methods);
        let constant = format!("{}_EVENT_ID", method.to_shouty_snake_case());

        let mut params = HashSet::new();
        let mut names = Vec::new();
        let mut types = Vec::new();
        for argument in binding.template().bindings() {
            let name = unique(sanitize(&argument.alias().to_snake_case()), &mut params);
            names.push(Ident::new(&name, Span::call_site()));
            let ty = argument.ty().qualified_name();
            types.push(syn::parse_str(ty).with_context(|| {
                ErrorKind::InvalidPlaceholderType {
                    message: binding.name().to_owned(),
                    ty: ty.to_owned(),
                }
            })?);
        }
        let error = Ident::new(&unique("error".into(), &mut params), Span::call_site());

        Ok(Message {
            doc: format!(
                "`{}`: \"{}\" at `{}`",
                binding.name(),
                binding.template().raw_text(),
                binding.log_level()
            ),
            constant: Ident::new(&constant, Span::call_site()),
            method: Ident::new(&method, Span::call_site()),
            event_id: Literal::i32_unsuffixed(event_id),
            level: self.level(binding)?,
            format: format_string(binding),
            params: names,
            types,
            error,
            scope: binding.extension_scope(),
        })
    }

    /// The `log` level of a message, or `None` for `LogLevel::None`.
    fn level(&self, binding: &AttributeBinding) -> Fallible<Option<TokenStream>> {
        let log = &self.log_crate;
        let variant = match binding.severity() {
            Severity::Trace => quote!(Trace),
            Severity::Debug => quote!(Debug),
            Severity::Information => quote!(Info),
            Severity::Warning => quote!(Warn),
            Severity::Error | Severity::Critical => quote!(Error),
            Severity::Unknown if binding.log_level().member() == NEVER_LOGS => return Ok(None),
            Severity::Unknown => {
                return Err(ErrorKind::InvalidLogLevel {
                    message: binding.name().to_owned(),
                    level: binding.log_level().to_string(),
                }
                .into());
            }
        };
        Ok(Some(quote!(#log::Level::#variant)))
    }
}

/// The template as a `format_args!` string: each placeholder becomes `{}`
/// and every other brace is escaped.
fn format_string(binding: &AttributeBinding) -> String {
    let template = binding.template();
    let text = template.normalized_text();
    let mut format = String::with_capacity(text.len());
    let mut cursor = 0;
    for argument in template.bindings() {
        escape_literal(&text[cursor..argument.span().start], &mut format);
        format.push_str("{}");
        cursor = argument.span().end;
    }
    escape_literal(&text[cursor..], &mut format);
    format
}

fn escape_literal(text: &str, out: &mut String) {
    for c in text.replace("{{", "{").replace("}}", "}").chars() {
        match c {
            '{' => out.push_str("{{"),
            '}' => out.push_str("}}"),
            c => out.push(c),
        }
    }
}

/// Turns `text` into a plain identifier: anything outside `[A-Za-z0-9_]`
/// becomes `_`, and keywords get a trailing `_`.
fn sanitize(text: &str) -> String {
    let mut name: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if name.is_empty() {
        name.push_str("arg");
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    if syn::parse_str::<syn::Ident>(&name).is_err() {
        name.push('_');
    }
    name
}

fn unique(base: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.clone()) {
        return base;
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{base}_{suffix}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        suffix += 1;
    }
}

fn visibility(modifiers: &str) -> Visibility {
    syn::parse_str(modifiers).unwrap_or(Visibility::Inherited)
}

/// `crate::net::Client` becomes `net__client_logger_messages.rs`. Snake
/// casing never produces `__`, so path boundaries stay distinct.
fn file_name(declaration: &AnnotatedDeclaration) -> String {
    let mut parts: Vec<String> = declaration
        .namespace()
        .split("::")
        .filter(|segment| !segment.is_empty() && *segment != "crate")
        .map(ToSnakeCase::to_snake_case)
        .collect();
    parts.push(declaration.type_name().to_snake_case());
    format!("{}_logger_messages.rs", parts.join("__"))
}
