//! Message templates and the `{Alias:Type}` placeholder scanner.
//!
//! A template is free text with placeholders of the form `{Alias:Type}`.
//! Braces are escaped by doubling them, so a `{` only opens a placeholder
//! when the run of `{` directly in front of it has even length:
//!
//! ```text
//! "{A:int}"      -> one placeholder
//! "{{A:int}"     -> literal text
//! "{{{A:int}"    -> literal "{{" followed by one placeholder
//! ```
//!
//! Parsing a template resolves every `Type` token and rewrites each
//! placeholder to `{Alias}`, which is the shape structured loggers expect.

use std::iter::FusedIterator;
use std::ops::Range;

use crate::error::BindError;
use crate::symbol::{resolve_single_type, Location, SymbolLookup, TypeRef};

/// A single placeholder found by [`tokenize`] or [`aliases`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderMatch<'a> {
    /// Alias as written, without the type.
    pub alias: &'a str,
    /// Empty for placeholders found by [`aliases`].
    pub type_token: &'a str,
    /// Byte offset of the opening brace.
    pub start: usize,
    /// Byte length including both braces.
    pub len: usize,
}

impl PlaceholderMatch<'_> {
    /// Byte offset just past the closing brace.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    /// `{Alias:Type}`
    Typed,
    /// `{Alias}`
    Bare,
}

impl Form {
    fn split(self, body: &str) -> Option<(&str, &str)> {
        match self {
            Self::Bare => (!body.is_empty()).then_some((body, "")),
            // The alias runs up to the last `:` that still leaves a non-empty type.
            Self::Typed => body
                .char_indices()
                .rev()
                .find(|&(i, c)| c == ':' && i > 0 && i + 1 < body.len())
                .map(|(i, _)| (&body[..i], &body[i + 1..])),
        }
    }
}

/// Lazy, single pass scanner over the placeholders of a template.
#[derive(Debug, Clone)]
pub struct Placeholders<'a> {
    text: &'a str,
    pos: usize,
    form: Form,
}

/// Scans `template` for `{Alias:Type}` placeholders, left to right.
#[must_use]
pub const fn tokenize(template: &str) -> Placeholders<'_> {
    Placeholders {
        text: template,
        pos: 0,
        form: Form::Typed,
    }
}

/// Scans a normalized template for `{Alias}` placeholders using the same
/// escaping rules as [`tokenize`].
#[must_use]
pub const fn aliases(normalized: &str) -> Placeholders<'_> {
    Placeholders {
        text: normalized,
        pos: 0,
        form: Form::Bare,
    }
}

impl<'a> Iterator for Placeholders<'a> {
    type Item = PlaceholderMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() {
            let start = self.pos;
            self.pos += 1;

            if bytes[start] != b'{' || is_escaped(bytes, start) {
                continue;
            }
            let Some(close) = closing_brace(bytes, start + 1) else {
                continue;
            };
            let Some((alias, type_token)) = self.form.split(&self.text[start + 1..close]) else {
                continue;
            };

            self.pos = close + 1;
            return Some(PlaceholderMatch {
                alias,
                type_token,
                start,
                len: close + 1 - start,
            });
        }
        None
    }
}

impl FusedIterator for Placeholders<'_> {}

/// True when the brace at `at` follows an odd run of `{`.
fn is_escaped(bytes: &[u8], at: usize) -> bool {
    bytes[..at].iter().rev().take_while(|&&b| b == b'{').count() % 2 == 1
}

/// Finds the `}` closing a placeholder body that begins at `from`. Another
/// `{` before it, or the end of input, means there is no placeholder here.
fn closing_brace(bytes: &[u8], from: usize) -> Option<usize> {
    bytes[from..]
        .iter()
        .position(|&b| b == b'{' || b == b'}')
        .map(|offset| from + offset)
        .filter(|&at| bytes[at] == b'}')
}

/// One placeholder of a parsed template bound to its resolved type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentBinding {
    alias: String,
    ty: TypeRef,
    span: Range<usize>,
}

impl ArgumentBinding {
    /// Alias of the placeholder.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The type the placeholder resolved to.
    #[must_use]
    pub const fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Byte range of the `{Alias}` placeholder in the normalized text.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

/// A parsed message template.
///
/// `bindings` holds one entry per placeholder occurrence, in the order the
/// placeholders appear. Repeated aliases are kept as separate entries since
/// each one is a separate argument at the call site.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    raw: String,
    normalized: String,
    bindings: Vec<ArgumentBinding>,
}

impl MessageTemplate {
    /// Parses `raw`, resolving each placeholder type as seen from `location`.
    ///
    /// # Errors
    ///
    /// Fails with [`BindError::NoPlaceholdersInFormat`] when `raw` has no
    /// placeholder, and with [`BindError::AmbiguousOrUnresolvedType`] when a
    /// type token does not name exactly one visible type.
    pub fn parse(
        raw: &str,
        lookup: &dyn SymbolLookup,
        location: &Location,
    ) -> Result<Self, BindError> {
        let mut normalized = String::with_capacity(raw.len());
        let mut bindings = Vec::new();
        let mut copied = 0;

        for placeholder in tokenize(raw) {
            let ty = resolve_single_type(lookup, location, placeholder.type_token)?;

            normalized.push_str(&raw[copied..placeholder.start]);
            let start = normalized.len();
            normalized.push('{');
            normalized.push_str(placeholder.alias);
            normalized.push('}');

            bindings.push(ArgumentBinding {
                alias: placeholder.alias.to_owned(),
                ty,
                span: start..normalized.len(),
            });
            copied = placeholder.end();
        }

        if bindings.is_empty() {
            return Err(BindError::NoPlaceholdersInFormat {
                format: raw.to_owned(),
            });
        }
        normalized.push_str(&raw[copied..]);

        Ok(Self {
            raw: raw.to_owned(),
            normalized,
            bindings,
        })
    }

    /// The template as written in the attribute.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw
    }

    /// The template with type tags stripped: every placeholder reads `{Alias}`.
    #[must_use]
    pub fn normalized_text(&self) -> &str {
        &self.normalized
    }

    /// Placeholders in order of appearance.
    #[must_use]
    pub fn bindings(&self) -> &[ArgumentBinding] {
        &self.bindings
    }
}
