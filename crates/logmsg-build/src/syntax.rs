//! Reads logger message attribute arguments from Rust syntax.
//!
//! Shared by the source scanner and the `logger_message` attribute macro so
//! both see the same arguments.

use log::debug;
use logmsg_core::{ArgValue, Argument, MemberRef, Severity};
use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::parse::{Parse, ParseStream, Parser};
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ExprLit, ExprPath, ExprUnary, Ident, Lit, Meta, Token, UnOp};

/// Level member of messages that are declared but never logged.
pub const NEVER_LOGS: &str = "None";

/// Whether `level` can be written as a `log` level: one of the known
/// severities, or [`NEVER_LOGS`].
#[must_use]
pub fn is_emittable_level(level: &MemberRef) -> bool {
    Severity::from_name(level.member()) != Severity::Unknown || level.member() == NEVER_LOGS
}

/// One attribute argument: `expr` or `name = expr`.
struct RawArgument {
    name: Option<Ident>,
    value: Expr,
}

impl Parse for RawArgument {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name = if input.peek(Ident) && input.peek2(Token![=]) && !input.peek2(Token![==]) {
            let name = input.parse()?;
            input.parse::<Token![=]>()?;
            Some(name)
        } else {
            None
        };
        Ok(Self {
            name,
            value: input.parse()?,
        })
    }
}

impl RawArgument {
    fn into_argument(self) -> Argument {
        Argument {
            name: self.name.map(|name| name.to_string()),
            value: classify(&self.value),
        }
    }
}

/// Parses the comma separated arguments inside an attribute's parentheses.
///
/// # Errors
///
/// Fails when the tokens are not a list of expressions, each optionally
/// preceded by `name =`.
pub fn parse_arguments(tokens: TokenStream) -> syn::Result<Vec<Argument>> {
    let parsed = Punctuated::<RawArgument, Token![,]>::parse_terminated.parse2(tokens)?;
    Ok(parsed.into_iter().map(RawArgument::into_argument).collect())
}

/// The arguments of `attr`. Argument lists that do not parse become a single
/// unclassified argument, which the binder rejects.
#[must_use]
pub fn attribute_arguments(attr: &Attribute) -> Vec<Argument> {
    match &attr.meta {
        Meta::Path(_) => Vec::new(),
        Meta::NameValue(pair) => vec![Argument::positional(classify(&pair.value))],
        Meta::List(list) => parse_arguments(list.tokens.clone()).unwrap_or_else(|error| {
            debug!("Could not parse logger message arguments: {error}");
            vec![Argument::positional(ArgValue::Other(list.tokens.to_string()))]
        }),
    }
}

/// Sorts an argument expression into the shapes the binder understands.
fn classify(expr: &Expr) -> ArgValue {
    match expr {
        Expr::Lit(ExprLit { lit: Lit::Str(lit), .. }) => ArgValue::Str(lit.value()),
        Expr::Lit(ExprLit {
            lit: Lit::Int(lit), ..
        }) => ArgValue::Number(lit.base10_digits().to_owned()),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: inner,
            ..
        }) => match classify(inner) {
            ArgValue::Number(digits) if !digits.starts_with('-') => {
                ArgValue::Number(format!("-{digits}"))
            }
            _ => ArgValue::Other(expr.to_token_stream().to_string()),
        },
        Expr::Path(ExprPath {
            qself: None, path, ..
        }) => {
            let segments = path
                .segments
                .iter()
                .map(|segment| segment.ident.to_string())
                .collect();
            MemberRef::new(segments).map_or_else(
                || ArgValue::Other(path.to_token_stream().to_string()),
                ArgValue::Member,
            )
        }
        Expr::Group(group) => classify(&group.expr),
        Expr::Paren(paren) => classify(&paren.expr),
        other => ArgValue::Other(other.to_token_stream().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    #[test]
    fn classifies_expressions() {
        let expr = |text: &str| classify(&syn::parse_str::<Expr>(text).expect("expression parses"));
        assert_eq!(expr("42u16"), ArgValue::Number("42".into()));
        assert_eq!(expr("(7)"), ArgValue::Number("7".into()));
        assert_eq!(expr("Warning"), ArgValue::Other("Warning".into()));
        assert!(matches!(expr("a::b::C"), ArgValue::Member(member) if member.member() == "C"));
        assert!(matches!(expr("f(1)"), ArgValue::Other(_)));
        assert!(matches!(expr("--1"), ArgValue::Other(_)));
    }

    #[test]
    fn parses_named_and_positional_arguments() {
        let arguments = parse_arguments(quote!("Name", level = LogLevel::Debug, a == b,))
            .expect("arguments parse");
        assert_eq!(arguments.len(), 3);
        assert_eq!(arguments[0], Argument::positional(ArgValue::Str("Name".into())));
        assert_eq!(arguments[1].name.as_deref(), Some("level"));
        assert!(matches!(&arguments[2], Argument { name: None, value: ArgValue::Other(_) }));
    }

    #[test]
    fn emittable_levels() {
        let level = |path: &str| {
            MemberRef::new(path.split("::").map(String::from).collect()).expect("qualified")
        };
        assert!(is_emittable_level(&level("LogLevel::Critical")));
        assert!(is_emittable_level(&level("LogLevel::None")));
        assert!(!is_emittable_level(&level("LogLevel::Loud")));
        assert!(!is_emittable_level(&level("log::Level::Warn")));
    }

    #[test]
    fn unparsable_arguments_become_other() {
        let attr: Attribute = syn::parse_quote!(#[logger_message("A", , )]);
        assert!(matches!(
            attribute_arguments(&attr).as_slice(),
            [Argument { name: None, value: ArgValue::Other(_) }]
        ));
        let attr: Attribute = syn::parse_quote!(#[logger_message]);
        assert!(attribute_arguments(&attr).is_empty());
    }
}
