use logmsg_build::logmsg_core::{bind, Location, Symbol, SymbolLookup};
use logmsg_build::syntax::{is_emittable_level, parse_arguments};
use proc_macro2::TokenStream;
use syn::{Error, Generics, Item};

/// Accepts any placeholder type that is a Rust type.
struct AnyType;

impl SymbolLookup for AnyType {
    fn lookup(&self, _: &Location, name: &str) -> Vec<Symbol> {
        if syn::parse_str::<syn::Type>(name).is_ok() {
            vec![Symbol::ty(name, name)]
        } else {
            Vec::new()
        }
    }
}

/// Checks that `item` can carry logger messages and that `attr` binds.
pub fn validate(attr: TokenStream, item: TokenStream) -> syn::Result<()> {
    let item: Item = syn::parse2(item)?;
    let generics = match &item {
        Item::Struct(item) => &item.generics,
        Item::Enum(item) => &item.generics,
        Item::Union(item) => &item.generics,
        other => {
            return Err(Error::new_spanned(
                other,
                "`#[logger_message]` can only be applied to a struct, enum or union",
            ));
        }
    };
    reject_generics(generics)?;

    let arguments = parse_arguments(attr.clone())?;
    let binding = bind(&arguments, &AnyType, &Location::default())
        .map_err(|error| Error::new_spanned(&attr, format!("invalid logger message: {error}")))?;

    if !is_emittable_level(binding.log_level()) {
        return Err(Error::new_spanned(
            &attr,
            format!(
                "unknown log level `{}`, expected `Trace`, `Debug`, `Information`, `Warning`, \
                 `Error`, `Critical` or `None`",
                binding.log_level()
            ),
        ));
    }

    if let Some(event_id) = binding.explicit_event_id() {
        if event_id.parse::<i32>().is_err() {
            return Err(Error::new_spanned(
                &attr,
                format!("event id `{event_id}` is not a 32-bit integer"),
            ));
        }
    }
    Ok(())
}

fn reject_generics(generics: &Generics) -> syn::Result<()> {
    if generics.params.is_empty() {
        Ok(())
    } else {
        Err(Error::new_spanned(
            generics,
            "logger messages cannot be declared on generic types",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn error(attr: TokenStream, item: TokenStream) -> String {
        validate(attr, item)
            .expect_err("validation fails")
            .to_string()
    }

    #[test]
    fn accepts_valid_messages() {
        let item = quote!(pub struct Accounts;);
        validate(quote!("LoginFailed", LogLevel::Warning, "User = {User:String}"), item.clone())
            .expect("positional arguments bind");
        validate(
            quote!(
                format = "{Id:crate::model::Id} done",
                name = "Done",
                logLevel = LogLevel::Debug,
                event_id = -3,
                extension_scope = Scope::Interface
            ),
            item,
        )
        .expect("named arguments bind");
        validate(quote!("Muted", LogLevel::None, "{A:u8}"), quote!(struct S;))
            .expect("messages may never log");
    }

    #[test]
    fn rejects_unbound_messages() {
        let item = quote!(struct S;);
        assert_eq!(
            error(quote!("Name", LogLevel::Debug, "no placeholders"), item.clone()),
            "invalid logger message: format `no placeholders` contains no `{Name:Type}` placeholder"
        );
        assert_eq!(
            error(quote!("Name", "Debug", "{A:u8}"), item.clone()),
            "invalid logger message: argument `logLevel` must be a member reference, found a string literal"
        );
        assert_eq!(
            error(quote!("Name", LogLevel::Debug, "{A:not a type}"), item.clone()),
            "invalid logger message: type `not a type` matches 0 visible types, expected exactly one"
        );
        assert_eq!(
            error(quote!("Name", LogLevel::Loud, "{A:u8}"), item.clone()),
            "unknown log level `LogLevel::Loud`, expected `Trace`, `Debug`, `Information`, \
             `Warning`, `Error`, `Critical` or `None`"
        );
        assert_eq!(
            error(quote!("Name", LogLevel::Debug, "{A:u8}", 99999999999), item),
            "event id `99999999999` is not a 32-bit integer"
        );
    }

    #[test]
    fn rejects_unsupported_items() {
        let attr = quote!("Name", LogLevel::Debug, "{A:u8}");
        assert_eq!(
            error(attr.clone(), quote!(fn run() {})),
            "`#[logger_message]` can only be applied to a struct, enum or union"
        );
        assert_eq!(
            error(attr, quote!(struct Wrapper<T>(T);)),
            "logger messages cannot be declared on generic types"
        );
    }
}
