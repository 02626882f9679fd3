//! The `#[logger_message]` attribute.
//!
//! The attribute declares a logger message on a type:
//!
//! ```text
//! use logmsg_macro::logger_message;
//!
//! #[logger_message("LoginFailed", LogLevel::Warning, "User = {User:String}")]
//! #[logger_message(
//!     name = "LoggedOut",
//!     log_level = LogLevel::Information,
//!     format = "User = {User:String}",
//!     event_id = 7,
//!     extension_scope = Scope::Interface,
//! )]
//! pub struct Accounts;
//! ```
//!
//! It leaves the type untouched; the helpers are written by `logmsg-build`.
//! What the attribute does is check its arguments while the crate compiles,
//! so a message that `logmsg-build` would skip fails here with a message
//! pointing at the attribute. Placeholder types are only checked to be Rust
//! types, since their resolution depends on the imports of the module.

extern crate proc_macro;

mod check;

use proc_macro::TokenStream;

/// Declares a logger message on a `struct`, `enum` or `union`.
///
/// The arguments are `name`, `log_level`, `format`, and optionally
/// `event_id` and `extension_scope`, given by position or by name
/// (`logLevel`, `eventId` and `extensionScope` are accepted too).
#[proc_macro_attribute]
pub fn logger_message(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = proc_macro2::TokenStream::from(item);
    match check::validate(attr.into(), item.clone()) {
        Ok(()) => item.into(),
        Err(error) => {
            let mut expanded = error.to_compile_error();
            expanded.extend(item);
            expanded.into()
        }
    }
}
