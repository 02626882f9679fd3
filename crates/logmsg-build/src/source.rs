//! Discovers logger message declarations in parsed Rust source.
//!
//! Every `struct`, `enum` and `union` is a candidate declaration. Its
//! namespace is the module path it lives in: the module path registered for
//! the file joined with any inline `mod` blocks around it. Alongside the
//! declarations a [`SymbolTable`] is built with, per module, the types
//! declared there and the names brought in by `use`, plus the primitive
//! types visible everywhere.

use log::debug;
use logmsg_core::{AttributeSyntax, Declaration, Scope, Symbol, SymbolTable};
use quote::ToTokens;
use syn::{Attribute, Block, Ident, Item, Stmt, UseTree, Visibility};

use crate::config::Config;
use crate::syntax::attribute_arguments;

const PRIMITIVES: [&str; 18] = [
    "bool", "char", "str", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64",
    "u128", "usize", "f32", "f64", "String",
];

/// Declarations and symbols gathered from one or more source files.
pub struct Discovery<'c> {
    config: &'c Config,
    attribute: String,
    declarations: Vec<Declaration>,
    symbols: SymbolTable,
}

impl<'c> Discovery<'c> {
    /// Creates an empty value.
    #[must_use]
    pub fn new(config: &'c Config) -> Self {
        let mut symbols = SymbolTable::new();
        for primitive in PRIMITIVES {
            symbols.add_global(Symbol::ty(primitive, primitive));
        }
        Self {
            config,
            attribute: config.qualified_attribute(),
            declarations: Vec::new(),
            symbols,
        }
    }

    /// Adds the items of `file`, which is the module at `module_path`
    /// (e.g. `crate::net`). Without a module path the file's own items have
    /// no namespace.
    pub fn add_file(&mut self, file: &syn::File, module_path: Option<&str>) {
        self.items(&file.items, module_path);
    }

    /// Every candidate declaration seen so far, in source order.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Symbols of every module seen so far.
    #[must_use]
    pub const fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    fn items(&mut self, items: &[Item], module: Option<&str>) {
        for item in items {
            match item {
                Item::Struct(item) => self.type_item(module, &item.ident, &item.vis, &item.attrs),
                Item::Enum(item) => self.type_item(module, &item.ident, &item.vis, &item.attrs),
                Item::Union(item) => self.type_item(module, &item.ident, &item.vis, &item.attrs),
                Item::Type(item) => self.declare(module, &item.ident),
                Item::Trait(item) => self.declare(module, &item.ident),
                Item::Use(item) => self.import(module, &item.tree, &mut Vec::new()),
                Item::Mod(item) => {
                    let name = item.ident.to_string();
                    let path = join(module, &name);
                    self.symbols
                        .add(module.unwrap_or_default(), Symbol::namespace(name, path.clone()));
                    if let Some((_, content)) = &item.content {
                        self.items(content, Some(&path));
                    }
                }
                Item::Fn(item) => self.function_body(module, &item.block),
                _ => {}
            }
        }
    }

    fn declare(&mut self, module: Option<&str>, ident: &Ident) {
        let name = ident.to_string();
        let qualified = join(module, &name);
        self.symbols
            .add(module.unwrap_or_default(), Symbol::ty(name, qualified));
    }

    fn type_item(
        &mut self,
        module: Option<&str>,
        ident: &Ident,
        vis: &Visibility,
        attrs: &[Attribute],
    ) {
        self.declare(module, ident);
        let enclosing = module
            .map(|module| vec![Scope::Namespace(module.to_owned())])
            .unwrap_or_default();
        self.candidate(ident, vis, attrs, enclosing);
    }

    /// Types declared inside a function body are recorded so the collector can
    /// reject them, but they are not visible to the module.
    fn function_body(&mut self, module: Option<&str>, block: &Block) {
        for stmt in &block.stmts {
            let Stmt::Item(item) = stmt else {
                continue;
            };
            let (ident, vis, attrs) = match item {
                Item::Struct(item) => (&item.ident, &item.vis, &item.attrs),
                Item::Enum(item) => (&item.ident, &item.vis, &item.attrs),
                Item::Union(item) => (&item.ident, &item.vis, &item.attrs),
                _ => continue,
            };
            let mut enclosing = vec![Scope::Other("fn".into())];
            enclosing.extend(module.map(|module| Scope::Namespace(module.to_owned())));
            self.candidate(ident, vis, attrs, enclosing);
        }
    }

    fn candidate(
        &mut self,
        ident: &Ident,
        vis: &Visibility,
        attrs: &[Attribute],
        enclosing: Vec<Scope>,
    ) {
        let attributes = attrs.iter().map(|attr| self.attribute(attr)).collect();
        self.declarations.push(Declaration {
            name: ident.to_string(),
            modifiers: vis.to_token_stream().to_string(),
            enclosing,
            attributes,
        });
    }

    fn attribute(&self, attr: &Attribute) -> AttributeSyntax {
        let segments: Vec<String> = attr
            .path()
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        let Some((last, prefix)) = segments.split_last() else {
            return AttributeSyntax {
                name: String::new(),
                arguments: Vec::new(),
            };
        };
        if *last != self.config.attribute
            || !(prefix.is_empty() || prefix.join("::") == self.config.macro_crate)
        {
            return AttributeSyntax {
                name: segments.join("::"),
                arguments: Vec::new(),
            };
        }

        AttributeSyntax {
            name: self.attribute.clone(),
            arguments: attribute_arguments(attr),
        }
    }

    fn import(&mut self, module: Option<&str>, tree: &UseTree, prefix: &mut Vec<String>) {
        match tree {
            UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.import(module, &path.tree, prefix);
                prefix.pop();
            }
            UseTree::Name(name) => self.bind_import(module, prefix, &name.ident, None),
            UseTree::Rename(rename) => {
                self.bind_import(module, prefix, &rename.ident, Some(&rename.rename));
            }
            UseTree::Glob(_) => {
                debug!("Ignoring glob import of `{}`", prefix.join("::"));
            }
            UseTree::Group(group) => {
                for tree in &group.items {
                    self.import(module, tree, prefix);
                }
            }
        }
    }

    fn bind_import(
        &mut self,
        module: Option<&str>,
        prefix: &[String],
        ident: &Ident,
        rename: Option<&Ident>,
    ) {
        let ident = ident.to_string();
        let mut target = prefix.to_vec();
        if ident != "self" {
            target.push(ident);
        }
        let Some(last) = target.last() else {
            return;
        };
        let visible = rename.map_or_else(|| last.clone(), ToString::to_string);
        if visible == "_" {
            return;
        }

        let qualified = absolute(module, &target);
        let symbol = if last.starts_with(char::is_uppercase) {
            Symbol::ty(visible, qualified)
        } else {
            Symbol::namespace(visible, qualified)
        };
        self.symbols.add(module.unwrap_or_default(), symbol);
    }
}

fn join(module: Option<&str>, name: &str) -> String {
    module.map_or_else(|| name.to_owned(), |module| format!("{module}::{name}"))
}

/// Resolves the `self` and `super` prefixes of a `use` path against `module`.
fn absolute(module: Option<&str>, segments: &[String]) -> String {
    let mut base: Vec<&str> = Vec::new();
    let mut rest = segments;
    match segments.first().map(String::as_str) {
        Some("self") => {
            base = module.map(|m| m.split("::").collect()).unwrap_or_default();
            rest = &segments[1..];
        }
        Some("super") => {
            base = module.map(|m| m.split("::").collect()).unwrap_or_default();
            while let Some((first, tail)) = rest.split_first() {
                if first != "super" {
                    break;
                }
                base.pop();
                rest = tail;
            }
        }
        _ => {}
    }
    base.extend(rest.iter().map(String::as_str));
    base.join("::")
}

#[cfg(test)]
mod tests {
    use super::*;
    use logmsg_core::{ArgValue, Argument, Location, SymbolKind, SymbolLookup};

    const SOURCE: &str = r#"
        use std::net::IpAddr;
        use crate::model::{self, User, Account as Acct};
        use super::Peer;
        use std::fmt::Write as _;
        use std::collections::*;

        #[logger_message("LoginFailed", LogLevel::Warning,
            "User = {User:User}, Attempt = {Attempt:u32}.")]
        #[derive(Debug)]
        pub struct Controller;

        struct Plain;

        mod inner {
            #[logmsg_macro::logger_message(
                name = "Gone", log_level = LogLevel::Error, format = "{A:Missing}", event_id = -5
            )]
            pub(crate) enum Thing {}

            #[other::logger_message("Ignored", LogLevel::Error, "{A:u8}")]
            pub struct Elsewhere;
        }

        fn helper() {
            #[logger_message("Local", LogLevel::Trace, "{A:u8}")]
            struct Local;
        }
    "#;

    fn discover(module: Option<&str>) -> (Vec<Declaration>, SymbolTable) {
        let config = Config::default();
        let file: syn::File = syn::parse_str(SOURCE).expect("source parses");
        let mut discovery = Discovery::new(&config);
        discovery.add_file(&file, module);
        (discovery.declarations().to_vec(), discovery.symbols().clone())
    }

    fn find<'a>(declarations: &'a [Declaration], name: &str) -> &'a Declaration {
        declarations
            .iter()
            .find(|declaration| declaration.name == name)
            .expect("declaration exists")
    }

    #[test]
    fn finds_candidate_declarations() {
        let (declarations, _) = discover(Some("crate::app"));
        let names: Vec<_> = declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Controller", "Plain", "Thing", "Elsewhere", "Local"]);

        let controller = find(&declarations, "Controller");
        assert_eq!(controller.modifiers, "pub");
        assert_eq!(controller.enclosing, vec![Scope::Namespace("crate::app".into())]);
        assert_eq!(controller.attributes[0].name, "logmsg_macro::logger_message");
        assert_eq!(controller.attributes[1].name, "derive");
        assert!(controller.attributes[1].arguments.is_empty());

        let thing = find(&declarations, "Thing");
        assert_eq!(thing.modifiers, "pub (crate)");
        assert_eq!(thing.enclosing, vec![Scope::Namespace("crate::app::inner".into())]);

        let elsewhere = find(&declarations, "Elsewhere");
        assert_eq!(elsewhere.attributes[0].name, "other::logger_message");

        let local = find(&declarations, "Local");
        assert_eq!(
            local.enclosing,
            vec![Scope::Other("fn".into()), Scope::Namespace("crate::app".into())]
        );
    }

    #[test]
    fn classifies_arguments() {
        let (declarations, _) = discover(Some("crate::app"));
        let controller = &find(&declarations, "Controller").attributes[0];
        assert_eq!(
            controller.arguments[0],
            Argument::positional(ArgValue::Str("LoginFailed".into()))
        );
        assert!(matches!(
            &controller.arguments[1].value,
            ArgValue::Member(member) if member.to_string() == "LogLevel::Warning"
        ));

        let thing = &find(&declarations, "Thing").attributes[0];
        assert_eq!(thing.arguments[0].name.as_deref(), Some("name"));
        assert_eq!(thing.arguments[1].name.as_deref(), Some("log_level"));
        assert_eq!(
            thing.arguments[3],
            Argument::named("event_id", ArgValue::Number("-5".into()))
        );
    }

    #[test]
    fn builds_module_symbols() {
        let (_, symbols) = discover(Some("crate::app"));
        let at = Location::new("crate::app");
        let lookup = |name: &str| symbols.lookup(&at, name);

        assert_eq!(lookup("User")[0].qualified_name(), "crate::model::User");
        assert_eq!(lookup("Acct")[0].qualified_name(), "crate::model::Account");
        assert_eq!(lookup("IpAddr")[0].qualified_name(), "std::net::IpAddr");
        assert_eq!(lookup("Peer")[0].qualified_name(), "crate::Peer");
        assert_eq!(lookup("Controller")[0].qualified_name(), "crate::app::Controller");
        assert_eq!(lookup("model")[0].kind(), SymbolKind::Namespace);
        assert_eq!(lookup("inner")[0].kind(), SymbolKind::Namespace);
        assert_eq!(lookup("u32")[0].qualified_name(), "u32");
        assert!(lookup("Write").is_empty());
        assert!(lookup("_").is_empty());
        assert!(lookup("Local").is_empty());
        assert!(lookup("Thing").is_empty());

        let inner = Location::new("crate::app::inner");
        assert_eq!(symbols.lookup(&inner, "Thing")[0].qualified_name(), "crate::app::inner::Thing");
        assert!(symbols.lookup(&inner, "User").is_empty());
    }

    #[test]
    fn files_without_module_path_have_no_namespace() {
        let (declarations, _) = discover(None);
        assert!(find(&declarations, "Controller").enclosing.is_empty());
        assert_eq!(
            find(&declarations, "Thing").enclosing,
            vec![Scope::Namespace("inner".into())]
        );
    }

    #[test]
    fn resolves_relative_paths() {
        let path = |segments: &[&str]| segments.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(absolute(Some("crate::a::b"), &path(&["self", "X"])), "crate::a::b::X");
        assert_eq!(absolute(Some("crate::a::b"), &path(&["super", "super", "X"])), "crate::X");
        assert_eq!(absolute(Some("crate::a"), &path(&["serde", "Serialize"])), "serde::Serialize");
        assert_eq!(absolute(None, &path(&["self", "X"])), "X");
    }
}
