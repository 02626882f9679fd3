//! Generates typed logger message helpers from annotated Rust sources.
//!
//! Meant to be called from a build script:
//!
//! ```no_run
//! // build.rs
//! fn main() {
//!     logmsg_build::Generator::new()
//!         .source("src/net.rs", "crate::net")
//!         .write()
//!         .unwrap();
//! }
//! ```
//!
//! and the generated file included next to the annotated type:
//!
//! ```text
//! include!(concat!(env!("OUT_DIR"), "/net__client_logger_messages.rs"));
//! ```

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use logmsg_core::{CancellationToken, Collection, Collector, Diagnostic};

mod codegen;
mod config;
/// Errors of generation runs, with their exit codes.
pub mod error;
mod source;
pub mod syntax;

pub use codegen::GeneratedFile;
pub use config::Config;
pub use logmsg_core;

use crate::codegen::Emitter;
use crate::error::{Context, ErrorKind, Fallible};
use crate::source::Discovery;

#[derive(Debug, Clone)]
enum Input {
    File(PathBuf),
    Text { name: String, text: String },
}

#[derive(Debug, Clone)]
struct SourceFile {
    input: Input,
    module_path: Option<String>,
}

impl SourceFile {
    fn label(&self) -> PathBuf {
        match &self.input {
            Input::File(path) => path.clone(),
            Input::Text { name, .. } => PathBuf::from(name),
        }
    }

    fn parse(&self) -> Fallible<syn::File> {
        let label = self.label();
        let text = match &self.input {
            Input::File(path) => fs::read_to_string(path)
                .with_context(|| ErrorKind::ReadSourceError { file: label.clone() })?,
            Input::Text { text, .. } => text.clone(),
        };
        syn::parse_file(&text).with_context(|| ErrorKind::ParseSourceError { file: label })
    }
}

/// The result of a generation run held in memory.
#[derive(Debug, Clone, Default)]
pub struct Generated {
    files: Vec<GeneratedFile>,
    diagnostics: Vec<Diagnostic>,
}

impl Generated {
    /// One file per annotated type, in source order.
    #[must_use]
    pub fn files(&self) -> &[GeneratedFile] {
        &self.files
    }

    /// Why logger messages or declarations were skipped.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Builder for a generation run.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: Config,
    sources: Vec<SourceFile>,
    out_dir: Option<PathBuf>,
    cancellation: CancellationToken,
}

impl Generator {
    /// A generator with the default configuration and no sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Adds the source file at `path`, which is the module at `module_path`
    /// (e.g. `crate::net`). An empty module path leaves the file's own items
    /// without a namespace, so only types in inline modules are collected.
    #[must_use]
    pub fn source(mut self, path: impl Into<PathBuf>, module_path: &str) -> Self {
        self.sources.push(SourceFile {
            input: Input::File(path.into()),
            module_path: module_path_of(module_path),
        });
        self
    }

    /// Adds source text that is not on disk. `name` is only used in messages.
    #[must_use]
    pub fn source_text(
        mut self,
        name: impl Into<String>,
        text: impl Into<String>,
        module_path: &str,
    ) -> Self {
        self.sources.push(SourceFile {
            input: Input::Text {
                name: name.into(),
                text: text.into(),
            },
            module_path: module_path_of(module_path),
        });
        self
    }

    /// Where [`write`](Self::write) puts generated files. Defaults to the
    /// configured `out_dir`, then to `OUT_DIR`.
    #[must_use]
    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    /// Checked between declarations; a cancelled run fails with
    /// [`ErrorKind::Cancelled`].
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// The configuration of this run.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Parses every source and collects the annotated declarations.
    ///
    /// # Errors
    ///
    /// Fails if there are no sources, a source cannot be read or parsed, the
    /// configuration names an invalid attribute, or the run is cancelled.
    pub fn collect(&self) -> Fallible<Collection> {
        if self.sources.is_empty() {
            return Err(ErrorKind::NoSources.into());
        }
        self.validate_config()?;

        let mut discovery = Discovery::new(&self.config);
        for source in &self.sources {
            self.cancellation.check()?;
            debug!("Scanning {}", source.label().display());
            discovery.add_file(&source.parse()?, source.module_path.as_deref());
        }

        let attribute = self.config.qualified_attribute();
        let collection = Collector::new(discovery.symbols(), &attribute)
            .with_cancellation(&self.cancellation)
            .collect_all(discovery.declarations())?;
        debug!(
            "Collected {} annotated type(s) with {} diagnostic(s)",
            collection.declarations.len(),
            collection.diagnostics.len()
        );
        Ok(collection)
    }

    /// Collects and emits, keeping the output in memory.
    ///
    /// # Errors
    ///
    /// Everything [`collect`](Self::collect) fails with, plus emission
    /// errors such as an explicit event id that is not an `i32`, an unknown
    /// log level, or two types that would share a file name.
    pub fn generate(&self) -> Fallible<Generated> {
        let collection = self.collect()?;
        let emitter = Emitter::new(&self.config)?;
        let mut files = Vec::with_capacity(collection.declarations.len());
        let mut owners: HashMap<String, String> = HashMap::new();
        for (ordinal, declaration) in collection.declarations.iter().enumerate() {
            self.cancellation.check()?;
            let file = emitter.emit(ordinal, declaration)?;
            let owner = file.type_path().to_owned();
            if let Some(first) = owners.insert(file.name().to_owned(), owner) {
                return Err(ErrorKind::DuplicateFileName {
                    name: file.name().to_owned(),
                    first,
                    second: file.type_path().to_owned(),
                }
                .into());
            }
            files.push(file);
        }
        Ok(Generated {
            files,
            diagnostics: collection.diagnostics,
        })
    }

    /// Generates and writes every file, returning their paths. Files whose
    /// contents did not change are left untouched.
    ///
    /// # Errors
    ///
    /// Everything [`generate`](Self::generate) fails with, plus a missing or
    /// unwritable output directory.
    pub fn write(&self) -> Fallible<Vec<PathBuf>> {
        let out_dir = self.resolve_out_dir()?;
        let generated = self.generate()?;

        fs::create_dir_all(&out_dir).with_context(|| ErrorKind::CreateDirError {
            dir: out_dir.clone(),
        })?;
        let mut written = Vec::with_capacity(generated.files.len());
        for file in &generated.files {
            let path = out_dir.join(file.name());
            write_if_changed(&path, file.contents())?;
            written.push(path);
        }
        info!("Generated {} file(s) in {}", written.len(), out_dir.display());
        Ok(written)
    }

    /// Generates in memory and returns the paths of files in the output
    /// directory that are missing or differ from what would be written.
    ///
    /// # Errors
    ///
    /// Everything [`generate`](Self::generate) fails with, plus a missing
    /// output directory.
    pub fn stale(&self) -> Fallible<Vec<PathBuf>> {
        let out_dir = self.resolve_out_dir()?;
        let generated = self.generate()?;
        Ok(generated
            .files
            .iter()
            .map(|file| (out_dir.join(file.name()), file.contents()))
            .filter(|(path, contents)| {
                !fs::read_to_string(path).is_ok_and(|existing| existing == *contents)
            })
            .map(|(path, _)| path)
            .collect())
    }

    fn resolve_out_dir(&self) -> Fallible<PathBuf> {
        self.out_dir
            .clone()
            .or_else(|| self.config.out_dir.clone())
            .or_else(|| env::var_os("OUT_DIR").map(PathBuf::from))
            .ok_or_else(|| ErrorKind::NoOutDir.into())
    }

    fn validate_config(&self) -> Fallible<()> {
        syn::parse_str::<syn::Ident>(&self.config.attribute).with_context(|| {
            ErrorKind::InvalidConfigPath {
                field: "attribute",
                value: self.config.attribute.clone(),
            }
        })?;
        syn::parse_str::<syn::Path>(&self.config.macro_crate).with_context(|| {
            ErrorKind::InvalidConfigPath {
                field: "macro_crate",
                value: self.config.macro_crate.clone(),
            }
        })?;
        Ok(())
    }
}

fn module_path_of(module_path: &str) -> Option<String> {
    let trimmed = module_path.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn write_if_changed(path: &Path, contents: &str) -> Fallible<()> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == contents) {
        debug!("{} is up to date", path.display());
        return Ok(());
    }
    fs::write(path, contents).with_context(|| ErrorKind::WriteFileError { file: path.to_owned() })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
        #[logger_message("Started", LogLevel::Information, "Listening on {Port:u16}")]
        pub struct Server;
    "#;

    #[test]
    fn requires_sources() {
        let error = Generator::new().generate().unwrap_err();
        assert_eq!(error.kind(), &ErrorKind::NoSources);
    }

    #[test]
    fn rejects_invalid_attribute_names() {
        let config = Config {
            attribute: "logger message".into(),
            ..Config::default()
        };
        let error = Generator::new()
            .with_config(config)
            .source_text("lib.rs", SOURCE, "crate")
            .collect()
            .unwrap_err();
        assert_eq!(
            error.kind(),
            &ErrorKind::InvalidConfigPath {
                field: "attribute",
                value: "logger message".into(),
            }
        );
    }

    #[test]
    fn reports_parse_errors_with_the_source_name() {
        let error = Generator::new()
            .source_text("broken.rs", "struct", "crate")
            .generate()
            .unwrap_err();
        assert_eq!(
            error.kind(),
            &ErrorKind::ParseSourceError {
                file: PathBuf::from("broken.rs"),
            }
        );
    }

    #[test]
    fn stops_when_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let error = Generator::new()
            .source_text("lib.rs", SOURCE, "crate")
            .cancellation(token)
            .generate()
            .unwrap_err();
        assert_eq!(error.kind(), &ErrorKind::Cancelled);
    }

    #[test]
    fn rejects_types_sharing_a_file_name() {
        let source = r#"
            #[logger_message("A", LogLevel::Debug, "{X:u8}")]
            pub struct HTTPClient;

            #[logger_message("B", LogLevel::Debug, "{X:u8}")]
            pub struct HttpClient;
        "#;
        let error = Generator::new()
            .source_text("lib.rs", source, "crate")
            .generate()
            .unwrap_err();
        assert_eq!(
            error.kind(),
            &ErrorKind::DuplicateFileName {
                name: "http_client_logger_messages.rs".into(),
                first: "crate::HTTPClient".into(),
                second: "crate::HttpClient".into(),
            }
        );
    }

    #[test]
    fn module_boundaries_keep_file_names_apart() {
        let generated = Generator::new()
            .source_text(
                "net.rs",
                r#"
                    #[logger_message("A", LogLevel::Debug, "{X:u8}")]
                    pub struct HttpClient;
                "#,
                "crate::net",
            )
            .source_text(
                "net_http.rs",
                r#"
                    #[logger_message("B", LogLevel::Debug, "{X:u8}")]
                    pub struct Client;
                "#,
                "crate::net_http",
            )
            .generate()
            .expect("generates");
        let names: Vec<_> = generated.files().iter().map(GeneratedFile::name).collect();
        assert_eq!(
            names,
            vec!["net__http_client_logger_messages.rs", "net_http__client_logger_messages.rs"]
        );
    }

    #[test]
    fn blank_module_path_means_none() {
        assert_eq!(module_path_of("  "), None);
        assert_eq!(module_path_of("crate::a"), Some("crate::a".into()));
    }

    #[test]
    fn explicit_out_dir_wins() {
        let config = Config {
            out_dir: Some(PathBuf::from("from-config")),
            ..Config::default()
        };
        let generator = Generator::new().with_config(config.clone());
        assert_eq!(generator.resolve_out_dir().expect("configured"), PathBuf::from("from-config"));
        let generator = Generator::new().with_config(config).out_dir("explicit");
        assert_eq!(generator.resolve_out_dir().expect("configured"), PathBuf::from("explicit"));
    }
}
