//! Generator configuration, read from a JSON file.
//!
//! ```json
//! {
//!     "attribute": "logger_message",
//!     "macro_crate": "logmsg_macro",
//!     "log_crate": "log",
//!     "out_dir": "src/generated",
//!     "include_header": true
//! }
//! ```
//!
//! Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Context, ErrorKind, Fallible};

/// Settings of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Name of the attribute that declares a logger message.
    pub attribute: String,
    /// Crate that exports the attribute; `macro_crate::attribute` is also recognised.
    pub macro_crate: String,
    /// Path of the `log` crate as seen from generated code.
    pub log_crate: String,
    /// Where generated files go, unless the caller picks a directory.
    pub out_dir: Option<PathBuf>,
    /// Start every generated file with an `@generated` comment.
    pub include_header: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attribute: "logger_message".into(),
            macro_crate: "logmsg_macro".into(),
            log_crate: "log".into(),
            out_dir: None,
            include_header: true,
        }
    }
}

impl Config {
    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid configuration.
    pub fn load(path: &Path) -> Fallible<Self> {
        let contents = fs::read_to_string(path).with_context(|| ErrorKind::ReadConfigError {
            file: path.to_owned(),
        })?;
        Self::from_json(&contents).with_context(|| ErrorKind::ParseConfigError {
            file: path.to_owned(),
        })
    }

    fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// The fully qualified attribute name collected declarations are matched against.
    #[must_use]
    pub fn qualified_attribute(&self) -> String {
        format!("{}::{}", self.macro_crate, self.attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Config::from_json("{}").expect("valid"), Config::default());
    }

    #[test]
    fn reads_fields() {
        let config = Config::from_json(
            r#"{ "attribute": "log_message", "log_crate": "::log", "out_dir": "gen", "include_header": false }"#,
        )
        .expect("valid");
        assert_eq!(config.attribute, "log_message");
        assert_eq!(config.macro_crate, "logmsg_macro");
        assert_eq!(config.log_crate, "::log");
        assert_eq!(config.out_dir, Some(PathBuf::from("gen")));
        assert!(!config.include_header);
        assert_eq!(config.qualified_attribute(), "logmsg_macro::log_message");
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(Config::from_json(r#"{ "atribute": "x" }"#).is_err());
    }
}
