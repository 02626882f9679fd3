//! Binds the arguments of one logger message attribute.
//!
//! The attribute has a fixed parameter list:
//!
//! | index | parameter        | required | shape                   |
//! |-------|------------------|----------|-------------------------|
//! | 0     | `name`           | yes      | string literal          |
//! | 1     | `logLevel`       | yes      | member reference        |
//! | 2     | `format`         | yes      | string literal          |
//! | 3     | `eventId`        | no       | number or string literal|
//! | 4     | `extensionScope` | no       | member reference        |
//!
//! A named argument binds by name. An unnamed argument binds by its own
//! position among the unnamed arguments, so named arguments placed before
//! or between them never shift their slots.

use std::fmt;

use crate::error::BindError;
use crate::event_id::{self, EventId, Severity};
use crate::symbol::{Location, SymbolLookup};
use crate::template::MessageTemplate;

/// A path with at least two segments, such as `LogLevel::Warning`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    segments: Vec<String>,
}

impl MemberRef {
    /// Returns `None` for paths with fewer than two segments.
    #[must_use]
    pub fn new(segments: Vec<String>) -> Option<Self> {
        (segments.len() >= 2).then_some(Self { segments })
    }

    /// The last segment, e.g. `Warning`.
    #[must_use]
    pub fn member(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Every path segment, e.g. `["LogLevel", "Warning"]`.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("::"))
    }
}

/// The syntactic shape of an attribute argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// A string literal, already unquoted.
    Str(String),
    /// An integer literal as written, sign included.
    Number(String),
    /// A path with at least two segments, e.g. `LogLevel::Warning`.
    Member(MemberRef),
    /// Anything else, kept as source text.
    Other(String),
}

impl ArgValue {
    const fn shape(&self) -> &'static str {
        match self {
            Self::Str(_) => "a string literal",
            Self::Number(_) => "a number literal",
            Self::Member(_) => "a member reference",
            Self::Other(_) => "an expression",
        }
    }
}

/// One argument of an attribute as written, with its optional name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// `Some` for `name = value` arguments.
    pub name: Option<String>,
    /// The argument value.
    pub value: ArgValue,
}

impl Argument {
    /// An argument without a name.
    #[must_use]
    pub const fn positional(value: ArgValue) -> Self {
        Self { name: None, value }
    }

    /// An argument written as `name = value`.
    pub fn named(name: impl Into<String>, value: ArgValue) -> Self {
        Self {
            name: Some(name.into()),
            value,
        }
    }
}

/// A parameter of the logger message attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    /// Message name, slot 0.
    Name,
    /// Level member reference, slot 1.
    LogLevel,
    /// Message template, slot 2.
    Format,
    /// Optional explicit event id, slot 3.
    EventId,
    /// Optional extension scope, slot 4.
    ExtensionScope,
}

/// Parameters in positional order, with their accepted spellings.
const PARAMETERS: [(Parameter, &str, &str); 5] = [
    (Parameter::Name, "name", "name"),
    (Parameter::LogLevel, "logLevel", "log_level"),
    (Parameter::Format, "format", "format"),
    (Parameter::EventId, "eventId", "event_id"),
    (Parameter::ExtensionScope, "extensionScope", "extension_scope"),
];

impl Parameter {
    /// The parameter bound by the positional argument at `index`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        PARAMETERS.get(index).map(|&(parameter, ..)| parameter)
    }

    /// Accepts both the camel case and the snake case spelling.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        PARAMETERS
            .iter()
            .find(|&&(_, camel, snake)| name == camel || name == snake)
            .map(|&(parameter, ..)| parameter)
    }

    /// Camel case name, as used in messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::LogLevel => "logLevel",
            Self::Format => "format",
            Self::EventId => "eventId",
            Self::ExtensionScope => "extensionScope",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which logger handles a generated message is available on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtensionScope {
    /// Only the logger bound to the annotated type's category.
    #[default]
    Generic,
    /// Any logger.
    Interface,
}

/// One successfully bound attribute instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeBinding {
    name: String,
    log_level: MemberRef,
    template: MessageTemplate,
    event_id: Option<String>,
    extension_scope: ExtensionScope,
}

impl AttributeBinding {
    /// Name of the message.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The log level exactly as referenced by the attribute.
    #[must_use]
    pub const fn log_level(&self) -> &MemberRef {
        &self.log_level
    }

    /// Severity read from the level member.
    #[must_use]
    pub fn severity(&self) -> Severity {
        Severity::from_name(self.log_level.member())
    }

    /// The parsed message template.
    #[must_use]
    pub const fn template(&self) -> &MessageTemplate {
        &self.template
    }

    /// The explicit event id, if the attribute had one.
    #[must_use]
    pub fn explicit_event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    /// Which logger handles the message is available on.
    #[must_use]
    pub const fn extension_scope(&self) -> ExtensionScope {
        self.extension_scope
    }

    /// The event id to use when this binding is attribute `attribute` of
    /// declaration `declaration`.
    #[must_use]
    pub fn event_id(&self, declaration: usize, attribute: usize) -> EventId {
        self.event_id.clone().map_or_else(
            || EventId::Derived(event_id::derive(self.severity().code(), declaration, attribute)),
            EventId::Explicit,
        )
    }
}

fn malformed(parameter: Parameter, expected: &'static str, found: &ArgValue) -> BindError {
    BindError::MalformedAttributeArgument {
        parameter,
        expected,
        found: found.shape(),
    }
}

/// Binds `arguments` to the attribute's parameters. Placeholder types in the
/// format are resolved as seen from `location`.
///
/// # Errors
///
/// Any [`BindError`]; the attribute instance then produces nothing.
pub fn bind(
    arguments: &[Argument],
    lookup: &dyn SymbolLookup,
    location: &Location,
) -> Result<AttributeBinding, BindError> {
    let mut name = None;
    let mut log_level = None;
    let mut template = None;
    let mut event_id = None;
    let mut extension_scope = ExtensionScope::default();
    let mut position = 0;

    for argument in arguments {
        let parameter = match &argument.name {
            Some(named) => Parameter::from_name(named)
                .ok_or_else(|| BindError::ParameterOutOfRange(format!("named `{named}`")))?,
            None => {
                let index = position;
                position += 1;
                Parameter::from_index(index)
                    .ok_or_else(|| BindError::ParameterOutOfRange(format!("at position {index}")))?
            }
        };

        match (parameter, &argument.value) {
            (Parameter::Name, ArgValue::Str(value)) => name = Some(value.clone()),
            (Parameter::LogLevel, ArgValue::Member(member)) => log_level = Some(member.clone()),
            (Parameter::Format, ArgValue::Str(raw)) => {
                if raw.is_empty() {
                    return Err(BindError::MissingRequiredField(Parameter::Format));
                }
                template = Some(MessageTemplate::parse(raw, lookup, location)?);
            }
            (Parameter::EventId, ArgValue::Number(value) | ArgValue::Str(value)) => {
                event_id = Some(value.clone());
            }
            (Parameter::ExtensionScope, ArgValue::Member(member)) => {
                extension_scope = match member.member() {
                    "Generic" => ExtensionScope::Generic,
                    "Interface" => ExtensionScope::Interface,
                    _ => {
                        return Err(malformed(
                            parameter,
                            "`Scope::Generic` or `Scope::Interface`",
                            &argument.value,
                        ));
                    }
                };
            }
            (Parameter::Name | Parameter::Format, value) => {
                return Err(malformed(parameter, "a string literal", value));
            }
            (Parameter::LogLevel | Parameter::ExtensionScope, value) => {
                return Err(malformed(parameter, "a member reference", value));
            }
            (Parameter::EventId, value) => {
                return Err(malformed(parameter, "a number or string literal", value));
            }
        }
    }

    let name = name
        .filter(|name| !name.is_empty())
        .ok_or(BindError::MissingRequiredField(Parameter::Name))?;
    let log_level = log_level.ok_or(BindError::MissingRequiredField(Parameter::LogLevel))?;
    let template = template.ok_or(BindError::MissingRequiredField(Parameter::Format))?;

    Ok(AttributeBinding {
        name,
        log_level,
        template,
        event_id,
        extension_scope,
    })
}
