//! Severity codes and derived event ids.
//!
//! When an attribute carries no explicit event id one is packed from the
//! severity, the declaration ordinal and the attribute ordinal:
//!
//! ```text
//!  31    28 27                   12 11           0
//! +--------+-----------------------+--------------+
//! |severity|  declaration ordinal  |  attr ordinal|
//! +--------+-----------------------+--------------+
//! ```

use std::fmt;

/// Severity of a logger message, read from its level member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Code 0.
    Trace,
    /// Code 1.
    Debug,
    /// Code 2.
    Information,
    /// Code 3.
    Warning,
    /// Code 4.
    Error,
    /// Code 5.
    Critical,
    /// `None` or any name not in the table.
    Unknown,
}

impl Severity {
    /// Maps the member name of a log level reference, e.g. `Warning` in
    /// `LogLevel::Warning`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Trace" => Self::Trace,
            "Debug" => Self::Debug,
            "Information" => Self::Information,
            "Warning" => Self::Warning,
            "Error" => Self::Error,
            "Critical" => Self::Critical,
            _ => Self::Unknown,
        }
    }

    /// Code stored in the top four bits of a derived event id.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Trace => 0,
            Self::Debug => 1,
            Self::Information => 2,
            Self::Warning => 3,
            Self::Error => 4,
            Self::Critical => 5,
            Self::Unknown => 6,
        }
    }
}

/// Packs a derived event id. Every field is masked to its width first.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const fn derive(severity: u32, declaration: usize, attribute: usize) -> i32 {
    let packed = (severity & 0xF) << 28
        | ((declaration & 0xFFFF) as u32) << 12
        | (attribute & 0xFFF) as u32;
    packed as i32
}

/// The event id of one message: written by the user or derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventId {
    /// The literal text of the `eventId` argument.
    Explicit(String),
    /// Packed with [`derive`].
    Derived(i32),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(text) => f.write_str(text),
            Self::Derived(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_table() {
        let names = ["Trace", "Debug", "Information", "Warning", "Error", "Critical"];
        for (code, name) in (0..).zip(names) {
            assert_eq!(Severity::from_name(name).code(), code);
        }
        assert_eq!(Severity::from_name("None").code(), 6);
        assert_eq!(Severity::from_name("Warn").code(), 6);
        assert_eq!(Severity::from_name("warning").code(), 6);
    }

    #[test]
    fn packs_fields() {
        assert_eq!(derive(3, 0, 0), 3 << 28);
        assert_eq!(derive(2, 1, 2), (2 << 28) | (1 << 12) | 2);
        assert_eq!(derive(0, 0xFFFF, 0xFFF), 0x0FFF_FFFF);
    }

    #[test]
    fn masks_overflowing_fields() {
        assert_eq!(derive(3, 0x1_0001, 0x1001), derive(3, 1, 1));
        assert_eq!(derive(0x13, 0, 0), derive(3, 0, 0));
    }

    #[test]
    fn high_severities_wrap_to_negative() {
        assert_eq!(derive(15, 0, 0), i32::MIN | 0x7000_0000);
        assert!(derive(8, 0, 0) < 0);
    }

    #[test]
    fn distinct_ordinals_give_distinct_ids() {
        let mut seen = std::collections::HashSet::new();
        for declaration in [0, 1, 2, 255, 4096, 0xFFFF] {
            for attribute in [0, 1, 2, 63, 0xFFF] {
                assert!(seen.insert(derive(4, declaration, attribute)));
            }
        }
    }

    #[test]
    fn event_id_display() {
        assert_eq!(EventId::Explicit("42".into()).to_string(), "42");
        assert_eq!(EventId::Derived(derive(3, 0, 0)).to_string(), "805306368");
    }
}
