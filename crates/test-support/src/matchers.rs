use std::fmt;
use std::process::Output;
use std::str;

use hamcrest2::core::{MatchResult, Matcher};

use crate::process::Builder;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    const fn name(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }

    fn of(self, output: &Output) -> Result<String, String> {
        let bytes = match self {
            Self::Stdout => &output.stdout,
            Self::Stderr => &output.stderr,
        };
        str::from_utf8(bytes)
            .map(|text| text.replace('\r', ""))
            .map_err(|_| format!("{} was not utf8 encoded", self.name()))
    }
}

/// Expectations on a finished process: its exit code and lines that must or
/// must not appear in its output.
#[derive(Clone)]
pub struct Execs {
    exit_code: Option<i32>,
    contains: Vec<(Stream, String)>,
    not_contains: Vec<(Stream, String)>,
}

impl Execs {
    /// Expects the process to exit with `expected`.
    #[must_use]
    pub const fn with_status(mut self, expected: i32) -> Self {
        self.exit_code = Some(expected);
        self
    }

    /// Verify that stdout contains the given contiguous lines.
    ///
    /// See [`lines_match`] for supported patterns.
    #[must_use]
    pub fn with_stdout_contains(mut self, expected: &str) -> Self {
        self.contains.push((Stream::Stdout, expected.to_owned()));
        self
    }

    /// Verify that stderr contains the given contiguous lines.
    #[must_use]
    pub fn with_stderr_contains(mut self, expected: &str) -> Self {
        self.contains.push((Stream::Stderr, expected.to_owned()));
        self
    }

    /// Expects no stdout line to match `expected`.
    #[must_use]
    pub fn with_stdout_does_not_contain(mut self, expected: &str) -> Self {
        self.not_contains.push((Stream::Stdout, expected.to_owned()));
        self
    }

    /// Verify that stderr does not contain the given contiguous lines.
    ///
    /// A typo in `expected` makes this pass without checking anything, so
    /// prefer pairing it with a positive expectation.
    #[must_use]
    pub fn with_stderr_does_not_contain(mut self, expected: &str) -> Self {
        self.not_contains.push((Stream::Stderr, expected.to_owned()));
        self
    }

    fn match_output(&self, actual: &Output) -> MatchResult {
        if let Some(code) = self.exit_code {
            if actual.status.code() != Some(code) {
                return Err(format!(
                    "exited with {}, expected {code}\n--- stdout\n{}\n--- stderr\n{}",
                    actual.status,
                    String::from_utf8_lossy(&actual.stdout),
                    String::from_utf8_lossy(&actual.stderr)
                ));
            }
        }

        for (stream, expected) in &self.contains {
            let text = stream.of(actual)?;
            if !contains_lines(&text, expected) {
                return Err(format!(
                    "expected to find:\n{expected}\n\ndid not find in {}:\n{text}",
                    stream.name()
                ));
            }
        }
        for (stream, expected) in &self.not_contains {
            let text = stream.of(actual)?;
            if contains_lines(&text, expected) {
                return Err(format!(
                    "expected not to find:\n{expected}\n\nbut found in {}:\n{text}",
                    stream.name()
                ));
            }
        }
        Ok(())
    }
}

/// True when `expected` matches a contiguous run of lines in `actual`.
fn contains_lines(actual: &str, expected: &str) -> bool {
    let actual: Vec<&str> = actual.lines().collect();
    let expected: Vec<&str> = expected.lines().collect();
    if expected.is_empty() {
        return true;
    }
    actual.windows(expected.len()).any(|window| {
        window
            .iter()
            .zip(&expected)
            .all(|(actual, expected)| lines_match(expected, actual))
    })
}

/// Compare a line with an expected pattern.
/// - Use `[..]` as a wildcard to match 0 or more characters on the same line.
/// - `[ERROR]` and `[WARNING]` stand for the `error:` and `warning:` prefixes.
#[must_use]
pub fn lines_match(expected: &str, actual: &str) -> bool {
    let expected = expected
        .replace("[ERROR]", "error:")
        .replace("[WARNING]", "warning:")
        .replace('\\', "/");
    let mut actual: &str = &actual.replace('\\', "/");
    for (i, part) in expected.split("[..]").enumerate() {
        match actual.find(part) {
            Some(j) => {
                if i == 0 && j != 0 {
                    return false;
                }
                actual = &actual[j + part.len()..];
            }
            None => return false,
        }
    }
    actual.is_empty() || expected.ends_with("[..]")
}

impl fmt::Display for Execs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "execs")
    }
}

impl fmt::Debug for Execs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "execs")
    }
}

impl Matcher<Builder> for Execs {
    fn matches(&self, mut process: Builder) -> MatchResult {
        self.matches(&mut process)
    }
}

impl<'a> Matcher<&'a mut Builder> for Execs {
    fn matches(&self, process: &'a mut Builder) -> MatchResult {
        println!("running {process}");
        match process.exec_with_output() {
            Ok(output) => self.match_output(&output),
            Err(error) => match error.output() {
                Some(output) => self.match_output(output),
                None => Err(format!("could not exec process {process}: {error}")),
            },
        }
    }
}

impl Matcher<Output> for Execs {
    fn matches(&self, output: Output) -> MatchResult {
        self.match_output(&output)
    }
}

/// Expects a successful exit unless [`Execs::with_status`] says otherwise.
#[must_use]
pub const fn execs() -> Execs {
    Execs {
        exit_code: Some(0),
        contains: Vec::new(),
        not_contains: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_match_works() {
        assert!(lines_match("a b", "a b"));
        assert!(lines_match("a[..]b", "a b"));
        assert!(lines_match("a[..]", "a b"));
        assert!(lines_match("[..]", "a b"));
        assert!(lines_match("[..]b", "a b"));
        assert!(lines_match("[ERROR] gone", "error: gone"));

        assert!(!lines_match("[..]b", "c"));
        assert!(!lines_match("b", "c"));
        assert!(!lines_match("b", "cb"));
    }

    #[test]
    fn contains_contiguous_lines() {
        let output = "one\ntwo\nthree\n";
        assert!(contains_lines(output, "two\nthree"));
        assert!(contains_lines(output, "t[..]"));
        assert!(!contains_lines(output, "one\nthree"));
        assert!(!contains_lines(output, "one\ntwo\nthree\nfour"));
    }
}
