//! Decode diagnostics and the collector attached to a font.

use super::types::Tag;
use core::fmt;
use std::sync::Mutex;

/// Severity of a decode diagnostic.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Severity {
    /// Cosmetic or known-benign format deviation.
    Minor,
    /// A local section is unusable; the rest of the graph may be consumed.
    Major,
    /// The decoded graph is unreliable and should be discarded.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
        })
    }
}

/// Classification of a decode issue.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum IssueKind {
    /// An offset, count or arithmetic operation would reach outside a buffer.
    Bounds,
    /// A format discriminator is out of range or a version is unsupported.
    Format,
    /// A sorted-sequence requirement is violated.
    Order,
    /// Extension or nested-array indirection depth exceeded.
    Recursion,
    /// A cross-table numeric requirement is violated.
    Consistency,
    /// A required table or section is absent.
    Missing,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Bounds => "bounds",
            Self::Format => "format",
            Self::Order => "order",
            Self::Recursion => "recursion",
            Self::Consistency => "consistency",
            Self::Missing => "missing",
        })
    }
}

/// Single decode diagnostic.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Diagnostic {
    /// Tag of the table the issue was found in.
    pub table: Tag,
    /// Label of the section within the table.
    pub section: &'static str,
    /// Classification of the issue.
    pub kind: IssueKind,
    /// Severity of the issue.
    pub severity: Severity,
    /// Byte offset of the issue within the table.
    pub offset: usize,
    /// Human readable description.
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} [{}/{}] {} at offset {}: {}",
            self.severity, self.table, self.section, self.kind, self.offset, self.detail
        )
    }
}

/// Non-error observation recorded during decoding.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Warning {
    /// Tag of the table the observation was made in.
    pub table: Tag,
    /// Human readable description.
    pub detail: String,
    /// Byte offset of the observation within the table.
    pub offset: usize,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {} at offset {}", self.table, self.detail, self.offset)
    }
}

/// Section-local decode failure, before table and section context is
/// attached.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct DecodeError {
    pub kind: IssueKind,
    pub offset: usize,
    pub detail: String,
}

impl DecodeError {
    pub fn bounds(offset: usize, detail: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Bounds,
            offset,
            detail: detail.into(),
        }
    }

    pub fn format(offset: usize, detail: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Format,
            offset,
            detail: detail.into(),
        }
    }

    pub fn order(offset: usize, detail: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Order,
            offset,
            detail: detail.into(),
        }
    }

    pub fn recursion(offset: usize, detail: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Recursion,
            offset,
            detail: detail.into(),
        }
    }

    pub fn missing(detail: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Missing,
            offset: 0,
            detail: detail.into(),
        }
    }

    pub fn into_diagnostic(
        self,
        table: Tag,
        section: &'static str,
        severity: Severity,
    ) -> Diagnostic {
        Diagnostic {
            table,
            section,
            kind: self.kind,
            severity,
            offset: self.offset,
            detail: self.detail,
        }
    }
}

/// Collector for diagnostics emitted while decoding a font.
///
/// The collector is shared with lazily decoded nodes, so appends go through
/// interior mutability. Readers always observe a snapshot.
#[derive(Default, Debug)]
pub struct DiagnosticList {
    errors: Mutex<Vec<Diagnostic>>,
    warnings: Mutex<Vec<Warning>>,
}

impl DiagnosticList {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, diagnostic: Diagnostic) {
        self.errors.lock().unwrap().push(diagnostic);
    }

    pub(crate) fn push_warning(&self, warning: Warning) {
        self.warnings.lock().unwrap().push(warning);
    }

    pub(crate) fn report(
        &self,
        table: Tag,
        section: &'static str,
        severity: Severity,
        error: DecodeError,
    ) -> Diagnostic {
        let diagnostic = error.into_diagnostic(table, section, severity);
        self.push(diagnostic.clone());
        diagnostic
    }

    /// Returns a snapshot of all recorded diagnostics.
    pub fn errors(&self) -> Vec<Diagnostic> {
        self.errors.lock().unwrap().clone()
    }

    /// Returns a snapshot of all recorded warnings.
    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings.lock().unwrap().clone()
    }

    /// Returns a snapshot of the critical diagnostics.
    pub fn critical_errors(&self) -> Vec<Diagnostic> {
        self.errors
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.severity == Severity::Critical)
            .cloned()
            .collect()
    }

    /// Returns true if any critical diagnostic has been recorded.
    pub fn has_critical_errors(&self) -> bool {
        self.errors
            .lock()
            .unwrap()
            .iter()
            .any(|d| d.severity == Severity::Critical)
    }
}

/// Top-level failure returned by [`Font::parse`](crate::Font::parse).
#[derive(Clone, Debug)]
pub struct Error {
    /// The diagnostic that aborted the decode.
    pub fatal: Diagnostic,
    /// Everything recorded up to and including the fatal diagnostic.
    pub diagnostics: Vec<Diagnostic>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.fatal)
    }
}

impl std::error::Error for Error {}
