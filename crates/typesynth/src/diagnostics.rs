//! Error types and anomaly reporting
//!
//! Fatal problems (unreadable files, malformed documents, invalid
//! libraries) are `SynthError`s. Irregularities in otherwise well-formed
//! metadata are `Anomaly` records: they are logged, collected, and never
//! stop a synthesis run.

use crate::ir::LibraryValidationError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for typesynth operations
pub type SynthResult<T> = Result<T, SynthError>;

/// Main error type for typesynth
#[derive(Debug, Error)]
pub enum SynthError {
    /// A metadata or configuration file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed metadata document
    #[error("invalid metadata document: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed configuration
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Library failed identity validation
    #[error("invalid library: {0}")]
    InvalidLibrary(#[from] LibraryValidationError),
}

/// Anomaly severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational: expected irregularity in real-world metadata
    Info,
    /// Warning: suspicious input, synthesis continued
    Warning,
    /// Error: unexpected shape or broken invariant, affected item skipped
    Error,
}

impl Severity {
    /// Get display string
    pub fn display(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Category of an anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnomalyKind {
    /// A conventionally-named event method does not exist
    MissingMethod,
    /// An event method exists but its parameters have an unexpected shape
    UnexpectedParameterShape,
    /// A settings field shares its name with an event but is not a handler slot
    SettingsFieldCollision,
    /// An ancestor declares the same event name more than once
    DuplicateAncestorEvent,
    /// The `extends` chain loops back on itself
    InheritanceCycle,
    /// A class declares the same event name twice
    DuplicateEvent,
    /// A synthesized name is already taken by an existing symbol
    NameCollision,
}

impl AnomalyKind {
    /// Short code used in formatted output
    pub fn code(&self) -> &'static str {
        match self {
            AnomalyKind::MissingMethod => "missing-method",
            AnomalyKind::UnexpectedParameterShape => "unexpected-parameter-shape",
            AnomalyKind::SettingsFieldCollision => "settings-field-collision",
            AnomalyKind::DuplicateAncestorEvent => "duplicate-ancestor-event",
            AnomalyKind::InheritanceCycle => "inheritance-cycle",
            AnomalyKind::DuplicateEvent => "duplicate-event",
            AnomalyKind::NameCollision => "name-collision",
        }
    }

    /// Default severity of this kind
    pub fn severity(&self) -> Severity {
        match self {
            AnomalyKind::MissingMethod | AnomalyKind::SettingsFieldCollision => Severity::Info,
            AnomalyKind::InheritanceCycle
            | AnomalyKind::DuplicateEvent
            | AnomalyKind::NameCollision => Severity::Warning,
            AnomalyKind::UnexpectedParameterShape | AnomalyKind::DuplicateAncestorEvent => {
                Severity::Error
            }
        }
    }
}

/// A recorded irregularity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub severity: Severity,
    /// FQN of the class being processed
    pub class: String,
    /// Event being processed, if any
    pub event: Option<String>,
    pub message: String,
}

impl Anomaly {
    /// Create an anomaly with the kind's default severity
    pub fn new(kind: AnomalyKind, class: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            class: class.into(),
            event: None,
            message: message.into(),
        }
    }

    /// Attach the event name
    pub fn for_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Format the anomaly for display
    pub fn format(&self) -> String {
        let mut result = self.class.clone();
        if let Some(ref event) = self.event {
            result.push('#');
            result.push_str(event);
        }
        result.push_str(": ");
        result.push_str(self.severity.display());
        result.push('[');
        result.push_str(self.kind.code());
        result.push_str("]: ");
        result.push_str(&self.message);
        result
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Collector for anomalies during a synthesis run
#[derive(Debug, Default, Clone)]
pub struct AnomalyLog {
    anomalies: Vec<Anomaly>,
}

impl AnomalyLog {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an anomaly and mirror it to the log
    pub fn record(&mut self, anomaly: Anomaly) {
        match anomaly.severity {
            Severity::Info => tracing::info!(target: "typesynth::anomaly", "{}", anomaly),
            Severity::Warning => tracing::warn!(target: "typesynth::anomaly", "{}", anomaly),
            Severity::Error => tracing::error!(target: "typesynth::anomaly", "{}", anomaly),
        }
        self.anomalies.push(anomaly);
    }

    /// Move every anomaly of `other` into this log without re-logging
    pub fn extend(&mut self, other: AnomalyLog) {
        self.anomalies.extend(other.anomalies);
    }

    /// Get all anomalies
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    pub fn is_empty(&self) -> bool {
        self.anomalies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.anomalies.len()
    }

    /// Anomalies of one kind
    pub fn of_kind(&self, kind: AnomalyKind) -> impl Iterator<Item = &Anomaly> {
        self.anomalies.iter().filter(move |a| a.kind == kind)
    }

    /// Count anomalies at a severity
    pub fn count(&self, severity: Severity) -> usize {
        self.anomalies
            .iter()
            .filter(|a| a.severity == severity)
            .count()
    }

    /// Check if there are any error-severity anomalies
    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// One-line summary, e.g. "2 error(s), 0 warning(s), 5 info"
    pub fn summary(&self) -> String {
        format!(
            "{} error(s), {} warning(s), {} info",
            self.count(Severity::Error),
            self.count(Severity::Warning),
            self.count(Severity::Info)
        )
    }
}
