//! Progress and error narration for a ranking run.
//!
//! The ranker reports what it is doing through a [`DiagnosticSink`]. Sinks
//! are purely observational: nothing they do can change the outcome. Use
//! [`NullSink`] to discard events, [`RecordingSink`] to inspect them, or
//! `TracingSink` (feature `tracing`) to forward them to `tracing`.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Severity attached to each event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// Why a candidate took no part in the ranking.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    /// The file could not be decoded into a non-empty image.
    Undecodable(String),
    /// Extraction failed for this image.
    ExtractionFailed(String),
    /// Extraction produced no descriptors.
    NoDescriptors,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Undecodable(reason) => write!(f, "could not load image: {reason}"),
            SkipReason::ExtractionFailed(reason) => write!(f, "feature extraction failed: {reason}"),
            SkipReason::NoDescriptors => f.write_str("no descriptors found"),
        }
    }
}

/// One narration event.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic<'a> {
    /// The scene could not be used; the run ends with the invalid-scene result.
    SceneRejected { reason: &'a str },
    /// Scene descriptors are ready and scanning begins.
    SceneReady { descriptors: usize },
    /// The candidate directory does not exist or cannot be listed.
    SourceUnavailable { location: &'a str, reason: &'a str },
    CandidateStarted { name: &'a str },
    CandidateSkipped { name: &'a str, reason: &'a SkipReason },
    CandidateScored { name: &'a str, score: usize },
    NewBest { name: &'a str, score: usize },
    /// Final answer of the run.
    Finished { result: &'a str },
}

impl Diagnostic<'_> {
    pub fn level(&self) -> Level {
        match self {
            Diagnostic::SceneRejected { .. } => Level::Error,
            Diagnostic::SourceUnavailable { .. } | Diagnostic::CandidateSkipped { .. } => {
                Level::Warn
            }
            Diagnostic::CandidateStarted { .. } | Diagnostic::CandidateScored { .. } => {
                Level::Debug
            }
            Diagnostic::SceneReady { .. }
            | Diagnostic::NewBest { .. }
            | Diagnostic::Finished { .. } => Level::Info,
        }
    }
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SceneRejected { reason } => write!(f, "scene image is invalid: {reason}"),
            Diagnostic::SceneReady { descriptors } => {
                write!(f, "scene ready with {descriptors} descriptors")
            }
            Diagnostic::SourceUnavailable { location, reason } => {
                write!(f, "cannot list tiles in {location}: {reason}")
            }
            Diagnostic::CandidateStarted { name } => write!(f, "processing tile {name}"),
            Diagnostic::CandidateSkipped { name, reason } => {
                write!(f, "skipping tile {name}: {reason}")
            }
            Diagnostic::CandidateScored { name, score } => {
                write!(f, "tile {name} has {score} good matches")
            }
            Diagnostic::NewBest { name, score } => {
                write!(f, "new best tile {name} with {score} good matches")
            }
            Diagnostic::Finished { result } => write!(f, "final result: {result}"),
        }
    }
}

/// Receiver for [`Diagnostic`] events.
pub trait DiagnosticSink {
    fn record(&self, event: &Diagnostic<'_>);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _event: &Diagnostic<'_>) {}
}

/// Owned copy of a recorded event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub level: Level,
    pub message: String,
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<Record>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records so far.
    pub fn records(&self) -> Vec<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of records at exactly `level`.
    pub fn count_at(&self, level: Level) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.level == level)
            .count()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, event: &Diagnostic<'_>) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Record {
                level: event.level(),
                message: event.to_string(),
            });
    }
}

/// Forwards events to `tracing` at the matching level.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl DiagnosticSink for TracingSink {
    fn record(&self, event: &Diagnostic<'_>) {
        match event.level() {
            Level::Debug => tracing::debug!(target: "tilematch", "{event}"),
            Level::Info => tracing::info!(target: "tilematch", "{event}"),
            Level::Warn => tracing::warn!(target: "tilematch", "{event}"),
            Level::Error => tracing::error!(target: "tilematch", "{event}"),
        }
    }
}
