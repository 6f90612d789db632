use std::fmt;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Coordinate component that failed to normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateField {
    GroupId,
    ArtifactId,
    Version,
}

impl CoordinateField {
    pub const fn as_str(self) -> &'static str {
        match self {
            CoordinateField::GroupId => "group ID",
            CoordinateField::ArtifactId => "artifact ID",
            CoordinateField::Version => "version",
        }
    }
}

impl fmt::Display for CoordinateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal issues collected while resolving a POM.
///
/// The resolver never surfaces these as `Err`: every kind is pushed to the
/// [`ErrorSink`] and resolution continues with a best-effort result. Overall
/// failure is signalled by returning nothing from the enclosing step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Unable to resolve {field} for raw pom [{pom}]")]
    UnresolvedCoordinate { pom: String, field: CoordinateField },

    #[error(
        "Cycle in parent poms detected: {coordinates} is its own parent by way of these poms: {chain}"
    )]
    ParentCycle { coordinates: String, chain: String },

    #[error("Invalid repository URL '{url}': {reason}")]
    MalformedRepositoryUrl { url: String, reason: String },

    #[error("Managed dependency {group_id}:{artifact_id} declares unrecognized scope '{scope}'")]
    InvalidManagedScope {
        group_id: String,
        artifact_id: String,
        scope: String,
    },

    #[error("Import-scoped managed dependency {group_id}:{artifact_id} is missing a version")]
    BomMissingVersion {
        group_id: String,
        artifact_id: String,
    },

    #[error("Unable to resolve property placeholder in '{value}' (declared in [{pom}])")]
    PropertyUnresolvable { pom: String, value: String },

    #[error("Downloader failed while fetching {coordinates} (requested by [{pom}]): {message}")]
    DownloaderFailure {
        pom: String,
        coordinates: String,
        message: String,
    },
}

/// Capability used to report non-fatal resolution errors.
///
/// The sink is passed by value through the execution context; clones share
/// the same receiver. The default sink drops everything.
#[derive(Clone)]
pub struct ErrorSink {
    inner: Arc<dyn Fn(ResolutionError) + Send + Sync>,
}

impl ErrorSink {
    pub fn new(receiver: impl Fn(ResolutionError) + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(receiver),
        }
    }

    /// Sink that ignores every report.
    pub fn ignore() -> Self {
        Self::new(|_| {})
    }

    /// Sink that accumulates reports into a shared vector, for inspection in
    /// tests and batch tooling.
    pub fn collecting() -> (Self, Arc<Mutex<Vec<ResolutionError>>>) {
        let collected = Arc::new(Mutex::new(Vec::new()));
        let sink_target = Arc::clone(&collected);
        let sink = Self::new(move |error| {
            if let Ok(mut errors) = sink_target.lock() {
                errors.push(error);
            }
        });
        (sink, collected)
    }

    pub fn report(&self, error: ResolutionError) {
        (self.inner)(error);
    }
}

impl Default for ErrorSink {
    fn default() -> Self {
        Self::ignore()
    }
}

impl fmt::Debug for ErrorSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorSink")
    }
}
