//! Execution context handle threaded through resolution.

use crate::error::{ErrorSink, ResolutionError};
use crate::repository::{MavenRepository, MavenRepositoryCredentials, MavenRepositoryMirror};

/// Immutable handle carrying the user settings a resolution runs under:
/// settings-level repositories, mirror and credential rewrites, the active
/// profile set, and the error sink. Cloning is cheap; the sink is shared.
#[derive(Debug, Clone, Default)]
pub struct ResolverContext {
    pub repositories: Vec<MavenRepository>,
    pub mirrors: Vec<MavenRepositoryMirror>,
    pub credentials: Vec<MavenRepositoryCredentials>,
    pub active_profiles: Vec<String>,
    pub on_error: ErrorSink,
}

impl ResolverContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repositories(mut self, repositories: Vec<MavenRepository>) -> Self {
        self.repositories = repositories;
        self
    }

    pub fn with_mirrors(mut self, mirrors: Vec<MavenRepositoryMirror>) -> Self {
        self.mirrors = mirrors;
        self
    }

    pub fn with_credentials(mut self, credentials: Vec<MavenRepositoryCredentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_active_profiles(mut self, active_profiles: Vec<String>) -> Self {
        self.active_profiles = active_profiles;
        self
    }

    pub fn with_error_sink(mut self, on_error: ErrorSink) -> Self {
        self.on_error = on_error;
        self
    }

    pub(crate) fn report(&self, error: ResolutionError) {
        self.on_error.report(error);
    }
}
