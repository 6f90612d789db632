//! External POM downloader boundary.

use thiserror::Error;

use crate::context::ResolverContext;
use crate::model::RawPom;
use crate::repository::{MavenRepository, MAVEN_CENTRAL};

/// Failure raised by a [`PomDownloader`] implementation. The resolver wraps
/// these into `ResolutionError::DownloaderFailure` reports and continues.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct DownloadError {
    pub message: String,
}

impl DownloadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Supplies raw POM descriptors to the resolver.
///
/// Implementations own fetching, decoding, retries, and any on-disk caching.
/// `Ok(None)` means the POM does not exist in any of the given repositories;
/// the resolver tolerates that and continues with a best-effort result.
/// `repositories` is already ordered by precedence (execution context first,
/// then POM-declared, child before parent); implementations are expected to
/// try [`central_repository`](PomDownloader::central_repository) last.
pub trait PomDownloader {
    #[allow(clippy::too_many_arguments)]
    fn download(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        relative_path: Option<&str>,
        containing_pom: Option<&RawPom>,
        repositories: &[MavenRepository],
        ctx: &ResolverContext,
    ) -> Result<Option<RawPom>, DownloadError>;

    /// The well-known fallback repository consulted after every explicit one.
    fn central_repository(&self) -> MavenRepository {
        MAVEN_CENTRAL.clone()
    }
}
