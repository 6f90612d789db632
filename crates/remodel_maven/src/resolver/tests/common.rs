use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::*;
use crate::downloader::DownloadError;
use crate::error::ErrorSink;

/// In-memory downloader backed by a fixed map of raw poms. Clones share
/// state, so tests keep a handle for inspection after the resolver takes
/// ownership of its copy.
#[derive(Clone, Default)]
pub(crate) struct MapDownloader {
    state: Arc<DownloaderState>,
}

#[derive(Default)]
struct DownloaderState {
    poms: Mutex<HashMap<(String, String, String), RawPom>>,
    requests: Mutex<Vec<DownloadRequest>>,
}

#[derive(Debug, Clone)]
pub(crate) struct DownloadRequest {
    pub(crate) coordinates: String,
    pub(crate) repositories: Vec<String>,
}

impl MapDownloader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put(&self, group_id: &str, artifact_id: &str, version: &str, raw: RawPom) {
        self.state.poms.lock().expect("poms lock").insert(
            (
                group_id.to_string(),
                artifact_id.to_string(),
                version.to_string(),
            ),
            raw,
        );
    }

    pub(crate) fn requests_for(&self, coordinates: &str) -> Vec<DownloadRequest> {
        self.state
            .requests
            .lock()
            .expect("requests lock")
            .iter()
            .filter(|request| request.coordinates == coordinates)
            .cloned()
            .collect()
    }
}

impl PomDownloader for MapDownloader {
    fn download(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        _relative_path: Option<&str>,
        _containing_pom: Option<&RawPom>,
        repositories: &[MavenRepository],
        _ctx: &ResolverContext,
    ) -> Result<Option<RawPom>, DownloadError> {
        self.state
            .requests
            .lock()
            .expect("requests lock")
            .push(DownloadRequest {
                coordinates: format!("{group_id}:{artifact_id}:{version}"),
                repositories: repositories
                    .iter()
                    .map(|repository| repository.uri.to_string())
                    .collect(),
            });
        Ok(self
            .state
            .poms
            .lock()
            .expect("poms lock")
            .get(&(
                group_id.to_string(),
                artifact_id.to_string(),
                version.to_string(),
            ))
            .cloned())
    }
}

/// Downloader that fails every request, for failure-report tests.
pub(crate) struct FailingDownloader;

impl PomDownloader for FailingDownloader {
    fn download(
        &self,
        _group_id: &str,
        _artifact_id: &str,
        _version: &str,
        _relative_path: Option<&str>,
        _containing_pom: Option<&RawPom>,
        _repositories: &[MavenRepository],
        _ctx: &ResolverContext,
    ) -> Result<Option<RawPom>, DownloadError> {
        Err(DownloadError::new("connection refused"))
    }
}

pub(crate) fn raw_pom(group_id: &str, artifact_id: &str, version: &str) -> RawPom {
    RawPom {
        group_id: Some(group_id.to_string()),
        artifact_id: Some(artifact_id.to_string()),
        version: Some(version.to_string()),
        ..RawPom::default()
    }
}

pub(crate) fn resolver_with(
    downloader: MapDownloader,
) -> (
    PomResolver<MapDownloader>,
    Arc<Mutex<Vec<ResolutionError>>>,
) {
    resolver_with_context(downloader, ResolverContext::new())
}

pub(crate) fn resolver_with_context<D: PomDownloader>(
    downloader: D,
    context: ResolverContext,
) -> (PomResolver<D>, Arc<Mutex<Vec<ResolutionError>>>) {
    let (sink, errors) = ErrorSink::collecting();
    (
        PomResolver::new(downloader, context.with_error_sink(sink)),
        errors,
    )
}
