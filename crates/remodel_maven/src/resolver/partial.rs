//! Partial resolution state for a single POM and its ancestors.

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::context::ResolverContext;
use crate::error::ResolutionError;
use crate::model::{GroupArtifact, RawPom};
use crate::placeholder;
use crate::pom::ManagedDependency;
use crate::repository::MavenRepository;

/// Intermediate state between the raw descriptor and the resolved model.
///
/// Coordinates are concrete: no field contains `${` once the partial exists.
/// The chain is built child-to-root; a child owns a link to its parent and
/// never the other way around. The two dependency tables are finalized
/// exactly once, before the fingerprint is ever computed.
#[derive(Debug)]
pub(crate) struct PartialPom {
    pub raw: Arc<RawPom>,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub parent: Option<Arc<PartialPom>>,
    /// Repositories declared in this pom, mirror and credential rewrites
    /// already applied.
    pub repositories: Vec<MavenRepository>,
    /// Properties whose effective value differs from the locally declared
    /// one, keyed by the placeholder names this pom actually references.
    pub property_overrides: IndexMap<String, String>,
    dependency_management: OnceCell<Vec<ManagedDependency>>,
    dependency_overrides: OnceCell<IndexMap<GroupArtifact, String>>,
}

impl PartialPom {
    pub fn new(
        raw: Arc<RawPom>,
        group_id: String,
        artifact_id: String,
        version: String,
        parent: Option<Arc<PartialPom>>,
        repositories: Vec<MavenRepository>,
        property_overrides: IndexMap<String, String>,
    ) -> Self {
        Self {
            raw,
            group_id,
            artifact_id,
            version,
            parent,
            repositories,
            property_overrides,
            dependency_management: OnceCell::new(),
            dependency_overrides: OnceCell::new(),
        }
    }

    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }

    pub fn finalize_dependency_management(&self, entries: Vec<ManagedDependency>) {
        let _ = self.dependency_management.set(entries);
    }

    pub fn finalize_dependency_overrides(&self, overrides: IndexMap<GroupArtifact, String>) {
        let _ = self.dependency_overrides.set(overrides);
    }

    pub fn dependency_management(&self) -> &[ManagedDependency] {
        self.dependency_management
            .get()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Property lookup in resolution-precedence order: reserved coordinate
    /// tokens, process-scope overrides, the override map, locally declared
    /// properties, then the parent chain. The first hit wins.
    pub fn property(&self, key: &str) -> Option<String> {
        match key {
            "groupId" | "project.groupId" | "pom.groupId" => return Some(self.group_id.clone()),
            "artifactId" | "project.artifactId" | "pom.artifactId" => {
                return Some(self.artifact_id.clone())
            }
            "version" | "project.version" | "pom.version" => return Some(self.version.clone()),
            "project.parent.groupId" => {
                return self.parent.as_ref().map(|parent| parent.group_id.clone())
            }
            "project.parent.artifactId" => {
                return self
                    .parent
                    .as_ref()
                    .map(|parent| parent.artifact_id.clone())
            }
            "project.parent.version" => {
                return self.parent.as_ref().map(|parent| parent.version.clone())
            }
            _ => {}
        }

        if let Ok(value) = std::env::var(key) {
            return Some(value);
        }
        if let Some(value) = self.property_overrides.get(key) {
            return Some(value.clone());
        }
        if let Some(value) = self.raw.properties.get(key) {
            return Some(value.clone());
        }
        self.parent
            .as_ref()
            .and_then(|parent| parent.property(key))
    }

    /// Evaluates `value` through this partial's property view. Placeholders
    /// that stay unresolved are left intact.
    pub fn value(&self, value: &str) -> String {
        placeholder::evaluate(value, |key| self.property(key))
    }

    /// Evaluated value, or `None` (without a report) when the input is
    /// absent, evaluates to empty, or still carries a placeholder.
    pub fn concrete_value(&self, value: Option<&str>) -> Option<String> {
        let evaluated = self.value(value?);
        let trimmed = evaluated.trim();
        if trimmed.is_empty() || placeholder::contains_placeholder(trimmed) {
            return None;
        }
        Some(trimmed.to_string())
    }

    /// Like [`concrete_value`](Self::concrete_value), but a value that cannot
    /// be fully expanded is reported as `PropertyUnresolvable`.
    pub fn required_value(&self, value: Option<&str>, ctx: &ResolverContext) -> Option<String> {
        let raw = value?;
        match self.concrete_value(Some(raw)) {
            Some(evaluated) => Some(evaluated),
            None => {
                ctx.report(ResolutionError::PropertyUnresolvable {
                    pom: self.coordinates(),
                    value: raw.to_string(),
                });
                None
            }
        }
    }

    /// Effective repository order for fetching artifacts referenced by this
    /// pom: execution-context repositories first, then declared repositories
    /// child-before-parent, de-duplicated preserving first occurrence. The
    /// downloader appends central on its own.
    pub fn effective_repositories(&self, ctx: &ResolverContext) -> Vec<MavenRepository> {
        let mut ordered: IndexSet<MavenRepository> = ctx.repositories.iter().cloned().collect();
        let mut cursor = Some(self);
        while let Some(level) = cursor {
            ordered.extend(level.repositories.iter().cloned());
            cursor = level.parent.as_deref();
        }
        ordered.into_iter().collect()
    }

    /// Structural identity of the partial. Two partials with equal
    /// fingerprints resolve to equal models, which is what makes the
    /// memoization map sound.
    pub fn fingerprint(&self) -> PomFingerprint {
        let mut property_overrides: Vec<(String, String)> = self
            .property_overrides
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        property_overrides.sort();

        let mut dependency_overrides: Vec<(String, String)> = self
            .dependency_overrides
            .get()
            .map(|overrides| {
                overrides
                    .iter()
                    .map(|(key, version)| (key.to_string(), version.clone()))
                    .collect()
            })
            .unwrap_or_default();
        dependency_overrides.sort();

        PomFingerprint {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            version: self.version.clone(),
            parent: self
                .parent
                .as_ref()
                .map(|parent| Box::new(parent.fingerprint())),
            property_overrides,
            dependency_overrides,
        }
    }
}

/// Memoization key: exactly the six components that can distinguish two
/// resolutions of the same underlying raw descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct PomFingerprint {
    group_id: String,
    artifact_id: String,
    version: String,
    parent: Option<Box<PomFingerprint>>,
    property_overrides: Vec<(String, String)>,
    dependency_overrides: Vec<(String, String)>,
}
