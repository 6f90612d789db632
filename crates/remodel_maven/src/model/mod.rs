//! Raw project descriptor model.
//!
//! [`RawPom`] mirrors an unresolved `pom.xml` exactly as the decoding layer
//! produced it: coordinates may carry `${...}` placeholders, the version may
//! be missing, and profile-qualified sections are kept separate from the base
//! sections. The resolver only ever reads this model through the
//! profile-aware accessors below; profile *activation* is decided by the
//! layer that parsed the document.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `groupId` + `artifactId` pair identifying an artifact line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupArtifact {
    pub group_id: String,
    pub artifact_id: String,
}

impl GroupArtifact {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }
}

impl fmt::Display for GroupArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// `<parent>` 参照。`relative_path` はファイルシステム探索のヒント。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawParent {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub relative_path: Option<String>,
}

impl RawParent {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            relative_path: None,
        }
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = Some(relative_path.into());
        self
    }
}

/// `<repository>` 宣言の未解決表現。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRepository {
    pub id: Option<String>,
    pub url: String,
    pub releases: Option<bool>,
    pub snapshots: Option<bool>,
}

impl RawRepository {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            url: url.into(),
            releases: None,
            snapshots: None,
        }
    }

    pub fn with_releases(mut self, enabled: bool) -> Self {
        self.releases = Some(enabled);
        self
    }

    pub fn with_snapshots(mut self, enabled: bool) -> Self {
        self.snapshots = Some(enabled);
        self
    }
}

/// `<dependency>` entry, shared between the direct-dependency and
/// dependency-management sections. Every field may still carry placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDependency {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub scope: Option<String>,
    #[serde(rename = "type")]
    pub dep_type: Option<String>,
    pub classifier: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub exclusions: Vec<GroupArtifact>,
}

impl RawDependency {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: Some(group_id.into()),
            artifact_id: Some(artifact_id.into()),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_type(mut self, dep_type: impl Into<String>) -> Self {
        self.dep_type = Some(dep_type.into());
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_exclusion(mut self, exclusion: GroupArtifact) -> Self {
        self.exclusions.push(exclusion);
        self
    }
}

/// `<license>` 宣言。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLicense {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Named, conditionally activated subset of a POM's configuration. Whether a
/// profile is active is decided outside the resolver; the accessors on
/// [`RawPom`] only match profile ids against the supplied active set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    pub id: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, String>,
    #[serde(default)]
    pub repositories: Vec<RawRepository>,
    #[serde(default)]
    pub dependencies: Vec<RawDependency>,
    #[serde(default)]
    pub dependency_management: Vec<RawDependency>,
}

impl RawProfile {
    pub fn is_active(&self, active_profiles: &[String]) -> bool {
        self.id
            .as_deref()
            .is_some_and(|id| active_profiles.iter().any(|active| active == id))
    }
}

/// Unresolved project descriptor as decoded from its XML source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub snapshot_version: Option<String>,
    pub parent: Option<RawParent>,
    #[serde(default)]
    pub properties: IndexMap<String, String>,
    #[serde(default)]
    pub repositories: Vec<RawRepository>,
    #[serde(default)]
    pub dependencies: Vec<RawDependency>,
    #[serde(default)]
    pub dependency_management: Vec<RawDependency>,
    #[serde(default)]
    pub licenses: Vec<RawLicense>,
    #[serde(default)]
    pub profiles: Vec<RawProfile>,
}

impl RawPom {
    /// Display form of the declared coordinates, placeholders and all. Only
    /// used for diagnostics; resolution goes through the normalizer.
    pub fn coordinates(&self) -> String {
        format!(
            "{}:{}:{}",
            self.group_id.as_deref().unwrap_or("?"),
            self.artifact_id.as_deref().unwrap_or("?"),
            self.version.as_deref().unwrap_or("?"),
        )
    }

    fn active_profiles<'a>(&'a self, active_profiles: &[String]) -> Vec<&'a RawProfile> {
        self.profiles
            .iter()
            .filter(|profile| profile.is_active(active_profiles))
            .collect()
    }

    /// Base properties merged with the properties of every active profile;
    /// a profile redefining a key wins over the base section.
    pub fn active_properties(&self, active_profiles: &[String]) -> IndexMap<String, String> {
        let mut properties = self.properties.clone();
        for profile in self.active_profiles(active_profiles) {
            for (key, value) in &profile.properties {
                properties.insert(key.clone(), value.clone());
            }
        }
        properties
    }

    /// Base repositories followed by the repositories of active profiles.
    pub fn active_repositories<'a>(&'a self, active_profiles: &[String]) -> Vec<&'a RawRepository> {
        let mut repositories: Vec<&RawRepository> = self.repositories.iter().collect();
        for profile in self.active_profiles(active_profiles) {
            repositories.extend(profile.repositories.iter());
        }
        repositories
    }

    /// Base dependencies followed by the dependencies of active profiles,
    /// preserving declaration order.
    pub fn active_dependencies<'a>(&'a self, active_profiles: &[String]) -> Vec<&'a RawDependency> {
        let mut dependencies: Vec<&RawDependency> = self.dependencies.iter().collect();
        for profile in self.active_profiles(active_profiles) {
            dependencies.extend(profile.dependencies.iter());
        }
        dependencies
    }

    /// Managed dependencies of the base section and every active profile.
    pub fn active_dependency_management<'a>(
        &'a self,
        active_profiles: &[String],
    ) -> Vec<&'a RawDependency> {
        let mut managed: Vec<&RawDependency> = self.dependency_management.iter().collect();
        for profile in self.active_profiles(active_profiles) {
            managed.extend(profile.dependency_management.iter());
        }
        managed
    }

    /// Every distinct property name referenced as `${name}` anywhere in this
    /// descriptor, in first-seen order.
    pub fn property_placeholder_names(&self) -> IndexSet<String> {
        let mut names = IndexSet::new();

        collect_placeholder_names(self.group_id.as_deref(), &mut names);
        collect_placeholder_names(self.artifact_id.as_deref(), &mut names);
        collect_placeholder_names(self.version.as_deref(), &mut names);
        collect_placeholder_names(self.packaging.as_deref(), &mut names);
        collect_placeholder_names(self.name.as_deref(), &mut names);
        collect_placeholder_names(self.description.as_deref(), &mut names);
        if let Some(parent) = &self.parent {
            collect_placeholder_names(Some(&parent.group_id), &mut names);
            collect_placeholder_names(Some(&parent.artifact_id), &mut names);
            collect_placeholder_names(Some(&parent.version), &mut names);
        }
        for value in self.properties.values() {
            collect_placeholder_names(Some(value), &mut names);
        }
        for repository in &self.repositories {
            collect_placeholder_names(Some(&repository.url), &mut names);
        }
        for dependency in self.dependencies.iter().chain(&self.dependency_management) {
            collect_dependency_names(dependency, &mut names);
        }
        for profile in &self.profiles {
            for value in profile.properties.values() {
                collect_placeholder_names(Some(value), &mut names);
            }
            for repository in &profile.repositories {
                collect_placeholder_names(Some(&repository.url), &mut names);
            }
            for dependency in profile
                .dependencies
                .iter()
                .chain(&profile.dependency_management)
            {
                collect_dependency_names(dependency, &mut names);
            }
        }
        names
    }
}

fn collect_dependency_names(dependency: &RawDependency, names: &mut IndexSet<String>) {
    collect_placeholder_names(dependency.group_id.as_deref(), names);
    collect_placeholder_names(dependency.artifact_id.as_deref(), names);
    collect_placeholder_names(dependency.version.as_deref(), names);
    collect_placeholder_names(dependency.scope.as_deref(), names);
    collect_placeholder_names(dependency.classifier.as_deref(), names);
}

fn collect_placeholder_names(value: Option<&str>, names: &mut IndexSet<String>) {
    let Some(mut rest) = value else {
        return;
    };
    while let Some(start) = rest.find("${") {
        let suffix = &rest[start + 2..];
        let Some(end) = suffix.find('}') else {
            return;
        };
        names.insert(suffix[..end].to_string());
        rest = &suffix[end + 1..];
    }
}
