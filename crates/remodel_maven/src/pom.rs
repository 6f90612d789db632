//! Resolved model types: the immutable [`Pom`] snapshot and the descriptors
//! it aggregates.

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::model::GroupArtifact;
use crate::repository::MavenRepository;

/// Maven dependency scope. Unrecognized tokens map to [`Scope::Invalid`],
/// which the composers filter out.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Provided,
    Runtime,
    Test,
    System,
    Import,
    Invalid,
}

impl Scope {
    pub fn from_name(name: &str) -> Scope {
        match name.trim().to_ascii_lowercase().as_str() {
            "compile" => Scope::Compile,
            "provided" => Scope::Provided,
            "runtime" => Scope::Runtime,
            "test" => Scope::Test,
            "system" => Scope::System,
            "import" => Scope::Import,
            _ => Scope::Invalid,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Provided => "provided",
            Scope::Runtime => "runtime",
            Scope::Test => "test",
            Scope::System => "system",
            Scope::Import => "import",
            Scope::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best-effort bucketing of a license name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseKind {
    Apache2,
    Mit,
    Bsd,
    Gpl,
    Lgpl,
    Eclipse,
    Mozilla,
    PublicDomain,
    Unknown,
}

/// License declaration carried on the resolved model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    pub kind: LicenseKind,
}

impl License {
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let normalized = name.to_ascii_lowercase();
        let kind = if normalized.contains("apache") {
            LicenseKind::Apache2
        } else if normalized.contains("mit") {
            LicenseKind::Mit
        } else if normalized.contains("bsd") {
            LicenseKind::Bsd
        } else if normalized.contains("lesser") || normalized.contains("lgpl") {
            LicenseKind::Lgpl
        } else if normalized.contains("gpl") || normalized.contains("gnu") {
            LicenseKind::Gpl
        } else if normalized.contains("eclipse") || normalized.contains("epl") {
            LicenseKind::Eclipse
        } else if normalized.contains("mozilla") || normalized.contains("mpl") {
            LicenseKind::Mozilla
        } else if normalized.contains("public domain") || normalized.contains("cc0") {
            LicenseKind::PublicDomain
        } else {
            LicenseKind::Unknown
        };
        Self { name, kind }
    }
}

/// Entry of a composed `<dependencyManagement>` table.
///
/// `Defined` is a plain managed coordinate; `Imported` records an
/// import-scoped BOM together with its fully resolved model. Downstream code
/// dispatches on the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ManagedDependency {
    Defined {
        group_id: String,
        artifact_id: String,
        version: String,
        requested_version: String,
        scope: Option<Scope>,
        classifier: Option<String>,
        exclusions: Vec<GroupArtifact>,
    },
    Imported {
        group_id: String,
        artifact_id: String,
        version: String,
        pom: Arc<Pom>,
    },
}

impl ManagedDependency {
    pub fn group_artifact(&self) -> GroupArtifact {
        match self {
            ManagedDependency::Defined {
                group_id,
                artifact_id,
                ..
            }
            | ManagedDependency::Imported {
                group_id,
                artifact_id,
                ..
            } => GroupArtifact::new(group_id.clone(), artifact_id.clone()),
        }
    }
}

/// Dependency descriptor chosen after conflict resolution.
///
/// Descriptors are shared by `Arc`: when a later occurrence of the same
/// `(group, artifact, scope)` key loses conflict resolution, the winning
/// descriptor is reused verbatim, so graph edges that collapsed onto one
/// version literally point at the same allocation. The resolved model of the
/// dependency is attached exactly once, after its own subtree resolves.
#[derive(Debug)]
pub struct ResolvedDependency {
    pub group_id: String,
    pub artifact_id: String,
    /// Version chosen by conflict resolution.
    pub version: String,
    /// Version as requested at the declaration site, before management and
    /// conflict resolution. Placeholders are kept verbatim.
    pub requested_version: String,
    pub scope: Scope,
    pub dep_type: Option<String>,
    pub classifier: Option<String>,
    pub optional: bool,
    pub exclusions: Vec<GroupArtifact>,
    model: OnceCell<Arc<Pom>>,
}

impl ResolvedDependency {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        group_id: String,
        artifact_id: String,
        version: String,
        requested_version: String,
        scope: Scope,
        dep_type: Option<String>,
        classifier: Option<String>,
        optional: bool,
        exclusions: Vec<GroupArtifact>,
    ) -> Self {
        Self {
            group_id,
            artifact_id,
            version,
            requested_version,
            scope,
            dep_type,
            classifier,
            optional,
            exclusions,
            model: OnceCell::new(),
        }
    }

    pub fn group_artifact(&self) -> GroupArtifact {
        GroupArtifact::new(self.group_id.clone(), self.artifact_id.clone())
    }

    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }

    /// Resolved model of this dependency, absent when its POM could not be
    /// fetched or resolved.
    pub fn model(&self) -> Option<&Arc<Pom>> {
        self.model.get()
    }

    pub(crate) fn attach_model(&self, pom: Arc<Pom>) {
        let _ = self.model.set(pom);
    }
}

impl PartialEq for ResolvedDependency {
    fn eq(&self, other: &Self) -> bool {
        // Models are compared by coordinates only: descriptors are shared
        // across poms and the dependency graph may contain cycles.
        self.group_id == other.group_id
            && self.artifact_id == other.artifact_id
            && self.version == other.version
            && self.requested_version == other.requested_version
            && self.scope == other.scope
            && self.dep_type == other.dep_type
            && self.classifier == other.classifier
            && self.optional == other.optional
            && self.exclusions == other.exclusions
            && self.model().map(|pom| pom.coordinates()) == other.model().map(|pom| pom.coordinates())
    }
}

impl fmt::Display for ResolvedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.coordinates(), self.scope)
    }
}

/// Immutable resolved project model.
#[derive(Debug)]
pub struct Pom {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub snapshot_version: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub packaging: Option<String>,
    pub parent: Option<Arc<Pom>>,
    pub dependencies: Vec<Arc<ResolvedDependency>>,
    pub dependency_management: Vec<ManagedDependency>,
    pub licenses: Vec<License>,
    pub repositories: Vec<MavenRepository>,
    /// Properties declared in this pom.
    pub properties: IndexMap<String, String>,
    /// Properties whose effective value differs from the declared one
    /// (child-wins inheritance makes a descendant's value stick).
    pub property_overrides: IndexMap<String, String>,
}

impl Pom {
    pub fn group_artifact(&self) -> GroupArtifact {
        GroupArtifact::new(self.group_id.clone(), self.artifact_id.clone())
    }

    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

impl PartialEq for Pom {
    fn eq(&self, other: &Self) -> bool {
        self.group_id == other.group_id
            && self.artifact_id == other.artifact_id
            && self.version == other.version
            && self.snapshot_version == other.snapshot_version
            && self.name == other.name
            && self.description == other.description
            && self.packaging == other.packaging
            && self.parent == other.parent
            && self.dependencies == other.dependencies
            && self.dependency_management == other.dependency_management
            && self.licenses == other.licenses
            && self.repositories == other.repositories
            && self.properties == other.properties
            && self.property_overrides == other.property_overrides
    }
}

impl fmt::Display for Pom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.coordinates())
    }
}
