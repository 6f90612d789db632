//! Maven POM resolution pipeline.
//!
//! A raw descriptor is resolved in deterministic passes: the parent chain is
//! walked first (accumulating effective properties and repositories and
//! detecting cycles), dependency management is composed child-first over the
//! frozen chain (resolving `scope=import` BOMs along the way), and direct
//! dependencies are composed last with conflict resolution against the
//! ambient winner map before each one is resolved recursively. Finished
//! models are memoized by the structural fingerprint of the partial, so a
//! subtree that is reached twice under identical overrides is solved once.
//!
//! The resolver is single-threaded per call; the only suspension points are
//! requests to the external [`PomDownloader`].

mod partial;
#[cfg(test)]
mod tests;

pub(crate) use partial::{PartialPom, PomFingerprint};

use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::context::ResolverContext;
use crate::downloader::PomDownloader;
use crate::error::{CoordinateField, ResolutionError};
use crate::model::{GroupArtifact, RawDependency, RawPom};
use crate::placeholder;
use crate::pom::{License, ManagedDependency, Pom, ResolvedDependency, Scope};
use crate::repository::{MavenRepository, MavenRepositoryCredentials, MavenRepositoryMirror};

/// Conflict-resolution key: one winner per artifact line and scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DependencyKey {
    group_artifact: GroupArtifact,
    scope: Scope,
}

type DependencyWinners = HashMap<DependencyKey, Arc<ResolvedDependency>>;

/// Flattened managed-dependency view held in the effective context. Both
/// `Defined` entries and the contents of imported BOM tables end up here.
#[derive(Debug, Clone)]
struct ManagedDescriptor {
    version: String,
    scope: Option<Scope>,
    classifier: Option<String>,
    exclusions: Vec<GroupArtifact>,
}

/// Marker propagated when the parent walk runs into a cycle. Unlike a pom
/// with unresolvable coordinates (which is simply dropped), a cycle fails the
/// resolution that requested the walk.
struct CycleDetected;

/// One level of the parent chain before it is frozen into [`PartialPom`]s.
struct ChainLevel {
    raw: Arc<RawPom>,
    group_id: String,
    artifact_id: String,
    version: String,
    repositories: Vec<MavenRepository>,
}

/// Resolves raw POM descriptors into immutable [`Pom`] models.
///
/// The resolver owns the memoization map and must not be shared across
/// threads without external synchronization.
pub struct PomResolver<D> {
    downloader: D,
    context: ResolverContext,
    resolve_optional: bool,
    resolved: HashMap<PomFingerprint, Arc<Pom>>,
}

impl<D: PomDownloader> PomResolver<D> {
    pub fn new(downloader: D, context: ResolverContext) -> Self {
        Self {
            downloader,
            context,
            resolve_optional: false,
            resolved: HashMap::new(),
        }
    }

    /// Whether optional dependencies are resolved transitively. Defaults to
    /// false, matching Maven's treatment of optional edges.
    pub fn with_resolve_optional(mut self, resolve_optional: bool) -> Self {
        self.resolve_optional = resolve_optional;
        self
    }

    pub fn context(&self) -> &ResolverContext {
        &self.context
    }

    /// Resolves `raw` into an immutable model. All non-fatal issues go to the
    /// context's error sink; `None` means the descriptor itself could not be
    /// resolved (unresolvable coordinates or a parent cycle).
    pub fn resolve(&mut self, raw: &RawPom) -> Option<Arc<Pom>> {
        let mut winners = DependencyWinners::new();
        let mut visited = IndexSet::new();
        self.resolve_tree(raw, &mut winners, &mut visited)
    }

    /// Resolves one pom tree. Properties and the managed table are scoped to
    /// the tree; `winners` is shared with the enclosing resolution so version
    /// conflicts collapse onto the nearest definition.
    fn resolve_tree(
        &mut self,
        raw: &RawPom,
        winners: &mut DependencyWinners,
        visited: &mut IndexSet<String>,
    ) -> Option<Arc<Pom>> {
        let mut properties = IndexMap::new();
        let levels =
            match self.walk_parents(Arc::new(raw.clone()), &mut properties, visited, &[]) {
                Ok(Some(levels)) => levels,
                Ok(None) => return None,
                Err(CycleDetected) => return None,
            };
        let partial = freeze_chain(levels, &properties);

        let mut managed = IndexMap::new();
        self.compose_dependency_management(&partial, &mut managed, visited);

        Some(self.build_pom(&partial, &managed, winners))
    }

    /// Walks the parent chain (C4). Returns the chain child-first, `None`
    /// when the current pom must be dropped, or `CycleDetected` when a
    /// coordinate reappears on the walk.
    fn walk_parents(
        &mut self,
        raw: Arc<RawPom>,
        properties: &mut IndexMap<String, String>,
        visited: &mut IndexSet<String>,
        inherited_repositories: &[MavenRepository],
    ) -> Result<Option<Vec<ChainLevel>>, CycleDetected> {
        // 実効プロパティは first-write-wins: 子で確定した値を親が上書きしない
        for (key, value) in raw.active_properties(&self.context.active_profiles) {
            properties.entry(key).or_insert(value);
        }

        let Some((group_id, artifact_id, version)) = self.normalize_coordinates(&raw, properties)
        else {
            return Ok(None);
        };

        let coordinates = format!("{group_id}:{artifact_id}:{version}");
        if visited.contains(&coordinates) {
            self.context.report(ResolutionError::ParentCycle {
                coordinates: coordinates.clone(),
                chain: visited.iter().cloned().collect::<Vec<_>>().join(" -> "),
            });
            return Err(CycleDetected);
        }
        visited.insert(coordinates.clone());

        let own_repositories = self.resolve_repositories(&raw, properties);

        let mut levels = vec![ChainLevel {
            raw: Arc::clone(&raw),
            group_id,
            artifact_id,
            version,
            repositories: own_repositories.clone(),
        }];

        if let Some(parent_ref) = raw.parent.clone() {
            // 親の取得に使うリポジトリ順: settings、POM宣言(子から親)、最後に central(ダウンローダ側)
            let mut download_repositories: IndexSet<MavenRepository> =
                self.context.repositories.iter().cloned().collect();
            download_repositories.extend(inherited_repositories.iter().cloned());
            download_repositories.extend(own_repositories.iter().cloned());
            let download_repositories: Vec<MavenRepository> =
                download_repositories.into_iter().collect();

            let parent_coordinates = self.parent_coordinates(&raw, &parent_ref, properties);
            if let Some((parent_group, parent_artifact, parent_version)) = parent_coordinates {
                match self.downloader.download(
                    &parent_group,
                    &parent_artifact,
                    &parent_version,
                    parent_ref.relative_path.as_deref(),
                    Some(&raw),
                    &download_repositories,
                    &self.context,
                ) {
                    Ok(Some(parent_raw)) => {
                        let mut accumulated = inherited_repositories.to_vec();
                        accumulated.extend(own_repositories);
                        match self.walk_parents(
                            Arc::new(parent_raw),
                            properties,
                            visited,
                            &accumulated,
                        )? {
                            Some(parent_levels) => levels.extend(parent_levels),
                            // 親の座標が解決できない場合は親なしとして継続する
                            None => {}
                        }
                    }
                    Ok(None) => {
                        debug!(
                            pom = %coordinates,
                            parent = %format!("{parent_group}:{parent_artifact}:{parent_version}"),
                            "parent pom not found; continuing without it"
                        );
                    }
                    Err(error) => {
                        self.context.report(ResolutionError::DownloaderFailure {
                            pom: coordinates.clone(),
                            coordinates: format!(
                                "{parent_group}:{parent_artifact}:{parent_version}"
                            ),
                            message: error.to_string(),
                        });
                    }
                }
            }
        }

        Ok(Some(levels))
    }

    /// Coordinate normalization (C2): evaluate against the effective property
    /// map, inheriting group and version from the parent reference.
    fn normalize_coordinates(
        &self,
        raw: &RawPom,
        properties: &IndexMap<String, String>,
    ) -> Option<(String, String, String)> {
        let parent = raw.parent.as_ref();

        let artifact_id = ambient_value(raw.artifact_id.as_deref(), properties);
        let group_id = ambient_value(raw.group_id.as_deref(), properties)
            .or_else(|| parent.and_then(|parent| ambient_value(Some(&parent.group_id), properties)));
        let version = ambient_value(raw.version.as_deref(), properties)
            .or_else(|| parent.and_then(|parent| ambient_value(Some(&parent.version), properties)));

        let mut failed = false;
        let mut check = |value: Option<String>, field: CoordinateField| -> Option<String> {
            match value {
                Some(value) if !placeholder::contains_placeholder(&value) => Some(value),
                _ => {
                    self.context.report(ResolutionError::UnresolvedCoordinate {
                        pom: raw.coordinates(),
                        field,
                    });
                    failed = true;
                    None
                }
            }
        };

        let group_id = check(group_id, CoordinateField::GroupId);
        let artifact_id = check(artifact_id, CoordinateField::ArtifactId);
        let version = check(version, CoordinateField::Version);
        if failed {
            return None;
        }
        Some((group_id?, artifact_id?, version?))
    }

    /// Evaluates the `<parent>` reference coordinates. Unresolvable parts are
    /// reported and the parent is treated as absent.
    fn parent_coordinates(
        &self,
        raw: &RawPom,
        parent_ref: &crate::model::RawParent,
        properties: &IndexMap<String, String>,
    ) -> Option<(String, String, String)> {
        let mut resolve = |value: &str| -> Option<String> {
            match ambient_value(Some(value), properties) {
                Some(evaluated) if !placeholder::contains_placeholder(&evaluated) => {
                    Some(evaluated)
                }
                _ => {
                    self.context.report(ResolutionError::PropertyUnresolvable {
                        pom: raw.coordinates(),
                        value: value.to_string(),
                    });
                    None
                }
            }
        };

        let group = resolve(&parent_ref.group_id)?;
        let artifact = resolve(&parent_ref.artifact_id)?;
        let version = resolve(&parent_ref.version)?;
        Some((group, artifact, version))
    }

    /// Repository resolution (C3): evaluate URLs, reject malformed ones, and
    /// apply mirror and credential rewrites in that fixed order.
    fn resolve_repositories(
        &self,
        raw: &RawPom,
        properties: &IndexMap<String, String>,
    ) -> Vec<MavenRepository> {
        let mut repositories = Vec::new();
        for raw_repository in raw.active_repositories(&self.context.active_profiles) {
            let Some(url) = ambient_value(Some(&raw_repository.url), properties) else {
                self.context
                    .report(ResolutionError::MalformedRepositoryUrl {
                        url: raw_repository.url.clone(),
                        reason: "URL is empty after property expansion".to_string(),
                    });
                continue;
            };
            if placeholder::contains_placeholder(&url) {
                self.context.report(ResolutionError::PropertyUnresolvable {
                    pom: raw.coordinates(),
                    value: raw_repository.url.clone(),
                });
                continue;
            }
            let uri = match Url::parse(url.trim()) {
                Ok(uri) => uri,
                Err(error) => {
                    self.context
                        .report(ResolutionError::MalformedRepositoryUrl {
                            url,
                            reason: error.to_string(),
                        });
                    continue;
                }
            };

            let mut repository = MavenRepository::new(raw_repository.id.clone(), uri)
                .with_releases_enabled(raw_repository.releases.unwrap_or(true))
                .with_snapshots_enabled(raw_repository.snapshots.unwrap_or(false));
            repository = MavenRepositoryMirror::apply_all(&self.context.mirrors, repository);
            repository =
                MavenRepositoryCredentials::apply_all(&self.context.credentials, repository);
            repositories.push(repository);
        }
        repositories
    }

    /// Dependency-management composition (C5), child-first over the frozen
    /// chain so that under first-write-wins a child's entry beats every
    /// ancestor's. Dependency overrides are computed afterwards, once the
    /// full table is known, so the fingerprint captures every managed
    /// version that can influence this pom's dependencies.
    fn compose_dependency_management(
        &mut self,
        partial: &Arc<PartialPom>,
        managed: &mut IndexMap<GroupArtifact, ManagedDescriptor>,
        visited: &IndexSet<String>,
    ) {
        let mut cursor = Some(partial);
        while let Some(level) = cursor {
            let entries = self.compose_level_management(level, managed, visited);
            level.finalize_dependency_management(entries);
            cursor = level.parent.as_ref();
        }

        let mut cursor = Some(partial);
        while let Some(level) = cursor {
            level.finalize_dependency_overrides(self.dependency_overrides_for(level, managed));
            cursor = level.parent.as_ref();
        }
    }

    fn compose_level_management(
        &mut self,
        level: &Arc<PartialPom>,
        managed: &mut IndexMap<GroupArtifact, ManagedDescriptor>,
        visited: &IndexSet<String>,
    ) -> Vec<ManagedDependency> {
        let mut entries = Vec::new();
        let managed_dependencies = level
            .raw
            .active_dependency_management(&self.context.active_profiles);

        for dependency in managed_dependencies {
            let Some(group_id) = level.required_value(dependency.group_id.as_deref(), &self.context)
            else {
                continue;
            };
            let Some(artifact_id) =
                level.required_value(dependency.artifact_id.as_deref(), &self.context)
            else {
                continue;
            };

            let is_import = dependency
                .dep_type
                .as_deref()
                .is_some_and(|dep_type| dep_type.eq_ignore_ascii_case("pom"))
                && dependency
                    .scope
                    .as_deref()
                    .is_some_and(|scope| scope.eq_ignore_ascii_case("import"));

            if is_import {
                let Some(requested_version) = dependency.version.as_deref() else {
                    self.context.report(ResolutionError::BomMissingVersion {
                        group_id,
                        artifact_id,
                    });
                    continue;
                };
                let Some(version) = level.required_value(Some(requested_version), &self.context)
                else {
                    continue;
                };
                if let Some(bom) =
                    self.resolve_import(level, &group_id, &artifact_id, &version, visited)
                {
                    // 取り込んだ BOM の管理表を呼び出し側へ first-write-wins で畳み込む
                    fold_managed_table(&bom.dependency_management, managed);
                    entries.push(ManagedDependency::Imported {
                        group_id,
                        artifact_id,
                        version,
                        pom: bom,
                    });
                }
                continue;
            }

            let Some(requested_version) = dependency.version.as_deref() else {
                debug!(
                    managed = %format!("{group_id}:{artifact_id}"),
                    "managed dependency without a version; entry skipped"
                );
                continue;
            };
            let Some(version) = level.required_value(Some(requested_version), &self.context) else {
                continue;
            };

            let scope = match dependency.scope.as_deref() {
                Some(name) => {
                    let parsed = Scope::from_name(&level.value(name));
                    if parsed == Scope::Invalid {
                        self.context.report(ResolutionError::InvalidManagedScope {
                            group_id,
                            artifact_id,
                            scope: name.to_string(),
                        });
                        continue;
                    }
                    Some(parsed)
                }
                None => None,
            };
            let classifier = level.concrete_value(dependency.classifier.as_deref());
            let exclusions = evaluate_exclusions(level, dependency);

            managed
                .entry(GroupArtifact::new(group_id.clone(), artifact_id.clone()))
                .or_insert_with(|| ManagedDescriptor {
                    version: version.clone(),
                    scope,
                    classifier: classifier.clone(),
                    exclusions: exclusions.clone(),
                });
            entries.push(ManagedDependency::Defined {
                group_id,
                artifact_id,
                version,
                requested_version: requested_version.to_string(),
                scope,
                classifier,
                exclusions,
            });
        }
        entries
    }

    /// Resolves an import-scoped BOM through the downloader. Imports start
    /// from a fresh context: fresh properties, fresh managed table, fresh
    /// conflict winners; only the resulting managed table is folded back.
    fn resolve_import(
        &mut self,
        level: &Arc<PartialPom>,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        visited: &IndexSet<String>,
    ) -> Option<Arc<Pom>> {
        let repositories = level.effective_repositories(&self.context);
        let raw = match self.downloader.download(
            group_id,
            artifact_id,
            version,
            None,
            Some(&level.raw),
            &repositories,
            &self.context,
        ) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                warn!(
                    bom = %format!("{group_id}:{artifact_id}:{version}"),
                    "imported BOM not found; import skipped"
                );
                return None;
            }
            Err(error) => {
                self.context.report(ResolutionError::DownloaderFailure {
                    pom: level.coordinates(),
                    coordinates: format!("{group_id}:{artifact_id}:{version}"),
                    message: error.to_string(),
                });
                return None;
            }
        };

        // visited を引き継ぐことで、自分自身(または祖先)を import する
        // BOM は親サイクルとして検出される
        let mut import_winners = DependencyWinners::new();
        let mut import_visited = visited.clone();
        self.resolve_tree(&raw, &mut import_winners, &mut import_visited)
    }

    /// Managed versions that will fill in this pom's version-less direct
    /// dependencies. Part of the partial's fingerprint: the same raw pom
    /// reached under a different management context must not share a cache
    /// entry.
    fn dependency_overrides_for(
        &self,
        level: &Arc<PartialPom>,
        managed: &IndexMap<GroupArtifact, ManagedDescriptor>,
    ) -> IndexMap<GroupArtifact, String> {
        let mut overrides = IndexMap::new();
        for dependency in level.raw.active_dependencies(&self.context.active_profiles) {
            if dependency.version.is_some() {
                continue;
            }
            let Some(group_id) = level.concrete_value(dependency.group_id.as_deref()) else {
                continue;
            };
            let Some(artifact_id) = level.concrete_value(dependency.artifact_id.as_deref()) else {
                continue;
            };
            let group_artifact = GroupArtifact::new(group_id, artifact_id);
            if let Some(descriptor) = managed.get(&group_artifact) {
                overrides.insert(group_artifact, descriptor.version.clone());
            }
        }
        overrides
    }

    /// Model assembly (C9), memoized by the partial's fingerprint (C7).
    fn build_pom(
        &mut self,
        partial: &Arc<PartialPom>,
        managed: &IndexMap<GroupArtifact, ManagedDescriptor>,
        winners: &mut DependencyWinners,
    ) -> Arc<Pom> {
        let fingerprint = partial.fingerprint();
        if let Some(existing) = self.resolved.get(&fingerprint) {
            debug!(pom = %partial.coordinates(), "resolved pom served from cache");
            return Arc::clone(existing);
        }

        let parent = partial
            .parent
            .as_ref()
            .map(|parent| self.build_pom(parent, managed, winners));
        let licenses = process_licenses(partial);
        let dependencies = self.process_dependencies(partial, managed, winners);

        let raw = &partial.raw;
        let pom = Arc::new(Pom {
            group_id: partial.group_id.clone(),
            artifact_id: partial.artifact_id.clone(),
            version: partial.version.clone(),
            snapshot_version: raw.snapshot_version.clone(),
            name: raw.name.as_deref().map(|name| partial.value(name)),
            description: raw
                .description
                .as_deref()
                .map(|description| partial.value(description)),
            packaging: raw
                .packaging
                .as_deref()
                .map(|packaging| partial.value(packaging)),
            parent,
            dependencies,
            dependency_management: partial.dependency_management().to_vec(),
            licenses,
            repositories: partial.repositories.clone(),
            properties: raw.properties.clone(),
            property_overrides: partial.property_overrides.clone(),
        });
        self.resolved.insert(fingerprint, Arc::clone(&pom));
        pom
    }

    /// Dependency composition (C6) in two phases. Phase one settles every
    /// direct dependency of this level against the winner map, so that a
    /// definition at the current depth beats anything a deeper subtree will
    /// request later. Phase two then resolves the model of each descriptor
    /// this level introduced.
    fn process_dependencies(
        &mut self,
        partial: &Arc<PartialPom>,
        managed: &IndexMap<GroupArtifact, ManagedDescriptor>,
        winners: &mut DependencyWinners,
    ) -> Vec<Arc<ResolvedDependency>> {
        let mut composed = Vec::new();
        let mut introduced = Vec::new();

        for dependency in partial.raw.active_dependencies(&self.context.active_profiles) {
            // 座標が解決できない依存はエラーにせず読み飛ばす
            let Some(group_id) = partial.concrete_value(dependency.group_id.as_deref()) else {
                continue;
            };
            let Some(artifact_id) = partial.concrete_value(dependency.artifact_id.as_deref())
            else {
                continue;
            };
            let group_artifact = GroupArtifact::new(group_id.clone(), artifact_id.clone());
            let managed_descriptor = managed.get(&group_artifact);

            let scope = match dependency.scope.as_deref() {
                Some(name) => Scope::from_name(&partial.value(name)),
                None => managed_descriptor
                    .and_then(|descriptor| descriptor.scope)
                    .unwrap_or_default(),
            };
            if scope == Scope::Invalid {
                debug!(dependency = %group_artifact, "dependency with invalid scope filtered out");
                continue;
            }
            if dependency.optional && !self.resolve_optional {
                continue;
            }

            let (version, requested_version) = match dependency.version.as_deref() {
                Some(requested) => {
                    let Some(version) = partial.required_value(Some(requested), &self.context)
                    else {
                        continue;
                    };
                    (version, requested.to_string())
                }
                None => match managed_descriptor {
                    Some(descriptor) => (descriptor.version.clone(), descriptor.version.clone()),
                    None => {
                        self.context.report(ResolutionError::UnresolvedCoordinate {
                            pom: format!(
                                "{group_artifact} (declared in {})",
                                partial.coordinates()
                            ),
                            field: CoordinateField::Version,
                        });
                        continue;
                    }
                },
            };

            let key = DependencyKey {
                group_artifact,
                scope,
            };
            if let Some(winner) = winners.get(&key) {
                // 既に解決済みの勝者を再利用する。勝者のバージョンが常に優先される
                composed.push(Arc::clone(winner));
                continue;
            }

            let classifier = partial
                .concrete_value(dependency.classifier.as_deref())
                .or_else(|| {
                    managed_descriptor.and_then(|descriptor| descriptor.classifier.clone())
                });
            let mut exclusions = evaluate_exclusions(partial, dependency);
            if exclusions.is_empty() {
                if let Some(descriptor) = managed_descriptor {
                    exclusions = descriptor.exclusions.clone();
                }
            }

            let resolved = Arc::new(ResolvedDependency::new(
                group_id,
                artifact_id,
                version,
                requested_version,
                scope,
                partial.concrete_value(dependency.dep_type.as_deref()),
                classifier,
                dependency.optional,
                exclusions,
            ));
            winners.insert(key, Arc::clone(&resolved));
            composed.push(Arc::clone(&resolved));
            introduced.push(resolved);
        }

        let repositories = partial.effective_repositories(&self.context);
        for descriptor in introduced {
            match self.downloader.download(
                &descriptor.group_id,
                &descriptor.artifact_id,
                &descriptor.version,
                None,
                Some(&partial.raw),
                &repositories,
                &self.context,
            ) {
                Ok(Some(raw)) => {
                    // 依存側のツリーはプロパティと管理表を新規に持ち、勝者の
                    // マップだけを共有する
                    let mut dependency_visited = IndexSet::new();
                    if let Some(model) = self.resolve_tree(&raw, winners, &mut dependency_visited)
                    {
                        descriptor.attach_model(model);
                    }
                }
                Ok(None) => {
                    debug!(
                        dependency = %descriptor.coordinates(),
                        "dependency pom absent; descriptor kept without model"
                    );
                }
                Err(error) => {
                    self.context.report(ResolutionError::DownloaderFailure {
                        pom: partial.coordinates(),
                        coordinates: descriptor.coordinates(),
                        message: error.to_string(),
                    });
                }
            }
        }

        composed
    }
}

/// Evaluates a value against process-scope overrides and the effective
/// property map, in that order. Used wherever no partial exists yet
/// (coordinate normalization, parent references, repository URLs).
fn ambient_value(value: Option<&str>, properties: &IndexMap<String, String>) -> Option<String> {
    let raw = value?;
    let evaluated = placeholder::evaluate(raw, |key| {
        std::env::var(key)
            .ok()
            .or_else(|| properties.get(key).cloned())
    });
    let trimmed = evaluated.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// Freezes the walked chain into an immutable child-to-parent linked list,
/// computing each level's property overrides along the way.
fn freeze_chain(levels: Vec<ChainLevel>, properties: &IndexMap<String, String>) -> Arc<PartialPom> {
    let mut frozen: Option<Arc<PartialPom>> = None;
    for level in levels.into_iter().rev() {
        let property_overrides = property_overrides_for(&level, properties);
        frozen = Some(Arc::new(PartialPom::new(
            level.raw,
            level.group_id,
            level.artifact_id,
            level.version,
            frozen,
            level.repositories,
            property_overrides,
        )));
    }
    frozen.expect("parent walk produces at least one level")
}

/// Properties this level references whose effective value differs from the
/// locally declared one. This is how a descendant's value reaches an
/// ancestor's placeholder under child-wins inheritance.
fn property_overrides_for(
    level: &ChainLevel,
    properties: &IndexMap<String, String>,
) -> IndexMap<String, String> {
    let mut overrides = IndexMap::new();
    for name in level.raw.property_placeholder_names() {
        let Some(effective) = properties.get(&name) else {
            continue;
        };
        if level.raw.properties.get(&name) != Some(effective) {
            overrides.insert(name, effective.clone());
        }
    }
    overrides
}

/// Folds a composed managed table into the context map, first write wins.
/// Imported entries contribute their BOM's table recursively, in the order
/// the BOM was encountered.
fn fold_managed_table(
    entries: &[ManagedDependency],
    managed: &mut IndexMap<GroupArtifact, ManagedDescriptor>,
) {
    for entry in entries {
        match entry {
            ManagedDependency::Defined {
                group_id,
                artifact_id,
                version,
                scope,
                classifier,
                exclusions,
                ..
            } => {
                managed
                    .entry(GroupArtifact::new(group_id.clone(), artifact_id.clone()))
                    .or_insert_with(|| ManagedDescriptor {
                        version: version.clone(),
                        scope: *scope,
                        classifier: classifier.clone(),
                        exclusions: exclusions.clone(),
                    });
            }
            ManagedDependency::Imported { pom, .. } => {
                fold_managed_table(&pom.dependency_management, managed);
            }
        }
    }
}

fn evaluate_exclusions(level: &PartialPom, dependency: &RawDependency) -> Vec<GroupArtifact> {
    dependency
        .exclusions
        .iter()
        .map(|exclusion| {
            GroupArtifact::new(
                level.value(&exclusion.group_id),
                level.value(&exclusion.artifact_id),
            )
        })
        .collect()
}

fn process_licenses(partial: &PartialPom) -> Vec<License> {
    partial
        .raw
        .licenses
        .iter()
        .filter_map(|license| {
            let name = partial.concrete_value(license.name.as_deref())?;
            Some(License::from_name(name))
        })
        .collect()
}
