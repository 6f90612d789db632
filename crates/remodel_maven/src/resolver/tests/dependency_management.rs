use super::*;
use crate::model::RawParent;
use indexmap::IndexMap;

fn import_of(group_id: &str, artifact_id: &str, version: &str) -> RawDependency {
    RawDependency::new(group_id, artifact_id)
        .with_version(version)
        .with_type("pom")
        .with_scope("import")
}

#[test]
fn imported_bom_supplies_missing_dependency_version() {
    let downloader = MapDownloader::new();
    downloader.put(
        "org.example",
        "bom",
        "1.0",
        RawPom {
            packaging: Some("pom".to_string()),
            dependency_management: vec![
                RawDependency::new("org.demo", "lib").with_version("2.0")
            ],
            ..raw_pom("org.example", "bom", "1.0")
        },
    );

    let project = RawPom {
        dependency_management: vec![import_of("org.example", "bom", "1.0")],
        dependencies: vec![RawDependency::new("org.demo", "lib")],
        ..raw_pom("org.example", "app", "1.0")
    };

    let (mut resolver, errors) = resolver_with(downloader);
    let pom = resolver.resolve(&project).expect("app resolves");

    assert_eq!(pom.dependencies.len(), 1);
    assert_eq!(pom.dependencies[0].version, "2.0");

    assert_eq!(pom.dependency_management.len(), 1);
    match &pom.dependency_management[0] {
        ManagedDependency::Imported { pom: bom, .. } => {
            assert_eq!(bom.coordinates(), "org.example:bom:1.0");
        }
        other => panic!("expected an imported entry, got {other:?}"),
    }
    assert!(errors.lock().expect("errors").is_empty());
}

#[test]
fn nearest_management_definition_wins() {
    let downloader = MapDownloader::new();
    downloader.put(
        "org.example",
        "parent",
        "1.0",
        RawPom {
            dependency_management: vec![
                RawDependency::new("org.demo", "lib").with_version("9.9")
            ],
            ..raw_pom("org.example", "parent", "1.0")
        },
    );

    let child = RawPom {
        parent: Some(RawParent::new("org.example", "parent", "1.0")),
        dependency_management: vec![RawDependency::new("org.demo", "lib").with_version("1.5")],
        dependencies: vec![RawDependency::new("org.demo", "lib")],
        ..raw_pom("org.example", "child", "1.0")
    };

    let (mut resolver, _errors) = resolver_with(downloader);
    let pom = resolver.resolve(&child).expect("child resolves");

    assert_eq!(
        pom.dependencies[0].version, "1.5",
        "the lowest-depth definition must win"
    );
}

#[test]
fn invalid_managed_scope_is_reported_and_filtered() {
    let project = RawPom {
        dependency_management: vec![RawDependency::new("org.demo", "lib")
            .with_version("1.0")
            .with_scope("whenever")],
        dependencies: vec![RawDependency::new("org.demo", "lib")],
        ..raw_pom("org.example", "app", "1.0")
    };

    let (mut resolver, errors) = resolver_with(MapDownloader::new());
    let pom = resolver.resolve(&project).expect("app resolves");

    assert!(
        pom.dependency_management.is_empty(),
        "no managed entry with the invalid scope token may survive"
    );
    // without the managed version the direct dependency cannot resolve
    assert!(pom.dependencies.is_empty());

    let errors = errors.lock().expect("errors");
    assert!(errors.iter().any(|error| matches!(
        error,
        ResolutionError::InvalidManagedScope { scope, .. } if scope == "whenever"
    )));
}

#[test]
fn import_without_version_is_reported_and_skipped() {
    let project = RawPom {
        dependency_management: vec![RawDependency::new("org.example", "bom")
            .with_type("pom")
            .with_scope("import")],
        ..raw_pom("org.example", "app", "1.0")
    };

    let (mut resolver, errors) = resolver_with(MapDownloader::new());
    let pom = resolver.resolve(&project).expect("app resolves");
    assert!(pom.dependency_management.is_empty());

    let errors = errors.lock().expect("errors");
    assert_eq!(
        errors
            .iter()
            .filter(|error| matches!(error, ResolutionError::BomMissingVersion { .. }))
            .count(),
        1
    );
}

#[test]
fn imports_resolve_with_fresh_properties() {
    let downloader = MapDownloader::new();
    downloader.put(
        "org.example",
        "bom",
        "1.0",
        RawPom {
            properties: IndexMap::from([("shared.version".to_string(), "2.0".to_string())]),
            dependency_management: vec![
                RawDependency::new("org.demo", "lib").with_version("${shared.version}")
            ],
            ..raw_pom("org.example", "bom", "1.0")
        },
    );

    let project = RawPom {
        // importer が同名プロパティを持っていても import 側には届かない
        properties: IndexMap::from([("shared.version".to_string(), "9.9".to_string())]),
        dependency_management: vec![import_of("org.example", "bom", "1.0")],
        dependencies: vec![RawDependency::new("org.demo", "lib")],
        ..raw_pom("org.example", "app", "1.0")
    };

    let (mut resolver, _errors) = resolver_with(downloader);
    let pom = resolver.resolve(&project).expect("app resolves");

    assert_eq!(pom.dependencies[0].version, "2.0");
}

#[test]
fn bom_importing_the_current_pom_is_detected_as_cycle() {
    let downloader = MapDownloader::new();
    downloader.put(
        "org.example",
        "app",
        "1.0",
        RawPom {
            dependency_management: vec![import_of("org.example", "app", "1.0")],
            ..raw_pom("org.example", "app", "1.0")
        },
    );

    let project = RawPom {
        dependency_management: vec![import_of("org.example", "app", "1.0")],
        ..raw_pom("org.example", "app", "1.0")
    };

    let (mut resolver, errors) = resolver_with(downloader);
    // the failed import is local recovery: the pom itself still resolves
    let pom = resolver.resolve(&project).expect("app resolves");
    assert!(pom.dependency_management.is_empty());

    let errors = errors.lock().expect("errors");
    assert_eq!(
        errors
            .iter()
            .filter(|error| matches!(error, ResolutionError::ParentCycle { .. }))
            .count(),
        1
    );
}

#[test]
fn managed_scope_and_classifier_fill_in_bare_dependencies() {
    let project = RawPom {
        dependency_management: vec![RawDependency::new("org.demo", "lib")
            .with_version("1.0")
            .with_scope("test")
            .with_classifier("shaded")],
        dependencies: vec![RawDependency::new("org.demo", "lib")],
        ..raw_pom("org.example", "app", "1.0")
    };

    let (mut resolver, _errors) = resolver_with(MapDownloader::new());
    let pom = resolver.resolve(&project).expect("app resolves");

    let dependency = &pom.dependencies[0];
    assert_eq!(dependency.scope, Scope::Test);
    assert_eq!(dependency.classifier.as_deref(), Some("shaded"));
    assert_eq!(dependency.version, "1.0");
}
