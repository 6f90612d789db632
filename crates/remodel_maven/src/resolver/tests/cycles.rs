use super::*;
use crate::model::RawParent;

#[test]
fn mutual_parent_cycle_reports_once_and_returns_absent() {
    let downloader = MapDownloader::new();
    downloader.put(
        "org.example",
        "b",
        "1.0",
        RawPom {
            parent: Some(RawParent::new("org.example", "a", "1.0")),
            ..raw_pom("org.example", "b", "1.0")
        },
    );
    downloader.put(
        "org.example",
        "a",
        "1.0",
        RawPom {
            parent: Some(RawParent::new("org.example", "b", "1.0")),
            ..raw_pom("org.example", "a", "1.0")
        },
    );

    let project = RawPom {
        parent: Some(RawParent::new("org.example", "b", "1.0")),
        ..raw_pom("org.example", "a", "1.0")
    };

    let (mut resolver, errors) = resolver_with(downloader);
    assert!(resolver.resolve(&project).is_none());

    let errors = errors.lock().expect("errors");
    let cycles: Vec<&ResolutionError> = errors
        .iter()
        .filter(|error| matches!(error, ResolutionError::ParentCycle { .. }))
        .collect();
    assert_eq!(cycles.len(), 1, "exactly one cycle report: {errors:?}");
    match cycles[0] {
        ResolutionError::ParentCycle { coordinates, chain } => {
            assert_eq!(coordinates, "org.example:a:1.0");
            assert!(chain.contains("org.example:b:1.0"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn self_parenting_pom_reports_a_cycle() {
    let downloader = MapDownloader::new();
    downloader.put(
        "org.example",
        "a",
        "1.0",
        RawPom {
            parent: Some(RawParent::new("org.example", "a", "1.0")),
            ..raw_pom("org.example", "a", "1.0")
        },
    );

    let project = RawPom {
        parent: Some(RawParent::new("org.example", "a", "1.0")),
        ..raw_pom("org.example", "a", "1.0")
    };

    let (mut resolver, errors) = resolver_with(downloader);
    assert!(resolver.resolve(&project).is_none());
    assert_eq!(errors.lock().expect("errors").len(), 1);
}

#[test]
fn downloader_failure_on_parent_degrades_to_parentless_model() {
    let project = RawPom {
        parent: Some(RawParent::new("org.example", "parent", "1.0")),
        ..raw_pom("org.example", "a", "1.0")
    };

    let (mut resolver, errors) =
        resolver_with_context(common::FailingDownloader, ResolverContext::new());
    let pom = resolver.resolve(&project).expect("a still resolves");

    assert!(pom.parent.is_none());
    let errors = errors.lock().expect("errors");
    assert!(errors.iter().any(|error| matches!(
        error,
        ResolutionError::DownloaderFailure { coordinates, .. }
            if coordinates == "org.example:parent:1.0"
    )));
}

#[test]
fn absent_parent_is_tolerated() {
    let project = RawPom {
        parent: Some(RawParent::new("org.example", "parent", "1.0")),
        ..raw_pom("org.example", "a", "1.0")
    };

    let (mut resolver, errors) = resolver_with(MapDownloader::new());
    let pom = resolver.resolve(&project).expect("a resolves");

    assert!(pom.parent.is_none());
    assert!(errors.lock().expect("errors").is_empty());
}
