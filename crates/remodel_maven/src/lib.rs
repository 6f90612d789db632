//! Maven POM resolution core for the remodel refactoring toolkit.
//!
//! Given a raw, unresolved project descriptor ([`RawPom`]), the resolver
//! produces a fully evaluated, immutable model ([`Pom`]): coordinates are
//! normalized against inherited properties, dependency management is composed
//! across the parent chain (including import-scoped BOMs), direct
//! dependencies are conflict-resolved and resolved recursively, and finished
//! models are memoized by structural fingerprint.
//!
//! Fetching and decoding POMs is not this crate's concern: callers supply a
//! [`PomDownloader`] and an execution context ([`ResolverContext`]) carrying
//! settings-level repositories, mirrors, credentials, active profiles, and
//! the error sink.

pub mod context;
pub mod downloader;
pub mod error;
pub mod model;
pub mod placeholder;
pub mod pom;
pub mod repository;
pub mod resolver;

pub use context::ResolverContext;
pub use downloader::{DownloadError, PomDownloader};
pub use error::{CoordinateField, ErrorSink, ResolutionError};
pub use model::{
    GroupArtifact, RawDependency, RawLicense, RawParent, RawPom, RawProfile, RawRepository,
};
pub use pom::{License, LicenseKind, ManagedDependency, Pom, ResolvedDependency, Scope};
pub use repository::{
    MavenRepository, MavenRepositoryCredentials, MavenRepositoryMirror, MAVEN_CENTRAL,
};
pub use resolver::PomResolver;
