//! Effective Maven repositories, mirror rewriting, and credentials.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Mavenリポジトリの実効表現。ミラー・認証情報の書き換え適用後の形。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MavenRepository {
    pub id: Option<String>,
    pub uri: Url,
    pub releases_enabled: bool,
    pub snapshots_enabled: bool,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl MavenRepository {
    pub fn new(id: Option<String>, uri: Url) -> Self {
        Self {
            id,
            uri,
            releases_enabled: true,
            snapshots_enabled: false,
            username: None,
            password: None,
        }
    }

    pub fn with_releases_enabled(mut self, enabled: bool) -> Self {
        self.releases_enabled = enabled;
        self
    }

    pub fn with_snapshots_enabled(mut self, enabled: bool) -> Self {
        self.snapshots_enabled = enabled;
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

impl fmt::Display for MavenRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} ({})", id, self.uri),
            None => write!(f, "{}", self.uri),
        }
    }
}

/// The well-known central repository. Downloaders consult it after every
/// explicitly configured repository.
pub static MAVEN_CENTRAL: Lazy<MavenRepository> = Lazy::new(|| {
    let uri = Url::parse("https://repo.maven.apache.org/maven2")
        .expect("central repository URL is valid");
    MavenRepository::new(Some("central".to_string()), uri)
});

/// Mavenミラー設定。`mirror_of` は settings.xml と同じパターン記法を取る:
/// `*`、`external:*`、カンマ区切りのID列、`!id` による除外。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MavenRepositoryMirror {
    pub id: Option<String>,
    pub url: String,
    pub mirror_of: String,
}

impl MavenRepositoryMirror {
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        mirror_of: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            url: url.into(),
            mirror_of: mirror_of.into(),
        }
    }

    /// Applies every matching mirror in declaration order.
    pub fn apply_all(mirrors: &[MavenRepositoryMirror], repository: MavenRepository) -> MavenRepository {
        mirrors
            .iter()
            .fold(repository, |repository, mirror| mirror.apply(repository))
    }

    /// Rewrites the repository URL (and id) when this mirror matches. A
    /// mirror whose own URL does not parse leaves the repository untouched.
    pub fn apply(&self, repository: MavenRepository) -> MavenRepository {
        if !self.matches(&repository) {
            return repository;
        }
        match Url::parse(self.url.trim()) {
            Ok(uri) => MavenRepository {
                id: self.id.clone().or(repository.id),
                uri,
                ..repository
            },
            Err(error) => {
                tracing::warn!(
                    mirror = %self.url,
                    error = %error,
                    "mirror URL does not parse; repository left as declared"
                );
                repository
            }
        }
    }

    fn matches(&self, repository: &MavenRepository) -> bool {
        let repository_id = repository.id.as_deref().unwrap_or("");
        let tokens: Vec<&str> = self.mirror_of.split(',').map(str::trim).collect();

        for token in &tokens {
            if let Some(excluded) = token.strip_prefix('!') {
                if excluded == repository_id {
                    return false;
                }
            }
        }
        tokens.iter().any(|token| match *token {
            "*" => true,
            "external:*" => is_external(repository),
            token => token == repository_id,
        })
    }
}

fn is_external(repository: &MavenRepository) -> bool {
    if repository.uri.scheme() == "file" {
        return false;
    }
    !matches!(repository.uri.host_str(), Some("localhost") | Some("127.0.0.1"))
}

/// リポジトリIDに紐づく認証情報。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MavenRepositoryCredentials {
    pub id: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl MavenRepositoryCredentials {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Applies the first credentials entry whose id matches the repository.
    pub fn apply_all(
        credentials: &[MavenRepositoryCredentials],
        repository: MavenRepository,
    ) -> MavenRepository {
        credentials
            .iter()
            .fold(repository, |repository, entry| entry.apply(repository))
    }

    pub fn apply(&self, mut repository: MavenRepository) -> MavenRepository {
        let matches = repository
            .id
            .as_deref()
            .is_some_and(|id| id == self.id && repository.username.is_none());
        if matches {
            repository.username = self.username.clone();
            repository.password = self.password.clone();
        }
        repository
    }
}
