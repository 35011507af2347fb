use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const PUBLIC_DIRECTORY_NAME: &str = "public";

/// Directory roots handed in by the host. `public` always sits under
/// `project` and is never configured on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RootsConfig")]
pub struct Roots {
    project: PathBuf,
    cache: PathBuf,
    logs: PathBuf,
    public: PathBuf,
}

#[derive(Deserialize)]
struct RootsConfig {
    project: PathBuf,
    cache: PathBuf,
    logs: PathBuf,
}

impl From<RootsConfig> for Roots {
    fn from(config: RootsConfig) -> Self {
        Self::new(config.project, config.cache, config.logs)
    }
}

impl Roots {
    pub fn new(
        project: impl Into<PathBuf>,
        cache: impl Into<PathBuf>,
        logs: impl Into<PathBuf>,
    ) -> Self {
        let project = project.into();
        let public = project.join(PUBLIC_DIRECTORY_NAME);
        Self {
            project,
            cache: cache.into(),
            logs: logs.into(),
            public,
        }
    }

    pub fn project(&self) -> &Path {
        &self.project
    }

    pub fn cache(&self) -> &Path {
        &self.cache
    }

    pub fn logs(&self) -> &Path {
        &self.logs
    }

    pub fn public(&self) -> &Path {
        &self.public
    }
}
