//! Artifact location and download utilities.
//!
//! A trained vectorizer or classifier lives either on local disk or in a
//! Hugging Face Hub repository. Hub artifacts are written
//! `hf://owner/repo[@revision]/path/in/repo` and fetched through the local hub
//! cache, so repeated starts do not download them again.
//!
//! ## Main Types
//!
//! - [`ArtifactSource`] - Where an artifact file lives
//! - [`HfLoader`] - Downloads a single file from a Hugging Face repository

use hf_hub::api::sync::Api as HfApi;
use hf_hub::{Repo, RepoType};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

const HUB_SCHEME: &str = "hf://";

#[derive(Debug, Clone)]
pub struct HfLoader {
    pub repo: String,
    pub revision: Option<String>,
    pub filename: String,
}

impl HfLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            repo: repo.into(),
            revision: None,
            filename: filename.into(),
        }
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    pub fn load(&self) -> anyhow::Result<PathBuf> {
        let api = HfApi::new()?;
        let repo = match &self.revision {
            Some(rev) => Repo::with_revision(self.repo.clone(), RepoType::Model, rev.clone()),
            None => Repo::new(self.repo.clone(), RepoType::Model),
        };
        let path = api.repo(repo).get(&self.filename).map_err(|e| {
            anyhow::anyhow!(
                "Failed to fetch `{}` from Hugging Face repo `{}`: {e}",
                self.filename,
                self.repo
            )
        })?;
        Ok(path)
    }
}

/// Location of a trained artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ArtifactSource {
    Local(PathBuf),
    Hub {
        repo: String,
        revision: Option<String>,
        filename: String,
    },
}

impl ArtifactSource {
    /// Resolve the source to a readable file on local disk.
    pub fn resolve(&self) -> anyhow::Result<PathBuf> {
        match self {
            ArtifactSource::Local(path) => {
                if !path.is_file() {
                    anyhow::bail!("Artifact file not found: {path:?}");
                }
                Ok(path.clone())
            }
            ArtifactSource::Hub {
                repo,
                revision,
                filename,
            } => {
                let mut loader = HfLoader::new(repo, filename);
                if let Some(rev) = revision {
                    loader = loader.with_revision(rev.clone());
                }
                tracing::info!(repo = %repo, file = %filename, "fetching artifact from hub");
                loader.load()
            }
        }
    }
}

impl fmt::Display for ArtifactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactSource::Local(path) => write!(f, "{}", path.display()),
            ArtifactSource::Hub {
                repo,
                revision: Some(rev),
                filename,
            } => write!(f, "{HUB_SCHEME}{repo}@{rev}/{filename}"),
            ArtifactSource::Hub {
                repo,
                revision: None,
                filename,
            } => write!(f, "{HUB_SCHEME}{repo}/{filename}"),
        }
    }
}

impl FromStr for ArtifactSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(rest) = s.strip_prefix(HUB_SCHEME) else {
            if s.trim().is_empty() {
                anyhow::bail!("artifact path is empty");
            }
            return Ok(ArtifactSource::Local(PathBuf::from(s)));
        };

        let mut parts = rest.splitn(3, '/');
        let (Some(owner), Some(name), Some(filename)) = (parts.next(), parts.next(), parts.next())
        else {
            anyhow::bail!("hub artifact must look like hf://owner/repo/file, got `{s}`");
        };
        let (name, revision) = match name.split_once('@') {
            Some((name, rev)) => (name, Some(rev.to_string())),
            None => (name, None),
        };
        if owner.is_empty() || name.is_empty() || filename.is_empty() {
            anyhow::bail!("hub artifact must look like hf://owner/repo/file, got `{s}`");
        }

        Ok(ArtifactSource::Hub {
            repo: format!("{owner}/{name}"),
            revision,
            filename: filename.to_string(),
        })
    }
}

impl TryFrom<String> for ArtifactSource {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl crate::core::ModelOptions for ArtifactSource {
    fn cache_key(&self) -> String {
        self.to_string()
    }
}
