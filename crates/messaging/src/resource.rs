use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use herald_core::AttachmentStream;
use tracing::debug;

use crate::MessagingError;

/// Trait for loading workflow resources (files shipped alongside a workflow)
/// as attachment streams.
#[async_trait]
pub trait ResourceLoader: Send + Sync {
    /// Open the resource at `path`.
    ///
    /// Returns `Ok(None)` when no resource exists at that path.
    async fn open(&self, path: &str) -> Result<Option<AttachmentStream>, MessagingError>;
}

/// Loads resources from a directory on the local filesystem.
///
/// Resource paths are always interpreted relative to the root: a leading `/`
/// is ignored, so `/tmp/a.png` resolves to `<root>/tmp/a.png`. Paths that
/// would escape the root are rejected.
#[derive(Debug, Clone)]
pub struct FsResourceLoader {
    root: PathBuf,
}

impl FsResourceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a resource path onto the filesystem.
    fn resolve(&self, path: &str) -> Result<PathBuf, MessagingError> {
        let mut resolved = self.root.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::RootDir | Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) => {
                    return Err(MessagingError::resource(
                        path,
                        "path must stay inside the resource directory",
                    ));
                }
            }
        }
        Ok(resolved)
    }
}

#[async_trait]
impl ResourceLoader for FsResourceLoader {
    async fn open(&self, path: &str) -> Result<Option<AttachmentStream>, MessagingError> {
        let resolved = self.resolve(path)?;
        match tokio::fs::File::open(&resolved).await {
            Ok(file) => {
                debug!(path, resolved = %resolved.display(), "opened workflow resource");
                Ok(Some(Box::pin(file)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path, resolved = %resolved.display(), "workflow resource not found");
                Ok(None)
            }
            Err(e) => Err(MessagingError::resource(path, e)),
        }
    }
}
