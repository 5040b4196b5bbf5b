use crate::core_ftpcommand::error::FtpError;
use log::warn;
use std::path::{Component, Path, PathBuf};

/// Maps sandbox-relative paths onto the real file system.
///
/// Every command that touches the file system goes through `resolve`; the
/// returned path is always the sandbox root or one of its descendants.
#[derive(Debug, Clone)]
pub struct PathJail {
    root: PathBuf,
}

impl PathJail {
    /// `root` should already be canonical (see `PathJail::open`); it is only
    /// normalized lexically here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: normalize(&root.into()),
        }
    }

    /// Canonicalizes an existing directory and uses it as the sandbox root.
    pub fn open(root: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self::new(root.as_ref().canonicalize()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `requested` against the working directory without touching
    /// the file system. A leading `/` makes `requested` sandbox-absolute.
    pub fn resolve(&self, working_dir: &str, requested: &str) -> Result<PathBuf, FtpError> {
        let mut joined = self.root.clone();
        if !requested.starts_with('/') {
            joined.push(working_dir.trim_start_matches('/'));
        }
        joined.push(requested.trim_start_matches('/'));

        let normalized = normalize(&joined);
        // Path::starts_with compares whole components
        if !normalized.starts_with(&self.root) {
            warn!(
                "Rejected path {:?} from working directory {:?}: outside the sandbox",
                requested, working_dir
            );
            return Err(FtpError::AccessDenied);
        }
        Ok(normalized)
    }

    /// Resolves `requested` and checks it is an existing directory. Returns
    /// the new working directory, relative to the sandbox root.
    pub fn change_directory(&self, working_dir: &str, requested: &str) -> Result<String, FtpError> {
        let resolved = self.resolve(working_dir, requested)?;
        if !resolved.is_dir() {
            return Err(FtpError::NotADirectory(requested.to_string()));
        }
        Ok(self.to_virtual(&resolved))
    }

    /// Expresses a resolved path as a `/`-rooted sandbox path.
    pub fn to_virtual(&self, resolved: &Path) -> String {
        let relative = resolved.strip_prefix(&self.root).unwrap_or(Path::new(""));
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        format!("/{}", parts.join("/"))
    }
}

/// Collapses `.`, `..` and repeated separators. `..` never climbs above the
/// file-system root.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                normalized.push(component.as_os_str())
            }
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
        }
    }
    normalized
}
