use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::core::config::METADATA_DIR;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [METADATA_DIR, ".", ".."];

/// The working tree
///
/// Files are addressed by their name relative to the repository root, with
/// `/` as the separator.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every file in the working tree, sorted by name
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        let mut files = WalkDir::new(&self.path)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || !Self::is_ignored(entry.file_name().to_string_lossy().as_ref())
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.file_name_of(entry.path()))
            .collect::<Vec<_>>();

        files.sort();
        Ok(files)
    }

    /// Canonical name of a user-supplied file path
    ///
    /// `.` and `..` components are folded, and absolute paths must lie under
    /// the working tree. Names that escape the working tree or point into
    /// the metadata directory fail with `InvalidFilePath`.
    pub fn normalize_name(&self, name: &str) -> anyhow::Result<String> {
        let invalid = || RepositoryError::InvalidFilePath(name.to_string());

        let path = Path::new(name);
        let relative_path = if path.is_absolute() {
            path.strip_prefix(self.path.as_ref()).map_err(|_| invalid())?
        } else {
            path
        };

        let mut components: Vec<&str> = Vec::new();
        for component in relative_path.components() {
            match component {
                Component::Normal(part) => components.push(part.to_str().ok_or_else(invalid)?),
                Component::CurDir => {}
                Component::ParentDir => {
                    components.pop().ok_or_else(invalid)?;
                }
                Component::RootDir | Component::Prefix(_) => return Err(invalid().into()),
            }
        }

        match components.first() {
            None => Err(invalid().into()),
            Some(first) if Self::is_ignored(first) => Err(invalid().into()),
            Some(_) => Ok(components.join("/")),
        }
    }

    pub fn file_exists(&self, name: &str) -> bool {
        self.path.join(name).is_file()
    }

    /// Read a working file, failing with `FileNotFound` if it is missing
    pub fn read_file(&self, name: &str) -> anyhow::Result<Bytes> {
        if !self.file_exists(name) {
            return Err(RepositoryError::FileNotFound(name.to_string()).into());
        }

        let content = std::fs::read(self.path.join(name))
            .with_context(|| format!("Failed to read file: {name}"))?;

        Ok(Bytes::from(content))
    }

    pub fn parse_blob(&self, name: &str) -> anyhow::Result<Blob> {
        let content = self.read_file(name)?;
        Ok(Blob::new(name.to_string(), content))
    }

    /// Create or overwrite a working file, creating its parent directories
    pub fn write_file(&self, name: &str, content: &[u8]) -> anyhow::Result<()> {
        let path = self.path.join(name);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for file: {name}"))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to open file: {name}"))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to file: {name}"))
    }

    /// Delete a working file if present, pruning directories it leaves empty
    pub fn remove_file(&self, name: &str) -> anyhow::Result<()> {
        let path = self.path.join(name);
        if !path.is_file() {
            return Ok(());
        }

        std::fs::remove_file(&path).with_context(|| format!("Failed to remove file: {name}"))?;
        self.prune_empty_parent_dirs(&path)
    }

    /// Bring the working tree to the migration's target snapshot
    ///
    /// Deletions run before writes, so a file replaced by a directory of the
    /// same name (or the reverse) does not collide.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for (name, _) in migration.actions_of(ActionType::Delete) {
            self.remove_file(name)?;
        }

        for action in [ActionType::Modify, ActionType::Add] {
            for (name, oid) in migration.actions_of(action) {
                let oid = oid
                    .as_ref()
                    .with_context(|| format!("Missing blob for file: {name}"))?;
                let blob = migration.load_blob(oid)?;
                self.write_file(name, blob.content())?;
            }
        }

        Ok(())
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.starts_with(&self.path)
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("Failed to remove empty directory: {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn is_ignored(name: &str) -> bool {
        IGNORED_PATHS.contains(&name)
    }

    fn file_name_of(&self, path: &Path) -> Option<String> {
        let relative_path = path.strip_prefix(self.path.as_ref()).ok()?;

        let components = relative_path
            .components()
            .map(|component| match component {
                Component::Normal(name) => name.to_str().map(str::to_string),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;

        Some(components.join("/"))
    }
}
