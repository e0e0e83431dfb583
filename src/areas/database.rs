//! Object store
//!
//! Content-addressed storage for blobs and commits. Each object is written
//! zlib-compressed to `objects/<first 2 hex>/<remaining 38 hex>`; writing an
//! object that is already present is a no-op, and new files are written to a
//! temporary name first and renamed into place.

use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Whether an object with this id is present in the store
    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Store an object and return its id
    ///
    /// Storing the same object twice leaves the store unchanged.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        if !object_path.exists() {
            let object_content = object.serialize()?;

            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object_content)?;
        }

        Ok(object_id)
    }

    /// Load the raw (decompressed) bytes of an object, header included
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());
        if !object_path.is_file() {
            return Err(RepositoryError::ObjectNotFound(object_id.clone()).into());
        }

        self.read_object(object_path)
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(
                object_reader,
            )?))),
        }
    }

    /// Load a blob, failing if the id names another kind of object
    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        match self.parse_object(object_id)? {
            ObjectBox::Blob(blob) => Ok(*blob),
            ObjectBox::Commit(_) => anyhow::bail!("Object {object_id} is not a blob"),
        }
    }

    /// Load a commit, failing if the id names another kind of object
    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        match self.parse_object(object_id)? {
            ObjectBox::Commit(commit) => Ok(*commit),
            ObjectBox::Blob(_) => anyhow::bail!("Object {object_id} is not a commit"),
        }
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    /// Find all objects whose id starts with the given prefix
    ///
    /// Prefixes of two or more characters only scan the matching fan-out
    /// directory; shorter ones scan every directory.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();

        if prefix.len() < 2 {
            return Ok(self
                .list_objects()?
                .into_iter()
                .filter(|oid| oid.as_ref().starts_with(&prefix))
                .collect());
        }

        let mut matches = Vec::new();
        let (dir_name, file_prefix) = prefix.split_at(2);
        let dir_path = self.path.join(dir_name);

        if dir_path.is_dir() {
            for entry in std::fs::read_dir(&dir_path)? {
                let entry = entry?;
                let file_name = entry.file_name();
                let file_name_str = file_name.to_string_lossy();

                if file_name_str.starts_with(file_prefix)
                    && let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name_str}"))
                {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }

    /// Every object id in the store, in path order
    pub fn list_objects(&self) -> anyhow::Result<Vec<ObjectId>> {
        let mut objects = Vec::new();

        for entry in WalkDir::new(&self.path)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let dir_name = entry
                .path()
                .parent()
                .and_then(|parent| parent.file_name())
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            let file_name = entry.file_name().to_string_lossy();

            // temp files and other strays do not parse as ids
            if let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}")) {
                objects.push(oid);
            }
        }

        Ok(objects)
    }

    /// Every commit in the store, in path order
    pub fn list_commits(&self) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        let mut commits = Vec::new();

        for oid in self.list_objects()? {
            if let ObjectBox::Commit(commit) = self.parse_object(&oid)? {
                commits.push((oid, *commit));
            }
        }

        Ok(commits)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_content = self.load(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::core::config::epoch_timestamp;
    use crate::artifacts::objects::commit::Snapshot;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn objects_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().to_path_buf().into_boxed_path())
    }

    #[rstest]
    fn stored_blob_loads_back(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let blob = Blob::new("a.txt".to_string(), Bytes::from_static(b"hello"));

        let oid = database.store(&blob).unwrap();

        assert_eq!(oid, blob.object_id().unwrap());
        assert!(database.contains(&oid));
        assert_eq!(database.parse_object_as_blob(&oid).unwrap(), blob);
        assert_eq!(database.get_object_type(&oid).unwrap(), ObjectType::Blob);
    }

    #[rstest]
    fn storing_twice_is_idempotent(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let blob = Blob::new("a.txt".to_string(), Bytes::from_static(b"hello"));

        let first = database.store(&blob).unwrap();
        let second = database.store(&blob).unwrap();

        assert_eq!(first, second);
        assert_eq!(database.list_objects().unwrap(), vec![first]);
    }

    #[rstest]
    fn loading_a_missing_object_reports_object_not_found(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = ObjectId::try_parse("f".repeat(40)).unwrap();

        let error = database.load(&oid).unwrap_err();

        assert!(matches!(
            RepositoryError::kind_of(&error),
            Some(RepositoryError::ObjectNotFound(missing)) if *missing == oid
        ));
    }

    #[rstest]
    fn prefix_search_and_commit_listing(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let blob = Blob::new("a.txt".to_string(), Bytes::from_static(b"hello"));
        let commit = Commit::new(
            None,
            None,
            Snapshot::new(),
            epoch_timestamp().unwrap(),
            "initial commit".to_string(),
        );

        let blob_oid = database.store(&blob).unwrap();
        let commit_oid = database.store(&commit).unwrap();

        assert_eq!(
            database.find_objects_by_prefix(&commit_oid.as_ref()[..6]).unwrap(),
            vec![commit_oid.clone()]
        );
        assert_eq!(
            database
                .find_objects_by_prefix(&blob_oid.as_ref().to_ascii_uppercase())
                .unwrap(),
            vec![blob_oid]
        );
        assert_eq!(database.list_commits().unwrap(), vec![(commit_oid, commit)]);
    }
}
