use crate::areas::database::Database;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;

/// A commit id as typed by the user: the full 40 hex digits or a prefix
///
/// A prefix resolves when exactly one stored commit starts with it. Blobs
/// sharing the prefix are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(String);

impl Revision {
    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        let revision = revision.trim();

        if revision.is_empty()
            || revision.len() > OBJECT_ID_LENGTH
            || !revision.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(RepositoryError::AmbiguousOrUnknownCommitId(revision.to_string()).into());
        }

        Ok(Revision(revision.to_ascii_lowercase()))
    }

    pub fn resolve(&self, database: &Database) -> anyhow::Result<ObjectId> {
        let mut candidates = database
            .find_objects_by_prefix(&self.0)?
            .into_iter()
            .filter(|oid| {
                database
                    .get_object_type(oid)
                    .map(|object_type| object_type == ObjectType::Commit)
                    .unwrap_or(false)
            })
            .collect::<Vec<_>>();

        match candidates.len() {
            1 => Ok(candidates.remove(0)),
            _ => Err(RepositoryError::AmbiguousOrUnknownCommitId(self.0.clone()).into()),
        }
    }
}

impl AsRef<str> for Revision {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::core::config::epoch_timestamp;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::commit::{Commit, Snapshot};
    use assert_fs::TempDir;
    use bytes::Bytes;
    use proptest::prelude::*;
    use rstest::rstest;

    fn unknown(error: &anyhow::Error) -> bool {
        matches!(
            RepositoryError::kind_of(error),
            Some(RepositoryError::AmbiguousOrUnknownCommitId(_))
        )
    }

    #[rstest]
    #[case("")]
    #[case("xyz")]
    #[case("master")]
    fn rejects_non_hex_revisions(#[case] revision: &str) {
        assert!(unknown(&Revision::try_parse(revision).unwrap_err()));
    }

    #[test]
    fn resolves_commits_but_not_blobs() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().to_path_buf().into_boxed_path());
        let commit = Commit::new(
            None,
            None,
            Snapshot::new(),
            epoch_timestamp().unwrap(),
            "initial commit".to_string(),
        );
        let blob = Blob::new("a.txt".to_string(), Bytes::from_static(b"a"));

        let commit_oid = database.store(&commit).unwrap();
        let blob_oid = database.store(&blob).unwrap();

        let short = Revision::try_parse(&commit_oid.as_ref()[..8]).unwrap();
        assert_eq!(short.resolve(&database).unwrap(), commit_oid);

        let blob_revision = Revision::try_parse(blob_oid.as_ref()).unwrap();
        assert!(unknown(&blob_revision.resolve(&database).unwrap_err()));
    }

    proptest! {
        #[test]
        fn hex_prefixes_parse_lowercased(revision in "[0-9a-fA-F]{1,40}") {
            let parsed = Revision::try_parse(&revision).unwrap();
            prop_assert_eq!(parsed.as_ref(), revision.to_ascii_lowercase());
        }
    }
}
