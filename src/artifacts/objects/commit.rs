//! Commit object
//!
//! Commits record a snapshot of the repository at a point in time. They contain:
//! - A parent commit ID (absent only for the root commit)
//! - A second, merge parent ID for merge commits
//! - The creation timestamp
//! - The snapshot: file name to blob ID, kept sorted by name
//! - The commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>
//! merge <merge-parent-sha>
//! date <unix-seconds> <+hhmm>
//! file <blob-sha> <name>
//! file <blob-sha> <name>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable, with_header};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;
use std::io::BufRead;

/// Mapping from file name to blob ID
pub type Snapshot = BTreeMap<String, ObjectId>;

/// Human-readable timestamp format, e.g. `Thu Nov 9 20:00:05 2017 -0800`
const READABLE_TIMESTAMP_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// Slim representation of a commit
///
/// Contains only what the merge base search needs: the commit's id and the
/// ids of its parents (first parent, then the merge parent if any).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    /// The commit's object ID
    pub oid: ObjectId,
    /// The commit's parent object IDs
    pub parents: Vec<ObjectId>,
}

/// Commit object
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit ID, `None` for the root commit
    parent: Option<ObjectId>,
    /// Second parent, present only on merge commits
    merge_parent: Option<ObjectId>,
    /// Creation time
    timestamp: DateTime<FixedOffset>,
    /// File name to blob ID
    snapshot: Snapshot,
    /// Commit message
    message: String,
}

impl Commit {
    /// Create a new commit
    ///
    /// # Arguments
    ///
    /// * `parent` - Parent commit ID (None for the root commit)
    /// * `merge_parent` - Second parent ID (Some only for merge commits)
    /// * `snapshot` - File name to blob ID mapping
    /// * `timestamp` - Creation time
    /// * `message` - Commit message
    pub fn new(
        parent: Option<ObjectId>,
        merge_parent: Option<ObjectId>,
        snapshot: Snapshot,
        timestamp: DateTime<FixedOffset>,
        message: String,
    ) -> Self {
        Commit {
            parent,
            merge_parent,
            timestamp,
            snapshot,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn merge_parent(&self) -> Option<&ObjectId> {
        self.merge_parent.as_ref()
    }

    /// All parents, first parent first
    pub fn parents(&self) -> Vec<&ObjectId> {
        self.parent.iter().chain(self.merge_parent.iter()).collect()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_merge(&self) -> bool {
        self.merge_parent.is_some()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Blob ID recorded for `name`, if the commit tracks it
    pub fn blob_oid(&self, name: &str) -> Option<&ObjectId> {
        self.snapshot.get(name)
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Wed Dec 31 16:00:00 1969 -0800"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format(READABLE_TIMESTAMP_FORMAT).to_string()
    }

    pub fn to_slim(&self, oid: ObjectId) -> SlimCommit {
        SlimCommit {
            oid,
            parents: self.parents().into_iter().cloned().collect(),
        }
    }

    fn parse_date(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
        let (seconds, offset) = value
            .split_once(' ')
            .context("Invalid commit object: invalid date line")?;
        let seconds = seconds
            .parse::<i64>()
            .context("Invalid commit object: invalid timestamp")?;
        let offset = parse_offset(offset)?;

        let datetime = DateTime::from_timestamp(seconds, 0)
            .context("Invalid commit object: timestamp out of range")?;

        Ok(datetime.with_timezone(&offset))
    }
}

/// Parse a `+hhmm` / `-hhmm` UTC offset
fn parse_offset(value: &str) -> anyhow::Result<FixedOffset> {
    let invalid = || anyhow::anyhow!("Invalid timezone offset: {value}");

    if value.len() != 5 || !value.is_ascii() {
        return Err(invalid());
    }

    let sign = match &value[..1] {
        "+" => 1,
        "-" => -1,
        _ => return Err(invalid()),
    };
    let hours = value[1..3].parse::<i32>().map_err(|_| invalid())?;
    let minutes = value[3..5].parse::<i32>().map_err(|_| invalid())?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut object_content = vec![];

        if let Some(parent) = &self.parent {
            object_content.push(format!("parent {}", parent.as_ref()));
        }
        if let Some(merge_parent) = &self.merge_parent {
            object_content.push(format!("merge {}", merge_parent.as_ref()));
        }
        object_content.push(format!(
            "date {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for (name, blob_oid) in &self.snapshot {
            object_content.push(format!("file {} {}", blob_oid.as_ref(), name));
        }
        object_content.push(String::new());
        object_content.push(self.message.to_string());

        let object_content = object_content.join("\n");

        Ok(with_header(self.object_type(), object_content.as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let (headers, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;

        let mut parent = None;
        let mut merge_parent = None;
        let mut timestamp = None;
        let mut snapshot = Snapshot::new();

        for line in headers.lines() {
            let (key, value) = line
                .split_once(' ')
                .with_context(|| format!("Invalid commit object: malformed line '{line}'"))?;

            match key {
                "parent" => parent = Some(ObjectId::try_parse(value.to_string())?),
                "merge" => merge_parent = Some(ObjectId::try_parse(value.to_string())?),
                "date" => timestamp = Some(Self::parse_date(value)?),
                "file" => {
                    let (blob_oid, name) = value
                        .split_once(' ')
                        .context("Invalid commit object: invalid file line")?;
                    snapshot.insert(name.to_string(), ObjectId::try_parse(blob_oid.to_string())?);
                }
                _ => anyhow::bail!("Invalid commit object: unknown header '{key}'"),
            }
        }

        let timestamp = timestamp.context("Invalid commit object: missing date line")?;

        Ok(Self::new(
            parent,
            merge_parent,
            snapshot,
            timestamp,
            message.to_string(),
        ))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
