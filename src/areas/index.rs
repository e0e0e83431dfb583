//! Staging area (index)
//!
//! The index tracks what the next commit will change relative to the current
//! commit's snapshot:
//!
//! - `additions`: file name to the blob that will be committed for it
//! - `removals`: names that the next commit drops
//! - `untracked`: names that were explicitly removed from version control
//!
//! A name is never staged for addition and removal at the same time.
//!
//! ## Index File Format
//!
//! See [`crate::artifacts::index`]. The file is read under a shared lock,
//! written under an exclusive lock, and carries a SHA-1 checksum trailer that
//! is verified on load.

use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::{ENTRY_FIXED_SIZE, EntryKind, IndexEntry};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::anyhow;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::DerefMut;
use std::path::Path;

/// What `stage_remove` did with the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// A pending addition was discarded; the working copy stays
    Unstaged,
    /// The file is staged for removal; the caller deletes the working copy
    StagedForRemoval,
}

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (`.twig/index`)
    path: Box<Path>,
    additions: BTreeMap<String, ObjectId>,
    removals: BTreeSet<String>,
    untracked: BTreeSet<String>,
    /// Whether the index was modified since it was loaded
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            additions: BTreeMap::new(),
            removals: BTreeSet::new(),
            untracked: BTreeSet::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn additions(&self) -> &BTreeMap<String, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeSet<String> {
        &self.removals
    }

    pub fn untracked(&self) -> &BTreeSet<String> {
        &self.untracked
    }

    pub fn is_staged_for_addition(&self, name: &str) -> bool {
        self.additions.contains_key(name)
    }

    pub fn is_marked_untracked(&self, name: &str) -> bool {
        self.untracked.contains(name)
    }

    pub fn has_changed(&self) -> bool {
        self.changed
    }

    /// No pending additions or removals
    pub fn is_clean(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    /// Stage `name` with blob `oid` against the current commit's snapshot
    ///
    /// Staging the blob the current commit already records cancels any pending
    /// addition for the name instead of recording one.
    pub fn stage_add(&mut self, name: &str, oid: ObjectId, head: &Snapshot) {
        self.removals.remove(name);
        self.untracked.remove(name);

        if head.get(name) == Some(&oid) {
            self.additions.remove(name);
        } else {
            self.additions.insert(name.to_string(), oid);
        }

        self.changed = true;
    }

    /// Unstage a pending addition or stage the removal of a tracked file
    pub fn stage_remove(&mut self, name: &str, head: &Snapshot) -> anyhow::Result<RemovalOutcome> {
        let was_staged = self.additions.remove(name).is_some();
        let is_tracked = head.contains_key(name);

        if !was_staged && !is_tracked {
            return Err(RepositoryError::NothingToRemove(name.to_string()).into());
        }

        self.untracked.insert(name.to_string());
        self.changed = true;

        if is_tracked {
            self.removals.insert(name.to_string());
            Ok(RemovalOutcome::StagedForRemoval)
        } else {
            Ok(RemovalOutcome::Unstaged)
        }
    }

    /// Apply the pending removals and additions onto a copy of `snapshot`
    pub fn materialize(&self, snapshot: &Snapshot) -> Snapshot {
        let mut materialized = snapshot.clone();

        for name in &self.removals {
            materialized.remove(name);
        }
        for (name, oid) in &self.additions {
            materialized.insert(name.clone(), oid.clone());
        }

        materialized
    }

    /// Forget every pending change and untracked mark
    pub fn clear(&mut self) {
        self.additions.clear();
        self.removals.clear();
        self.untracked.clear();
        self.changed = true;
    }

    /// Load the index from disk
    ///
    /// A missing or empty index file is an empty staging area.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the index file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.reset();

        if !self.path().exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(lock);
        let entries_count = Self::parse_header(&mut reader)?;
        self.parse_entries(entries_count, &mut reader)?;

        reader.verify()
    }

    /// Persist the index if it was modified since it was loaded
    ///
    /// # Locking
    ///
    /// Acquires an exclusive lock on the index file during writing.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;
        let lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let entries = self.entries();
        let mut writer = Checksum::new(lock);

        let header = IndexHeader::new(String::from(SIGNATURE), VERSION, entries.len() as u32);
        writer.write(&header.serialize()?)?;

        for entry in entries {
            writer.write(&entry.serialize()?)?;
        }

        writer.write_checksum()?;
        self.changed = false;

        Ok(())
    }

    /// Entries in the order they are written: additions, removals, untracked
    fn entries(&self) -> Vec<IndexEntry> {
        let additions = self
            .additions
            .iter()
            .map(|(name, oid)| IndexEntry::added(name.clone(), oid.clone()));
        let removals = self
            .removals
            .iter()
            .map(|name| IndexEntry::removed(name.clone()));
        let untracked = self
            .untracked
            .iter()
            .map(|name| IndexEntry::untracked(name.clone()));

        additions.chain(removals).chain(untracked).collect()
    }

    fn reset(&mut self) {
        self.additions.clear();
        self.removals.clear();
        self.untracked.clear();
        self.changed = false;
    }

    fn parse_header(reader: &mut Checksum) -> anyhow::Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = IndexHeader::deserialize(std::io::Cursor::new(header_bytes))?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("Invalid index file signature"));
        }

        if header.version != VERSION {
            return Err(anyhow!(
                "Unsupported index file version: {}",
                header.version
            ));
        }

        Ok(header.entries_count)
    }

    fn parse_entries(&mut self, entries_count: u32, reader: &mut Checksum) -> anyhow::Result<()> {
        for _ in 0..entries_count {
            let fixed_part = reader.read(ENTRY_FIXED_SIZE)?;
            let name_length = IndexEntry::name_length(&fixed_part)?;
            let name = reader.read(name_length)?;

            let entry_bytes = [fixed_part.to_vec(), name.to_vec()].concat();
            let entry = IndexEntry::deserialize(std::io::Cursor::new(entry_bytes))?;

            match entry.kind {
                EntryKind::Added(oid) => {
                    self.additions.insert(entry.name, oid);
                }
                EntryKind::Removed => {
                    self.removals.insert(entry.name);
                }
                EntryKind::Untracked => {
                    self.untracked.insert(entry.name);
                }
            }
        }

        if self.additions.keys().any(|name| self.removals.contains(name)) {
            return Err(anyhow!("Index stages a file for both addition and removal"));
        }

        Ok(())
    }
}
