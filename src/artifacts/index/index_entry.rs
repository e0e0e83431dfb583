//! Index entry representation
//!
//! Each entry records one name in the staging area together with how it is
//! staged: as an addition (with the blob to commit), as a removal, or as a
//! name that is known to be untracked.

use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::anyhow;
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use std::io::{BufRead, Write};

/// Fixed-size part of an entry: kind byte, 20-byte blob id, 2-byte name length
pub const ENTRY_FIXED_SIZE: usize = 23;

/// Longest name an entry can hold
const MAX_NAME_SIZE: usize = u16::MAX as usize;

const ADDED: u8 = 0;
const REMOVED: u8 = 1;
const UNTRACKED: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Staged for addition with the given blob
    Added(ObjectId),
    /// Staged for removal from the next commit
    Removed,
    /// Marked untracked
    Untracked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl IndexEntry {
    pub fn added(name: String, oid: ObjectId) -> Self {
        IndexEntry {
            name,
            kind: EntryKind::Added(oid),
        }
    }

    pub fn removed(name: String) -> Self {
        IndexEntry {
            name,
            kind: EntryKind::Removed,
        }
    }

    pub fn untracked(name: String) -> Self {
        IndexEntry {
            name,
            kind: EntryKind::Untracked,
        }
    }

    /// Length of the name that follows the fixed-size part
    pub fn name_length(fixed_part: &[u8]) -> anyhow::Result<usize> {
        if fixed_part.len() < ENTRY_FIXED_SIZE {
            return Err(anyhow!("Truncated index entry"));
        }

        let length = &fixed_part[ENTRY_FIXED_SIZE - 2..ENTRY_FIXED_SIZE];
        Ok(u16::from_be_bytes([length[0], length[1]]) as usize)
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let name = self.name.as_bytes();
        if name.len() > MAX_NAME_SIZE {
            return Err(anyhow!("File name too long for the index: {}", self.name));
        }

        let mut bytes = Vec::with_capacity(ENTRY_FIXED_SIZE + name.len());

        match &self.kind {
            EntryKind::Added(oid) => {
                bytes.write_u8(ADDED)?;
                oid.write_h40_to(&mut bytes)?;
            }
            EntryKind::Removed => {
                bytes.write_u8(REMOVED)?;
                bytes.write_all(&[0u8; 20])?;
            }
            EntryKind::Untracked => {
                bytes.write_u8(UNTRACKED)?;
                bytes.write_all(&[0u8; 20])?;
            }
        }

        bytes.write_u16::<NetworkEndian>(name.len() as u16)?;
        bytes.write_all(name)?;

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for IndexEntry {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let kind = reader.read_u8()?;
        let oid = ObjectId::read_h40_from(&mut reader)?;
        let name_length = reader.read_u16::<NetworkEndian>()? as usize;

        let mut name = vec![0u8; name_length];
        reader
            .read_exact(&mut name)
            .map_err(|_| anyhow!("Truncated index entry name"))?;
        let name = String::from_utf8(name).map_err(|_| anyhow!("Invalid index entry name"))?;

        let kind = match kind {
            ADDED => EntryKind::Added(oid),
            REMOVED => EntryKind::Removed,
            UNTRACKED => EntryKind::Untracked,
            other => return Err(anyhow!("Unknown index entry kind: {other}")),
        };

        Ok(IndexEntry { name, kind })
    }
}
