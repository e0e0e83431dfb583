//! Blob object
//!
//! Blobs store a file's content together with the file name it was added
//! under, so the same bytes stored under two names are two distinct blobs.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<name>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable, with_header};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

/// Blob object representing a named file's content
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    /// Logical file name, relative to the repository root
    name: String,
    /// Raw file content
    content: Bytes,
}

impl Blob {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut body = Vec::with_capacity(self.name.len() + 1 + self.content.len());
        body.extend_from_slice(self.name.as_bytes());
        body.push(b'\0');
        body.extend_from_slice(&self.content);

        Ok(with_header(self.object_type(), &body))
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let mut name = Vec::new();
        reader.read_until(b'\0', &mut name)?;
        if name.pop() != Some(b'\0') {
            anyhow::bail!("Invalid blob object: missing name terminator");
        }

        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Self::new(String::from_utf8(name)?, Bytes::from(content)))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[test]
    fn serialized_form_carries_header_name_and_content() {
        let blob = Blob::new("a.txt".to_string(), Bytes::from_static(b"hello"));

        assert_eq!(
            blob.serialize().unwrap(),
            Bytes::from_static(b"blob 11\0a.txt\0hello")
        );
    }

    #[test]
    fn same_content_under_another_name_is_another_blob() {
        let a = Blob::new("a.txt".to_string(), Bytes::from_static(b"hello"));
        let b = Blob::new("b.txt".to_string(), Bytes::from_static(b"hello"));

        assert_ne!(a.object_id().unwrap(), b.object_id().unwrap());
    }

    #[test]
    fn deserializes_body_after_header() {
        let blob = Blob::new("notes/a.txt".to_string(), Bytes::from_static(b"x\0y"));
        let mut reader = Cursor::new(blob.serialize().unwrap());

        assert_eq!(
            ObjectType::parse_object_type(&mut reader).unwrap(),
            ObjectType::Blob
        );
        assert_eq!(Blob::deserialize(reader).unwrap(), blob);
    }

    proptest! {
        #[test]
        fn digest_depends_only_on_name_and_content(
            name in "[a-z]{1,8}\\.txt",
            content in proptest::collection::vec(any::<u8>(), 0..64)
        ) {
            let first = Blob::new(name.clone(), Bytes::from(content.clone()));
            let second = Blob::new(name, Bytes::from(content));

            prop_assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
        }
    }
}
