//! Object types and operations
//!
//! Everything the repository stores is an immutable object identified by the
//! SHA-1 hash of its serialized form. There are two object types:
//!
//! - **Blob**: A named file's raw content
//! - **Commit**: A snapshot (file name to blob id) with a message, a timestamp
//!   and one or two parent commits
//!
//! All objects serialize to `<type> <size>\0<body>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated object id shown in merge log lines
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
