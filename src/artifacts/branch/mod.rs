//! Branch names and commit id lookup
//!
//! - `branch_name`: Validated branch names and the `refs/heads/` ref paths they map to
//! - `revision`: Resolution of full or abbreviated commit ids typed by the user

pub mod branch_name;
pub mod revision;

pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Directory prefix of branch refs, relative to the metadata directory
pub const REF_PREFIX: &str = "refs/heads/";
