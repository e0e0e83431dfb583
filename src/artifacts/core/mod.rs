//! Core utilities and shared types
//!
//! - `config`: Repository layout constants and environment overrides
//! - `errors`: The error kinds surfaced to callers of the repository

pub mod config;
pub mod errors;

/// Macro for debug logging that is enabled with the debug_merge feature flag
///
/// # Usage
/// ```rust,ignore
/// debug_log!("Processing commit {}", commit_id);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            eprintln!($($arg)*);
        }
    };
}
