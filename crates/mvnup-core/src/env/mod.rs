//! Persistent environment-variable store.
//!
//! The OS-level environment table is global mutable state, so it sits
//! behind a narrow interface: [`EnvStore::get`] and [`EnvStore::set`] at a
//! chosen scope. [`SystemEnv`] talks to the real machine; [`MemoryEnv`] is
//! an in-memory substitute for tests.

mod memory;
mod system;

pub use memory::MemoryEnv;
pub use system::SystemEnv;

use crate::Result;

/// Visibility level of a persisted environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvScope {
    /// Visible to the current user's sessions.
    User,
    /// Visible to every user and process on the host.
    Machine,
}

impl std::fmt::Display for EnvScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvScope::User => write!(f, "user"),
            EnvScope::Machine => write!(f, "machine"),
        }
    }
}

/// Store of persistent, scoped environment variables.
pub trait EnvStore {
    /// Read a variable at the given scope. `Ok(None)` if unset.
    fn get(&self, name: &str, scope: EnvScope) -> Result<Option<String>>;

    /// Write a variable at the given scope, replacing any previous value.
    fn set(&self, name: &str, value: &str, scope: EnvScope) -> Result<()>;
}

/// Name of the search-path variable on this platform.
pub const PATH_VAR: &str = if cfg!(windows) { "Path" } else { "PATH" };

/// Separator between search-path entries on this platform.
pub const PATH_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Append `entry` to a search-path value unless it is already present.
///
/// Returns the updated value, or `None` when the entry is already there,
/// so repeated runs never duplicate it. Entries are compared whole, not
/// by substring, and case-insensitively on Windows.
pub fn append_entry(current: &str, entry: &str) -> Option<String> {
    let present = current
        .split(PATH_SEPARATOR)
        .any(|existing| !existing.is_empty() && entry_matches(existing.trim(), entry));

    if present {
        return None;
    }

    if current.is_empty() {
        Some(entry.to_string())
    } else {
        Some(format!("{}{}{}", current, PATH_SEPARATOR, entry))
    }
}

fn entry_matches(a: &str, b: &str) -> bool {
    if cfg!(windows) {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}
