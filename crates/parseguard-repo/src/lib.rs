//! Filesystem adapters for parseguard: glob expansion and list files.
//!
//! Everything returned from here is already normalized to [`RepoPath`] relative to the base
//! directory the caller supplies; no process-wide state is consulted.

#![forbid(unsafe_code)]

mod list;
mod pattern;
mod resolve;

pub use list::{read_list_file, write_list_file};
pub use pattern::PatternSet;
pub use resolve::{FileSetSource, ListKind, resolve_file_set};

pub use parseguard_types::{FileSet, RepoPath};
