//! Folder-to-video assembly.
//!
//! Sources are listed, sorted by file name and turned into one frame each; files that fail to
//! parse are skipped and recorded rather than aborting the run.

/// Folder-level video generation with output reuse.
pub mod folder;
/// Serializable assembly options.
pub mod opts;
/// Source listing and the exclusion set.
pub mod sources;
/// The assembly loop.
pub mod video;
