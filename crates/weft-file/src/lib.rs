//! # Weft File
//!
//! Filesystem adapter for the Weft messaging framework: turns a watched
//! directory into a deduplicated message stream.
//!
//! A [`FileSource`] re-lists its directory once per period, passes every
//! regular file through an ordered [`FilterChain`] (glob pattern match,
//! process-lifetime accept-once dedup), and publishes one
//! [`Message<FileEntry>`](weft_core::Message) per accepted entry on its
//! output channel. [`FileWriter`] is the matching terminal handler that
//! appends delivered entries to one output file.
//!
//! ```text
//! ┌───────────┐  every period   ┌──────────────┐  accepted   ┌─────────┐
//! │ directory │ ───────────────▶│ filter chain │ ───────────▶│ channel │
//! └───────────┘   full listing  └──────────────┘  entries    └─────────┘
//! ```

pub mod entry;
pub mod error;
pub mod filter;
pub mod source;
pub mod writer;

pub use entry::FileEntry;
pub use error::{SourceError, SourceResult};
pub use filter::{AcceptOnceFilter, EntryFilter, FilterChain, PatternFilter};
pub use source::{FileSource, FileSourceBuilder};
pub use writer::FileWriter;
